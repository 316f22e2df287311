//! Cluster lifecycle through `ClusterManager` with in-memory fakes.

use std::sync::Arc;

use hind::adapter::outbound::memory::MemoryStore;
use hind::application::StartOutcome;
use hind::domain::{ClusterHealth, ContainerStatus};
use hind::error::{Error, ResourceKind};
use hind::port::{ConfigStore, ContainerOps};
use hind::testkit::domain::cluster;
use hind::testkit::domain::manager;
use hind::testkit::runtime::{FakeRuntime, RuntimeCall};

fn fakes() -> (Arc<FakeRuntime>, Arc<MemoryStore>) {
    (Arc::new(FakeRuntime::new()), Arc::new(MemoryStore::new()))
}

#[tokio::test]
async fn demo_cluster_comes_up_with_four_running_nodes() {
    let (runtime, store) = fakes();
    let mut m = manager("demo", &runtime, &store);

    assert_eq!(m.start().await.unwrap(), StartOutcome::Created);

    assert!(runtime.network("hind.demo").is_some());
    assert_eq!(
        runtime.container_names(),
        vec![
            "hind.demo.client.01",
            "hind.demo.consul.01",
            "hind.demo.nomad.01",
            "hind.demo.vault.01",
        ]
    );

    let info = m.get().await.unwrap();
    assert_eq!(info.network.as_ref().map(|n| n.name.as_str()), Some("hind.demo"));
    assert_eq!(info.containers.len(), 4);
    assert_eq!(info.running_count(), 4);
    assert_eq!(
        ClusterHealth::aggregate(&info.containers, m.config().nodes.len()),
        ClusterHealth::Running
    );
    assert!(store.exists("demo"));
    assert!(m.is_resident());
}

#[tokio::test]
async fn second_start_resumes_without_changes() {
    let (runtime, store) = fakes();
    let mut first = manager("demo", &runtime, &store);
    first.start().await.unwrap();
    let nodes = first.config().node_names();
    runtime.clear_calls();

    let mut second = manager("demo", &runtime, &store);
    assert_eq!(second.start().await.unwrap(), StartOutcome::Resumed);

    assert_eq!(second.config().node_names(), nodes);
    assert!(runtime.mutations().is_empty());
    assert_eq!(store.save_count(), 2);
}

#[tokio::test]
async fn start_after_stop_restarts_every_node() {
    let (runtime, store) = fakes();
    let mut m = manager("demo", &runtime, &store);
    m.start().await.unwrap();

    let report = m.stop().await.unwrap();
    assert_eq!(report.stopped, 4);
    assert_eq!(report.already_stopped, 0);
    runtime.clear_calls();

    let mut again = manager("demo", &runtime, &store);
    assert_eq!(again.start().await.unwrap(), StartOutcome::Resumed);
    let starts = runtime
        .mutations()
        .into_iter()
        .filter(|c| matches!(c, RuntimeCall::StartContainer(_)))
        .count();
    assert_eq!(starts, 4);
    assert_eq!(runtime.mutations().len(), 4);
}

#[tokio::test]
async fn stop_skips_missing_and_stopped_nodes() {
    let (runtime, store) = fakes();
    let mut m = manager("demo", &runtime, &store);
    m.start().await.unwrap();
    runtime.set_status("hind.demo.vault.01", ContainerStatus::Stopped);
    runtime.delete_container("hind.demo.client.01").await.unwrap();

    let report = m.stop().await.unwrap();
    assert_eq!(report.stopped, 2);
    assert_eq!(report.already_stopped, 1);
    assert_eq!(report.missing, 1);
}

#[tokio::test]
async fn stop_without_config_is_not_found() {
    let (runtime, store) = fakes();
    let mut m = manager("ghost", &runtime, &store);

    let err = m.stop().await.unwrap_err();
    assert!(err.is_not_found());
    assert!(runtime.mutations().is_empty());
}

#[tokio::test]
async fn delete_removes_nodes_network_and_config() {
    let (runtime, store) = fakes();
    let mut m = manager("demo", &runtime, &store);
    m.start().await.unwrap();
    runtime.clear_calls();

    let report = m.delete().await.unwrap();

    assert_eq!(report.deleted, 4);
    assert_eq!(report.missing, 0);
    assert!(report.network_deleted);

    let mut expected = Vec::new();
    for name in m.config().node_names() {
        expected.push(RuntimeCall::StopContainer(name.clone()));
        expected.push(RuntimeCall::DeleteContainer(name));
    }
    expected.push(RuntimeCall::DeleteNetwork("hind.demo".into()));
    assert_eq!(runtime.mutations(), expected);

    assert!(runtime.container_names().is_empty());
    assert!(!store.exists("demo"));
    assert!(store.list().unwrap().is_empty());
}

#[tokio::test]
async fn delete_does_not_stop_already_stopped_nodes() {
    let (runtime, store) = fakes();
    let mut m = manager("demo", &runtime, &store);
    m.start().await.unwrap();
    runtime.set_status("hind.demo.vault.01", ContainerStatus::Stopped);
    runtime.clear_calls();

    m.delete().await.unwrap();

    let mutations = runtime.mutations();
    assert!(!mutations.contains(&RuntimeCall::StopContainer("hind.demo.vault.01".into())));
    assert!(mutations.contains(&RuntimeCall::DeleteContainer("hind.demo.vault.01".into())));
    let stops = mutations
        .iter()
        .filter(|c| matches!(c, RuntimeCall::StopContainer(_)))
        .count();
    assert_eq!(stops, 3);
}

#[tokio::test]
async fn delete_surfaces_stop_failure_of_running_node() {
    let (runtime, store) = fakes();
    let mut m = manager("demo", &runtime, &store);
    m.start().await.unwrap();
    runtime.fail_on(
        RuntimeCall::StopContainer("hind.demo.consul.01".into()),
        "daemon refused",
    );
    runtime.clear_calls();

    let err = m.delete().await.unwrap_err();

    let message = err.to_string();
    assert!(message.contains("failed to stop node 'hind.demo.consul.01'"), "{message}");
    assert!(message.contains("daemon refused"), "{message}");
    assert!(!runtime
        .mutations()
        .contains(&RuntimeCall::DeleteContainer("hind.demo.consul.01".into())));
    assert!(runtime.container("hind.demo.consul.01").is_some());
    assert!(store.exists("demo"));
}

#[tokio::test]
async fn delete_without_config_is_not_found() {
    let (runtime, store) = fakes();
    let mut m = manager("ghost", &runtime, &store);

    let err = m.delete().await.unwrap_err();
    assert!(matches!(
        err.root(),
        Error::NotFound {
            kind: ResourceKind::Cluster,
            ..
        }
    ));
}

#[tokio::test]
async fn failed_reconcile_leaves_store_untouched() {
    let (runtime, store) = fakes();
    runtime.fail_on(
        RuntimeCall::CreateContainer("hind.demo.client.01".into()),
        "image not found",
    );
    let mut m = manager("demo", &runtime, &store);

    let err = m.start().await.unwrap_err();

    assert!(err.to_string().contains("image not found"), "{err}");
    assert!(!store.exists("demo"));
    assert_eq!(store.save_count(), 0);
    assert!(!m.is_resident());
}

#[tokio::test]
async fn unconverged_cluster_times_out_without_saving() {
    let runtime = Arc::new(FakeRuntime::new().with_created_status(ContainerStatus::Stopped));
    let store = Arc::new(MemoryStore::new());
    let mut m = manager("demo", &runtime, &store);

    let err = m.start().await.unwrap_err();

    assert!(err.is_timeout(), "{err}");
    assert_eq!(store.save_count(), 0);
}

#[tokio::test]
async fn scale_up_and_down_tracks_client_count() {
    let (runtime, store) = fakes();
    let mut m = manager("demo", &runtime, &store);
    m.start().await.unwrap();

    let summary = m.scale(3).await.unwrap();
    assert_eq!(summary.create, 2);
    assert_eq!(m.count_client_nodes(), 3);
    assert!(runtime.container("hind.demo.client.03").is_some());
    assert_eq!(store.saved("demo").unwrap().count_client_nodes(), 3);

    m.scale(1).await.unwrap();
    assert_eq!(m.count_client_nodes(), 1);
    assert!(runtime.container("hind.demo.client.02").is_none());
    assert!(runtime.container("hind.demo.client.03").is_none());
    assert!(runtime.container("hind.demo.consul.01").is_some());
    assert_eq!(store.saved("demo").unwrap().count_client_nodes(), 1);
}

#[tokio::test]
async fn scale_to_current_count_is_a_no_op() {
    let (runtime, store) = fakes();
    let mut m = manager("demo", &runtime, &store);
    m.start().await.unwrap();
    runtime.clear_calls();

    let summary = m.scale(1).await.unwrap();
    assert!(summary.is_empty());
    assert!(runtime.calls().is_empty());
}

#[tokio::test]
async fn new_cluster_honours_client_count_before_first_start() {
    let (runtime, store) = fakes();
    let mut m = manager("lab", &runtime, &store);
    m.set_client_count(2).unwrap();

    m.start().await.unwrap();

    assert_eq!(runtime.container_names().len(), 5);
    assert_eq!(store.saved("lab").unwrap().count_client_nodes(), 2);
}

#[tokio::test]
async fn scale_keeps_clients_on_the_configured_network() {
    let (runtime, store) = fakes();
    let mut stored = cluster("demo");
    stored.network.name = "lab-net".into();
    for node in &mut stored.nodes {
        node.network = "lab-net".into();
    }
    store.save(&stored).unwrap();

    let mut m = manager("demo", &runtime, &store);
    assert_eq!(m.start().await.unwrap(), StartOutcome::Resumed);
    m.scale(2).await.unwrap();

    let client = m.config().node("hind.demo.client.02").unwrap();
    assert_eq!(client.network, "lab-net");
    m.config().validate().unwrap();
    store.saved("demo").unwrap().validate().unwrap();
    assert!(runtime.network("lab-net").is_some());
    assert!(runtime.network("hind.demo").is_none());
}

#[tokio::test]
async fn failed_scale_down_keeps_undeleted_clients_in_the_model() {
    let (runtime, store) = fakes();
    let mut m = manager("demo", &runtime, &store);
    m.start().await.unwrap();
    m.scale(3).await.unwrap();
    let stop = RuntimeCall::StopContainer("hind.demo.client.03".into());
    runtime.fail_on(stop.clone(), "daemon refused");

    let err = m.scale(1).await.unwrap_err();

    assert!(err.to_string().contains("hind.demo.client.03"), "{err}");
    assert_eq!(m.count_client_nodes(), 3);
    assert!(runtime.container("hind.demo.client.03").is_some());
    assert_eq!(store.saved("demo").unwrap().count_client_nodes(), 3);

    runtime.recover(&stop);
    m.scale(1).await.unwrap();
    assert_eq!(m.count_client_nodes(), 1);
    assert!(runtime.container("hind.demo.client.02").is_none());
    assert!(runtime.container("hind.demo.client.03").is_none());
}
