//! In-memory [`Runtime`] that records every call.
//!
//! Containers created through the fake take [`FakeRuntime::with_created_status`]
//! (running by default). Statuses can be overridden at any time and any call
//! can be made to fail with a backend error.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::domain::{ContainerInfo, ContainerStatus, Labels, Network, NetworkInfo, Node};
use crate::error::{Error, Result};
use crate::port::{ContainerOps, NetworkOps, Runtime};

/// One call made against the fake.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuntimeCall {
    CreateNetwork(String),
    DeleteNetwork(String),
    InspectNetwork(String),
    CreateContainer(String),
    StartContainer(String),
    StopContainer(String),
    DeleteContainer(String),
    InspectContainer(String),
    ListContainers,
}

impl RuntimeCall {
    /// Whether the call changes runtime state.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Self::InspectNetwork(_) | Self::InspectContainer(_) | Self::ListContainers
        )
    }
}

#[derive(Debug)]
struct State {
    networks: BTreeMap<String, NetworkInfo>,
    containers: BTreeMap<String, ContainerInfo>,
    calls: Vec<RuntimeCall>,
    failures: HashMap<RuntimeCall, String>,
    created_status: ContainerStatus,
    next_id: u64,
}

#[derive(Debug)]
pub struct FakeRuntime {
    state: Mutex<State>,
}

impl Default for FakeRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                networks: BTreeMap::new(),
                containers: BTreeMap::new(),
                calls: Vec::new(),
                failures: HashMap::new(),
                created_status: ContainerStatus::Running,
                next_id: 1,
            }),
        }
    }

    /// Status given to containers on create and start.
    #[must_use]
    pub fn with_created_status(self, status: ContainerStatus) -> Self {
        self.state.lock().created_status = status;
        self
    }

    /// Seed an existing network.
    #[must_use]
    pub fn with_network(self, name: &str) -> Self {
        {
            let mut state = self.state.lock();
            let info = network_info(&mut state, name, Labels::new());
            state.networks.insert(name.to_string(), info);
        }
        self
    }

    /// Seed an existing container.
    #[must_use]
    pub fn with_container(self, name: &str, status: ContainerStatus) -> Self {
        {
            let mut state = self.state.lock();
            let info = container_info(&mut state, name, status, String::new(), Labels::new());
            state.containers.insert(name.to_string(), info);
        }
        self
    }

    /// Override the status of an existing container.
    pub fn set_status(&self, name: &str, status: ContainerStatus) {
        if let Some(c) = self.state.lock().containers.get_mut(name) {
            c.status = status;
        }
    }

    /// Make `call` fail with a backend error carrying `message`.
    pub fn fail_on(&self, call: RuntimeCall, message: &str) {
        self.state.lock().failures.insert(call, message.to_string());
    }

    /// Let `call` succeed again after [`FakeRuntime::fail_on`].
    pub fn recover(&self, call: &RuntimeCall) {
        self.state.lock().failures.remove(call);
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<RuntimeCall> {
        self.state.lock().calls.clone()
    }

    /// Calls that changed state, in order.
    pub fn mutations(&self) -> Vec<RuntimeCall> {
        self.calls().into_iter().filter(RuntimeCall::is_mutation).collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    pub fn container(&self, name: &str) -> Option<ContainerInfo> {
        self.state.lock().containers.get(name).cloned()
    }

    pub fn container_names(&self) -> Vec<String> {
        self.state.lock().containers.keys().cloned().collect()
    }

    pub fn network(&self, name: &str) -> Option<NetworkInfo> {
        self.state.lock().networks.get(name).cloned()
    }

    /// Record `call` and return the injected failure for it, if any.
    fn record(&self, state: &mut State, call: RuntimeCall) -> Result<()> {
        state.calls.push(call.clone());
        match state.failures.get(&call) {
            Some(message) => Err(Error::backend(
                operation(&call),
                resource(&call),
                message.clone(),
            )),
            None => Ok(()),
        }
    }
}

fn operation(call: &RuntimeCall) -> &'static str {
    match call {
        RuntimeCall::CreateNetwork(_) => "create network",
        RuntimeCall::DeleteNetwork(_) => "delete network",
        RuntimeCall::InspectNetwork(_) => "inspect network",
        RuntimeCall::CreateContainer(_) => "create container",
        RuntimeCall::StartContainer(_) => "start container",
        RuntimeCall::StopContainer(_) => "stop container",
        RuntimeCall::DeleteContainer(_) => "delete container",
        RuntimeCall::InspectContainer(_) => "inspect container",
        RuntimeCall::ListContainers => "list containers",
    }
}

fn resource(call: &RuntimeCall) -> String {
    match call {
        RuntimeCall::CreateNetwork(n)
        | RuntimeCall::DeleteNetwork(n)
        | RuntimeCall::InspectNetwork(n)
        | RuntimeCall::CreateContainer(n)
        | RuntimeCall::StartContainer(n)
        | RuntimeCall::StopContainer(n)
        | RuntimeCall::DeleteContainer(n)
        | RuntimeCall::InspectContainer(n) => n.clone(),
        RuntimeCall::ListContainers => "all".to_string(),
    }
}

fn next_id(state: &mut State) -> String {
    let id = format!("fake-{:04}", state.next_id);
    state.next_id += 1;
    id
}

fn network_info(state: &mut State, name: &str, labels: Labels) -> NetworkInfo {
    NetworkInfo {
        id: next_id(state),
        name: name.to_string(),
        created: Some(Utc::now()),
        driver: "bridge".to_string(),
        labels,
    }
}

fn container_info(
    state: &mut State,
    name: &str,
    status: ContainerStatus,
    image: String,
    labels: Labels,
) -> ContainerInfo {
    ContainerInfo {
        id: next_id(state),
        name: name.to_string(),
        created: Some(Utc::now()),
        hostname: name.to_string(),
        status,
        image,
        ports: Vec::new(),
        labels,
    }
}

fn matches_filters(labels: &Labels, filters: &[String]) -> bool {
    filters.iter().all(|f| {
        let Some(label) = f.strip_prefix("label=") else {
            return true;
        };
        match label.split_once('=') {
            Some((k, v)) => labels.get(k).is_some_and(|actual| actual == v),
            None => labels.contains_key(label),
        }
    })
}

#[async_trait]
impl NetworkOps for FakeRuntime {
    async fn create_network(&self, network: &Network) -> Result<String> {
        let mut state = self.state.lock();
        self.record(&mut state, RuntimeCall::CreateNetwork(network.name.clone()))?;
        if state.networks.contains_key(&network.name) {
            return Err(Error::backend("create network", &network.name, "network already exists"));
        }
        let info = network_info(&mut state, &network.name, network.labels.clone());
        let id = info.id.clone();
        state.networks.insert(network.name.clone(), info);
        Ok(id)
    }

    async fn delete_network(&self, name: &str) -> Result<()> {
        let mut state = self.state.lock();
        self.record(&mut state, RuntimeCall::DeleteNetwork(name.to_string()))?;
        state
            .networks
            .remove(name)
            .map(drop)
            .ok_or_else(|| Error::backend("delete network", name, "no such network"))
    }

    async fn inspect_network(&self, name: &str) -> Result<Option<NetworkInfo>> {
        let mut state = self.state.lock();
        self.record(&mut state, RuntimeCall::InspectNetwork(name.to_string()))?;
        Ok(state.networks.get(name).cloned())
    }
}

#[async_trait]
impl ContainerOps for FakeRuntime {
    async fn create_container(&self, node: &Node) -> Result<String> {
        let mut state = self.state.lock();
        self.record(&mut state, RuntimeCall::CreateContainer(node.name.clone()))?;
        if state.containers.contains_key(&node.name) {
            return Err(Error::backend("create container", &node.name, "name already in use"));
        }
        let status = state.created_status;
        let info = container_info(
            &mut state,
            &node.name,
            status,
            node.image.reference(),
            node.labels.clone(),
        );
        let id = info.id.clone();
        state.containers.insert(node.name.clone(), info);
        Ok(id)
    }

    async fn start_container(&self, name: &str) -> Result<()> {
        let mut state = self.state.lock();
        self.record(&mut state, RuntimeCall::StartContainer(name.to_string()))?;
        let status = state.created_status;
        let container = state
            .containers
            .get_mut(name)
            .ok_or_else(|| Error::backend("start container", name, "no such container"))?;
        container.status = status;
        Ok(())
    }

    async fn stop_container(&self, name: &str) -> Result<()> {
        let mut state = self.state.lock();
        self.record(&mut state, RuntimeCall::StopContainer(name.to_string()))?;
        let container = state
            .containers
            .get_mut(name)
            .ok_or_else(|| Error::backend("stop container", name, "no such container"))?;
        container.status = ContainerStatus::Stopped;
        Ok(())
    }

    async fn delete_container(&self, name: &str) -> Result<()> {
        let mut state = self.state.lock();
        self.record(&mut state, RuntimeCall::DeleteContainer(name.to_string()))?;
        state
            .containers
            .remove(name)
            .map(drop)
            .ok_or_else(|| Error::backend("delete container", name, "no such container"))
    }

    async fn inspect_container(&self, name: &str) -> Result<Option<ContainerInfo>> {
        let mut state = self.state.lock();
        self.record(&mut state, RuntimeCall::InspectContainer(name.to_string()))?;
        Ok(state.containers.get(name).cloned())
    }

    async fn list_containers(&self, filters: &[String]) -> Result<Vec<ContainerInfo>> {
        let mut state = self.state.lock();
        self.record(&mut state, RuntimeCall::ListContainers)?;
        Ok(state
            .containers
            .values()
            .filter(|c| matches_filters(&c.labels, filters))
            .cloned()
            .collect())
    }
}

impl Runtime for FakeRuntime {
    fn provider(&self) -> &'static str {
        "fake"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls_and_injects_failures() {
        let runtime = FakeRuntime::new().with_container("a", ContainerStatus::Stopped);
        runtime.fail_on(RuntimeCall::StartContainer("a".into()), "boom");

        assert!(runtime.inspect_container("a").await.unwrap().is_some());
        let err = runtime.start_container("a").await.unwrap_err();
        assert_eq!(err.to_string(), "failed to start container 'a': boom");

        assert_eq!(
            runtime.calls(),
            vec![
                RuntimeCall::InspectContainer("a".into()),
                RuntimeCall::StartContainer("a".into()),
            ]
        );
        assert_eq!(runtime.mutations(), vec![RuntimeCall::StartContainer("a".into())]);
    }

    #[tokio::test]
    async fn list_filters_by_label() {
        let runtime = FakeRuntime::new();
        let cluster = crate::domain::Topology::default().build("demo", "0.4.0").unwrap();
        let node = cluster.nodes[0].with_labels(&cluster.ownership_labels());
        runtime.create_container(&node).await.unwrap();
        runtime.create_container(&cluster.nodes[1]).await.unwrap();

        let owned = runtime
            .list_containers(&["label=hind.cluster=demo".to_string()])
            .await
            .unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].name, "hind.demo.consul.01");
    }
}
