//! Builders for clusters and managers used across tests.

use std::sync::Arc;
use std::time::Duration;

use crate::adapter::outbound::memory::MemoryStore;
use crate::application::reconcile::ConvergenceConfig;
use crate::application::ClusterManager;
use crate::domain::{release, Cluster, Topology};

use super::runtime::FakeRuntime;

/// Default topology for `name` at the latest release.
pub fn cluster(name: &str) -> Cluster {
    cluster_with_clients(name, 1)
}

/// Default topology for `name` with `clients` nomad clients.
pub fn cluster_with_clients(name: &str, clients: u16) -> Cluster {
    Topology::default()
        .with_clients(clients)
        .build(name, release::latest().hind)
        .expect("valid test cluster")
}

/// Convergence settings that poll every millisecond and give up quickly.
pub fn fast_convergence() -> ConvergenceConfig {
    ConvergenceConfig {
        timeout: Duration::from_millis(50),
        poll_interval: Duration::from_millis(1),
    }
}

/// A manager for `name` wired to the given fakes with fast convergence.
pub fn manager(name: &str, runtime: &Arc<FakeRuntime>, store: &Arc<MemoryStore>) -> ClusterManager {
    ClusterManager::new(name, "latest", runtime.clone(), store.clone())
        .expect("valid test manager")
        .with_convergence(fast_convergence())
}
