//! Observed state of a cluster's network and configured nodes.

use std::collections::HashMap;

use tracing::trace;

use crate::domain::{Cluster, ContainerInfo, NetworkInfo};
use crate::error::{Result, ResultExt};
use crate::port::Runtime;

/// What the runtime currently holds for a desired cluster.
#[derive(Debug, Clone, Default)]
pub struct ActualState {
    /// The cluster network, if it exists.
    pub network: Option<NetworkInfo>,
    /// Containers keyed by node name. Absent nodes have no entry.
    pub containers: HashMap<String, ContainerInfo>,
}

impl ActualState {
    #[must_use]
    pub fn container(&self, name: &str) -> Option<&ContainerInfo> {
        self.containers.get(name)
    }
}

/// Inspect the network and every configured node.
///
/// Missing resources are recorded as absent; any other runtime failure aborts
/// the observation.
pub async fn observe(runtime: &dyn Runtime, desired: &Cluster) -> Result<ActualState> {
    let mut actual = ActualState::default();

    if !desired.network.name.is_empty() {
        actual.network = runtime
            .inspect_network(&desired.network.name)
            .await
            .with_context(|| format!("failed to inspect network '{}'", desired.network.name))?;
    }

    for node in &desired.nodes {
        let info = runtime
            .inspect_container(&node.name)
            .await
            .with_context(|| format!("failed to inspect node '{}'", node.name))?;
        if let Some(info) = info {
            trace!(node = %node.name, status = %info.status, "Observed node");
            actual.containers.insert(node.name.clone(), info);
        }
    }

    Ok(actual)
}
