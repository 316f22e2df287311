//! Enumerate stored clusters with their aggregate health.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use super::reconcile::observe;
use crate::domain::{ClusterHealth, ContainerInfo};
use crate::error::Result;
use crate::port::{ConfigStore, Runtime};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterSummary {
    pub name: String,
    pub active: bool,
    pub health: ClusterHealth,
    pub running_nodes: usize,
    pub total_nodes: usize,
    /// Creation time of the oldest container.
    pub created: Option<DateTime<Utc>>,
}

/// Summarize every stored cluster.
///
/// A cluster whose status cannot be read is reported with
/// [`ClusterHealth::Error`]; the listing itself only fails when the store
/// cannot be enumerated.
pub async fn list_clusters(
    store: &dyn ConfigStore,
    runtime: &dyn Runtime,
    active: &str,
) -> Result<Vec<ClusterSummary>> {
    let mut summaries = Vec::new();

    for name in store.list()? {
        let summary = match summarize(store, runtime, &name).await {
            Ok((containers, total_nodes)) => {
                ClusterSummary {
                    health: ClusterHealth::aggregate(&containers, total_nodes),
                    running_nodes: containers.iter().filter(|c| c.status.is_running()).count(),
                    total_nodes,
                    created: containers.iter().filter_map(|c| c.created).min(),
                    active: name == active,
                    name,
                }
            }
            Err(e) => {
                warn!(cluster = %name, error = %e, "Failed to read cluster status");
                ClusterSummary {
                    health: ClusterHealth::Error,
                    running_nodes: 0,
                    total_nodes: 0,
                    created: None,
                    active: name == active,
                    name,
                }
            }
        };
        summaries.push(summary);
    }

    Ok(summaries)
}

/// Observed containers and the configured node count of one cluster.
async fn summarize(
    store: &dyn ConfigStore,
    runtime: &dyn Runtime,
    name: &str,
) -> Result<(Vec<ContainerInfo>, usize)> {
    let cluster = store.load(name)?;
    let actual = observe(runtime, &cluster).await?;
    let containers = cluster
        .nodes
        .iter()
        .filter_map(|n| actual.containers.get(&n.name).cloned())
        .collect();
    Ok((containers, cluster.nodes.len()))
}
