//! Cluster lifecycle façade.
//!
//! [`ClusterManager`] owns the desired configuration of one cluster during a
//! command. Every operation that changes the runtime goes through
//! [`ClusterManager::reconcile`], which persists the configuration only once
//! the runtime has converged to it.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

use super::reconcile::{self, ConvergenceConfig, Executor, PlanSummary};
use crate::domain::{release, topology, Cluster, ClusterInfo, DomainError, Node, Topology};
use crate::error::{Error, ResourceKind, Result, ResultExt};
use crate::port::{ConfigStore, Runtime};

/// How [`ClusterManager::start`] found the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StartOutcome {
    /// No configuration existed; defaults were synthesized.
    Created,
    /// A stored configuration was loaded.
    Resumed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StopReport {
    pub stopped: usize,
    pub already_stopped: usize,
    pub missing: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    pub deleted: usize,
    pub missing: usize,
    pub network_deleted: bool,
}

pub struct ClusterManager {
    runtime: Arc<dyn Runtime>,
    store: Arc<dyn ConfigStore>,
    cluster: Cluster,
    resident: bool,
    convergence: ConvergenceConfig,
    shutdown: watch::Receiver<bool>,
}

impl ClusterManager {
    /// Create a manager holding the default topology for `name`.
    ///
    /// Nothing is read or written until an operation runs. `version` may be
    /// `latest`.
    pub fn new(
        name: &str,
        version: &str,
        runtime: Arc<dyn Runtime>,
        store: Arc<dyn ConfigStore>,
    ) -> Result<Self> {
        let release = release::get(version)
            .ok_or_else(|| Error::not_found(ResourceKind::Release, version))?;
        let cluster = Topology::default().build(name, release.hind)?;
        let (_, shutdown) = watch::channel(false);

        Ok(Self {
            runtime,
            store,
            cluster,
            resident: false,
            convergence: ConvergenceConfig::default(),
            shutdown,
        })
    }

    #[must_use]
    pub fn with_convergence(mut self, convergence: ConvergenceConfig) -> Self {
        self.convergence = convergence;
        self
    }

    /// Observe `shutdown` during convergence waits.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = shutdown;
        self
    }

    #[must_use]
    pub fn config(&self) -> &Cluster {
        &self.cluster
    }

    /// Whether the in-memory configuration came from (or was written to) the store.
    #[must_use]
    pub fn is_resident(&self) -> bool {
        self.resident
    }

    #[must_use]
    pub fn config_exists(&self) -> bool {
        self.store.exists(&self.cluster.name)
    }

    /// Replace the in-memory configuration with the stored one.
    pub fn load(&mut self) -> Result<()> {
        self.cluster = self.store.load(&self.cluster.name)?;
        self.resident = true;
        Ok(())
    }

    fn ensure_loaded(&mut self) -> Result<()> {
        if self.resident {
            return Ok(());
        }
        self.load()
    }

    #[must_use]
    pub fn count_client_nodes(&self) -> usize {
        self.cluster.count_client_nodes()
    }

    /// Bring the cluster up, creating it with defaults if it has never run.
    pub async fn start(&mut self) -> Result<StartOutcome> {
        let outcome = if self.config_exists() {
            self.load()
                .context("failed to load cluster config")?;
            StartOutcome::Resumed
        } else {
            StartOutcome::Created
        };
        info!(cluster = %self.cluster.name, ?outcome, "Starting cluster");

        self.store.ensure(&self.cluster.name)?;
        let summary = self.reconcile().await?;
        info!(cluster = %self.cluster.name, %summary, "Cluster started");
        Ok(outcome)
    }

    /// Converge the runtime to the in-memory configuration, then persist it.
    ///
    /// On failure the store is left untouched.
    pub async fn reconcile(&mut self) -> Result<PlanSummary> {
        let runtime = self.runtime.as_ref();

        let actual = reconcile::observe(runtime, &self.cluster)
            .await
            .context("failed to get actual state")?;
        let plan = reconcile::plan(&self.cluster, &actual);
        let summary = plan.summary();

        if plan.is_empty() {
            debug!(cluster = %self.cluster.name, "Cluster already converged");
        } else {
            info!(cluster = %self.cluster.name, %summary, "Executing reconcile plan");
            let executor = Executor::new(runtime, &self.cluster);
            executor
                .execute(&plan)
                .await
                .context("failed to execute reconcile plan")?;
            executor
                .await_convergence(
                    &self.cluster.node_names(),
                    &self.convergence,
                    &mut self.shutdown,
                )
                .await
                .context("cluster did not converge")?;
        }

        self.store
            .save(&self.cluster)
            .context("failed to save cluster config")?;
        self.resident = true;
        Ok(summary)
    }

    /// Stop every running node. Never touches the network or the store.
    pub async fn stop(&mut self) -> Result<StopReport> {
        self.ensure_loaded()?;
        let mut report = StopReport::default();

        for node in &self.cluster.nodes {
            let Some(info) = self.runtime.inspect_container(&node.name).await? else {
                debug!(node = %node.name, "Node not found, skipping");
                report.missing += 1;
                continue;
            };
            if !info.status.is_running() {
                report.already_stopped += 1;
                continue;
            }
            self.runtime.stop_container(&node.name).await?;
            info!(node = %node.name, "Stopped node");
            report.stopped += 1;
        }

        Ok(report)
    }

    /// Remove every node, the network and the stored configuration.
    ///
    /// A failure part-way leaves the remaining resources in place; running
    /// `delete` again picks up where it stopped while the config still exists.
    pub async fn delete(&mut self) -> Result<DeleteReport> {
        self.ensure_loaded()?;
        let mut report = DeleteReport::default();

        for node in &self.cluster.nodes {
            if decommission(self.runtime.as_ref(), node).await? {
                report.deleted += 1;
            } else {
                report.missing += 1;
            }
        }

        let network = &self.cluster.network.name;
        if !network.is_empty() && self.runtime.inspect_network(network).await?.is_some() {
            self.runtime.delete_network(network).await?;
            info!(network = %network, "Deleted network");
            report.network_deleted = true;
        }

        self.store
            .remove(&self.cluster.name)
            .context("failed to remove cluster config")?;
        self.resident = false;
        info!(cluster = %self.cluster.name, "Cluster deleted");
        Ok(report)
    }

    /// Snapshot of the network and the configured nodes that exist.
    pub async fn get(&self) -> Result<ClusterInfo> {
        let actual = reconcile::observe(self.runtime.as_ref(), &self.cluster).await?;

        let containers = self
            .cluster
            .nodes
            .iter()
            .filter_map(|n| actual.containers.get(&n.name).cloned())
            .collect();

        Ok(ClusterInfo {
            name: self.cluster.name.clone(),
            network: actual.network,
            containers,
        })
    }

    /// Change the number of client nodes to `target` and reconcile.
    ///
    /// Server nodes are never touched. Removed clients are stopped and
    /// deleted before the reconcile runs.
    pub async fn scale(&mut self, target: usize) -> Result<PlanSummary> {
        let current = self.count_client_nodes();
        if target == current {
            debug!(cluster = %self.cluster.name, clients = current, "Client count unchanged");
            return Ok(PlanSummary::default());
        }

        if target > current {
            let added = self.add_client_nodes(target - current)?;
            info!(cluster = %self.cluster.name, added = %added.join(", "), "Scaling up");
        } else {
            let doomed = self.newest_clients(current - target)?;
            info!(cluster = %self.cluster.name, removed = doomed.len(), "Scaling down");
            // Teardown first so a failure leaves the model listing every live container.
            for node in &doomed {
                decommission(self.runtime.as_ref(), node)
                    .await
                    .with_context(|| format!("failed to remove client '{}'", node.name))?;
            }
            self.drop_nodes(&doomed);
        }

        self.reconcile().await
    }

    /// Append `count` client nodes after the highest existing ordinal.
    pub fn add_client_nodes(&mut self, count: usize) -> Result<Vec<String>> {
        let start = self.cluster.max_client_ordinal();
        let mut names = Vec::with_capacity(count);

        for offset in 1..=count {
            let ordinal = u16::try_from(usize::from(start) + offset)
                .map_err(|_| DomainError::InvalidClientCount { count })?;
            let node = topology::client_node(
                &self.cluster.name,
                &self.cluster.network.name,
                ordinal,
                &self.cluster.version,
            )?;
            names.push(node.name.clone());
            self.cluster.nodes.push(node);
        }
        Ok(names)
    }

    /// Remove the `count` most recently numbered client nodes.
    ///
    /// Fails with [`Error::Conflict`] and leaves the node list unchanged when
    /// fewer than `count` clients exist.
    pub fn remove_client_nodes(&mut self, count: usize) -> Result<Vec<Node>> {
        let removed = self.newest_clients(count)?;
        self.drop_nodes(&removed);
        Ok(removed)
    }

    /// The `count` client nodes with the highest ordinals, highest first.
    fn newest_clients(&self, count: usize) -> Result<Vec<Node>> {
        let existing = self.count_client_nodes();
        if count > existing {
            return Err(Error::Conflict(format!(
                "cannot remove {count} clients, only {existing} exist"
            )));
        }

        let mut clients: Vec<(u16, &Node)> = self
            .cluster
            .client_nodes()
            .map(|n| (n.identity().map(|id| id.ordinal()).unwrap_or(0), n))
            .collect();
        clients.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.name.cmp(&a.1.name)));
        Ok(clients
            .into_iter()
            .take(count)
            .map(|(_, node)| node.clone())
            .collect())
    }

    fn drop_nodes(&mut self, nodes: &[Node]) {
        self.cluster
            .nodes
            .retain(|n| !nodes.iter().any(|gone| gone.name == n.name));
    }

    /// Replace all client nodes with ordinals `1..=count`.
    ///
    /// Meant for configuring a cluster before its first start.
    pub fn set_client_count(&mut self, count: usize) -> Result<()> {
        if count < 1 {
            return Err(DomainError::InvalidClientCount { count }.into());
        }
        let count16 = u16::try_from(count).map_err(|_| DomainError::InvalidClientCount { count })?;

        // Keep the client block where the topology put it.
        let position = self
            .cluster
            .nodes
            .iter()
            .position(Node::is_client)
            .unwrap_or(self.cluster.nodes.len());
        self.cluster.nodes.retain(|n| !n.is_client());

        let mut clients = Vec::with_capacity(count);
        for ordinal in 1..=count16 {
            clients.push(topology::client_node(
                &self.cluster.name,
                &self.cluster.network.name,
                ordinal,
                &self.cluster.version,
            )?);
        }
        let position = position.min(self.cluster.nodes.len());
        self.cluster.nodes.splice(position..position, clients);
        Ok(())
    }
}

/// Stop (if running) and delete a node's container.
///
/// Returns `false` when the container does not exist.
async fn decommission(runtime: &dyn Runtime, node: &Node) -> Result<bool> {
    let Some(info) = runtime.inspect_container(&node.name).await? else {
        debug!(node = %node.name, "Node not found, skipping");
        return Ok(false);
    };
    if info.status.is_running() {
        runtime
            .stop_container(&node.name)
            .await
            .with_context(|| format!("failed to stop node '{}'", node.name))?;
    }
    runtime
        .delete_container(&node.name)
        .await
        .with_context(|| format!("failed to delete node '{}'", node.name))?;
    info!(node = %node.name, "Deleted node");
    Ok(true)
}
