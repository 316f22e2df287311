//! Applies a reconcile plan and waits for the cluster to converge.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use super::planner::Plan;
use crate::domain::{Cluster, Labels};
use crate::error::{Error, Result, ResultExt};
use crate::port::Runtime;

/// Timing of the convergence wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvergenceConfig {
    /// Upper bound on the wait.
    pub timeout: Duration,
    /// Delay between status polls.
    pub poll_interval: Duration,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Executes plans for one cluster.
///
/// Every resource it creates is stamped with the cluster's ownership labels.
pub struct Executor<'a> {
    runtime: &'a dyn Runtime,
    labels: Labels,
}

impl<'a> Executor<'a> {
    pub fn new(runtime: &'a dyn Runtime, cluster: &Cluster) -> Self {
        Self {
            runtime,
            labels: cluster.ownership_labels(),
        }
    }

    /// Apply `plan` in fixed order: network, recreates, creates, starts.
    ///
    /// Stops at the first failure; operations already applied are not rolled
    /// back.
    pub async fn execute(&self, plan: &Plan) -> Result<()> {
        if let Some(network) = &plan.network_to_create {
            let mut network = network.clone();
            network
                .labels
                .extend(self.labels.iter().map(|(k, v)| (k.clone(), v.clone())));
            let id = self.runtime.create_network(&network).await?;
            info!(network = %network.name, id = %id, "Created network");
        }

        for action in &plan.to_recreate {
            let name = &action.existing_name;
            info!(node = %name, reason = %action.reason, "Recreating node");
            if let Err(e) = self.runtime.stop_container(name).await {
                debug!(node = %name, error = %e, "Stop before recreate failed, continuing");
            }
            self.runtime
                .delete_container(name)
                .await
                .with_context(|| format!("failed to remove unhealthy node '{name}'"))?;
            self.runtime
                .create_container(&action.new_config.with_labels(&self.labels))
                .await?;
        }

        for node in &plan.to_create {
            let id = self
                .runtime
                .create_container(&node.with_labels(&self.labels))
                .await?;
            info!(node = %node.name, id = %id, "Created node");
        }

        for name in &plan.to_start {
            self.runtime.start_container(name).await?;
            info!(node = %name, "Started node");
        }

        Ok(())
    }

    /// Poll until every node in `nodes` reports running.
    ///
    /// Returns [`Error::Timeout`] listing the nodes still pending when the
    /// deadline passes, or [`Error::Cancelled`] as soon as `shutdown` flips.
    pub async fn await_convergence(
        &self,
        nodes: &[String],
        config: &ConvergenceConfig,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<()> {
        let deadline = Instant::now() + config.timeout;

        loop {
            if *shutdown.borrow() {
                return Err(Error::Cancelled);
            }

            let pending = self.pending(nodes).await?;
            if pending.is_empty() {
                debug!(nodes = nodes.len(), "All nodes running");
                return Ok(());
            }

            let now = Instant::now();
            if now >= deadline {
                warn!(pending = %pending.join(", "), "Cluster did not converge");
                return Err(Error::Timeout {
                    waited: config.timeout,
                    pending,
                });
            }

            debug!(pending = pending.len(), "Waiting for nodes");
            let delay = config.poll_interval.min(deadline - now);
            tokio::select! {
                () = sleep(delay) => {}
                () = shutdown_requested(shutdown) => return Err(Error::Cancelled),
            }
        }
    }

    async fn pending(&self, nodes: &[String]) -> Result<Vec<String>> {
        let mut pending = Vec::new();
        for name in nodes {
            let running = self
                .runtime
                .inspect_container(name)
                .await?
                .is_some_and(|c| c.status.is_running());
            if !running {
                pending.push(name.clone());
            }
        }
        Ok(pending)
    }
}

/// Resolves once the shutdown flag is raised. Never resolves if the sender
/// is gone without raising it.
pub async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
