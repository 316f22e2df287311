//! Per-invocation state shared by command handlers.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::application::reconcile::shutdown_requested;
use crate::application::ClusterManager;
use crate::error::{Error, Result};
use crate::infrastructure::config::Settings;
use crate::infrastructure::factory::{build_runtime, build_stores};
use crate::port::{ActiveClusterStore, ConfigStore, Runtime};

/// Cluster used when neither an argument nor the active pointer names one.
pub const DEFAULT_CLUSTER: &str = "default";

/// Everything a command needs, resolved once at startup.
pub struct CommandContext {
    pub settings: Settings,
    pub home: PathBuf,
    pub runtime: Arc<dyn Runtime>,
    pub configs: Arc<dyn ConfigStore>,
    pub active: Arc<dyn ActiveClusterStore>,
    /// Active pointer as read at startup, empty when unset.
    pub active_cluster: String,
    pub shutdown: watch::Receiver<bool>,
}

impl CommandContext {
    /// Build the file-backed stores and configured runtime under `home`.
    pub fn from_settings(
        settings: Settings,
        home: PathBuf,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self> {
        let runtime = build_runtime(&settings)?;
        let (configs, active) = build_stores(&home);
        Self::new(settings, home, runtime, configs, active, shutdown)
    }

    pub fn new(
        settings: Settings,
        home: PathBuf,
        runtime: Arc<dyn Runtime>,
        configs: Arc<dyn ConfigStore>,
        active: Arc<dyn ActiveClusterStore>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self> {
        let active_cluster = active.get()?;
        debug!(home = %home.display(), active = %active_cluster, "Command context ready");
        Ok(Self {
            settings,
            home,
            runtime,
            configs,
            active,
            active_cluster,
            shutdown,
        })
    }

    /// Explicit name, then the active cluster, then `default`.
    #[must_use]
    pub fn resolve_name(&self, name: Option<&str>) -> String {
        name.filter(|n| !n.is_empty())
            .or_else(|| Some(self.active_cluster.as_str()).filter(|n| !n.is_empty()))
            .unwrap_or(DEFAULT_CLUSTER)
            .to_string()
    }

    /// Manager for `name`, wired to this context's runtime, store and shutdown signal.
    pub fn manager(&self, name: &str, version: &str) -> Result<ClusterManager> {
        Ok(ClusterManager::new(
            name,
            version,
            Arc::clone(&self.runtime),
            Arc::clone(&self.configs),
        )?
        .with_convergence(self.settings.timeouts.convergence())
        .with_shutdown(self.shutdown.clone()))
    }

    /// Run `fut`, failing with [`Error::DeadlineExceeded`] after `limit` or
    /// [`Error::Cancelled`] on Ctrl-C. `task` describes the command in errors.
    pub async fn with_timeout<T, F>(&self, limit: Duration, task: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let mut shutdown = self.shutdown.clone();
        tokio::select! {
            result = tokio::time::timeout(limit, fut) => match result {
                Ok(inner) => inner,
                Err(_) => Err(Error::DeadlineExceeded {
                    task: task.to_string(),
                    limit,
                }),
            },
            () = shutdown_requested(&mut shutdown) => Err(Error::Cancelled),
        }
    }
}
