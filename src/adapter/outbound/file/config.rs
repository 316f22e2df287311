//! JSON cluster configuration store.

use std::path::PathBuf;

use tracing::debug;

use super::FileStore;
use crate::domain::identity::validate_cluster_name;
use crate::domain::{Cluster, DomainError};
use crate::error::{Error, ResourceKind, Result, ResultExt};
use crate::port::ConfigStore;

/// Directory under the root holding one sub-directory per cluster.
pub const CLUSTER_DIR: &str = "cluster";

/// Configuration document inside a cluster directory.
pub const CONFIG_FILE: &str = "cluster.json";

/// Stores each cluster as `<root>/cluster/<name>/cluster.json`.
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    files: FileStore,
}

impl JsonConfigStore {
    pub fn new(files: FileStore) -> Self {
        Self { files }
    }

    fn cluster_dir(name: &str) -> Result<PathBuf> {
        validate_cluster_name(name)?;
        Ok(PathBuf::from(CLUSTER_DIR).join(name))
    }

    fn config_path(name: &str) -> Result<PathBuf> {
        Ok(Self::cluster_dir(name)?.join(CONFIG_FILE))
    }
}

impl ConfigStore for JsonConfigStore {
    fn load(&self, name: &str) -> Result<Cluster> {
        let path = Self::config_path(name)?;
        let Some(data) = self.files.read(&path)? else {
            return Err(Error::not_found(ResourceKind::Cluster, name));
        };

        let cluster: Cluster = serde_json::from_slice(&data)
            .with_context(|| format!("failed to parse config for cluster '{name}'"))?;
        if cluster.name.is_empty() {
            return Err(DomainError::MissingClusterName.into());
        }

        debug!(cluster = %name, nodes = cluster.nodes.len(), "Loaded cluster config");
        Ok(cluster)
    }

    fn save(&self, cluster: &Cluster) -> Result<()> {
        let path = Self::config_path(&cluster.name)?;
        let json = serde_json::to_vec_pretty(cluster)?;
        self.files
            .write_atomic(&path, &json)
            .with_context(|| format!("failed to save config for cluster '{}'", cluster.name))?;

        debug!(cluster = %cluster.name, "Saved cluster config");
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        Self::config_path(name)
            .map(|path| self.files.is_file(&path))
            .unwrap_or(false)
    }

    fn ensure(&self, name: &str) -> Result<()> {
        self.files.create_dir(&Self::cluster_dir(name)?)
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.files.remove_dir(&Self::cluster_dir(name)?)
    }

    fn list(&self) -> Result<Vec<String>> {
        self.files.list_dirs(&PathBuf::from(CLUSTER_DIR))
    }
}
