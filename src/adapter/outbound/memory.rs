//! In-memory store implementation for testing.

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::RwLock;

use crate::domain::identity::validate_cluster_name;
use crate::domain::Cluster;
use crate::error::{Error, ResourceKind, Result};
use crate::port::{ActiveClusterStore, ConfigStore};

/// In-memory config store and active pointer.
///
/// A cluster is "known" once `ensure` or `save` has been called for it,
/// mirroring the directory semantics of the file store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    clusters: RwLock<BTreeMap<String, Cluster>>,
    known: RwLock<BTreeSet<String>>,
    active: RwLock<String>,
    saves: RwLock<usize>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        *self.saves.read()
    }

    /// Last saved document for `name`, if any.
    pub fn saved(&self, name: &str) -> Option<Cluster> {
        self.clusters.read().get(name).cloned()
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self, name: &str) -> Result<Cluster> {
        self.clusters
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::not_found(ResourceKind::Cluster, name))
    }

    fn save(&self, cluster: &Cluster) -> Result<()> {
        validate_cluster_name(&cluster.name)?;
        self.known.write().insert(cluster.name.clone());
        self.clusters
            .write()
            .insert(cluster.name.clone(), cluster.clone());
        *self.saves.write() += 1;
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.clusters.read().contains_key(name)
    }

    fn ensure(&self, name: &str) -> Result<()> {
        validate_cluster_name(name)?;
        self.known.write().insert(name.to_string());
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.known.write().remove(name);
        self.clusters.write().remove(name);
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.known.read().iter().cloned().collect())
    }
}

impl ActiveClusterStore for MemoryStore {
    fn get(&self) -> Result<String> {
        Ok(self.active.read().clone())
    }

    fn set(&self, name: &str) -> Result<()> {
        if !self.known.read().contains(name) {
            return Err(Error::not_found(ResourceKind::Cluster, name));
        }
        *self.active.write() = name.to_string();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.active.write().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Topology;

    #[test]
    fn active_pointer_requires_known_cluster() {
        let store = MemoryStore::new();
        assert!(ActiveClusterStore::set(&store, "demo").unwrap_err().is_not_found());

        store.ensure("demo").unwrap();
        ActiveClusterStore::set(&store, "demo").unwrap();
        assert_eq!(ActiveClusterStore::get(&store).unwrap(), "demo");

        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(ActiveClusterStore::get(&store).unwrap(), "");
    }

    #[test]
    fn save_then_load() {
        let store = MemoryStore::new();
        let cluster = Topology::default().build("demo", "0.4.0").unwrap();

        assert!(!store.exists("demo"));
        store.save(&cluster).unwrap();

        assert!(store.exists("demo"));
        assert_eq!(store.load("demo").unwrap(), cluster);
        assert_eq!(ConfigStore::list(&store).unwrap(), vec!["demo"]);
        assert_eq!(store.save_count(), 1);
    }
}
