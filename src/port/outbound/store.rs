//! Persistence ports for cluster configuration.

use crate::domain::Cluster;
use crate::error::Result;

/// Storage for the last converged configuration of each cluster.
pub trait ConfigStore: Send + Sync {
    /// Load a cluster's configuration.
    ///
    /// Fails with `NotFound` when nothing is stored for `name` and with a
    /// validation error when the stored document has no name.
    fn load(&self, name: &str) -> Result<Cluster>;

    /// Save a cluster, replacing any previous document atomically.
    fn save(&self, cluster: &Cluster) -> Result<()>;

    /// Whether a configuration document exists for `name`.
    fn exists(&self, name: &str) -> bool;

    /// Create the storage location for `name` if missing.
    fn ensure(&self, name: &str) -> Result<()>;

    /// Remove everything stored for `name`.
    fn remove(&self, name: &str) -> Result<()>;

    /// Names of all known clusters, sorted.
    fn list(&self) -> Result<Vec<String>>;
}

/// Pointer to the cluster used when a command names none.
pub trait ActiveClusterStore: Send + Sync {
    /// The active cluster name, empty when unset.
    fn get(&self) -> Result<String>;

    /// Point at `name`. Fails with `NotFound` if the cluster does not exist.
    fn set(&self, name: &str) -> Result<()>;

    /// Unset the pointer. Idempotent.
    fn clear(&self) -> Result<()>;
}
