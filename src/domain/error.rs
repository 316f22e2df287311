//! Domain validation errors for cluster model types.
//!
//! These errors are returned by `try_new` constructors and validation methods
//! when a cluster, node or port definition violates a model invariant.

use thiserror::Error;

/// Errors that occur when cluster model invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Cluster names cannot be empty.
    #[error("cluster name cannot be empty")]
    EmptyClusterName,

    /// Cluster names are embedded in node and network names.
    #[error("invalid cluster name '{name}': {reason}")]
    InvalidClusterName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A stored cluster document carried no name.
    #[error("loaded config file but no cluster name was found")]
    MissingClusterName,

    /// Node name does not follow the naming scheme.
    #[error("invalid node name '{name}': {reason}")]
    InvalidNodeName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Port mappings must name the port inside the container.
    #[error("container port is required")]
    MissingContainerPort,

    /// Nodes must reference an image.
    #[error("image name is required for node '{node}'")]
    MissingImage {
        /// Node without an image.
        node: String,
    },

    /// Nodes must attach to the cluster network.
    #[error("node '{node}' is attached to network '{actual}', expected '{expected}'")]
    NetworkMismatch {
        /// Offending node.
        node: String,
        /// The cluster network name.
        expected: String,
        /// The network the node names.
        actual: String,
    },

    /// Node names must be unique within a cluster.
    #[error("duplicate node name '{name}'")]
    DuplicateNode {
        /// The repeated name.
        name: String,
    },

    /// A cluster needs at least one client node.
    #[error("client count must be at least 1, got {count}")]
    InvalidClientCount {
        /// The rejected count.
        count: usize,
    },
}
