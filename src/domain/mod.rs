//! Cluster model, naming scheme and release catalog.
//!
//! Everything here is pure data and validation; no runtime or filesystem
//! access happens in this layer.

pub mod cluster;
pub mod error;
pub mod identity;
pub mod release;
pub mod status;
pub mod topology;

pub use cluster::{
    Cluster, Image, Labels, Network, Node, NodeKind, PortMapping, Role, Volume, CLUSTER_LABEL,
    VERSION_LABEL,
};
pub use error::DomainError;
pub use identity::{NodeIdentity, NAMING_SCHEME_VERSION};
pub use release::{ImageKind, Release};
pub use status::{ClusterHealth, ClusterInfo, ContainerInfo, ContainerStatus, NetworkInfo};
pub use topology::Topology;
