//! Container runtime port.
//!
//! The engine only needs a handful of container and network primitives, so
//! the backend is split into two capability traits. Every name argument is
//! the runtime-side resource name, which equals the configured node or
//! network name.

use async_trait::async_trait;

use crate::domain::{ContainerInfo, Network, NetworkInfo, Node};
use crate::error::Result;

#[async_trait]
pub trait NetworkOps: Send + Sync {
    /// Create a network, returning its runtime id.
    async fn create_network(&self, network: &Network) -> Result<String>;

    async fn delete_network(&self, name: &str) -> Result<()>;

    /// Inspect a network. `None` when it does not exist.
    async fn inspect_network(&self, name: &str) -> Result<Option<NetworkInfo>>;
}

#[async_trait]
pub trait ContainerOps: Send + Sync {
    /// Create and launch a container for `node`, returning its runtime id.
    async fn create_container(&self, node: &Node) -> Result<String>;

    async fn start_container(&self, name: &str) -> Result<()>;

    /// Stop a container. Stopping an already stopped container succeeds.
    async fn stop_container(&self, name: &str) -> Result<()>;

    async fn delete_container(&self, name: &str) -> Result<()>;

    /// Inspect a container. `None` when it does not exist.
    async fn inspect_container(&self, name: &str) -> Result<Option<ContainerInfo>>;

    async fn list_containers(&self, filters: &[String]) -> Result<Vec<ContainerInfo>>;
}

/// A complete runtime backend.
pub trait Runtime: ContainerOps + NetworkOps {
    /// Short provider name used in logs.
    fn provider(&self) -> &'static str;
}
