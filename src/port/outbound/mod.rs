//! Outbound ports (driven by the application).

mod runtime;
mod store;

pub use runtime::{ContainerOps, NetworkOps, Runtime};
pub use store::{ActiveClusterStore, ConfigStore};
