//! hind - Nomad, Consul and Vault clusters in docker containers.
//!
//! Each cluster is a named set of nodes on a dedicated bridge network. The
//! last converged configuration is stored as JSON; every lifecycle command
//! reconciles the container runtime towards it.
//!
//! # Architecture
//!
//! - [`domain`] - Cluster model, node identity, release catalog, topology
//! - [`port`] - Runtime and store traits the engine is written against
//! - [`application`] - Cluster manager and the observe/plan/execute loop
//! - [`adapter`] - Docker CLI runtime, file and memory stores, the CLI
//! - [`infrastructure`] - Settings, logging and adapter wiring
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `testkit` - In-memory `FakeRuntime` and cluster builders for tests
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hind::adapter::outbound::docker::DockerCli;
//! use hind::adapter::outbound::memory::MemoryStore;
//! use hind::application::ClusterManager;
//!
//! # async fn demo() -> hind::error::Result<()> {
//! let mut manager = ClusterManager::new(
//!     "demo",
//!     "latest",
//!     Arc::new(DockerCli::default()),
//!     Arc::new(MemoryStore::new()),
//! )?;
//! manager.start().await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
