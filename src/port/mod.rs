//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points the reconciliation engine is written
//! against. Adapters implement them for a concrete container runtime or
//! storage medium.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │  observe → plan → apply │
//!                    └────────────┬────────────┘
//!                 ┌───────────────┴───────────────┐
//!                 ▼                               ▼
//!          ┌─────────────┐                 ┌─────────────┐
//!          │   Runtime   │                 │    Store    │
//!          │ (docker CLI)│                 │ (JSON files)│
//!          └─────────────┘                 └─────────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`ContainerOps`], [`NetworkOps`], [`Runtime`] - Container runtime backend
//! - [`ConfigStore`] - Cluster configuration persistence
//! - [`ActiveClusterStore`] - Default cluster for name-less commands

pub mod outbound;

pub use outbound::{ActiveClusterStore, ConfigStore, ContainerOps, NetworkOps, Runtime};
