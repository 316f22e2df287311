//! Application services (use cases).
//!
//! These services combine the domain model with the runtime and store ports
//! to implement cluster lifecycle operations.

pub mod listing;
pub mod manager;
pub mod reconcile;

pub use listing::{list_clusters, ClusterSummary};
pub use manager::{ClusterManager, DeleteReport, StartOutcome, StopReport};
