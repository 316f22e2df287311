//! Reconciliation: observe, plan, execute.
//!
//! ```text
//! desired Cluster ──┐
//!                   ├─> planner::plan ──> Plan ──> Executor::execute
//! observer::observe ┘                                    │
//!                                                        v
//!                                         Executor::await_convergence
//! ```

pub mod executor;
pub mod observer;
pub mod planner;

pub use executor::{shutdown_requested, ConvergenceConfig, Executor};
pub use observer::{observe, ActualState};
pub use planner::{plan, Plan, PlanSummary, RecreateAction, RecreateReason};
