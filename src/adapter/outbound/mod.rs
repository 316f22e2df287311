//! Outbound adapters (driven side).

pub mod docker;
pub mod file;
pub mod memory;
