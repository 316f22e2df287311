//! Infrastructure layer.
//!
//! Technical concerns that support the application without containing
//! lifecycle logic.
//!
//! # Submodules
//!
//! - [`config`] - Settings loading, validation and logging setup
//! - [`factory`] - Adapter construction from settings

pub mod config;
pub mod factory;
