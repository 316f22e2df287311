//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`runtime`] - [`FakeRuntime`](runtime::FakeRuntime): in-memory runtime
//!   with call recording, status overrides and failure injection.
//! - [`domain`] - Cluster builders and managers wired to the fakes.

pub mod domain;
pub mod runtime;
