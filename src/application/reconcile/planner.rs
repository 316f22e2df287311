//! Diff between desired configuration and observed state.
//!
//! Planning is pure: it only reads the two inputs and never touches the
//! runtime. Running nodes are left alone even if their configuration has
//! changed; only presence and status are compared.

use std::fmt;

use serde::Serialize;

use super::observer::ActualState;
use crate::domain::{Cluster, ContainerStatus, Network, Node};

/// Why a node is being recreated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecreateReason {
    /// The runtime reports the container in an error state.
    Unhealthy,
}

impl RecreateReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unhealthy => "unhealthy",
        }
    }
}

impl fmt::Display for RecreateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecreateAction {
    /// Runtime name of the container being replaced.
    pub existing_name: String,
    /// Configuration for the replacement, created under the same name.
    pub new_config: Node,
    pub reason: RecreateReason,
}

/// Ordered operations that bring the runtime in line with a desired cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub network_to_create: Option<Network>,
    pub to_create: Vec<Node>,
    pub to_start: Vec<String>,
    pub to_recreate: Vec<RecreateAction>,
}

impl Plan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.network_to_create.is_none()
            && self.to_create.is_empty()
            && self.to_start.is_empty()
            && self.to_recreate.is_empty()
    }

    #[must_use]
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            network: self.network_to_create.is_some(),
            create: self.to_create.len(),
            start: self.to_start.len(),
            recreate: self.to_recreate.len(),
        }
    }
}

/// Operation counts of a [`Plan`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub network: bool,
    pub create: usize,
    pub start: usize,
    pub recreate: usize,
}

impl PlanSummary {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.network && self.create == 0 && self.start == 0 && self.recreate == 0
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("no changes");
        }
        write!(
            f,
            "network: {}, create: {}, start: {}, recreate: {}",
            if self.network { "create" } else { "keep" },
            self.create,
            self.start,
            self.recreate
        )
    }
}

/// Compute the plan for `desired` given `actual`.
#[must_use]
pub fn plan(desired: &Cluster, actual: &ActualState) -> Plan {
    let mut plan = Plan::default();

    if actual.network.is_none() && !desired.network.name.is_empty() {
        plan.network_to_create = Some(desired.network.clone());
    }

    for node in &desired.nodes {
        match actual.container(&node.name).map(|c| c.status) {
            None => plan.to_create.push(node.clone()),
            Some(ContainerStatus::Running) => {}
            Some(ContainerStatus::Error) => plan.to_recreate.push(RecreateAction {
                existing_name: node.name.clone(),
                new_config: node.clone(),
                reason: RecreateReason::Unhealthy,
            }),
            Some(ContainerStatus::Stopped | ContainerStatus::Unknown) => {
                plan.to_start.push(node.name.clone());
            }
        }
    }

    plan
}
