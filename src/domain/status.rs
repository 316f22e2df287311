//! Observed runtime state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::cluster::Labels;

/// Normalized container status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    Running,
    Stopped,
    Error,
    Unknown,
}

impl ContainerStatus {
    /// Map a backend state string onto the normalized set.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "running" => Self::Running,
            "created" | "exited" | "paused" | "stopped" => Self::Stopped,
            "dead" | "error" => Self::Error,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }

    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerInfo {
    pub id: String,
    pub name: String,
    pub created: Option<DateTime<Utc>>,
    pub hostname: String,
    pub status: ContainerStatus,
    pub image: String,
    pub ports: Vec<String>,
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkInfo {
    pub id: String,
    pub name: String,
    pub created: Option<DateTime<Utc>>,
    pub driver: String,
    pub labels: Labels,
}

/// Read-only snapshot returned by `ClusterManager::get`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterInfo {
    pub name: String,
    pub network: Option<NetworkInfo>,
    pub containers: Vec<ContainerInfo>,
}

impl ClusterInfo {
    #[must_use]
    pub fn running_count(&self) -> usize {
        self.containers
            .iter()
            .filter(|c| c.status.is_running())
            .count()
    }
}

/// Aggregate health of a cluster as shown by `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClusterHealth {
    Running,
    Partial,
    Stopped,
    Degraded,
    NotFound,
    Error,
}

impl ClusterHealth {
    /// Aggregate container statuses against the configured node count.
    #[must_use]
    pub fn aggregate(containers: &[ContainerInfo], configured: usize) -> Self {
        if containers.is_empty() {
            return Self::NotFound;
        }
        if containers.iter().any(|c| c.status == ContainerStatus::Error) {
            return Self::Degraded;
        }

        let running = containers.iter().filter(|c| c.status.is_running()).count();
        let stopped = containers
            .iter()
            .filter(|c| c.status == ContainerStatus::Stopped)
            .count();

        if running == containers.len() && running == configured {
            Self::Running
        } else if stopped == containers.len() {
            Self::Stopped
        } else {
            Self::Partial
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Partial => "partial",
            Self::Stopped => "stopped",
            Self::Degraded => "degraded",
            Self::NotFound => "not-found",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ClusterHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
