use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::domain::error::DomainError;

/// Kind of resource reported by [`Error::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Cluster,
    Release,
}

impl ResourceKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cluster => "cluster",
            Self::Release => "release",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: ResourceKind, name: String },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error("failed to {operation} '{resource}': {message}")]
    Backend {
        operation: &'static str,
        resource: String,
        message: String,
    },

    #[error(
        "timed out after {}s waiting for: {}",
        .waited.as_secs_f32(),
        .pending.join(", ")
    )]
    Timeout {
        waited: Duration,
        pending: Vec<String>,
    },

    /// A whole command outlived its deadline.
    #[error("{task} did not finish within {}s", .limit.as_secs_f32())]
    DeadlineExceeded { task: String, limit: Duration },

    #[error("operation cancelled")]
    Cancelled,

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn not_found(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn backend(
        operation: &'static str,
        resource: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Backend {
            operation,
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// The innermost error beneath any [`Error::Context`] layers.
    #[must_use]
    pub fn root(&self) -> &Error {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Self::NotFound { .. })
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self.root(),
            Self::Timeout { .. } | Self::DeadlineExceeded { .. }
        )
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self.root(), Self::Cancelled)
    }
}

/// Attach a step description to an error without losing its kind.
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Context {
            context: context.into(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| Error::Context {
            context: f().into(),
            source: Box::new(e.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_sees_through_context_layers() {
        let err: Result<()> = Err(Error::not_found(ResourceKind::Cluster, "demo"));
        let err = err
            .context("failed to load cluster config")
            .context("start")
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "start: failed to load cluster config: cluster 'demo' not found"
        );
    }

    #[test]
    fn timeout_lists_pending_resources() {
        let err = Error::Timeout {
            waited: Duration::from_secs(30),
            pending: vec!["hind.demo.consul.01".into(), "hind.demo.vault.01".into()],
        };

        let msg = err.to_string();
        assert!(msg.contains("30s"));
        assert!(msg.contains("hind.demo.consul.01, hind.demo.vault.01"));
        assert!(err.is_timeout());
        assert!(!err.is_cancelled());
    }

    #[test]
    fn deadline_names_the_task_not_nodes() {
        let err = Error::DeadlineExceeded {
            task: "stopping cluster 'demo'".into(),
            limit: Duration::from_secs(30),
        };

        assert_eq!(
            err.to_string(),
            "stopping cluster 'demo' did not finish within 30s"
        );
        assert!(err.is_timeout());
    }

    #[test]
    fn backend_error_names_resource_and_message() {
        let err = Error::backend(
            "create container",
            "hind.demo.nomad.01",
            "port is already allocated",
        );
        assert_eq!(
            err.to_string(),
            "failed to create container 'hind.demo.nomad.01': port is already allocated"
        );
    }
}
