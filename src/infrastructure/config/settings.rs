//! User settings loading and validation.
//!
//! Settings live in an optional `config.toml` under the hind home directory.
//! Every section and field has a default, so a missing file or an empty one
//! yields [`Settings::default`].
//!
//! ```toml
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [runtime]
//! provider = "dockercli"
//! binary = "podman"
//!
//! [timeouts]
//! start = 600
//! convergence = 60
//! ```

use std::io;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use super::logging::LoggingConfig;
use crate::adapter::outbound::docker;
use crate::application::reconcile::ConvergenceConfig;
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub runtime: RuntimeConfig,
    pub timeouts: TimeoutConfig,
}

/// Container runtime selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Backend implementation. Only `dockercli` is available.
    pub provider: String,
    /// Binary invoked by the CLI backend.
    pub binary: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            provider: docker::PROVIDER.into(),
            binary: docker::DEFAULT_BINARY.into(),
        }
    }
}

/// Default command timeouts, in seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub start: u64,
    pub stop: u64,
    pub delete: u64,
    pub get: u64,
    pub list: u64,
    /// How long a reconcile waits for every node to report running.
    pub convergence: u64,
    pub poll_interval: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            start: 300,
            stop: 30,
            delete: 120,
            get: 120,
            list: 30,
            convergence: 30,
            poll_interval: 1,
        }
    }
}

impl TimeoutConfig {
    #[must_use]
    pub fn convergence(&self) -> ConvergenceConfig {
        ConvergenceConfig {
            timeout: Duration::from_secs(self.convergence),
            poll_interval: Duration::from_secs(self.poll_interval),
        }
    }
}

impl Settings {
    /// Parse settings from TOML content and validate them.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse_toml(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::ReadFile {
                path: path.to_path_buf(),
                source,
            }
            .into()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.runtime.provider != docker::PROVIDER {
            return Err(ConfigError::InvalidValue {
                field: "runtime.provider",
                reason: format!(
                    "unsupported provider '{}', expected '{}'",
                    self.runtime.provider,
                    docker::PROVIDER
                ),
            }
            .into());
        }
        if self.runtime.binary.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "runtime.binary",
                reason: "must not be empty".to_string(),
            }
            .into());
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("expected 'pretty' or 'json', got '{}'", self.logging.format),
            }
            .into());
        }

        let t = &self.timeouts;
        let positive = [
            ("timeouts.start", t.start),
            ("timeouts.stop", t.stop),
            ("timeouts.delete", t.delete),
            ("timeouts.get", t.get),
            ("timeouts.list", t.list),
            ("timeouts.convergence", t.convergence),
            ("timeouts.poll_interval", t.poll_interval),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be greater than 0".to_string(),
                }
                .into());
            }
        }
        if t.poll_interval > t.convergence {
            return Err(ConfigError::InvalidValue {
                field: "timeouts.poll_interval",
                reason: "must not exceed timeouts.convergence".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn empty_file_uses_defaults() {
        let settings = Settings::parse_toml("").unwrap();
        assert_eq!(settings.runtime.binary, "docker");
        assert_eq!(settings.timeouts.start, 300);
        assert_eq!(
            settings.timeouts.convergence(),
            ConvergenceConfig::default()
        );
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let settings = Settings::parse_toml(
            r#"
            [logging]
            format = "json"

            [timeouts]
            convergence = 90
            "#,
        )
        .unwrap();

        assert_eq!(settings.logging.format, "json");
        assert_eq!(settings.logging.level, "warn");
        assert_eq!(settings.timeouts.convergence, 90);
        assert_eq!(settings.timeouts.poll_interval, 1);
    }

    #[test]
    fn rejects_unknown_provider() {
        let err = Settings::parse_toml("[runtime]\nprovider = \"kubernetes\"").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "runtime.provider",
                ..
            })
        ));
    }

    #[test]
    fn rejects_zero_timeouts() {
        let err = Settings::parse_toml("[timeouts]\nstop = 0").unwrap_err();
        assert!(err.to_string().contains("timeouts.stop"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Settings::parse_toml("[logging\nlevel=").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path().join("config.toml")).unwrap();
        assert_eq!(settings.runtime.provider, "dockercli");
    }
}
