//! Logging configuration and initialization.

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable overriding the configured level.
pub const LOGLEVEL_ENV: &str = "HIND_LOGLEVEL";

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "pretty".into(),
        }
    }
}

impl LoggingConfig {
    /// Effective filter directive.
    ///
    /// Precedence: `-v` flags, then `HIND_LOGLEVEL`, then `RUST_LOG`, then the
    /// configured level.
    #[must_use]
    pub fn directive(&self, verbosity: u8) -> String {
        resolve_level(
            verbosity,
            std::env::var(LOGLEVEL_ENV).ok(),
            std::env::var(EnvFilter::DEFAULT_ENV).ok(),
            &self.level,
        )
    }

    /// Initialize the tracing subscriber. Logs go to stderr.
    ///
    /// Calling this twice is harmless; the second subscriber is discarded.
    pub fn init(&self, verbosity: u8) {
        let filter = EnvFilter::new(self.directive(verbosity));

        let _ = match self.format.as_str() {
            "json" => fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init(),
            _ => fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init(),
        };
    }
}

fn resolve_level(
    verbosity: u8,
    hind_level: Option<String>,
    rust_log: Option<String>,
    configured: &str,
) -> String {
    let from_flags = match verbosity {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    };
    if let Some(level) = from_flags {
        return level.to_string();
    }

    [hind_level, rust_log]
        .into_iter()
        .flatten()
        .find(|level| !level.trim().is_empty())
        .unwrap_or_else(|| configured.to_string())
}
