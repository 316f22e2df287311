//! Path utilities for hind.
//!
//! All data lives under `~/.config/hind/` unless `HIND_HOME` points elsewhere:
//! - `config.toml` - user settings
//! - `cluster/<name>/cluster.json` - per-cluster configuration
//! - `cluster/active` - active cluster pointer

use std::path::PathBuf;

/// Environment variable overriding the hind home directory.
pub const HOME_ENV: &str = "HIND_HOME";

/// Settings file name inside the home directory.
pub const SETTINGS_FILE: &str = "config.toml";

/// Returns the hind home directory.
pub fn home_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("hind")
}

/// Returns the default settings file path.
pub fn default_settings() -> PathBuf {
    home_dir().join(SETTINGS_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_live_under_home() {
        let settings = default_settings();
        assert!(settings.starts_with(home_dir()));
        assert!(settings.ends_with(SETTINGS_FILE));
    }
}
