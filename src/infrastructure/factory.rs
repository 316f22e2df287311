//! Builds runtime and store adapters from settings.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use super::config::Settings;
use crate::adapter::outbound::docker::{self, DockerCli};
use crate::adapter::outbound::file::{ActivePointer, FileStore, JsonConfigStore};
use crate::error::{ConfigError, Result};
use crate::port::Runtime;

/// Build the configured runtime backend.
pub fn build_runtime(settings: &Settings) -> Result<Arc<dyn Runtime>> {
    match settings.runtime.provider.as_str() {
        docker::PROVIDER => {
            debug!(binary = %settings.runtime.binary, "Using docker CLI runtime");
            Ok(Arc::new(DockerCli::new(settings.runtime.binary.clone())))
        }
        other => Err(ConfigError::InvalidValue {
            field: "runtime.provider",
            reason: format!("unsupported provider '{other}'"),
        }
        .into()),
    }
}

/// File-backed config store and active pointer rooted at `root`.
pub fn build_stores(root: &Path) -> (Arc<JsonConfigStore>, Arc<ActivePointer>) {
    let files = FileStore::new(root);
    (
        Arc::new(JsonConfigStore::new(files.clone())),
        Arc::new(ActivePointer::new(files)),
    )
}
