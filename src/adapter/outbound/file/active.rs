//! Active cluster pointer stored as a plain text file.

use std::path::{Path, PathBuf};

use super::{FileStore, CLUSTER_DIR};
use crate::domain::identity::validate_cluster_name;
use crate::error::{Error, ResourceKind, Result};
use crate::port::ActiveClusterStore;

/// Pointer file name inside the cluster directory.
pub const ACTIVE_FILE: &str = "active";

#[derive(Debug, Clone)]
pub struct ActivePointer {
    files: FileStore,
}

impl ActivePointer {
    pub fn new(files: FileStore) -> Self {
        Self { files }
    }

    fn pointer_path() -> PathBuf {
        Path::new(CLUSTER_DIR).join(ACTIVE_FILE)
    }
}

impl ActiveClusterStore for ActivePointer {
    fn get(&self) -> Result<String> {
        let data = self.files.read(&Self::pointer_path())?.unwrap_or_default();
        Ok(String::from_utf8_lossy(&data).trim().to_string())
    }

    fn set(&self, name: &str) -> Result<()> {
        validate_cluster_name(name)?;
        if !self.files.is_dir(&Path::new(CLUSTER_DIR).join(name)) {
            return Err(Error::not_found(ResourceKind::Cluster, name));
        }
        self.files.write_atomic(&Self::pointer_path(), name.as_bytes())
    }

    fn clear(&self) -> Result<()> {
        self.files.remove_file(&Self::pointer_path())
    }
}
