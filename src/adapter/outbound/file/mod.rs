//! Root-scoped file storage.
//!
//! Every path handed to [`FileStore`] is relative to its root. Writes go to a
//! temporary sibling first and are renamed into place after `sync_all`, so
//! readers never observe a half-written document.

mod active;
mod config;

use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

pub use active::{ActivePointer, ACTIVE_FILE};
pub use config::{JsonConfigStore, CLUSTER_DIR, CONFIG_FILE};

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `relative` under the root, rejecting empty and escaping paths.
    pub fn path(&self, relative: &Path) -> Result<PathBuf> {
        if relative.as_os_str().is_empty() {
            return Err(invalid_path(relative, "path cannot be empty").into());
        }
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid_path(relative, "path escapes the store root").into());
                }
            }
        }
        Ok(self.root.join(relative))
    }

    /// Read a file. `None` when it does not exist.
    pub fn read(&self, relative: &Path) -> Result<Option<Vec<u8>>> {
        let path = self.path(relative)?;
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace a file's contents atomically, creating parent directories.
    pub fn write_atomic(&self, relative: &Path, data: &[u8]) -> Result<()> {
        let path = self.path(relative)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;

        let cleanup_and_err = |e| {
            let _ = fs::remove_file(&temp_path);
            e
        };

        file.write_all(data).map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;
        fs::rename(&temp_path, &path).map_err(cleanup_and_err)?;

        Ok(())
    }

    #[must_use]
    pub fn is_file(&self, relative: &Path) -> bool {
        self.path(relative).map(|p| p.is_file()).unwrap_or(false)
    }

    #[must_use]
    pub fn is_dir(&self, relative: &Path) -> bool {
        self.path(relative).map(|p| p.is_dir()).unwrap_or(false)
    }

    pub fn create_dir(&self, relative: &Path) -> Result<()> {
        fs::create_dir_all(self.path(relative)?)?;
        Ok(())
    }

    /// Remove a directory tree. Absent directories are not an error.
    pub fn remove_dir(&self, relative: &Path) -> Result<()> {
        match fs::remove_dir_all(self.path(relative)?) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    /// Remove a file. Absent files are not an error.
    pub fn remove_file(&self, relative: &Path) -> Result<()> {
        match fs::remove_file(self.path(relative)?) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    /// Names of the sub-directories of `relative`, sorted.
    pub fn list_dirs(&self, relative: &Path) -> Result<Vec<String>> {
        let entries = match fs::read_dir(self.path(relative)?) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

fn invalid_path(path: &Path, reason: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("{reason}: '{}'", path.display()),
    )
}
