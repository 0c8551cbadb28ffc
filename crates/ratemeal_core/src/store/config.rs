//! Explicit storage location for the record collection file.
//!
//! # Invariants
//! - `storage_root` is a non-empty absolute path.
//! - `file_name` is a single non-empty path component.

use super::{StoreError, StoreResult};
use std::path::{Path, PathBuf};

/// Default file name of the record collection inside the storage root.
pub const DEFAULT_FILE_NAME: &str = "records";

/// Location of the record collection file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    storage_root: PathBuf,
    file_name: String,
}

impl StoreConfig {
    /// Creates a config rooted at `storage_root` with the default file name.
    ///
    /// # Errors
    /// - Returns `StoreError::Config` when the root is empty or relative.
    pub fn new(storage_root: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            storage_root: normalize_storage_root(storage_root.as_ref())?,
            file_name: DEFAULT_FILE_NAME.to_string(),
        })
    }

    /// Overrides the collection file name.
    ///
    /// # Errors
    /// - Returns `StoreError::Config` when `file_name` is empty, `.`/`..`, or
    ///   contains a path separator.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> StoreResult<Self> {
        let file_name = file_name.into();
        let trimmed = file_name.trim();
        if trimmed.is_empty() {
            return Err(StoreError::Config("file_name cannot be empty".to_string()));
        }
        if trimmed == "." || trimmed == ".." || trimmed.contains(['/', '\\']) {
            return Err(StoreError::Config(format!(
                "file_name must be a plain file name, got `{trimmed}`"
            )));
        }
        self.file_name = trimmed.to_string();
        Ok(self)
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Full path of the collection file.
    pub fn file_path(&self) -> PathBuf {
        self.storage_root.join(&self.file_name)
    }
}

fn normalize_storage_root(storage_root: &Path) -> StoreResult<PathBuf> {
    if storage_root.as_os_str().is_empty() {
        return Err(StoreError::Config("storage_root cannot be empty".to_string()));
    }
    if !storage_root.is_absolute() {
        return Err(StoreError::Config(format!(
            "storage_root must be an absolute path, got `{}`",
            storage_root.display()
        )));
    }
    Ok(storage_root.to_path_buf())
}
