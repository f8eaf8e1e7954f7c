//! On-disk fragment store.
//!
//! One file per fragment, named `NN_<name>.opts`, so a plain directory
//! listing is already in priority order. Ties within a priority are ordered
//! by `all_ordered`, not by the listing. Writes go to a uniquely named
//! temporary file in the same directory and are renamed into place, which
//! keeps concurrent producers on distinct keys from clobbering each other.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::opts::fragment::{Fragment, FragmentError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to write fragment '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read fragment store '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    InvalidFragment(#[from] FragmentError),
}

/// Directory-backed fragment collection.
#[derive(Debug, Clone)]
pub struct FragmentStore {
    dir: PathBuf,
}

impl FragmentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write or overwrite the fragment keyed by `(priority, name)`.
    pub fn put(&self, fragment: &Fragment) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source: std::io::Error| StoreError::WriteError {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.dir.join(fragment.file_name());
        let write_err = |source: std::io::Error| StoreError::WriteError {
            path: path.clone(),
            source,
        };

        let tmp_path = self.dir.join(format!(
            ".{}.{}.tmp",
            fragment.file_name(),
            uuid::Uuid::new_v4()
        ));
        if let Err(e) = fs::write(&tmp_path, fragment.content()) {
            let _ = fs::remove_file(&tmp_path);
            return Err(write_err(e));
        }
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(write_err(e));
        }

        tracing::debug!(key = %fragment.key(), path = %path.display(), "Fragment written");
        Ok(path)
    }

    /// All fragments, ascending by priority then name.
    ///
    /// A store directory that was never created yields an empty list.
    pub fn all_ordered(&self) -> Result<Vec<Fragment>, StoreError> {
        let read_err = |path: &Path, source: std::io::Error| StoreError::ReadError {
            path: path.to_path_buf(),
            source,
        };

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(read_err(self.dir.as_path(), e)),
        };

        let mut fragments = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| read_err(self.dir.as_path(), e))?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            let Some((priority, name)) = Fragment::parse_file_name(file_name) else {
                if !file_name.starts_with('.') {
                    tracing::warn!(file = %file_name, "Ignoring unrecognized file in fragment store");
                }
                continue;
            };

            let path = entry.path();
            let content = fs::read_to_string(&path).map_err(|e| read_err(path.as_path(), e))?;
            match Fragment::new(priority, &name, content) {
                Ok(fragment) => {
                    tracing::debug!(key = %fragment.key(), "Fragment read");
                    fragments.push(fragment);
                }
                Err(e) => tracing::warn!(file = %file_name, "Skipping fragment: {}", e),
            }
        }

        fragments.sort();
        Ok(fragments)
    }
}

/// Producer entry point: build a fragment and persist it.
pub fn write_fragment(
    store: &FragmentStore,
    priority: u8,
    name: &str,
    content: &str,
) -> Result<(), StoreError> {
    let fragment = Fragment::new(priority, name, content)?;
    store.put(&fragment)?;
    Ok(())
}
