//! Kalina Store - Persistent governance state with JSON snapshot files.
//!
//! The engine serializes its whole state after every committed mutation;
//! this crate owns the on-disk format and the crash-consistent write path.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Corrupt snapshot at {path}: {reason}")]
    CorruptSnapshot { path: PathBuf, reason: String },
}

/// A typed snapshot file under a data directory.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves either the previous snapshot or the new one,
/// never a torn file.
pub struct SnapshotFile<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize + DeserializeOwned> SnapshotFile<T> {
    /// Open (or create) the snapshot file `<dir>/<name>.json`.
    pub fn open(dir: &Path, name: &str) -> Result<Self, StoreError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(format!("{name}.json")),
            _marker: PhantomData,
        })
    }

    /// Check whether `dir` already holds a snapshot named `name`, without
    /// creating the directory.
    pub fn exists(dir: &Path, name: &str) -> bool {
        dir.join(format!("{name}.json")).exists()
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, or `None` if no snapshot has been written yet.
    pub fn load(&self) -> Result<Option<T>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        let value = serde_json::from_str(&contents).map_err(|e| StoreError::CorruptSnapshot {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        Ok(Some(value))
    }

    /// Write a new snapshot, replacing any previous one atomically.
    pub fn save(&self, value: &T) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;

        tracing::trace!(path = %self.path.display(), "snapshot written");
        Ok(())
    }
}
