//! Local durable storage for the session layer.
//!
//! A string-keyed blob store: each key maps to one JSON document on disk
//! under the configured data directory. Containers own disjoint keys
//! (`profile`, `wishlist`) and always rewrite the whole record, so the store
//! needs no partial-update support.
//!
//! Writes go to a temp file in the same directory and are renamed into
//! place, so a crash mid-write leaves the previous record intact.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur reading or writing the blob store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored document could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// File-backed JSON blob store.
///
/// Cheaply cloneable; containers share one store and namespace their keys.
#[derive(Clone)]
pub struct BlobStore {
    root: Arc<PathBuf>,
}

impl BlobStore {
    /// Open (and create if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root: Arc::new(root),
        })
    }

    /// Read and decode the record stored under `key`.
    ///
    /// Returns `Ok(None)` if no record exists; absence is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failure or if the stored JSON does not
    /// decode as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let path = self.key_path(key);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Serialize `value` and overwrite the record under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on encode or write failure.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let path = self.key_path(key);
        let json = serde_json::to_string_pretty(value)?;
        write_atomic(&path, json.as_bytes())?;
        debug!(key = %key, "persisted record");
        Ok(())
    }

    /// Delete the record under `key`. Deleting a missing record is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` on filesystem failure.
    pub fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.key_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

/// Write a temp file next to the target and rename it into place.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    let tmp_path = path.with_extension("json.tmp");
    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}
