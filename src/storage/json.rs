//! JSON file-based storage backend.
//!
//! Stores the serialized cache in one human-readable file. Writes go to a
//! temporary sibling file which is then renamed over the target, so a crash never
//! leaves a truncated cache behind.
//!
//! # Performance Characteristics
//!
//! - **Read**: once per process, whole file
//! - **Write**: O(n) in cached briefs, whole file on every mutation
//! - **Best for**: a few hundred cached dates

use crate::domain::error::Result;
use crate::storage::backend::CacheStorage;
use std::path::{Path, PathBuf};

/// JSON file storage backend.
///
/// Holds only the file path; every [`read`](CacheStorage::read) and
/// [`write`](CacheStorage::write) goes to disk.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    /// Path to the JSON file on disk.
    file_path: PathBuf,
}

impl JsonFileStorage {
    /// Opens a JSON storage backend at `file_path`.
    ///
    /// Parent directories are created automatically. The file itself is not
    /// created until the first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use news_brief::storage::JsonFileStorage;
    /// use std::path::PathBuf;
    ///
    /// let storage = JsonFileStorage::new(PathBuf::from("/tmp/news-brief/cache.json"))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON cache storage");

        if let Some(parent) = file_path.parent() {
            tracing::debug!(parent = ?parent, "creating parent directory");
            std::fs::create_dir_all(parent)?;
        }

        Ok(Self { file_path })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl CacheStorage for JsonFileStorage {
    fn read(&self) -> Result<Option<String>> {
        let _span = tracing::debug_span!("json_read", path = ?self.file_path).entered();

        if !self.file_path.exists() {
            tracing::debug!("no cache file yet");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.file_path)?;
        tracing::debug!(bytes = contents.len(), "read cache file");
        Ok(Some(contents))
    }

    fn write(&self, payload: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_write",
            path = ?self.file_path,
            bytes = payload.len()
        )
        .entered();

        let tmp_path = self.file_path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, payload)?;

        tracing::trace!("renaming temporary file to final location");
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::debug!("cache file saved");
        Ok(())
    }
}
