//! Durable storage abstraction.
//!
//! This module defines the [`CacheStorage`] trait: a single named slot holding
//! the serialized cache as text. The cache layer reads it once at startup and
//! overwrites it after every mutation, so the trait stays as small as that use.

use crate::domain::error::Result;

/// A single durable text slot.
///
/// Implementations must be usable from the orchestrator's shared handle, hence
/// `Send + Sync`. Writes replace the whole slot.
///
/// # Implementations
///
/// - [`JsonFileStorage`](crate::storage::JsonFileStorage): one file on disk, atomic writes
/// - [`MemoryStorage`](crate::storage::MemoryStorage): in-process slot
///
/// # Examples
///
/// ```no_run
/// use news_brief::storage::{CacheStorage, JsonFileStorage};
/// use std::path::PathBuf;
///
/// let storage = JsonFileStorage::new(PathBuf::from("/tmp/news-brief/cache.json"))?;
/// let payload = storage.read()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait CacheStorage: Send + Sync {
    /// Returns the slot contents, or `Ok(None)` if nothing was ever written.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot exists but cannot be read.
    fn read(&self) -> Result<Option<String>>;

    /// Replaces the slot contents with `payload`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. Backends should never leave a
    /// partially written slot behind.
    fn write(&self, payload: &str) -> Result<()>;
}
