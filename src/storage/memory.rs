//! In-process storage backend.
//!
//! Keeps the slot in memory. Useful for embedders that persist elsewhere and
//! for tests that need to inspect what was written.

use crate::domain::error::{NewsBriefError, Result};
use crate::storage::backend::CacheStorage;
use std::sync::Mutex;

/// In-memory single-slot storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Slot>,
}

#[derive(Debug, Default)]
struct Slot {
    payload: Option<String>,
    writes: usize,
}

impl MemoryStorage {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a slot pre-filled with `payload`, as if written by an earlier run.
    #[must_use]
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Slot {
                payload: Some(payload.into()),
                writes: 0,
            }),
        }
    }

    /// Number of writes performed since construction.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.slot.lock().map_or(0, |slot| slot.writes)
    }
}

impl CacheStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>> {
        let slot = self
            .slot
            .lock()
            .map_err(|e| NewsBriefError::Storage(format!("memory slot poisoned: {e}")))?;
        Ok(slot.payload.clone())
    }

    fn write(&self, payload: &str) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| NewsBriefError::Storage(format!("memory slot poisoned: {e}")))?;
        slot.payload = Some(payload.to_string());
        slot.writes += 1;
        drop(slot);
        Ok(())
    }
}
