//! On-disk cache document format.
//!
//! These types describe the serialized shape only. The in-memory representation
//! is [`CacheStore`](crate::storage::CacheStore).

use crate::domain::DailyBrief;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version written into new cache documents.
pub const CACHE_FORMAT_VERSION: u32 = 1;

/// Versioned cache document.
///
/// ```json
/// {
///   "version": 1,
///   "briefs": {
///     "2024-05-01": {
///       "date": "2024-05-01",
///       "news": [ ... ],
///       "retrievedAt": 1714521600000
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheDocument {
    /// Format version for future migrations.
    pub version: u32,

    /// Cached briefs keyed by canonical date.
    #[serde(default)]
    pub briefs: BTreeMap<NaiveDate, DailyBrief>,
}

/// Any cache payload the loader understands.
///
/// Besides the versioned document, the bare `{ "YYYY-MM-DD": brief }` map that
/// the browser dashboard kept in local storage is accepted, so an exported
/// browser cache can be dropped in as the cache file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StoredCache {
    Versioned(CacheDocument),
    Bare(BTreeMap<NaiveDate, DailyBrief>),
}

impl StoredCache {
    /// Returns the format version and the briefs map.
    #[must_use]
    pub fn into_parts(self) -> (u32, BTreeMap<NaiveDate, DailyBrief>) {
        match self {
            Self::Versioned(document) => (document.version, document.briefs),
            Self::Bare(briefs) => (0, briefs),
        }
    }
}
