//! Date-keyed cache of fetched briefs.
//!
//! [`CacheStore`] is an immutable value: [`CacheStore::put`] returns a new store
//! and leaves the receiver untouched. The orchestrator swaps the whole value in
//! one step under its state lock, so a mutation is never observed half-applied.
//! The map sits behind an `Arc`, which makes snapshots of the view state cheap.
//!
//! Loading and saving never fail from the caller's point of view. An unreadable
//! or unparseable slot loads as an empty cache; a failed write is logged and
//! dropped.

use crate::domain::error::Result;
use crate::domain::DailyBrief;
use crate::storage::backend::CacheStorage;
use crate::storage::models::{StoredCache, CACHE_FORMAT_VERSION};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Mapping from date to the brief fetched for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStore {
    briefs: Arc<BTreeMap<NaiveDate, DailyBrief>>,
}

/// Aggregate figures over the whole cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of dates with a cached brief.
    pub days: usize,
    /// Total number of news items across all cached briefs.
    pub items: usize,
}

#[derive(Serialize)]
struct CacheDocumentRef<'a> {
    version: u32,
    briefs: &'a BTreeMap<NaiveDate, DailyBrief>,
}

impl CacheStore {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the cache from durable storage.
    ///
    /// Returns an empty cache if the slot is absent, unreadable, or does not
    /// parse. Failures are logged at `warn` and otherwise swallowed.
    pub fn load(storage: &dyn CacheStorage) -> Self {
        let _span = tracing::debug_span!("cache_load").entered();

        let payload = match storage.read() {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                tracing::debug!("no stored cache, starting empty");
                return Self::new();
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stored cache, starting empty");
                return Self::new();
            }
        };

        match Self::from_json(&payload) {
            Ok(cache) => {
                tracing::debug!(days = cache.len(), "loaded cache");
                cache
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse stored cache, starting empty");
                Self::new()
            }
        }
    }

    /// Writes the full cache to durable storage.
    ///
    /// Skipped when the cache is empty, so an empty in-memory value never
    /// replaces a valid stored cache. Write errors are logged and not retried.
    pub fn save(&self, storage: &dyn CacheStorage) {
        let _span = tracing::debug_span!("cache_save", days = self.len()).entered();

        if self.is_empty() {
            tracing::debug!("skipping save, cache is empty");
            return;
        }

        let result = self.to_json().and_then(|payload| storage.write(&payload));
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to persist cache");
        }
    }

    /// Returns the brief cached for `date`, if any.
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<&DailyBrief> {
        self.briefs.get(&date)
    }

    /// Returns a new cache with `brief` bound to `brief.date`.
    ///
    /// Any prior entry for that date is replaced wholesale. All other entries
    /// are carried over unchanged, and `self` is not modified.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use news_brief::storage::CacheStore;
    /// use news_brief::DailyBrief;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    /// let empty = CacheStore::new();
    /// let cache = empty.put(DailyBrief::new(date, vec![], 0));
    ///
    /// assert!(empty.is_empty());
    /// assert!(cache.get(date).is_some());
    /// ```
    #[must_use]
    pub fn put(&self, brief: DailyBrief) -> Self {
        let mut briefs = (*self.briefs).clone();
        briefs.insert(brief.date, brief);
        Self {
            briefs: Arc::new(briefs),
        }
    }

    /// Number of cached dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.briefs.len()
    }

    /// Whether no date is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.briefs.is_empty()
    }

    /// Cached dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.briefs.keys().copied()
    }

    /// Number of cached days and total cached items.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            days: self.briefs.len(),
            items: self.briefs.values().map(|brief| brief.news.len()).sum(),
        }
    }

    /// Serializes the cache as a versioned JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn to_json(&self) -> Result<String> {
        let document = CacheDocumentRef {
            version: CACHE_FORMAT_VERSION,
            briefs: &self.briefs,
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Parses a cache from a versioned document or a bare date map.
    ///
    /// Each brief is re-keyed by its map key, so a brief whose embedded `date`
    /// disagrees with its key is stored under the key.
    ///
    /// # Errors
    ///
    /// Returns an error if `payload` is not valid JSON in either shape.
    pub fn from_json(payload: &str) -> Result<Self> {
        let stored: StoredCache = serde_json::from_str(payload)?;
        let (version, mut briefs) = stored.into_parts();

        if version > CACHE_FORMAT_VERSION {
            tracing::warn!(version, "cache written by a newer format version");
        }

        for (date, brief) in &mut briefs {
            if brief.date != *date {
                tracing::debug!(key = %date, embedded = %brief.date, "re-keying brief");
                brief.date = *date;
            }
        }

        Ok(Self {
            briefs: Arc::new(briefs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::news::sample_item;
    use crate::domain::Category;
    use crate::storage::MemoryStorage;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn brief(d: u32, ids: &[&str]) -> DailyBrief {
        let news = ids
            .iter()
            .map(|id| sample_item(id, Category::International))
            .collect();
        DailyBrief::new(day(d), news, 1_714_521_600_000 + i64::from(d))
    }

    #[test]
    fn put_returns_new_value_and_keeps_receiver() {
        let first = CacheStore::new().put(brief(1, &["a"]));
        let second = first.put(brief(2, &["b"]));

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
        assert_eq!(second.get(day(1)), first.get(day(1)));
    }

    #[test]
    fn put_replaces_existing_entry_without_merging() {
        let cache = CacheStore::new()
            .put(brief(1, &["a", "b", "c"]))
            .put(brief(1, &["x", "y"]));

        let ids: Vec<_> = cache
            .get(day(1))
            .unwrap()
            .news
            .iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(ids, vec!["x", "y"]);
    }

    #[test]
    fn save_then_load_round_trips() {
        let storage = MemoryStorage::new();
        let cache = CacheStore::new()
            .put(brief(1, &["a", "b"]))
            .put(brief(3, &["c"]));

        cache.save(&storage);
        let loaded = CacheStore::load(&storage);

        assert_eq!(loaded, cache);
    }

    #[test]
    fn save_skips_empty_cache() {
        let storage = MemoryStorage::with_payload("{\"version\":1,\"briefs\":{}}");

        CacheStore::new().save(&storage);

        assert_eq!(storage.writes(), 0);
    }

    #[test]
    fn unparseable_payload_loads_empty() {
        let storage = MemoryStorage::with_payload("{not json");

        assert!(CacheStore::load(&storage).is_empty());
    }

    #[test]
    fn loads_bare_browser_map() {
        let payload = r#"{
            "2024-05-01": {
                "date": "2024-05-01",
                "news": [{
                    "id": "2024-05-01-0",
                    "title": "t",
                    "summary": "s",
                    "content": "c",
                    "source": "X - @openai",
                    "url": "https://x.com/openai",
                    "category": "International",
                    "timestamp": "2024-05-01",
                    "imageUrl": "https://picsum.photos/seed/t0/800/600"
                }],
                "retrievedAt": 1714521600000
            }
        }"#;

        let cache = CacheStore::from_json(payload).unwrap();

        let cached = cache.get(day(1)).unwrap();
        assert_eq!(cached.news.len(), 1);
        assert_eq!(cached.retrieved_at, 1_714_521_600_000);
    }

    #[test]
    fn stats_count_days_and_items() {
        let cache = CacheStore::new()
            .put(brief(1, &["a", "b"]))
            .put(brief(2, &["c", "d", "e"]));

        assert_eq!(cache.stats(), CacheStats { days: 2, items: 5 });
    }
}
