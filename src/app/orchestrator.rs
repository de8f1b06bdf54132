//! Brief orchestrator: cache-first loading, search, and fetch lifecycle.
//!
//! [`BriefOrchestrator`] is a cloneable handle over the shared view state. All
//! operations take `&self`, so several intents can be in flight on one runtime.
//! The state lock is only ever held between awaits, never across one.
//!
//! # Overlapping fetches
//!
//! When operations overlap, the latest one owns the view. A fetch that resolves
//! after it was superseded leaves view state alone. A superseded date fetch
//! that succeeded is still written to the cache, unless a newer fetch of the
//! same date already wrote its own result.
//!
//! # Example
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use news_brief::{initialize, Config};
//!
//! # async fn run() -> news_brief::Result<()> {
//! let orchestrator = initialize(&Config::default())?;
//! let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
//!
//! orchestrator.load_brief(date, false).await;
//! println!("{} items", orchestrator.snapshot().news().len());
//!
//! orchestrator.shutdown();
//! # Ok(())
//! # }
//! ```

use super::state::{BriefState, Ticket, ViewError};
use crate::domain::{CategoryCounts, DailyBrief, NewsItem};
use crate::infrastructure::Clock;
use crate::provider::BriefProvider;
use crate::storage::{CacheStats, CacheStorage, CacheStore};
use crate::ui::viewmodel::FeedViewModel;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared handle coordinating the cache, the provider and the view state.
#[derive(Clone)]
pub struct BriefOrchestrator {
    state: Arc<Mutex<BriefState>>,
    provider: Arc<dyn BriefProvider>,
    storage: Arc<dyn CacheStorage>,
    clock: Arc<dyn Clock>,
}

impl BriefOrchestrator {
    /// Creates an orchestrator, loading the cache from `storage`.
    ///
    /// The initial state browses today's date with nothing displayed; the
    /// caller typically follows up with `load_brief(today, false)`.
    pub fn new(
        provider: Arc<dyn BriefProvider>,
        storage: Arc<dyn CacheStorage>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = CacheStore::load(storage.as_ref());
        let today = clock.today();

        tracing::info!(days = cache.len(), today = %today, "orchestrator initialized");

        Self {
            state: Arc::new(Mutex::new(BriefState::new(cache, today))),
            provider,
            storage,
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, BriefState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the current view state.
    #[must_use]
    pub fn snapshot(&self) -> BriefState {
        self.lock().clone()
    }

    /// Computes the view model of the current state.
    #[must_use]
    pub fn view_model(&self) -> FeedViewModel {
        let today = self.clock.today();
        self.lock().compute_viewmodel(today)
    }

    /// Shows the brief of `date`, from the cache unless `force_refresh` is set.
    ///
    /// Leaves search mode and selects `date`. On a cache miss, or when forced,
    /// the provider is called; a successful result replaces the cached entry
    /// for `date` and is persisted. A failure sets a fetch error and keeps the
    /// previously displayed news. Loading is cleared however the call ends.
    #[tracing::instrument(name = "load_brief", skip(self, date), fields(date = %date))]
    pub async fn load_brief(&self, date: NaiveDate, force_refresh: bool) {
        let ticket = {
            let mut state = self.lock();
            let ticket = state.begin_date_load(date);
            if !force_refresh && state.serve_cached(ticket, date) {
                tracing::debug!(count = state.news().len(), "served from cache");
                return;
            }
            ticket
        };

        let in_flight = InFlight::new(&self.state, ticket);
        let result = self.provider.fetch_by_date(date).await;
        in_flight.settle();

        let mut state = self.lock();
        match result {
            Ok(items) => {
                let brief = DailyBrief::new(date, items.clone(), self.clock.now_millis());
                match state.store_brief(ticket, brief) {
                    Some(cache) => cache.save(self.storage.as_ref()),
                    None => tracing::debug!("newer fetch of this date already cached"),
                }

                if state.finish_date_load(ticket, date, items) {
                    tracing::debug!(count = state.news().len(), "brief fetched");
                } else {
                    tracing::debug!("brief fetched for a superseded load, cached only");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch brief");
                if !state.fail(ticket, ViewError::fetch_failed()) {
                    tracing::debug!("ignoring failure of a superseded load");
                }
            }
        }
    }

    /// Searches for `query` and shows the results.
    ///
    /// The query is used as given; rejecting blank queries is up to the caller.
    /// Results are never cached. A failure sets a search error naming the
    /// query and keeps the previous results.
    #[tracing::instrument(name = "search", skip(self))]
    pub async fn search(&self, query: &str) {
        let ticket = self.lock().begin_search(query);

        let in_flight = InFlight::new(&self.state, ticket);
        let result = self.provider.fetch_by_query(query).await;
        in_flight.settle();

        let mut state = self.lock();
        match result {
            Ok(items) => {
                let count = items.len();
                if state.finish_search(ticket, items) {
                    tracing::debug!(count, "search results shown");
                } else {
                    tracing::debug!(count, "discarding results of a superseded search");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "search failed");
                state.fail(ticket, ViewError::search_failed(query));
            }
        }
    }

    /// Leaves search mode, dropping the query, the results and any error.
    ///
    /// The date brief and the selected date are left as they are.
    pub fn exit_search(&self) {
        tracing::debug!("exiting search");
        self.lock().exit_search();
    }

    /// Selects `date`, leaving search mode, and loads its brief cache-first.
    pub async fn select_date(&self, date: NaiveDate) {
        self.lock().select_date(date);
        self.load_brief(date, false).await;
    }

    /// Re-runs the current operation: the active search, or a forced reload of
    /// the selected date.
    pub async fn refresh(&self) {
        let (query, date) = {
            let state = self.lock();
            (state.mode().query().map(str::to_string), state.selected_date())
        };

        match query {
            Some(query) => self.search(&query).await,
            None => self.load_brief(date, true).await,
        }
    }

    /// Opens the displayed item with `id` in the detail view.
    ///
    /// Returns `false` if no displayed item has that id.
    pub fn open_item(&self, id: &str) -> bool {
        self.lock().open_item(id)
    }

    /// Closes the detail view.
    pub fn close_item(&self) {
        self.lock().close_item();
    }

    /// Cached dates plus today, ascending.
    #[must_use]
    pub fn available_dates(&self) -> BTreeSet<NaiveDate> {
        let today = self.clock.today();
        self.lock().available_dates(today)
    }

    /// Counts `items` per category.
    #[must_use]
    pub fn counts(items: &[NewsItem]) -> CategoryCounts {
        CategoryCounts::of(items)
    }

    /// Category counts of the displayed collection.
    #[must_use]
    pub fn displayed_counts(&self) -> CategoryCounts {
        self.lock().displayed_counts()
    }

    /// Number of cached days and items.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.lock().cache_stats()
    }

    /// Flushes the cache one last time. Best effort.
    pub fn shutdown(&self) {
        let _span = tracing::debug_span!("shutdown").entered();
        self.lock().cache().save(self.storage.as_ref());
    }
}

impl std::fmt::Debug for BriefOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BriefOrchestrator")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Clears the loading flag of `ticket` unless settled.
///
/// Covers a provider future that panics or is dropped before it resolves.
struct InFlight<'a> {
    state: &'a Mutex<BriefState>,
    ticket: Ticket,
    armed: bool,
}

impl<'a> InFlight<'a> {
    const fn new(state: &'a Mutex<BriefState>, ticket: Ticket) -> Self {
        Self {
            state,
            ticket,
            armed: true,
        }
    }

    fn settle(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::debug!("fetch abandoned before completion");
            self.state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .abandon(self.ticket);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::news::sample_item;
    use crate::domain::{Category, NewsBriefError, Result};
    use crate::infrastructure::FixedClock;
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn items(prefix: &str, n: usize) -> Vec<NewsItem> {
        (0..n)
            .map(|i| sample_item(&format!("{prefix}-{i}"), Category::International))
            .collect()
    }

    #[derive(Default)]
    struct CountingProvider {
        date_calls: AtomicUsize,
        query_calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl BriefProvider for CountingProvider {
        async fn fetch_by_date(&self, date: NaiveDate) -> Result<Vec<NewsItem>> {
            self.date_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(NewsBriefError::MalformedResponse("boom".into()));
            }
            Ok(items(&date.to_string(), 2))
        }

        async fn fetch_by_query(&self, query: &str) -> Result<Vec<NewsItem>> {
            self.query_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(NewsBriefError::MalformedResponse("boom".into()));
            }
            Ok(items(query, 1))
        }
    }

    /// Blocks date fetches of `gated`, and searches for "late", until released.
    struct GatedProvider {
        gated: NaiveDate,
        gate: Notify,
    }

    #[async_trait]
    impl BriefProvider for GatedProvider {
        async fn fetch_by_date(&self, date: NaiveDate) -> Result<Vec<NewsItem>> {
            if date == self.gated {
                self.gate.notified().await;
            }
            Ok(items(&date.to_string(), 1))
        }

        async fn fetch_by_query(&self, query: &str) -> Result<Vec<NewsItem>> {
            if query == "late" {
                self.gate.notified().await;
            }
            Ok(items(query, 1))
        }
    }

    /// Holds the first date fetch until released, answering it with "old".
    /// Later fetches answer "new" at once.
    #[derive(Default)]
    struct FirstFetchGated {
        calls: AtomicUsize,
        gate: Notify,
    }

    #[async_trait]
    impl BriefProvider for FirstFetchGated {
        async fn fetch_by_date(&self, _date: NaiveDate) -> Result<Vec<NewsItem>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                self.gate.notified().await;
                return Ok(items("old", 1));
            }
            Ok(items("new", 1))
        }

        async fn fetch_by_query(&self, query: &str) -> Result<Vec<NewsItem>> {
            Ok(items(query, 1))
        }
    }

    fn build(provider: Arc<dyn BriefProvider>) -> (BriefOrchestrator, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let orchestrator =
            BriefOrchestrator::new(provider, storage.clone(), Arc::new(FixedClock::at(day(1))));
        (orchestrator, storage)
    }

    #[tokio::test]
    async fn refresh_dispatches_on_mode() {
        let provider = Arc::new(CountingProvider::default());
        let (orchestrator, _) = build(provider.clone());

        orchestrator.load_brief(day(1), false).await;
        orchestrator.refresh().await;
        assert_eq!(provider.date_calls.load(Ordering::SeqCst), 2);

        orchestrator.search("agents").await;
        orchestrator.refresh().await;
        assert_eq!(provider.query_calls.load(Ordering::SeqCst), 2);
        assert_eq!(provider.date_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_news() {
        let (orchestrator, _) = build(Arc::new(CountingProvider::default()));
        orchestrator.load_brief(day(1), false).await;
        let before = orchestrator.snapshot().news().to_vec();

        let failing = BriefOrchestrator {
            provider: Arc::new(CountingProvider {
                fail: true,
                ..CountingProvider::default()
            }),
            ..orchestrator.clone()
        };
        failing.load_brief(day(1), true).await;

        let state = orchestrator.snapshot();
        assert_eq!(state.news(), before.as_slice());
        assert!(!state.is_loading());
        assert_eq!(state.error(), Some(&ViewError::fetch_failed()));
    }

    #[tokio::test]
    async fn successful_fetch_is_persisted() {
        let (orchestrator, storage) = build(Arc::new(CountingProvider::default()));

        orchestrator.load_brief(day(1), false).await;

        let persisted = CacheStore::load(storage.as_ref());
        assert_eq!(persisted.get(day(1)).map(|b| b.news.len()), Some(2));
        assert_eq!(
            persisted.get(day(1)).map(|b| b.retrieved_at),
            Some(1_714_521_600_000)
        );
    }

    #[tokio::test]
    async fn stale_date_fetch_does_not_overwrite_newer_view() {
        let provider = Arc::new(GatedProvider {
            gated: day(1),
            gate: Notify::new(),
        });
        let (orchestrator, _) = build(provider.clone());

        let slow = orchestrator.clone();
        let slow_load = tokio::spawn(async move { slow.load_brief(day(1), false).await });
        tokio::task::yield_now().await;

        orchestrator.load_brief(day(2), false).await;
        provider.gate.notify_one();
        slow_load.await.unwrap();

        let state = orchestrator.snapshot();
        assert_eq!(state.selected_date(), day(2));
        assert_eq!(state.news_date(), Some(day(2)));
        assert!(!state.is_loading());
        assert!(state.cache().get(day(1)).is_some());
    }

    #[tokio::test]
    async fn overlapping_refreshes_of_one_date_keep_the_newest_result() {
        let provider = Arc::new(FirstFetchGated::default());
        let (orchestrator, storage) = build(provider.clone());

        let slow = orchestrator.clone();
        let slow_refresh = tokio::spawn(async move { slow.load_brief(day(1), true).await });
        tokio::task::yield_now().await;

        orchestrator.load_brief(day(1), true).await;
        provider.gate.notify_one();
        slow_refresh.await.unwrap();

        let state = orchestrator.snapshot();
        assert_eq!(state.news()[0].id, "new-0");
        assert_eq!(state.cache().get(day(1)).unwrap().news, state.news());
        let persisted = CacheStore::load(storage.as_ref());
        assert_eq!(persisted.get(day(1)).unwrap().news[0].id, "new-0");

        orchestrator.load_brief(day(1), false).await;
        assert_eq!(orchestrator.snapshot().news()[0].id, "new-0");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn dropped_load_clears_loading() {
        let provider = Arc::new(GatedProvider {
            gated: day(1),
            gate: Notify::new(),
        });
        let (orchestrator, _) = build(provider);

        let pending = orchestrator.load_brief(day(1), false);
        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(10), pending).await;

        assert!(timed_out.is_err());
        assert!(!orchestrator.snapshot().is_loading());
    }

    #[tokio::test]
    async fn exit_search_during_search_discards_results() {
        let provider = Arc::new(GatedProvider {
            gated: day(9),
            gate: Notify::new(),
        });
        let (orchestrator, _) = build(provider.clone());
        orchestrator.load_brief(day(1), false).await;

        let searching = orchestrator.clone();
        let handle = tokio::spawn(async move { searching.search("late").await });
        tokio::task::yield_now().await;
        assert!(orchestrator.snapshot().is_loading());

        orchestrator.exit_search();
        provider.gate.notify_one();
        handle.await.unwrap();

        let state = orchestrator.snapshot();
        assert!(!state.search_mode());
        assert!(state.search_results().is_empty());
        assert_eq!(state.news_date(), Some(day(1)));
    }

    #[tokio::test]
    async fn search_results_are_never_cached() {
        let (orchestrator, storage) = build(Arc::new(CountingProvider::default()));

        orchestrator.search("transformer").await;

        assert_eq!(orchestrator.cache_stats(), CacheStats::default());
        assert_eq!(storage.writes(), 0);
    }
}
