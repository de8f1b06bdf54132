//! View state container and view model computation.
//!
//! [`BriefState`] is the single source of truth for everything the view layer
//! shows: the selected date, the active mode, both collections, the fetch
//! lifecycle flags and the opened item. It also holds the current
//! [`CacheStore`] value.
//!
//! # Generations
//!
//! Every operation that starts a fetch, or supersedes one, takes a new
//! [`Ticket`]. Completions carry the ticket they were started with, and only
//! the holder of the latest ticket may touch view state. An overlapping older
//! fetch therefore can never overwrite what a newer operation put on screen.
//! A superseded date fetch may still write the cache, unless a newer fetch of
//! the same date has already done so.
//!
//! The transition methods are crate-private; the view layer reads through the
//! accessors and mutates only through the orchestrator.

use super::modes::ViewMode;
use crate::domain::{CategoryCounts, DailyBrief, NewsItem, DATE_FORMAT};
use crate::storage::{CacheStats, CacheStore};
use crate::ui::viewmodel::{CalendarInfo, FeedViewModel, HeaderInfo, Panel};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

const FETCH_FAILED_MESSAGE: &str =
    "Unable to fetch the latest AI news. Check your network connection or API key configuration.";

/// Which operation a [`ViewError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViewErrorKind {
    /// Loading the brief of a date failed.
    FetchFailed,
    /// A query search failed.
    SearchFailed,
}

/// User-facing error shown in place of the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewError {
    pub kind: ViewErrorKind,
    pub message: String,
}

impl ViewError {
    /// Error for a failed date load.
    #[must_use]
    pub fn fetch_failed() -> Self {
        Self {
            kind: ViewErrorKind::FetchFailed,
            message: FETCH_FAILED_MESSAGE.to_string(),
        }
    }

    /// Error for a failed search; the message names `query`.
    #[must_use]
    pub fn search_failed(query: &str) -> Self {
        Self {
            kind: ViewErrorKind::SearchFailed,
            message: format!("Search for \"{query}\" failed. Please try again."),
        }
    }
}

impl std::fmt::Display for ViewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Identifies the operation that currently owns the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Transient view state. Never persisted.
#[derive(Debug, Clone)]
pub struct BriefState {
    cache: CacheStore,
    selected_date: NaiveDate,
    mode: ViewMode,
    news: Vec<NewsItem>,
    news_date: Option<NaiveDate>,
    search_results: Vec<NewsItem>,
    is_loading: bool,
    error: Option<ViewError>,
    selected_news: Option<NewsItem>,
    generation: u64,
    /// Ticket of the fetch whose result is cached, per date fetched this session.
    cached_by: BTreeMap<NaiveDate, Ticket>,
}

impl BriefState {
    /// Creates the initial state: browsing `today`, nothing displayed yet.
    #[must_use]
    pub fn new(cache: CacheStore, today: NaiveDate) -> Self {
        Self {
            cache,
            selected_date: today,
            mode: ViewMode::Browsing,
            news: Vec::new(),
            news_date: None,
            search_results: Vec::new(),
            is_loading: false,
            error: None,
            selected_news: None,
            generation: 0,
            cached_by: BTreeMap::new(),
        }
    }

    /// Current cache value.
    #[must_use]
    pub const fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Date whose brief the browsing view refers to.
    #[must_use]
    pub const fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    /// Active view mode.
    #[must_use]
    pub const fn mode(&self) -> &ViewMode {
        &self.mode
    }

    /// Whether search mode is active.
    #[must_use]
    pub const fn search_mode(&self) -> bool {
        self.mode.is_search()
    }

    /// Active search query, empty outside search mode.
    #[must_use]
    pub fn search_query(&self) -> &str {
        self.mode.query().unwrap_or_default()
    }

    /// Items of the last date brief served.
    #[must_use]
    pub fn news(&self) -> &[NewsItem] {
        &self.news
    }

    /// Date that [`news`](Self::news) belongs to, if any brief was served yet.
    #[must_use]
    pub const fn news_date(&self) -> Option<NaiveDate> {
        self.news_date
    }

    /// Items of the last successful search.
    #[must_use]
    pub fn search_results(&self) -> &[NewsItem] {
        &self.search_results
    }

    /// The collection the active mode displays.
    #[must_use]
    pub fn displayed(&self) -> &[NewsItem] {
        if self.mode.is_search() {
            &self.search_results
        } else {
            &self.news
        }
    }

    /// Whether a fetch owned by the view is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Error of the last operation, if it failed.
    #[must_use]
    pub const fn error(&self) -> Option<&ViewError> {
        self.error.as_ref()
    }

    /// Item opened in the detail view.
    #[must_use]
    pub const fn selected_news(&self) -> Option<&NewsItem> {
        self.selected_news.as_ref()
    }

    /// Category counts of the displayed collection.
    #[must_use]
    pub fn displayed_counts(&self) -> CategoryCounts {
        CategoryCounts::of(self.displayed())
    }

    /// Cached dates plus `today`, deduplicated and ascending.
    #[must_use]
    pub fn available_dates(&self, today: NaiveDate) -> BTreeSet<NaiveDate> {
        self.cache.dates().chain(std::iter::once(today)).collect()
    }

    /// Number of cached days and items.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn next_ticket(&mut self) -> Ticket {
        self.generation += 1;
        Ticket(self.generation)
    }

    pub(crate) const fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }

    pub(crate) fn begin_date_load(&mut self, date: NaiveDate) -> Ticket {
        self.is_loading = true;
        self.error = None;
        self.mode = ViewMode::Browsing;
        self.selected_date = date;
        self.selected_news = None;
        self.next_ticket()
    }

    /// Serves `date` from the cache if present. Returns whether it was a hit.
    pub(crate) fn serve_cached(&mut self, ticket: Ticket, date: NaiveDate) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        let Some(brief) = self.cache.get(date) else {
            return false;
        };

        self.news = brief.news.clone();
        self.news_date = Some(date);
        self.is_loading = false;
        true
    }

    /// Replaces the cache value with one that binds `brief`, fetched under
    /// `ticket`.
    ///
    /// Returns `None` and leaves the cache alone if a newer fetch of the same
    /// date already stored its result.
    pub(crate) fn store_brief(
        &mut self,
        ticket: Ticket,
        brief: DailyBrief,
    ) -> Option<&CacheStore> {
        if self
            .cached_by
            .get(&brief.date)
            .is_some_and(|newest| *newest > ticket)
        {
            return None;
        }
        self.cached_by.insert(brief.date, ticket);
        self.cache = self.cache.put(brief);
        Some(&self.cache)
    }

    /// Shows a fetched brief. Returns `false` if `ticket` was superseded.
    pub(crate) fn finish_date_load(
        &mut self,
        ticket: Ticket,
        date: NaiveDate,
        items: Vec<NewsItem>,
    ) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.news = items;
        self.news_date = Some(date);
        self.is_loading = false;
        true
    }

    pub(crate) fn begin_search(&mut self, query: &str) -> Ticket {
        self.is_loading = true;
        self.error = None;
        self.mode = ViewMode::Search {
            query: query.to_string(),
        };
        self.selected_news = None;
        self.next_ticket()
    }

    /// Shows search results. Returns `false` if `ticket` was superseded.
    pub(crate) fn finish_search(&mut self, ticket: Ticket, items: Vec<NewsItem>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.search_results = items;
        self.is_loading = false;
        true
    }

    /// Records a failure. Returns `false` if `ticket` was superseded.
    pub(crate) fn fail(&mut self, ticket: Ticket, error: ViewError) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.error = Some(error);
        self.is_loading = false;
        true
    }

    /// Clears loading for an operation that ended without settling.
    pub(crate) fn abandon(&mut self, ticket: Ticket) {
        if self.is_current(ticket) {
            self.is_loading = false;
        }
    }

    pub(crate) fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
        self.mode = ViewMode::Browsing;
        self.selected_news = None;
    }

    /// Leaves search mode. A search still in flight is superseded.
    pub(crate) fn exit_search(&mut self) {
        if self.mode.is_search() && self.is_loading {
            self.next_ticket();
            self.is_loading = false;
        }
        self.mode = ViewMode::Browsing;
        self.search_results.clear();
        self.error = None;
        self.selected_news = None;
    }

    /// Opens the displayed item with `id`. Returns whether one was found.
    pub(crate) fn open_item(&mut self, id: &str) -> bool {
        let found = self.displayed().iter().find(|item| item.id == id).cloned();
        let opened = found.is_some();
        if opened {
            self.selected_news = found;
        }
        opened
    }

    pub(crate) fn close_item(&mut self) {
        self.selected_news = None;
    }

    /// Computes the renderable view model.
    ///
    /// Panel precedence: loading, then error, then the displayed collection,
    /// then the empty state.
    #[must_use]
    pub fn compute_viewmodel(&self, today: NaiveDate) -> FeedViewModel {
        let query = self.mode.query();
        let can_exit_search = query.is_some();

        let header = HeaderInfo {
            title: query.map_or_else(
                || self.selected_date.format(DATE_FORMAT).to_string(),
                |q| format!("Search: {q}"),
            ),
            refresh_label: if can_exit_search { "Search again" } else { "Refresh" },
            is_loading: self.is_loading,
        };

        let panel = if self.is_loading {
            Panel::Loading {
                message: query.map_or_else(
                    || "Scanning the latest AI developments...".to_string(),
                    |q| format!("Searching for \"{q}\"..."),
                ),
                detail: "Retrieving real-time data from X and major tech portals.",
            }
        } else if let Some(error) = &self.error {
            Panel::Error {
                kind: error.kind,
                message: error.message.clone(),
                can_exit_search,
            }
        } else if self.displayed().is_empty() {
            Panel::Empty {
                message: "No news found",
                hint: "Try a different keyword, or go back to the daily brief.",
                can_exit_search,
            }
        } else {
            Panel::Feed {
                title: query.map_or_else(
                    || "Today's highlights".to_string(),
                    |q| format!("Results for \"{q}\""),
                ),
                items: self.displayed().to_vec(),
                counts: self.displayed_counts(),
                can_exit_search,
            }
        };

        FeedViewModel {
            header,
            panel,
            calendar: CalendarInfo {
                selected: self.selected_date,
                available: self.available_dates(today).into_iter().collect(),
            },
            stats: self.cache_stats(),
            detail: self.selected_news.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::news::sample_item;
    use crate::domain::Category;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn items(ids: &[&str]) -> Vec<NewsItem> {
        ids.iter()
            .map(|id| sample_item(id, Category::Domestic))
            .collect()
    }

    #[test]
    fn begin_date_load_forces_browsing_and_clears_error() {
        let mut state = BriefState::new(CacheStore::new(), day(1));
        let ticket = state.begin_search("x");
        state.fail(ticket, ViewError::search_failed("x"));

        state.begin_date_load(day(2));

        assert!(!state.search_mode());
        assert!(state.error().is_none());
        assert!(state.is_loading());
        assert_eq!(state.selected_date(), day(2));
    }

    #[test]
    fn superseded_completion_is_ignored() {
        let mut state = BriefState::new(CacheStore::new(), day(1));
        let old = state.begin_date_load(day(1));
        let new = state.begin_date_load(day(2));

        assert!(!state.finish_date_load(old, day(1), items(&["old"])));
        assert!(state.is_loading());
        assert!(state.finish_date_load(new, day(2), items(&["new"])));

        assert_eq!(state.news()[0].id, "new");
        assert_eq!(state.news_date(), Some(day(2)));
        assert!(!state.is_loading());
    }

    #[test]
    fn exit_search_supersedes_in_flight_search() {
        let mut state = BriefState::new(CacheStore::new(), day(1));
        let ticket = state.begin_search("x");

        state.exit_search();

        assert!(!state.is_loading());
        assert!(!state.finish_search(ticket, items(&["late"])));
        assert!(state.search_results().is_empty());
        assert_eq!(state.search_query(), "");
    }

    #[test]
    fn open_item_looks_in_displayed_collection_only() {
        let mut state = BriefState::new(CacheStore::new(), day(1));
        let ticket = state.begin_date_load(day(1));
        state.finish_date_load(ticket, day(1), items(&["brief-item"]));
        let ticket = state.begin_search("q");
        state.finish_search(ticket, items(&["search-item"]));

        assert!(!state.open_item("brief-item"));
        assert!(state.open_item("search-item"));
        assert_eq!(state.selected_news().map(|item| item.id.as_str()), Some("search-item"));

        state.close_item();
        assert!(state.selected_news().is_none());
    }

    #[test]
    fn older_fetch_never_replaces_newer_cache_entry() {
        let mut state = BriefState::new(CacheStore::new(), day(1));
        let old = state.begin_date_load(day(1));
        let new = state.begin_date_load(day(1));

        assert!(state
            .store_brief(new, DailyBrief::new(day(1), items(&["new"]), 2))
            .is_some());
        assert!(state
            .store_brief(old, DailyBrief::new(day(1), items(&["old"]), 3))
            .is_none());

        let cached = state.cache().get(day(1)).unwrap();
        assert_eq!(cached.news[0].id, "new");
        assert_eq!(cached.retrieved_at, 2);
    }

    #[test]
    fn superseded_fetch_still_caches_its_own_date() {
        let mut state = BriefState::new(CacheStore::new(), day(1));
        let old = state.begin_date_load(day(1));
        state.begin_date_load(day(2));

        assert!(state
            .store_brief(old, DailyBrief::new(day(1), items(&["a"]), 0))
            .is_some());
        assert!(state.cache().get(day(1)).is_some());
    }

    #[test]
    fn mode_switches_close_the_detail_view() {
        let mut state = BriefState::new(CacheStore::new(), day(1));
        let ticket = state.begin_search("q");
        state.finish_search(ticket, items(&["search-item"]));
        assert!(state.open_item("search-item"));

        state.exit_search();
        assert!(state.selected_news().is_none());
        assert!(state.compute_viewmodel(day(1)).detail.is_none());

        let ticket = state.begin_date_load(day(1));
        state.finish_date_load(ticket, day(1), items(&["brief-item"]));
        assert!(state.open_item("brief-item"));
        let ticket = state.begin_search("other");
        assert!(state.selected_news().is_none());

        state.finish_search(ticket, items(&["x"]));
        assert!(state.open_item("x"));
        state.begin_date_load(day(2));
        assert!(state.selected_news().is_none());
    }

    #[test]
    fn available_dates_always_include_today() {
        let cache = CacheStore::new()
            .put(DailyBrief::new(day(1), vec![], 0))
            .put(DailyBrief::new(day(3), vec![], 0));
        let state = BriefState::new(cache, day(3));

        let dates: Vec<_> = state.available_dates(day(3)).into_iter().collect();

        assert_eq!(dates, vec![day(1), day(3)]);
    }

    #[test]
    fn viewmodel_shows_exactly_the_right_panel() {
        let mut state = BriefState::new(CacheStore::new(), day(1));
        assert!(matches!(state.compute_viewmodel(day(1)).panel, Panel::Empty { .. }));

        let ticket = state.begin_search("agents");
        let vm = state.compute_viewmodel(day(1));
        assert!(matches!(vm.panel, Panel::Loading { .. }));
        assert_eq!(vm.header.title, "Search: agents");
        assert_eq!(vm.header.refresh_label, "Search again");

        state.fail(ticket, ViewError::search_failed("agents"));
        match state.compute_viewmodel(day(1)).panel {
            Panel::Error {
                kind,
                message,
                can_exit_search,
            } => {
                assert_eq!(kind, ViewErrorKind::SearchFailed);
                assert!(message.contains("\"agents\""));
                assert!(can_exit_search);
            }
            other => panic!("unexpected panel: {other:?}"),
        }
    }

    #[test]
    fn feed_panel_carries_counts_of_displayed_items() {
        let mut state = BriefState::new(CacheStore::new(), day(1));
        let ticket = state.begin_date_load(day(1));
        let mut news = items(&["a", "b"]);
        news.push(sample_item("c", Category::International));
        state.finish_date_load(ticket, day(1), news);

        match state.compute_viewmodel(day(1)).panel {
            Panel::Feed {
                counts,
                items,
                can_exit_search,
                ..
            } => {
                assert_eq!(counts.domestic, 2);
                assert_eq!(counts.international, 1);
                assert_eq!(counts.total(), items.len());
                assert!(!can_exit_search);
            }
            other => panic!("unexpected panel: {other:?}"),
        }
    }
}
