//! View model types representing renderable feed state.
//!
//! View models are computed from a [`BriefState`](crate::BriefState) snapshot
//! via `BriefState::compute_viewmodel()` and contain only display-ready data. A
//! view layer renders exactly one [`Panel`] at a time.

use crate::app::state::ViewErrorKind;
use crate::domain::{CategoryCounts, NewsItem};
use crate::storage::CacheStats;
use chrono::NaiveDate;
use serde::Serialize;

/// Complete view model for one frame of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedViewModel {
    /// Header title and refresh control.
    pub header: HeaderInfo,

    /// The single main-area panel to show.
    pub panel: Panel,

    /// Calendar enablement.
    pub calendar: CalendarInfo,

    /// Sidebar cache statistics.
    pub stats: CacheStats,

    /// Item opened in the detail view, if any.
    pub detail: Option<NewsItem>,
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderInfo {
    /// The selected date, or `Search: <query>` in search mode.
    pub title: String,

    /// Label of the refresh control, which re-runs the current operation.
    pub refresh_label: &'static str,

    /// Whether the refresh control should show activity.
    pub is_loading: bool,
}

/// Main-area panel. Exactly one is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum Panel {
    /// A fetch is in flight.
    Loading {
        message: String,
        detail: &'static str,
    },

    /// The last fetch failed. Offers a retry of the same operation, and in
    /// search mode a way back to the daily brief.
    Error {
        kind: ViewErrorKind,
        message: String,
        can_exit_search: bool,
    },

    /// The displayed collection.
    Feed {
        title: String,
        items: Vec<NewsItem>,
        counts: CategoryCounts,
        can_exit_search: bool,
    },

    /// Nothing to show.
    Empty {
        message: &'static str,
        hint: &'static str,
        can_exit_search: bool,
    },
}

/// Calendar enablement information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarInfo {
    /// Currently selected date.
    pub selected: NaiveDate,

    /// Dates that can be navigated to, ascending: cached dates plus today.
    pub available: Vec<NaiveDate>,
}
