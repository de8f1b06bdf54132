//! Intent handling for the view layer.
//!
//! The view reports what the user did as an [`Intent`]; [`dispatch`] maps it
//! onto orchestrator operations. Every refresh and retry control funnels into
//! the same [`BriefOrchestrator::refresh`] call.
//!
//! # Example
//!
//! ```rust,no_run
//! use news_brief::{dispatch, initialize, Config, Intent};
//!
//! # async fn run() -> news_brief::Result<()> {
//! let orchestrator = initialize(&Config::default())?;
//!
//! dispatch(&orchestrator, Intent::SearchSubmitted("  agents ".into())).await;
//! assert_eq!(orchestrator.snapshot().search_query(), "agents");
//! # Ok(())
//! # }
//! ```

use super::orchestrator::BriefOrchestrator;
use chrono::NaiveDate;

/// Something the user asked the dashboard to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// A date was picked in the calendar.
    DatePicked(NaiveDate),
    /// The search box was submitted with this text, untrimmed.
    SearchSubmitted(String),
    /// The header refresh control or the floating refresh button.
    Refresh,
    /// The retry button of an error panel.
    Retry,
    /// Back from search results to the daily brief.
    ExitSearch,
    /// A news card was opened.
    ItemOpened(String),
    /// The detail view was closed.
    ItemClosed,
}

/// Applies `intent` to `orchestrator`.
///
/// Blank search submissions are ignored. Leaving search reloads the selected
/// date, cache-first, when the displayed brief belongs to another date, which
/// happens when a search superseded the load of the selected date.
///
/// Returns whether the view changed and needs a redraw.
#[tracing::instrument(level = "debug", skip(orchestrator))]
pub async fn dispatch(orchestrator: &BriefOrchestrator, intent: Intent) -> bool {
    match intent {
        Intent::DatePicked(date) => {
            orchestrator.select_date(date).await;
            true
        }
        Intent::SearchSubmitted(text) => {
            let query = text.trim();
            if query.is_empty() {
                tracing::debug!("ignoring blank search submission");
                return false;
            }
            orchestrator.search(query).await;
            true
        }
        Intent::Refresh | Intent::Retry => {
            orchestrator.refresh().await;
            true
        }
        Intent::ExitSearch => {
            let state = orchestrator.snapshot();
            if !state.search_mode() {
                return false;
            }
            orchestrator.exit_search();

            let selected = state.selected_date();
            if state.news_date() != Some(selected) {
                tracing::debug!(date = %selected, "displayed brief is stale, reloading");
                orchestrator.load_brief(selected, false).await;
            }
            true
        }
        Intent::ItemOpened(id) => {
            let opened = orchestrator.open_item(&id);
            if !opened {
                tracing::debug!(id = %id, "no displayed item with this id");
            }
            opened
        }
        Intent::ItemClosed => {
            orchestrator.close_item();
            true
        }
    }
}
