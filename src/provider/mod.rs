//! Remote brief providers.
//!
//! The orchestrator talks to the generative-search backend only through
//! [`BriefProvider`]. Implementations return items already in [`NewsItem`]
//! shape; assigning ids, timestamp labels and image references happens in the
//! adapter (see [`mapping`]), never in the orchestrator.
//!
//! # Modules
//!
//! - [`gemini`]: Gemini REST adapter with Google Search grounding
//! - [`mapping`]: raw payload parsing and `NewsItem` construction
//! - [`prompts`]: prompt text for date and query fetches

pub mod gemini;
pub mod mapping;
pub mod prompts;

pub use gemini::GeminiProvider;

use crate::domain::{NewsItem, Result};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Source of news items for a date or a free-text query.
///
/// Calls may be slow or fail; the orchestrator imposes no timeout of its own.
/// Any provider, transport or parse failure is reported as an `Err`.
#[async_trait]
pub trait BriefProvider: Send + Sync {
    /// Fetches the brief for one calendar date.
    async fn fetch_by_date(&self, date: NaiveDate) -> Result<Vec<NewsItem>>;

    /// Fetches items matching a free-text query.
    async fn fetch_by_query(&self, query: &str) -> Result<Vec<NewsItem>>;
}
