//! View mode state for the orchestrator.
//!
//! The dashboard shows either the brief of the selected date or the results of
//! a free-text search, never both. [`ViewMode`] encodes that as one enum, so a
//! search query only exists while search mode is active.
//!
//! # Example
//!
//! ```rust
//! use news_brief::ViewMode;
//!
//! let mode = ViewMode::Search { query: "transformer".to_string() };
//! assert!(mode.is_search());
//! assert_eq!(mode.query(), Some("transformer"));
//! assert_eq!(ViewMode::Browsing.query(), None);
//! ```

/// Which collection the view currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Date-browsing: the brief of the selected date is shown.
    #[default]
    Browsing,

    /// Search: the results of `query` are shown.
    Search {
        /// The submitted query, already trimmed by the caller.
        query: String,
    },
}

impl ViewMode {
    /// Whether search mode is active.
    #[must_use]
    pub const fn is_search(&self) -> bool {
        matches!(self, Self::Search { .. })
    }

    /// The active search query, if in search mode.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Browsing => None,
            Self::Search { query } => Some(query),
        }
    }
}
