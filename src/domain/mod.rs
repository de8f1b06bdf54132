//! Domain layer for the news brief library.
//!
//! Core data types and the crate error, independent of storage, HTTP, or any
//! particular view layer.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`news`]: News items, daily briefs, and category counts

pub mod error;
pub mod news;

pub use error::{NewsBriefError, Result};
pub use news::{
    parse_date, Category, CategoryCounts, DailyBrief, NewsItem, DATE_FORMAT, RECENT_LABEL,
};
