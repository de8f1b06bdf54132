//! News item and daily brief domain models.
//!
//! A [`NewsItem`] is one entry returned by the remote provider. A [`DailyBrief`]
//! groups the items fetched for one calendar date and is the unit stored in the
//! cache. Field names serialize in camelCase so the on-disk format matches what
//! the browser build of the dashboard wrote to local storage.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical date key format (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp label attached to search results, which have no single date.
pub const RECENT_LABEL: &str = "Recent";

/// Which of the two display buckets a news item belongs to.
///
/// Every collection is partitioned into exactly these two buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// News from domestic (Chinese) platforms and companies.
    Domestic,
    /// News from international platforms and companies.
    International,
}

impl Category {
    /// Parses a provider-supplied category label.
    ///
    /// Matching is case-insensitive and also accepts the Chinese labels the
    /// model sometimes echoes back from the prompt. Returns `None` for anything
    /// else.
    ///
    /// # Examples
    ///
    /// ```
    /// use news_brief::Category;
    ///
    /// assert_eq!(Category::from_label("domestic"), Some(Category::Domestic));
    /// assert_eq!(Category::from_label("国际"), Some(Category::International));
    /// assert_eq!(Category::from_label("Regional"), None);
    /// ```
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("domestic") || label == "国内" {
            Some(Self::Domestic)
        } else if label.eq_ignore_ascii_case("international") || label == "国际" {
            Some(Self::International)
        } else {
            None
        }
    }

    /// Returns the English display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Domestic => "Domestic",
            Self::International => "International",
        }
    }
}

/// One retrieved news entry.
///
/// `id` is unique within the collection that contains it but is not stable
/// across fetches. `timestamp` is a display label, not a sortable instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub source: String,
    pub url: String,
    pub category: Category,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// The news fetched for one calendar date.
///
/// `news` keeps provider order, which is also display order. `retrieved_at`
/// records when the brief was fetched (epoch milliseconds); nothing expires
/// briefs based on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBrief {
    pub date: NaiveDate,
    pub news: Vec<NewsItem>,
    pub retrieved_at: i64,
}

impl DailyBrief {
    /// Creates a brief for `date` holding `news`, retrieved at `retrieved_at`.
    #[must_use]
    pub const fn new(date: NaiveDate, news: Vec<NewsItem>, retrieved_at: i64) -> Self {
        Self {
            date,
            news,
            retrieved_at,
        }
    }
}

/// Per-category item counts for one displayed collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub domestic: usize,
    pub international: usize,
}

impl CategoryCounts {
    /// Counts the items of `items` in each category.
    ///
    /// # Examples
    ///
    /// ```
    /// use news_brief::CategoryCounts;
    ///
    /// let counts = CategoryCounts::of(&[]);
    /// assert_eq!(counts.total(), 0);
    /// ```
    #[must_use]
    pub fn of(items: &[NewsItem]) -> Self {
        items.iter().fold(Self::default(), |mut counts, item| {
            match item.category {
                Category::Domestic => counts.domestic += 1,
                Category::International => counts.international += 1,
            }
            counts
        })
    }

    /// Total number of counted items.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.domestic + self.international
    }
}

/// Parses a canonical `YYYY-MM-DD` date key.
///
/// # Errors
///
/// Returns [`crate::NewsBriefError::Config`] if `value` is not a valid date in
/// canonical form.
pub fn parse_date(value: &str) -> crate::Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| crate::NewsBriefError::Config(format!("invalid date {value:?}: {e}")))
}

#[cfg(test)]
pub(crate) fn sample_item(id: &str, category: Category) -> NewsItem {
    NewsItem {
        id: id.to_string(),
        title: format!("title {id}"),
        summary: format!("summary {id}"),
        content: format!("content {id}"),
        source: "TechCrunch".to_string(),
        url: format!("https://example.com/{id}"),
        category,
        timestamp: "2024-05-01".to_string(),
        image_url: None,
    }
}
