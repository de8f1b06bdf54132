//! Raw provider payloads and their mapping into [`NewsItem`]s.
//!
//! The model answers with a JSON array of loosely-typed objects. This module
//! turns that text into items with synthetic ids, a timestamp label and a
//! deterministic illustrative image URL derived from the title.

use crate::domain::{Category, NewsBriefError, NewsItem, Result, DATE_FORMAT, RECENT_LABEL};
use chrono::NaiveDate;
use reqwest::Url;
use serde::Deserialize;

/// Base of the illustrative image URLs.
const IMAGE_BASE: &str = "https://picsum.photos/seed";

/// Image dimensions appended to every illustrative image URL.
const IMAGE_SIZE: (&str, &str) = ("800", "600");

/// One item as the model returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNewsItem {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub url: String,
    pub category: String,
}

/// How ids and timestamp labels are assigned to a fetched collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdScheme {
    /// Daily brief: ids `"{date}-{index}"`, timestamp is the date.
    Date(NaiveDate),
    /// Search results: ids `"search-{stamp}-{index}"`, timestamp is [`RECENT_LABEL`].
    Search {
        /// Epoch milliseconds at which the search was issued.
        stamp_millis: i64,
    },
}

impl IdScheme {
    fn id(&self, index: usize) -> String {
        match self {
            Self::Date(date) => format!("{}-{index}", date.format(DATE_FORMAT)),
            Self::Search { stamp_millis } => format!("search-{stamp_millis}-{index}"),
        }
    }

    fn timestamp(&self) -> String {
        match self {
            Self::Date(date) => date.format(DATE_FORMAT).to_string(),
            Self::Search { .. } => RECENT_LABEL.to_string(),
        }
    }
}

/// Parses the model's text answer into raw items.
///
/// Surrounding whitespace and Markdown code fences are ignored; an empty
/// answer is an empty list.
///
/// # Errors
///
/// Returns [`NewsBriefError::MalformedResponse`] if the text is not a JSON
/// array of item objects.
pub fn parse_raw_items(text: &str) -> Result<Vec<RawNewsItem>> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(body)
        .map_err(|e| NewsBriefError::MalformedResponse(format!("expected a JSON array of items: {e}")))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Builds [`NewsItem`]s from raw items, in order.
///
/// # Errors
///
/// Returns [`NewsBriefError::MalformedResponse`] if an item carries a category
/// other than domestic or international.
pub fn into_news_items(raw: Vec<RawNewsItem>, scheme: IdScheme) -> Result<Vec<NewsItem>> {
    raw.into_iter()
        .enumerate()
        .map(|(index, item)| {
            let category = Category::from_label(&item.category).ok_or_else(|| {
                NewsBriefError::MalformedResponse(format!(
                    "item {index} has unknown category {:?}",
                    item.category
                ))
            })?;

            Ok(NewsItem {
                id: scheme.id(index),
                image_url: image_url(&item.title, index),
                title: item.title,
                summary: item.summary,
                content: item.content,
                source: item.source,
                url: item.url,
                category,
                timestamp: scheme.timestamp(),
            })
        })
        .collect()
}

/// Deterministic illustrative image for an item, seeded by title and position.
#[must_use]
pub fn image_url(title: &str, index: usize) -> Option<String> {
    let mut url = Url::parse(IMAGE_BASE).ok()?;
    url.path_segments_mut()
        .ok()?
        .push(&format!("{title}{index}"))
        .push(IMAGE_SIZE.0)
        .push(IMAGE_SIZE.1);
    Some(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: &str, category: &str) -> RawNewsItem {
        RawNewsItem {
            title: title.to_string(),
            summary: "s".to_string(),
            content: "c".to_string(),
            source: "TechCrunch".to_string(),
            url: "https://techcrunch.com".to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn date_scheme_assigns_positional_ids_and_date_label() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let items = into_news_items(
            vec![raw("a", "Domestic"), raw("b", "International")],
            IdScheme::Date(date),
        )
        .unwrap();

        assert_eq!(items[0].id, "2024-05-01-0");
        assert_eq!(items[1].id, "2024-05-01-1");
        assert!(items.iter().all(|item| item.timestamp == "2024-05-01"));
        assert_eq!(items[1].category, Category::International);
    }

    #[test]
    fn search_scheme_uses_stamp_and_recent_label() {
        let items = into_news_items(
            vec![raw("a", "domestic")],
            IdScheme::Search {
                stamp_millis: 1_714_521_600_000,
            },
        )
        .unwrap();

        assert_eq!(items[0].id, "search-1714521600000-0");
        assert_eq!(items[0].timestamp, RECENT_LABEL);
    }

    #[test]
    fn unknown_category_is_malformed() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let result = into_news_items(vec![raw("a", "Regional")], IdScheme::Date(date));

        assert!(matches!(result, Err(NewsBriefError::MalformedResponse(_))));
    }

    #[test]
    fn image_url_encodes_title_into_one_segment() {
        assert_eq!(
            image_url("GPT / launch", 3).as_deref(),
            Some("https://picsum.photos/seed/GPT%20%2F%20launch3/800/600")
        );
    }

    #[test]
    fn parse_accepts_fenced_and_empty_answers() {
        let fenced = "```json\n[{\"title\":\"t\",\"category\":\"International\"}]\n```";

        assert_eq!(parse_raw_items(fenced).unwrap().len(), 1);
        assert!(parse_raw_items("  ").unwrap().is_empty());
        assert!(parse_raw_items("here are the news").is_err());
    }
}
