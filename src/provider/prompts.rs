//! Prompt text sent to the generative-search backend.

use crate::domain::DATE_FORMAT;
use chrono::NaiveDate;

/// Minimum number of items requested for a daily brief, per category.
pub const DATE_ITEMS_PER_CATEGORY: usize = 20;

/// Minimum number of items requested for a query search.
pub const SEARCH_MIN_ITEMS: usize = 12;

const ITEM_FORMAT: &str = "Return every item as a JSON object with:
- title: a short, punchy headline
- summary: a 1-2 sentence overview
- content: a detailed analysis (about 300 words) of the impact and significance
- source: the original source name (for example 'X - @username', 'TechCrunch', 'IT之家', '财联社')
- url: a direct link to the story or discussion
- category: 'Domestic' (Chinese platforms and companies) or 'International'";

/// Prompt for the top AI news of `date`.
#[must_use]
pub fn date_prompt(date: NaiveDate, language: &str) -> String {
    let total = DATE_ITEMS_PER_CATEGORY * 2;
    format!(
        "Search for the top AI news of {date}.
Cover major developments from X (Twitter), OpenAI, Google, Meta and other leading platforms, \
as well as domestic Chinese platforms (Baidu, Alibaba, ByteDance, Moonshot, DeepSeek, Zhipu AI and others).

Provide a curated list of at least {total} items ({per} International, {per} Domestic).

All content must be written in {language}.
{ITEM_FORMAT}",
        date = date.format(DATE_FORMAT),
        per = DATE_ITEMS_PER_CATEGORY,
    )
}

/// Prompt for the latest AI news about `query`.
#[must_use]
pub fn query_prompt(query: &str, language: &str) -> String {
    format!(
        "Search for the latest AI-related news about \"{query}\".
Provide at least {SEARCH_MIN_ITEMS} relevant items.

All content must be written in {language}.
{ITEM_FORMAT}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_prompt_names_the_date_and_language() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let prompt = date_prompt(date, "Simplified Chinese");

        assert!(prompt.contains("2024-05-01"));
        assert!(prompt.contains("at least 40 items"));
        assert!(prompt.contains("Simplified Chinese"));
    }

    #[test]
    fn query_prompt_quotes_the_query() {
        let prompt = query_prompt("transformer", "English");

        assert!(prompt.contains("\"transformer\""));
        assert!(prompt.contains("English"));
    }
}
