//! Gemini REST adapter.
//!
//! Calls `models/{model}:generateContent` with the Google Search tool enabled
//! and a JSON array response schema, then maps the answer into news items.

use crate::domain::{NewsBriefError, NewsItem, Result};
use crate::infrastructure::Clock;
use crate::provider::mapping::{into_news_items, parse_raw_items, IdScheme};
use crate::provider::prompts;
use crate::provider::BriefProvider;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;

/// Model used when the configuration does not name one.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";

/// Default REST base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Header carrying the API key. The key stays out of the URL, which
/// `reqwest` errors include in their message.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Connection settings for [`GeminiProvider`].
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Language every generated field must be written in.
    pub language: String,
    pub request_timeout: Duration,
}

/// [`BriefProvider`] backed by the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    settings: GeminiSettings,
    clock: Arc<dyn Clock>,
}

impl GeminiProvider {
    /// Creates a provider from `settings`.
    ///
    /// An empty API key is accepted so a cache-only session still starts;
    /// every fetch then fails with a configuration error.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(settings: GeminiSettings, clock: Arc<dyn Clock>) -> Result<Self> {
        if settings.api_key.trim().is_empty() {
            tracing::warn!("no Gemini API key configured, remote fetches will fail");
        }

        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()?;

        Ok(Self {
            client,
            settings,
            clock,
        })
    }

    async fn generate(&self, prompt: String) -> Result<String> {
        if self.settings.api_key.trim().is_empty() {
            return Err(NewsBriefError::Config(
                "Gemini API key is not configured".to_string(),
            ));
        }

        let url = format!(
            "{base}/{model}:generateContent",
            base = self.settings.base_url.trim_end_matches('/'),
            model = self.settings.model,
        );
        let body = GenerateContentRequest::grounded_json(prompt);

        tracing::debug!(model = %self.settings.model, "sending generateContent request");

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, self.settings.api_key.as_str())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read Gemini error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        extract_text(parsed)
    }
}

#[async_trait]
impl BriefProvider for GeminiProvider {
    #[tracing::instrument(name = "gemini_fetch_by_date", skip(self, date), fields(date = %date))]
    async fn fetch_by_date(&self, date: NaiveDate) -> Result<Vec<NewsItem>> {
        let prompt = prompts::date_prompt(date, &self.settings.language);
        let text = self.generate(prompt).await?;
        let items = into_news_items(parse_raw_items(&text)?, IdScheme::Date(date))?;

        tracing::debug!(count = items.len(), "date brief fetched");
        Ok(items)
    }

    #[tracing::instrument(name = "gemini_fetch_by_query", skip(self))]
    async fn fetch_by_query(&self, query: &str) -> Result<Vec<NewsItem>> {
        let stamp_millis = self.clock.now_millis();
        let prompt = prompts::query_prompt(query, &self.settings.language);
        let text = self.generate(prompt).await?;
        let items = into_news_items(parse_raw_items(&text)?, IdScheme::Search { stamp_millis })?;

        tracing::debug!(count = items.len(), "search results fetched");
        Ok(items)
    }
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("model", &self.settings.model)
            .field("base_url", &self.settings.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    tools: Vec<JsonValue>,
    generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    fn grounded_json(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: prompt }],
            }],
            tools: vec![serde_json::json!({ "googleSearch": {} })],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: news_item_schema(),
            },
        }
    }
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: JsonValue,
}

fn news_item_schema() -> JsonValue {
    const FIELDS: [&str; 6] = ["title", "summary", "content", "source", "url", "category"];

    let properties: serde_json::Map<String, JsonValue> = FIELDS
        .iter()
        .map(|field| ((*field).to_string(), serde_json::json!({ "type": "STRING" })))
        .collect();

    serde_json::json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": properties,
            "required": FIELDS,
        }
    })
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Concatenates the text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> Result<String> {
    let content = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .ok_or_else(|| {
            NewsBriefError::MalformedResponse("Gemini returned no candidates".to_string())
        })?;

    Ok(content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect::<String>())
}

fn map_http_error(status: StatusCode, body: &str) -> NewsBriefError {
    let message = serde_json::from_str::<ErrorWrapper>(body).map_or_else(
        |_| body.to_string(),
        |wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        },
    );

    NewsBriefError::Provider {
        status: status.as_u16(),
        message,
    }
}
