// src/services/google.rs

//! Google Play review crawler.
//!
//! Reviews come from the Play web UI's internal `batchexecute` RPC. The
//! response is an anti-JSON-prefixed envelope whose payload is itself a
//! JSON string of deeply nested arrays; the fields we rely on are read
//! through positional accessors with explicit defaults.

use std::sync::Arc;

use chrono::DateTime;
use reqwest::Client;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{Config, Platform, Review};
use crate::utils::http::create_async_client;
use crate::utils::lang::classify;
use crate::utils::url::parse_google_play_url;

const DEFAULT_PLAY_BASE: &str = "https://play.google.com";
const BATCH_PATH: &str = "/_/PlayStoreUi/data/batchexecute";
const REVIEWS_RPC_ID: &str = "UsvDTd";
/// Play's newest-first sort order.
const SORT_NEWEST: u8 = 2;

/// One review entry decoded from the RPC payload.
#[derive(Debug, Default, PartialEq)]
struct GoogleRawReview {
    user_name: String,
    content: String,
    score: u8,
    /// Posting time as epoch seconds (0 when absent)
    posted_at: i64,
    reply_content: String,
}

impl GoogleRawReview {
    /// Decode one positional review entry, defaulting missing fields.
    fn from_value(entry: &Value) -> Self {
        Self {
            user_name: str_at(entry, &[1, 0]),
            content: str_at(entry, &[4]),
            score: int_at(entry, &[2]).clamp(0, u8::MAX as i64) as u8,
            posted_at: int_at(entry, &[5, 0]),
            reply_content: str_at(entry, &[7, 1]),
        }
    }
}

/// Crawler for Google Play reviews.
pub struct GooglePlayCrawler {
    config: Arc<Config>,
    client: Client,
    base_url: String,
}

impl GooglePlayCrawler {
    /// Create a crawler against the real Play endpoint.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        Self::with_endpoint(config, DEFAULT_PLAY_BASE)
    }

    /// Create a crawler with an overridden endpoint base.
    pub fn with_endpoint(config: Arc<Config>, base_url: impl Into<String>) -> Result<Self> {
        let client = create_async_client(&config.http)?;
        Ok(Self {
            config,
            client,
            base_url: base_url.into(),
        })
    }

    /// Accumulate raw reviews for one listing URL across the configured
    /// language buckets, each bucket asking for an equal share of the
    /// fetch quota. The result is unranked; callers rank and truncate.
    pub async fn fetch_reviews(&self, url: &str) -> Result<Vec<Review>> {
        let package = parse_google_play_url(url)?;
        let buckets = &self.config.google.languages;
        let per_language = self.config.quotas.fetch_quota / buckets.len().max(1);

        let mut collected = Vec::new();
        for language in buckets {
            let raws = self
                .query_reviews(&package, language, &self.config.google.country, per_language)
                .await?;
            log::info!(
                "Fetched {} Google Play reviews for {} ({})",
                raws.len(),
                package,
                language
            );
            collected.extend(raws.into_iter().map(|raw| map_review(raw, &package)));
        }
        Ok(collected)
    }

    /// Issue one reviews RPC for a single language bucket, newest first.
    async fn query_reviews(
        &self,
        package: &str,
        language: &str,
        country: &str,
        count: usize,
    ) -> Result<Vec<GoogleRawReview>> {
        let url = format!("{}{}", self.base_url, BATCH_PATH);
        let envelope = review_request_envelope(package, SORT_NEWEST, count);

        let response = self
            .client
            .post(&url)
            .query(&[("hl", language), ("gl", country)])
            .form(&[("f.req", envelope.as_str())])
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(AppError::Fetch { status });
        }

        let text = response.text().await?;
        parse_batch_response(&text, count)
    }
}

/// Build the `f.req` form value for the reviews RPC.
fn review_request_envelope(package: &str, sort: u8, count: usize) -> String {
    // Package id embedded as a JSON string literal inside the inner payload
    let package_json = Value::String(package.to_string()).to_string();
    let inner = format!("[null,null,[2,{sort},[{count},null,null],null,[]],[{package_json},7]]");
    serde_json::json!([[[REVIEWS_RPC_ID, inner, null, "generic"]]]).to_string()
}

/// Unwrap the batchexecute envelope down to the review entries.
fn parse_batch_response(text: &str, count: usize) -> Result<Vec<GoogleRawReview>> {
    let stripped = text
        .strip_prefix(")]}'")
        .ok_or_else(|| AppError::store_response("batchexecute", "missing anti-JSON prefix"))?
        .trim_start();

    let envelope: Value = serde_json::from_str(stripped)?;
    let payload_str = envelope
        .get(0)
        .and_then(|row| row.get(2))
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::store_response("batchexecute", "missing payload string"))?;
    let payload: Value = serde_json::from_str(payload_str)?;

    // Payload slot 0 holds the review entries; null when the app has none.
    let entries = match payload.get(0) {
        Some(Value::Array(entries)) => entries.as_slice(),
        _ => &[],
    };

    Ok(entries
        .iter()
        .take(count)
        .map(GoogleRawReview::from_value)
        .collect())
}

/// Map one raw entry to the normalized review shape.
///
/// The language tag is re-derived from the body: the query language is a
/// hint to Play's index, not a guarantee about the content.
fn map_review(raw: GoogleRawReview, package: &str) -> Review {
    let date = DateTime::from_timestamp(raw.posted_at, 0)
        .unwrap_or_default()
        .date_naive();
    let language = classify(&raw.content);
    Review {
        date,
        username: raw.user_name,
        review: raw.content,
        rating: raw.score,
        platform: Platform::Android,
        developer_response: raw.reply_content,
        language,
        app_id: package.to_string(),
    }
}

/// Read a string at a positional path, defaulting to empty.
fn str_at(value: &Value, path: &[usize]) -> String {
    at(value, path)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Read an integer at a positional path, defaulting to zero.
fn int_at(value: &Value, path: &[usize]) -> i64 {
    at(value, path).and_then(Value::as_i64).unwrap_or_default()
}

fn at<'a>(value: &'a Value, path: &[usize]) -> Option<&'a Value> {
    let mut current = value;
    for index in path {
        current = current.get(*index)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::models::Language;

    fn review_entry(user: &str, content: &str, score: u8, at: i64, reply: &str) -> Value {
        let reply_slot = if reply.is_empty() {
            Value::Null
        } else {
            serde_json::json!([null, reply, [at + 100]])
        };
        serde_json::json!([
            "gp:review-id",
            [user],
            score,
            null,
            content,
            [at],
            null,
            reply_slot
        ])
    }

    fn batch_body(entries: &[Value]) -> String {
        let payload = serde_json::json!([entries, null, ["continuation", null]]);
        let envelope = serde_json::json!([[
            "wrb.fr",
            "UsvDTd",
            payload.to_string(),
            null,
            null,
            null,
            "generic"
        ]]);
        format!(")]}}'\n\n{envelope}")
    }

    #[test]
    fn test_review_request_envelope_shape() {
        let envelope = review_request_envelope("com.example.app", 2, 75);
        let parsed: Value = serde_json::from_str(&envelope).unwrap();
        assert_eq!(parsed[0][0][0], "UsvDTd");
        assert_eq!(parsed[0][0][3], "generic");
        let inner: Value = serde_json::from_str(parsed[0][0][1].as_str().unwrap()).unwrap();
        assert_eq!(inner[3][0], "com.example.app");
        assert_eq!(inner[2][2][0], 75);
    }

    #[test]
    fn test_parse_batch_response() {
        let body = batch_body(&[
            review_entry("Alice", "很好用", 5, 1_700_000_000, ""),
            review_entry("Bob", "Crashes a lot", 1, 1_700_100_000, "We fixed it"),
        ]);
        let raws = parse_batch_response(&body, 75).unwrap();
        assert_eq!(raws.len(), 2);
        assert_eq!(raws[0].user_name, "Alice");
        assert_eq!(raws[0].score, 5);
        assert_eq!(raws[0].reply_content, "");
        assert_eq!(raws[1].reply_content, "We fixed it");
    }

    #[test]
    fn test_parse_batch_response_truncates_to_count() {
        let entries: Vec<Value> = (0..10)
            .map(|i| review_entry("u", "text", 3, 1_700_000_000 + i, ""))
            .collect();
        let raws = parse_batch_response(&batch_body(&entries), 4).unwrap();
        assert_eq!(raws.len(), 4);
    }

    #[test]
    fn test_parse_batch_response_no_reviews() {
        let payload = serde_json::json!([null, null, null]);
        let envelope =
            serde_json::json!([["wrb.fr", "UsvDTd", payload.to_string(), null, null, null, "generic"]]);
        let body = format!(")]}}'\n\n{envelope}");
        let raws = parse_batch_response(&body, 75).unwrap();
        assert!(raws.is_empty());
    }

    #[test]
    fn test_parse_batch_response_missing_prefix() {
        assert!(parse_batch_response("[[]]", 75).is_err());
    }

    #[test]
    fn test_map_review_defaults() {
        let raw = GoogleRawReview {
            user_name: "Carol".to_string(),
            content: "good".to_string(),
            score: 4,
            posted_at: 1_700_000_000,
            reply_content: String::new(),
        };
        let review = map_review(raw, "com.example.app");
        assert_eq!(review.date.to_string(), "2023-11-14");
        assert_eq!(review.platform, Platform::Android);
        assert_eq!(review.language, Language::En);
        assert_eq!(review.app_id, "com.example.app");
        assert_eq!(review.developer_response, "");
    }

    #[test]
    fn test_map_review_zero_timestamp_falls_back_to_epoch() {
        let review = map_review(GoogleRawReview::default(), "pkg");
        assert_eq!(review.date.to_string(), "1970-01-01");
    }

    #[tokio::test]
    async fn test_fetch_reviews_queries_each_language_bucket() {
        let server = MockServer::start().await;

        let zh_body = batch_body(&[review_entry("甲", "很棒", 5, 1_700_000_000, "")]);
        let en_body = batch_body(&[review_entry("Dave", "Love it", 5, 1_700_200_000, "")]);

        Mock::given(method("POST"))
            .and(path("/_/PlayStoreUi/data/batchexecute"))
            .and(query_param("hl", "zh-TW"))
            .respond_with(ResponseTemplate::new(200).set_body_string(zh_body))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/_/PlayStoreUi/data/batchexecute"))
            .and(query_param("hl", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_string(en_body))
            .expect(1)
            .mount(&server)
            .await;

        let crawler =
            GooglePlayCrawler::with_endpoint(Arc::new(Config::default()), server.uri()).unwrap();
        let reviews = crawler
            .fetch_reviews("https://play.google.com/store/apps/details?id=com.example.app")
            .await
            .unwrap();

        assert_eq!(reviews.len(), 2);
        assert!(reviews.iter().all(|r| r.platform == Platform::Android));
        assert!(reviews.iter().all(|r| r.app_id == "com.example.app"));
        // Language re-derived from content, not trusted from the query
        assert_eq!(reviews[0].language, Language::Zh);
        assert_eq!(reviews[1].language, Language::En);
    }

    #[tokio::test]
    async fn test_fetch_reviews_invalid_url() {
        let crawler =
            GooglePlayCrawler::with_endpoint(Arc::new(Config::default()), "http://unused").unwrap();
        let result = crawler
            .fetch_reviews("https://play.google.com/store/apps/details?hl=en")
            .await;
        assert!(matches!(result, Err(AppError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_fetch_reviews_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let crawler =
            GooglePlayCrawler::with_endpoint(Arc::new(Config::default()), server.uri()).unwrap();
        let result = crawler
            .fetch_reviews("https://play.google.com/store/apps/details?id=pkg")
            .await;
        assert!(matches!(result, Err(AppError::Fetch { status: 503 })));
    }
}
