// src/services/apple.rs

//! App Store review crawler.
//!
//! The amp-api reviews endpoint is undocumented and wants a bearer token
//! that Apple embeds, percent-encoded, in the human-facing listing page.
//! Token scraping sits behind [`TokenSource`] so the strategy can change
//! without touching the fetch/retry/aggregation logic.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use lazy_regex::regex;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, ORIGIN, REFERER, USER_AGENT};

use crate::error::{AppError, Result};
use crate::models::{
    AppleRawReview, AppleReviewsResponse, Config, Platform, Review, ReviewPage, StoreIdentity,
};
use crate::utils::http::{create_async_client, pick_user_agent};
use crate::utils::lang::classify;
use crate::utils::retry::RetryPolicy;
use crate::utils::url::parse_apple_listing_url;

const DEFAULT_STORE_BASE: &str = "https://apps.apple.com";
const DEFAULT_API_BASE: &str = "https://amp-api.apps.apple.com";
const ADDITIONAL_PLATFORMS: &str = "appletv,ipad,iphone,mac";

/// Provider of bearer tokens for the reviews endpoint.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn acquire(&self, identity: &StoreIdentity) -> Result<String>;
}

/// Token source that scrapes the public listing page.
pub struct ListingTokenSource {
    config: Arc<Config>,
    client: Client,
    store_base: String,
}

impl ListingTokenSource {
    pub fn new(config: Arc<Config>, client: Client, store_base: impl Into<String>) -> Self {
        Self {
            config,
            client,
            store_base: store_base.into(),
        }
    }
}

#[async_trait]
impl TokenSource for ListingTokenSource {
    /// Fetch the listing page and extract the embedded config token.
    ///
    /// Failure here is not retried; the caller treats it as
    /// "no reviews available" for this source.
    async fn acquire(&self, identity: &StoreIdentity) -> Result<String> {
        let url = format!(
            "{}/{}/app/{}/id{}",
            self.store_base, identity.country, identity.slug, identity.app_id
        );

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, pick_user_agent(&self.config.http))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::token(format!(
                "listing page returned {status} for {url}"
            )));
        }

        let body = response.text().await?;
        let marker = regex!(r"^<meta.+web-experience-app/config/environment");
        let token_pattern = regex!(r"token%22%3A%22(.+?)%22");

        for line in body.lines() {
            if !marker.is_match(line) {
                continue;
            }
            if let Some(caps) = token_pattern.captures(line) {
                return Ok(caps[1].to_string());
            }
        }

        Err(AppError::token("token marker not found in listing page"))
    }
}

/// Crawler for App Store reviews.
pub struct AppleCrawler {
    config: Arc<Config>,
    client: Client,
    api_base: String,
    tokens: Arc<dyn TokenSource>,
}

impl AppleCrawler {
    /// Create a crawler against the real Apple endpoints.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        Self::with_endpoints(config, DEFAULT_STORE_BASE, DEFAULT_API_BASE)
    }

    /// Create a crawler with overridden endpoint bases.
    pub fn with_endpoints(
        config: Arc<Config>,
        store_base: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Result<Self> {
        let client = create_async_client(&config.http)?;
        let tokens = Arc::new(ListingTokenSource::new(
            Arc::clone(&config),
            client.clone(),
            store_base,
        ));
        Ok(Self {
            config,
            client,
            api_base: api_base.into(),
            tokens,
        })
    }

    /// Create a crawler with a custom token source.
    pub fn with_token_source(
        config: Arc<Config>,
        api_base: impl Into<String>,
        tokens: Arc<dyn TokenSource>,
    ) -> Result<Self> {
        let client = create_async_client(&config.http)?;
        Ok(Self {
            config,
            client,
            api_base: api_base.into(),
            tokens,
        })
    }

    /// Accumulate raw reviews for one listing URL, newest pages first.
    ///
    /// Stops at the fetch quota, the end of pagination, or the first
    /// non-success page. The result is unranked; callers rank and truncate.
    pub async fn fetch_reviews(&self, url: &str) -> Result<Vec<Review>> {
        let identity = parse_apple_listing_url(url)?;
        let token = self.tokens.acquire(&identity).await?;

        let fetch_quota = self.config.quotas.fetch_quota;
        let page_delay = Duration::from_millis(self.config.apple.page_delay_ms);
        let mut collected: Vec<Review> = Vec::new();
        let mut cursor = Some("1".to_string());

        while let Some(offset) = cursor {
            let page = self.fetch_page(&identity, &token, &offset).await?;
            if page.status != 200 {
                log::warn!(
                    "Stopping pagination for app {} on status {}",
                    identity.app_id,
                    page.status
                );
                break;
            }

            for raw in page.reviews {
                if collected.len() >= fetch_quota {
                    break;
                }
                collected.push(self.map_review(raw, &identity)?);
            }

            if collected.len() >= fetch_quota {
                break;
            }

            cursor = page.next_cursor;
            if cursor.is_some() && !page_delay.is_zero() {
                tokio::time::sleep(page_delay).await;
            }
        }

        Ok(collected)
    }

    /// Fetch a single page of reviews at the given offset cursor.
    ///
    /// Rate-limit responses back off linearly (attempt x base delay) and
    /// network failures wait a flat base delay; both draw on one shared
    /// attempt budget. Any other non-success status is returned as an
    /// empty page carrying that status.
    pub async fn fetch_page(
        &self,
        identity: &StoreIdentity,
        token: &str,
        offset: &str,
    ) -> Result<ReviewPage> {
        let request_url = format!(
            "{}/v1/catalog/{}/apps/{}/reviews",
            self.api_base, identity.country, identity.app_id
        );
        // Url::parse percent-encodes the slug for the Referer header
        let landing = url::Url::parse(&format!(
            "https://apps.apple.com/{}/app/{}/id{}",
            identity.country, identity.slug, identity.app_id
        ))?;
        let page_size = self.config.apple.page_size.to_string();
        let policy = RetryPolicy::new(
            self.config.apple.retry_max_attempts,
            Duration::from_secs(self.config.apple.retry_base_delay_secs),
        );

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let result = self
                .client
                .get(&request_url)
                .query(&[
                    ("l", self.config.apple.locale.as_str()),
                    ("offset", offset),
                    ("limit", page_size.as_str()),
                    ("platform", "web"),
                    ("additionalPlatforms", ADDITIONAL_PLATFORMS),
                ])
                .header(ACCEPT, "application/json")
                .header(AUTHORIZATION, format!("bearer {token}"))
                .header(ORIGIN, "https://apps.apple.com")
                .header(REFERER, landing.as_str())
                .header(USER_AGENT, pick_user_agent(&self.config.http))
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if status == 200 {
                        let body: AppleReviewsResponse = response.json().await?;
                        let next_cursor = body.next.as_deref().and_then(extract_offset);
                        return Ok(ReviewPage {
                            reviews: body.data,
                            next_cursor,
                            status,
                        });
                    }

                    if RetryPolicy::is_retryable_status(status) {
                        if policy.is_exhausted(attempt) {
                            return Ok(ReviewPage::status_only(status));
                        }
                        let delay = policy.backoff_delay(attempt);
                        log::warn!(
                            "Rate limited, retry {}/{} in {:?}",
                            attempt,
                            policy.max_attempts,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    log::warn!("Review fetch failed with status {status}");
                    return Ok(ReviewPage::status_only(status));
                }
                Err(error) => {
                    if policy.is_exhausted(attempt) {
                        return Err(error.into());
                    }
                    log::warn!(
                        "Request error: {}, retry {}/{}",
                        error,
                        attempt,
                        policy.max_attempts
                    );
                    tokio::time::sleep(policy.retry_delay()).await;
                }
            }
        }
    }

    /// Map one raw entry to the normalized review shape.
    fn map_review(&self, raw: AppleRawReview, identity: &StoreIdentity) -> Result<Review> {
        let attrs = raw.attributes;
        let date = NaiveDateTime::parse_from_str(&attrs.date, "%Y-%m-%dT%H:%M:%SZ")?.date();
        let language = classify(&attrs.review);
        Ok(Review {
            date,
            username: attrs.user_name,
            review: attrs.review,
            rating: attrs.rating,
            platform: Platform::Ios,
            developer_response: attrs
                .developer_response
                .map(|reply| reply.body)
                .unwrap_or_default(),
            language,
            app_id: identity.app_id.clone(),
        })
    }
}

/// Pull the next-page cursor out of the `next` link.
fn extract_offset(next: &str) -> Option<String> {
    regex!(r"offset=([0-9]+)")
        .captures(next)
        .map(|caps| caps[1].to_string())
}
