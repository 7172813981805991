// src/pipeline/scrape.rs

//! Batch scrape orchestration.
//!
//! Each store URL in a request is processed strictly sequentially with its
//! own accumulator. A failure on one source becomes an empty review list
//! for that URL and never aborts its siblings.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Config, Review};
use crate::pipeline::rank;
use crate::services::{AppleCrawler, GooglePlayCrawler};

/// Incoming batch request: listing URLs per store.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default, rename = "appleStore")]
    pub apple_store: Vec<String>,

    #[serde(default, rename = "googlePlay")]
    pub google_play: Vec<String>,
}

/// Reviews keyed by platform, then by the original listing URL.
#[derive(Debug, Default, Serialize)]
pub struct ScrapeData {
    pub ios: BTreeMap<String, Vec<Review>>,
    pub android: BTreeMap<String, Vec<Review>>,
}

/// Run a batch scrape against the real store endpoints.
pub async fn run_scrape(config: Arc<Config>, request: &ScrapeRequest) -> Result<ScrapeData> {
    let apple = AppleCrawler::new(Arc::clone(&config))?;
    let google = GooglePlayCrawler::new(Arc::clone(&config))?;
    Ok(run_scrape_with(&config, &apple, &google, request).await)
}

/// Run a batch scrape with the given crawlers.
pub async fn run_scrape_with(
    config: &Config,
    apple: &AppleCrawler,
    google: &GooglePlayCrawler,
    request: &ScrapeRequest,
) -> ScrapeData {
    let quota = config.quotas.return_quota;
    let mut data = ScrapeData::default();

    for url in &request.apple_store {
        log::info!("Fetching iOS reviews from {url}");
        let reviews = match apple.fetch_reviews(url).await {
            Ok(collected) => rank(collected, quota),
            Err(error) => {
                log::warn!("iOS review fetch failed for {url}: {error}");
                Vec::new()
            }
        };
        log::info!("Found {} iOS reviews for {url}", reviews.len());
        data.ios.insert(url.clone(), reviews);
    }

    for url in &request.google_play {
        log::info!("Fetching Android reviews from {url}");
        let reviews = match google.fetch_reviews(url).await {
            Ok(collected) => rank(collected, quota),
            Err(error) => {
                log::warn!("Android review fetch failed for {url}: {error}");
                Vec::new()
            }
        };
        log::info!("Found {} Android reviews for {url}", reviews.len());
        data.android.insert(url.clone(), reviews);
    }

    data
}
