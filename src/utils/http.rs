// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use rand::prelude::IndexedRandom;

use crate::error::Result;
use crate::models::HttpConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Pick a User-Agent at random from the configured pool.
pub fn pick_user_agent(config: &HttpConfig) -> String {
    config
        .user_agents
        .choose(&mut rand::rng())
        .cloned()
        .unwrap_or_default()
}
