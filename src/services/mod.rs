//! Service layer for the review crawler.
//!
//! This module contains the store-facing clients:
//! - App Store token scraping and paginated review fetch (`AppleCrawler`)
//! - Google Play review RPC (`GooglePlayCrawler`)

mod apple;
mod google;

pub use apple::{AppleCrawler, ListingTokenSource, TokenSource};
pub use google::GooglePlayCrawler;
