// src/pipeline/mod.rs

//! Request-level orchestration: ranking and batch scraping.

mod rank;
mod scrape;

pub use rank::rank;
pub use scrape::{ScrapeData, ScrapeRequest, run_scrape, run_scrape_with};
