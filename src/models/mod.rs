// src/models/mod.rs

//! Domain models for the review crawler.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod apple;
mod config;
mod review;

// Re-export all public types
pub use apple::{
    AppleDeveloperResponse, AppleRawReview, AppleReviewAttributes, AppleReviewsResponse,
    ReviewPage, StoreIdentity,
};
pub use config::{AppleConfig, Config, GoogleConfig, HttpConfig, QuotaConfig};
pub use review::{Language, Platform, Review};
