//! Normalized review record shared by both store pipelines.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store platform a review originated from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Platform {
    #[serde(rename = "iOS")]
    Ios,
    #[serde(rename = "Android")]
    Android,
}

/// Coarse language tag attached to a review body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Zh,
    En,
    Unknown,
}

/// A user review normalized across storefronts.
///
/// Field names on the wire are kept exactly as consumers expect
/// (`developerResponse` camel-cased, `app_id` snake-cased).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Review {
    /// Calendar date the review was posted (no time component)
    pub date: NaiveDate,

    /// Reviewer display name
    pub username: String,

    /// Review body (may be empty)
    pub review: String,

    /// Store-native rating, typically 1-5 (0 when absent)
    pub rating: u8,

    /// Originating store
    pub platform: Platform,

    /// Developer reply body (empty string if none)
    #[serde(rename = "developerResponse")]
    pub developer_response: String,

    /// Coarse language tag for the review body
    pub language: Language,

    /// Store-side application identifier
    pub app_id: String,
}
