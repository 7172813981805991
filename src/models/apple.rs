//! App Store identity and wire types for the amp-api reviews endpoint.
//!
//! The endpoint is undocumented; fields we rely on are modeled explicitly
//! with per-field defaults so missing-field behavior stays auditable.

use serde::Deserialize;

/// Identifiers extracted from an App Store listing URL.
///
/// Derived once per request and consumed by token acquisition and every
/// paginated fetch call within that request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreIdentity {
    /// Two-letter storefront country code (e.g. `tw`)
    pub country: String,

    /// App slug as it appears in the listing URL, not re-encoded
    pub slug: String,

    /// Numeric app identifier
    pub app_id: String,
}

/// Response body of the amp-api reviews endpoint.
#[derive(Debug, Deserialize)]
pub struct AppleReviewsResponse {
    #[serde(default)]
    pub data: Vec<AppleRawReview>,

    /// Link to the next page; the cursor hides in its `offset` parameter
    #[serde(default)]
    pub next: Option<String>,
}

/// One raw review entry from the `data` array.
#[derive(Debug, Deserialize)]
pub struct AppleRawReview {
    #[serde(default)]
    pub attributes: AppleReviewAttributes,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppleReviewAttributes {
    /// ISO-8601 UTC timestamp, e.g. `2024-01-02T03:04:05Z`
    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub user_name: String,

    #[serde(default)]
    pub review: String,

    #[serde(default)]
    pub rating: u8,

    #[serde(default)]
    pub developer_response: Option<AppleDeveloperResponse>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppleDeveloperResponse {
    #[serde(default)]
    pub body: String,
}

/// One fetched page of raw reviews plus pagination state.
#[derive(Debug)]
pub struct ReviewPage {
    pub reviews: Vec<AppleRawReview>,
    pub next_cursor: Option<String>,
    pub status: u16,
}

impl ReviewPage {
    /// Empty page carrying only a status code.
    pub fn status_only(status: u16) -> Self {
        Self {
            reviews: Vec::new(),
            next_cursor: None,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_missing_fields() {
        let json = r#"{
            "data": [
                { "attributes": { "date": "2024-01-02T03:04:05Z", "userName": "abc" } },
                { "attributes": {} },
                {}
            ]
        }"#;
        let parsed: AppleReviewsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data.len(), 3);
        assert_eq!(parsed.data[0].attributes.user_name, "abc");
        assert_eq!(parsed.data[1].attributes.rating, 0);
        assert!(parsed.data[2].attributes.developer_response.is_none());
        assert!(parsed.next.is_none());
    }

    #[test]
    fn test_deserialize_developer_response() {
        let json = r#"{
            "data": [
                { "attributes": { "developerResponse": { "body": "thanks!" } } }
            ],
            "next": "/v1/catalog/tw/apps/123/reviews?offset=21"
        }"#;
        let parsed: AppleReviewsResponse = serde_json::from_str(json).unwrap();
        let reply = parsed.data[0].attributes.developer_response.as_ref().unwrap();
        assert_eq!(reply.body, "thanks!");
        assert!(parsed.next.unwrap().contains("offset=21"));
    }
}
