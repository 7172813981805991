// src/utils/url.rs

//! Store listing URL resolvers.

use lazy_regex::regex;

use crate::error::{AppError, Result};
use crate::models::StoreIdentity;

/// Extract store identifiers from an App Store listing URL.
///
/// The URL is percent-decoded before matching so localized slugs
/// (e.g. `%E9%8A%80%E8%A1%8C`) match as written. The extracted slug is
/// kept in its decoded form; callers needing it URL-safe encode lazily.
///
/// # Examples
/// ```
/// use review_crawler::utils::url::parse_apple_listing_url;
///
/// let identity =
///     parse_apple_listing_url("https://apps.apple.com/tw/app/my-bank/id123456789").unwrap();
/// assert_eq!(identity.country, "tw");
/// assert_eq!(identity.app_id, "123456789");
/// ```
pub fn parse_apple_listing_url(url: &str) -> Result<StoreIdentity> {
    let decoded = percent_decode(url);
    let pattern = regex!(r"apps\.apple\.com/(\w+)/app/(.*?)/id(\d+)");

    let caps = pattern.captures(&decoded).ok_or_else(|| {
        AppError::invalid_url(url, "expected apps.apple.com/{country}/app/{slug}/id{digits}")
    })?;

    Ok(StoreIdentity {
        country: caps[1].to_string(),
        slug: caps[2].to_string(),
        app_id: caps[3].to_string(),
    })
}

/// Extract the package id from a Google Play listing URL.
///
/// Takes the `id` query parameter up to the next `&`.
pub fn parse_google_play_url(url: &str) -> Result<String> {
    let pattern = regex!(r"id=([^&]+)");
    let caps = pattern
        .captures(url)
        .ok_or_else(|| AppError::invalid_url(url, "missing id query parameter"))?;
    Ok(caps[1].to_string())
}

/// Decode percent-encoded bytes in a URL, leaving malformed escapes as-is.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let h1 = bytes[i + 1] as char;
            let h2 = bytes[i + 2] as char;
            if let (Some(a), Some(b)) = (h1.to_digit(16), h2.to_digit(16)) {
                out.push(((a << 4) + b) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).to_string()
}
