// src/pipeline/rank.rs

//! Recency ranking shared by both store pipelines.

use crate::models::Review;

/// Sort reviews by date descending and keep the newest `quota`.
///
/// The sort is stable, so reviews sharing a date keep their arrival order.
pub fn rank(mut reviews: Vec<Review>, quota: usize) -> Vec<Review> {
    reviews.sort_by(|a, b| b.date.cmp(&a.date));
    reviews.truncate(quota);
    reviews
}
