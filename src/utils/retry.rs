// src/utils/retry.rs

//! Retry policy for page fetches.
//!
//! The schedule is computed, not slept, so callers own the actual waiting
//! and tests can assert on delays directly.

use std::time::Duration;

/// Retry budget shared by rate-limit and network failures on one fetch.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum attempts for a single page fetch
    pub max_attempts: u32,
    /// Base delay between attempts
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Linearly growing delay used after a rate-limit response.
    ///
    /// `attempt` is 1-based: attempts 1, 2, 3 wait base, 2x base, 3x base.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// Flat delay used after a network-level failure.
    pub fn retry_delay(&self) -> Duration {
        self.base_delay
    }

    /// Whether the budget is spent after `attempt` attempts.
    pub fn is_exhausted(&self, attempt: u32) -> bool {
        attempt >= self.max_attempts
    }

    /// Whether a status code should be retried at all.
    pub fn is_retryable_status(status: u16) -> bool {
        status == 429
    }
}
