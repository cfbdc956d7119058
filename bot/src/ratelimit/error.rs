//! Rate limiting error types.

use crate::ratelimit::RateLimitResult;

/// Errors that can occur during rate limit checks.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    /// Redis is unavailable (fail-open, but should be logged).
    #[error("Rate limiter unavailable")]
    RedisUnavailable,
    /// Request exceeded the rate limit.
    #[error("Too many requests. Wait {} seconds.", .0.retry_after)]
    LimitExceeded(RateLimitResult),
}

impl RateLimitError {
    /// Seconds until the caller may retry, if known.
    pub const fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RedisUnavailable => None,
            Self::LimitExceeded(result) => Some(result.retry_after),
        }
    }
}
