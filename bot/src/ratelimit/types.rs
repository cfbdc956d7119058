//! Rate limiting types.

/// Categories for rate limiting with different thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateLimitCategory {
    /// Any friend code command
    Command,
    /// Guild-wide code listing
    ListAll,
}

impl RateLimitCategory {
    /// Returns the string identifier for this category (used in Redis keys).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::ListAll => "list_all",
        }
    }

    pub const fn all() -> &'static [Self] {
        &[Self::Command, Self::ListAll]
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Seconds to wait before retrying (0 if allowed)
    pub retry_after: u64,
}

impl RateLimitResult {
    /// Result returned when limiting is bypassed.
    pub const fn unlimited() -> Self {
        Self {
            allowed: true,
            remaining: 0,
            retry_after: 0,
        }
    }
}
