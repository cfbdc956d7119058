//! Rate limiting configuration.

/// Configuration for the rate limiting system.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Whether rate limiting is enabled
    pub enabled: bool,
    /// Prefix for Redis keys (e.g., "fcbot:rl")
    pub redis_key_prefix: String,
    /// Whether to allow commands when Redis is unavailable
    pub fail_open: bool,
    /// Per-category rate limits
    pub limits: RateLimits,
}

/// Rate limits for each category.
#[derive(Debug, Clone)]
pub struct RateLimits {
    /// Any friend code command
    pub command: LimitConfig,
    /// Guild-wide code listing
    pub list_all: LimitConfig,
}

/// Configuration for a single rate limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitConfig {
    /// Maximum requests allowed in the window
    pub requests: u32,
    /// Window duration in seconds
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            redis_key_prefix: "fcbot:rl".to_string(),
            fail_open: true,
            limits: RateLimits::default(),
        }
    }
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            command: LimitConfig { requests: 30, window_secs: 60 },
            list_all: LimitConfig { requests: 1, window_secs: 30 },
        }
    }
}

impl RateLimitConfig {
    /// Creates configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RATE_LIMIT_ENABLED`: Enable/disable rate limiting (default: true)
    /// - `RATE_LIMIT_PREFIX`: Redis key prefix (default: "fcbot:rl")
    /// - `RATE_LIMIT_FAIL_OPEN`: Allow commands when Redis unavailable (default: true)
    /// - `RATE_LIMIT_COMMAND`: Per-command limit as "requests,window_secs"
    /// - `RATE_LIMIT_LIST_ALL`: Guild listing limit as "requests,window_secs"
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("RATE_LIMIT_ENABLED") {
            config.enabled = val.parse().unwrap_or(true);
        }
        if let Ok(val) = std::env::var("RATE_LIMIT_PREFIX") {
            config.redis_key_prefix = val;
        }
        if let Ok(val) = std::env::var("RATE_LIMIT_FAIL_OPEN") {
            config.fail_open = val.parse().unwrap_or(true);
        }
        if let Some(limit) = std::env::var("RATE_LIMIT_COMMAND")
            .ok()
            .and_then(|val| parse_limit_config(&val))
        {
            config.limits.command = limit;
        }
        if let Some(limit) = std::env::var("RATE_LIMIT_LIST_ALL")
            .ok()
            .and_then(|val| parse_limit_config(&val))
        {
            config.limits.list_all = limit;
        }

        config
    }
}

/// Parses a limit config from "requests,window_secs" format.
fn parse_limit_config(val: &str) -> Option<LimitConfig> {
    let parts: Vec<&str> = val.split(',').collect();
    if parts.len() == 2 {
        let requests = parts[0].trim().parse().ok()?;
        let window_secs = parts[1].trim().parse().ok()?;
        Some(LimitConfig { requests, window_secs })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.redis_key_prefix, "fcbot:rl");
        assert!(config.fail_open);
    }

    #[test]
    fn test_list_all_defaults_to_one_per_thirty_seconds() {
        let limits = RateLimits::default();
        assert_eq!(limits.list_all, LimitConfig { requests: 1, window_secs: 30 });
        assert_eq!(limits.command.requests, 30);
    }

    #[test]
    fn test_parse_limit_config() {
        let limit = parse_limit_config("10,60").unwrap();
        assert_eq!(limit.requests, 10);
        assert_eq!(limit.window_secs, 60);

        // With whitespace
        let limit = parse_limit_config(" 20 , 120 ").unwrap();
        assert_eq!(limit.requests, 20);
        assert_eq!(limit.window_secs, 120);

        // Invalid formats
        assert!(parse_limit_config("10").is_none());
        assert!(parse_limit_config("10,60,extra").is_none());
        assert!(parse_limit_config("abc,60").is_none());
    }
}
