//! Core rate limiter service using Redis.

use std::sync::Arc;

use fred::prelude::*;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::ratelimit::{
    LimitConfig, RateLimitCategory, RateLimitConfig, RateLimitError, RateLimitResult,
    SCRIPT_ALLOWED,
};

/// Embedded Lua script for atomic rate limit check and increment.
const RATE_LIMIT_SCRIPT: &str = include_str!("rate_limit.lua");

/// Core rate limiter service backed by Redis.
///
/// Each check runs the fixed-window Lua script atomically, so concurrent
/// commands from the same user cannot both slip through a 1-request window.
#[derive(Clone)]
pub struct RateLimiter {
    redis: Client,
    config: Arc<RateLimitConfig>,
    script_sha: Arc<RwLock<String>>,
}

impl RateLimiter {
    /// Creates a new rate limiter instance.
    ///
    /// Call `init()` after creation to load the Lua script into Redis.
    pub fn new(redis: Client, config: RateLimitConfig) -> Self {
        Self {
            redis,
            config: Arc::new(config),
            script_sha: Arc::new(RwLock::new(String::new())),
        }
    }

    /// Initializes the rate limiter by loading the Lua script into Redis.
    pub async fn init(&mut self) -> Result<(), Error> {
        self.load_script().await
    }

    /// Loads or reloads the Lua script into Redis.
    async fn load_script(&self) -> Result<(), Error> {
        let sha: String = self.redis.script_load(RATE_LIMIT_SCRIPT).await?;
        info!(rate_limit_sha = %sha, "Lua script loaded into Redis");
        *self.script_sha.write().await = sha;
        Ok(())
    }

    /// Checks if an error is a NOSCRIPT error (script not found in Redis).
    fn is_noscript_error(error: &Error) -> bool {
        error.to_string().contains("NOSCRIPT")
    }

    /// Checks and increments the rate limit for a user in a category.
    ///
    /// Returns `allowed: false` with retry information once the limit is
    /// exceeded.
    ///
    /// # Errors
    /// Returns `RateLimitError::RedisUnavailable` if Redis is unreachable.
    #[tracing::instrument(skip(self), fields(category = %category.as_str()))]
    pub async fn check(
        &self,
        category: RateLimitCategory,
        user_id: Uuid,
    ) -> Result<RateLimitResult, RateLimitError> {
        if !self.config.enabled {
            return Ok(RateLimitResult::unlimited());
        }

        let limit_config = self.get_limit_config(category);
        let key = self.build_key(category, user_id);

        let reply = self.execute_rate_limit_script(&key, limit_config).await?;
        let [count, allowed, ttl] = reply.as_slice() else {
            warn!(reply = ?reply, "Unexpected rate limit script reply");
            return Err(RateLimitError::RedisUnavailable);
        };

        let count = (*count).max(0) as u32;
        let allowed = *allowed == SCRIPT_ALLOWED;
        let ttl = (*ttl).max(0) as u64;

        Ok(RateLimitResult {
            allowed,
            remaining: if allowed {
                limit_config.requests.saturating_sub(count)
            } else {
                0
            },
            retry_after: if allowed { 0 } else { ttl },
        })
    }

    /// Executes the rate limit Lua script with NOSCRIPT retry.
    async fn execute_rate_limit_script(
        &self,
        key: &str,
        limit_config: &LimitConfig,
    ) -> Result<Vec<i64>, RateLimitError> {
        let args = vec![
            limit_config.window_secs.to_string(),
            limit_config.requests.to_string(),
        ];
        let sha = self.script_sha.read().await.clone();

        let result: Result<Vec<i64>, _> = self.redis.evalsha(&sha, vec![key], args.clone()).await;

        match result {
            Ok(r) => Ok(r),
            Err(e) if Self::is_noscript_error(&e) => {
                warn!("NOSCRIPT error, reloading Lua script");
                self.load_script().await.map_err(|e| {
                    warn!(error = %e, "Failed to reload script");
                    RateLimitError::RedisUnavailable
                })?;

                let new_sha = self.script_sha.read().await.clone();
                self.redis
                    .evalsha(&new_sha, vec![key], args)
                    .await
                    .map_err(|e| {
                        warn!(error = %e, "Redis rate limit check failed after reload");
                        RateLimitError::RedisUnavailable
                    })
            }
            Err(e) => {
                warn!(error = %e, "Redis rate limit check failed");
                Err(RateLimitError::RedisUnavailable)
            }
        }
    }

    /// Returns the configuration for this rate limiter.
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Builds a Redis key with the configured prefix.
    fn build_key(&self, category: RateLimitCategory, user_id: Uuid) -> String {
        format!(
            "{}:{}:user:{}",
            self.config.redis_key_prefix,
            category.as_str(),
            user_id
        )
    }

    /// Returns the limit configuration for a given category.
    fn get_limit_config(&self, category: RateLimitCategory) -> &LimitConfig {
        match category {
            RateLimitCategory::Command => &self.config.limits.command,
            RateLimitCategory::ListAll => &self.config.limits.list_all,
        }
    }
}
