//! Per-user cooldowns wrapped around command dispatch.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::ratelimit::{RateLimitCategory, RateLimitError, RateLimiter};

/// Check every category for the user before a command runs.
///
/// # Behavior
///
/// - If no rate limiter is configured, the command passes through.
/// - If Redis is unavailable and `fail_open` is true, the command passes through with a warning.
/// - The first exceeded category rejects the command with its retry information.
#[tracing::instrument(skip(limiter))]
pub async fn enforce(
    limiter: Option<&RateLimiter>,
    categories: &[RateLimitCategory],
    user_id: Uuid,
) -> Result<(), RateLimitError> {
    let Some(limiter) = limiter else {
        return Ok(());
    };

    for &category in categories {
        let result = match limiter.check(category, user_id).await {
            Ok(result) => result,
            Err(RateLimitError::RedisUnavailable) if limiter.config().fail_open => {
                warn!(
                    category = %category.as_str(),
                    user_id = %user_id,
                    "Redis unavailable, allowing command (fail_open=true)"
                );
                continue;
            }
            Err(e) => return Err(e),
        };

        if !result.allowed {
            debug!(
                category = %category.as_str(),
                user_id = %user_id,
                retry_after = result.retry_after,
                "Command cooldown active"
            );
            return Err(RateLimitError::LimitExceeded(result));
        }
    }

    Ok(())
}
