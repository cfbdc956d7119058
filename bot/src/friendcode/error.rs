//! Friend code command errors.

use super::store::StoreError;
use super::types::ValidationError;
use super::visibility::LookupDenied;
use crate::ratelimit::RateLimitError;
use crate::reply::Reply;

/// Everything that can stop a friend code command.
#[derive(Debug, thiserror::Error)]
pub enum FriendCodeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No friend codes stored for {target_name}")]
    NoCodes {
        target_name: String,
        filter: Option<String>,
    },

    #[error("{0} not found on your list.")]
    NotOnList(String),

    #[error(transparent)]
    Denied(#[from] LookupDenied),

    #[error("This command can only be used in a server.")]
    GuildOnly,

    #[error("Only the server owner can list every friend code in this server.")]
    NotPermitted,

    #[error(transparent)]
    RateLimited(#[from] RateLimitError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl FriendCodeError {
    /// Render the error as a reply, using `title` where the error has no title of its own.
    pub fn into_reply(self, title: &str) -> Reply {
        match self {
            Self::NoCodes {
                target_name,
                filter: None,
            } => Reply::warning(
                format!("{target_name}'s Friend Codes"),
                format!("Sadly `{target_name}` doesn't have any friend codes stored."),
            ),
            Self::NoCodes {
                target_name,
                filter: Some(filter),
            } => Reply::warning(
                format!("{target_name}'s Friend Codes"),
                format!("No friend codes were found for `{target_name}` with `{filter}` in it"),
            ),
            Self::Denied(denied) => {
                let footer = denied.footer();
                let reply = Reply::error(
                    format!("{}'s Friend Codes", denied.target_name),
                    denied.to_string(),
                );
                match footer {
                    Some(footer) => reply.with_footer(footer),
                    None => reply,
                }
            }
            Self::RateLimited(RateLimitError::LimitExceeded(result)) => Reply::warning(
                "Cooldown",
                format!("Slow down! Try again in {} seconds.", result.retry_after),
            ),
            Self::RateLimited(RateLimitError::RedisUnavailable) => {
                tracing::error!("Cooldown check failed: Redis unavailable");
                Reply::error(title, "Something went wrong, please try again later.")
            }
            Self::Store(e) => {
                tracing::error!(error = %e, "Friend code store failure");
                Reply::error(title, "Something went wrong, please try again later.")
            }
            other => Reply::error(title, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::friendcode::visibility::DenyReason;
    use crate::ratelimit::RateLimitResult;
    use crate::reply::ReplyKind;

    #[test]
    fn test_validation_error_uses_command_title() {
        let reply = FriendCodeError::from(ValidationError::CodeNotNumeric)
            .into_reply("Error Adding Friend Code");
        assert_eq!(reply.kind, ReplyKind::Error);
        assert_eq!(reply.title, "Error Adding Friend Code");
        assert_eq!(reply.body, "The given friend code isn't all numbers.");
    }

    #[test]
    fn test_no_codes_messages() {
        let reply = FriendCodeError::NoCodes {
            target_name: "Misty".into(),
            filter: None,
        }
        .into_reply("Friend Codes");
        assert_eq!(reply.kind, ReplyKind::Warning);
        assert_eq!(reply.title, "Misty's Friend Codes");
        assert_eq!(reply.body, "Sadly `Misty` doesn't have any friend codes stored.");

        let reply = FriendCodeError::NoCodes {
            target_name: "Misty".into(),
            filter: Some("star".into()),
        }
        .into_reply("Friend Codes");
        assert_eq!(
            reply.body,
            "No friend codes were found for `Misty` with `star` in it"
        );
    }

    #[test]
    fn test_denied_carries_footer() {
        let reply = FriendCodeError::from(LookupDenied {
            reason: DenyReason::NoHomeGuild,
            target_name: "Brock".into(),
        })
        .into_reply("Friend Codes");
        assert_eq!(reply.kind, ReplyKind::Error);
        assert_eq!(reply.footer.as_deref(), Some("They need to run `fc sethome`"));
    }

    #[test]
    fn test_cooldown_message() {
        let result = RateLimitResult {
            allowed: false,
            remaining: 0,
            retry_after: 12,
        };
        let reply = FriendCodeError::from(RateLimitError::LimitExceeded(result))
            .into_reply("Error Listing Friend Codes");
        assert_eq!(reply.kind, ReplyKind::Warning);
        assert_eq!(reply.body, "Slow down! Try again in 12 seconds.");
    }

    #[test]
    fn test_store_error_is_not_leaked() {
        let reply = FriendCodeError::from(StoreError::Database(sqlx::Error::RowNotFound))
            .into_reply("Error Removing Friend Code");
        assert_eq!(reply.kind, ReplyKind::Error);
        assert!(!reply.body.contains("Database"));
    }

    #[test]
    fn test_not_on_list_message() {
        let reply =
            FriendCodeError::NotOnList("Ash".into()).into_reply("Error Removing Friend Code");
        assert_eq!(reply.body, "Ash not found on your list.");
    }
}
