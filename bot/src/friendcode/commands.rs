//! Friend code subcommands and their invocation context.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::types::{FriendCode, Identifier, ValidationError, Visibility};
use crate::ratelimit::RateLimitCategory;

/// A platform user as resolved by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UserRef {
    pub id: Uuid,
    #[validate(length(min = 1, max = 64, message = "Display name must be 1-64 characters"))]
    pub display_name: String,
}

/// The guild a command was invoked in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct GuildRef {
    pub id: Uuid,
    #[validate(length(min = 1, max = 100, message = "Guild name must be 1-100 characters"))]
    pub name: String,
    pub owner_id: Uuid,
    /// Display names of current members, keyed by user ID.
    #[serde(default)]
    pub members: HashMap<Uuid, String>,
}

impl GuildRef {
    pub fn member_name(&self, user_id: Uuid) -> Option<&str> {
        self.members.get(&user_id).map(String::as_str)
    }
}

/// Who invoked a command, and where.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub requester: UserRef,
    /// `None` in direct messages.
    pub guild: Option<GuildRef>,
}

impl CommandContext {
    pub fn guild_id(&self) -> Option<Uuid> {
        self.guild.as_ref().map(|g| g.id)
    }
}

/// Which subcommand was invoked, before its arguments are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Lookup,
    Add,
    List,
    ListAll,
    Remove,
    Visibility,
    SetHome,
}

impl CommandKind {
    /// Resolve a subcommand name or alias. No subcommand means a lookup.
    pub fn from_subcommand(name: Option<&str>) -> Result<Self, ValidationError> {
        let Some(name) = name else {
            return Ok(Self::Lookup);
        };

        match name.to_lowercase().as_str() {
            "add" | "a" => Ok(Self::Add),
            "list" | "l" => Ok(Self::List),
            "listall" | "list_all" => Ok(Self::ListAll),
            "remove" | "r" | "delete" | "d" => Ok(Self::Remove),
            "visibility" | "vis" | "v" => Ok(Self::Visibility),
            "sethome" => Ok(Self::SetHome),
            _ => Err(ValidationError::UnknownSubcommand(name.to_string())),
        }
    }

    /// Title used when the command fails without a more specific one.
    pub const fn error_title(&self) -> &'static str {
        match self {
            Self::Lookup => "Friend Codes",
            Self::Add => "Error Adding Friend Code",
            Self::List | Self::ListAll => "Error Listing Friend Codes",
            Self::Remove => "Error Removing Friend Code",
            Self::Visibility => "Error Changing F.C. Visibility",
            Self::SetHome => "Error Setting Home Server",
        }
    }

    /// Cooldowns checked before the command runs.
    pub const fn rate_limit_categories(&self) -> &'static [RateLimitCategory] {
        match self {
            Self::ListAll => &[RateLimitCategory::Command, RateLimitCategory::ListAll],
            _ => &[RateLimitCategory::Command],
        }
    }
}

/// Most groups a friend code may be typed in, e.g. `1234 5678 9012`.
const MAX_CODE_PARTS: usize = 3;

/// A fully parsed friend code command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FriendCodeCommand {
    /// Show the target's codes (the requester's when no target is given).
    Lookup {
        target: Option<UserRef>,
        filter: Option<String>,
    },
    Add {
        identifier: Identifier,
        code: FriendCode,
    },
    List,
    ListAll,
    Remove {
        identifier: String,
    },
    /// Report the current setting when `value` is `None`.
    Visibility {
        value: Option<Visibility>,
    },
    SetHome,
}

impl FriendCodeCommand {
    /// Build a command from dispatcher arguments.
    ///
    /// `target` is the mentioned user resolved by the dispatcher; only lookups
    /// use it.
    pub fn parse(
        kind: CommandKind,
        args: Vec<String>,
        target: Option<UserRef>,
    ) -> Result<Self, ValidationError> {
        let mut args = args.into_iter();

        match kind {
            CommandKind::Lookup => Ok(Self::Lookup {
                target,
                filter: args
                    .next()
                    .filter(|f| !f.is_empty())
                    .map(reject_control_chars)
                    .transpose()?,
            }),
            CommandKind::Add => {
                let identifier = args
                    .next()
                    .ok_or(ValidationError::MissingArgument("trainer name"))?;
                // Extra words after the third code group are ignored
                let parts: Vec<String> = args.by_ref().take(MAX_CODE_PARTS).collect();
                if parts.is_empty() {
                    return Err(ValidationError::MissingArgument("friend code"));
                }
                Ok(Self::Add {
                    identifier: Identifier::parse(&identifier)?,
                    code: FriendCode::from_parts(&parts)?,
                })
            }
            CommandKind::List => Ok(Self::List),
            CommandKind::ListAll => Ok(Self::ListAll),
            CommandKind::Remove => {
                let identifier = args
                    .next()
                    .filter(|i| !i.trim().is_empty())
                    .ok_or(ValidationError::MissingArgument("trainer name"))?;
                Ok(Self::Remove {
                    identifier: reject_control_chars(identifier)?,
                })
            }
            CommandKind::Visibility => Ok(Self::Visibility {
                value: args.next().map(|v| v.parse()).transpose()?,
            }),
            CommandKind::SetHome => Ok(Self::SetHome),
        }
    }
}

/// Free-text arguments end up in SQL text columns, which refuse control characters.
fn reject_control_chars(arg: String) -> Result<String, ValidationError> {
    if arg.chars().any(char::is_control) {
        return Err(ValidationError::IdentifierControlChars);
    }
    Ok(arg)
}
