//! Friend code domain types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Maximum identifier length, in characters.
pub const MAX_IDENTIFIER_LEN: usize = 16;

/// Number of digits in a friend code.
pub const FRIEND_CODE_DIGITS: usize = 12;

/// Input validation failures. Always reported back to the requester.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("The trainer name / identifier that you gave is longer than the maximum character limit.")]
    IdentifierTooLong,

    #[error("The trainer name / identifier can't be empty.")]
    IdentifierEmpty,

    #[error("The trainer name / identifier can't contain control characters.")]
    IdentifierControlChars,

    #[error("The given friend code isn't all numbers.")]
    CodeNotNumeric,

    #[error("The given friend code isn't 12 digits long.")]
    CodeWrongLength,

    #[error("{} is not a valid option.", title_case(.0))]
    InvalidVisibility(String),

    #[error("`{0}` is not a friend code subcommand.")]
    UnknownSubcommand(String),

    #[error("Missing required argument `{0}`.")]
    MissingArgument(&'static str),
}

/// User-chosen label for a stored code, e.g. a trainer name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.trim().is_empty() {
            return Err(ValidationError::IdentifierEmpty);
        }
        if raw.chars().count() > MAX_IDENTIFIER_LEN {
            return Err(ValidationError::IdentifierTooLong);
        }
        if raw.chars().any(char::is_control) {
            return Err(ValidationError::IdentifierControlChars);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A 12-digit friend code. Leading zeros are significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FriendCode(String);

impl FriendCode {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if !raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::CodeNotNumeric);
        }
        if raw.len() != FRIEND_CODE_DIGITS {
            return Err(ValidationError::CodeWrongLength);
        }
        Ok(Self(raw.to_string()))
    }

    /// Parse a code typed as separate groups, e.g. `1234 5678 9012`.
    pub fn from_parts<S: AsRef<str>>(parts: &[S]) -> Result<Self, ValidationError> {
        let joined: String = parts.iter().map(AsRef::as_ref).collect();
        Self::parse(&joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FriendCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who may look up a user's friend codes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "fc_visibility", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Anyone in any shared server.
    Public,
    /// Only members of the owner's home server.
    Private,
    /// Only the owner.
    Hidden,
}

impl Visibility {
    /// Visibility assumed when a user never chose one.
    pub const DEFAULT: Self = Self::Private;

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Hidden => "hidden",
        }
    }

    /// Capitalized form used in replies.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::Private => "Private",
            Self::Hidden => "Hidden",
        }
    }

    pub const fn all() -> &'static [Self] {
        &[Self::Public, Self::Private, Self::Hidden]
    }
}

impl FromStr for Visibility {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|v| v.as_str() == normalized)
            .ok_or(ValidationError::InvalidVisibility(normalized))
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored friend code row.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct FriendCodeEntry {
    #[sqlx(rename = "user_id")]
    pub owner: Uuid,
    pub identifier: String,
    /// Always 12 digits, zero-padded.
    pub code: String,
}

/// Per-user sharing settings.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct UserPreference {
    #[sqlx(rename = "user_id")]
    pub owner: Uuid,
    #[sqlx(rename = "fc_visibility")]
    pub visibility: Option<Visibility>,
    pub home_guild: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

/// All codes of one member whose home guild is the queried guild.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct GuildCodeSummary {
    #[sqlx(rename = "user_id")]
    pub owner: Uuid,
    /// `identifier: code` lines joined with `\n`, ordered by identifier.
    pub lines: String,
}

/// Format one line of a guild-wide listing.
pub fn summary_line(identifier: &str, code: &str) -> String {
    format!("{identifier}: {code}")
}

/// Uppercase the first letter of every word and lowercase the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
