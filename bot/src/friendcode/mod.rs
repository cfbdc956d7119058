//! Friend code sharing.
//!
//! Users store named 12-digit friend codes and choose who may look them up:
//! anyone, members of their home guild, or nobody but themselves.

pub mod commands;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod postgres;
pub mod store;
pub mod types;
pub mod visibility;

pub use commands::{CommandContext, CommandKind, FriendCodeCommand, GuildRef, UserRef};
pub use error::FriendCodeError;
pub use handlers::execute;
pub use store::{CodeStore, PreferenceStore, StoreError, Stores};
pub use types::{FriendCode, Identifier, ValidationError, Visibility};
pub use visibility::{resolve_lookup, DenyReason, LookupDenied, LookupRequest};
