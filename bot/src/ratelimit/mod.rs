//! Rate limiting for command dispatch.
//!
//! Provides Redis-based per-user cooldowns. Limits are checked around
//! dispatch, never inside the stores or the visibility resolver.

pub mod config;
pub mod constants;
pub mod cooldown;
pub mod error;
pub mod limiter;
pub mod types;

pub use config::*;
pub use constants::*;
pub use cooldown::enforce;
pub use error::*;
pub use limiter::*;
pub use types::*;
