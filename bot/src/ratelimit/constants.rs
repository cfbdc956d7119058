//! Rate limiting constants.

/// Lua script return code for an allowed request
pub const SCRIPT_ALLOWED: i64 = 1;
