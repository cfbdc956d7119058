//! Friend Code Bot
//!
//! Stores game friend codes for chat users and shares them according to
//! each user's visibility and home server.

pub mod api;
pub mod config;
pub mod db;
pub mod friendcode;
pub mod ratelimit;
pub mod reply;
