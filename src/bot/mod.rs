//! Discord bot integration.
//!
//! The bot runs in a separate tokio task and serves two purposes: it receives
//! operator commands (`!marketpoll ...`) through the gateway, and its HTTP
//! client backs the [`platform::PollPlatform`] implementation the poll engine
//! posts and tallies through.
//!
//! # Gateway Intents
//!
//! - `GUILDS` - guild availability events
//! - `GUILD_MESSAGES` - command messages in guild channels
//! - `MESSAGE_CONTENT` - privileged; required to read the `!`-prefix commands

pub mod handler;
pub mod platform;
pub mod start;
