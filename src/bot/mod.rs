//! Discord bot integration.
//!
//! The bot listens for the guild events the antinuke engine watches and for prefix
//! commands that configure it. Serenity dispatches every event as its own task, so a
//! slow correlation in one guild does not hold up events from another.
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Channel and role creation events, guild cache
//! - `GUILD_MODERATION` - Ban events
//! - `GUILD_MEMBERS` - Member removal events, used to detect kicks (privileged intent)
//! - `GUILD_MESSAGES` / `MESSAGE_CONTENT` - Prefix commands (message content is privileged)
//!
//! Privileged intents must be explicitly enabled in the Discord Developer Portal for the
//! bot application. The bot also needs the View Audit Log, Ban Members, Manage Channels
//! and Manage Roles permissions, and its role must sit above the roles it acts against.

pub mod handler;
pub mod start;
