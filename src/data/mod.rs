//! Access to the chat platform.
//!
//! The antinuke services never talk to Serenity directly; they go through the
//! `GuildPlatform` port defined here, which the bot backs with Discord's HTTP API and
//! gateway cache and tests back with an in-memory fake.

pub mod discord;
