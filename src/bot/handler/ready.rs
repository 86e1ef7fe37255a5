//! Ready event handler for bot initialization.
//!
//! Fired when the bot connects to Discord's gateway, and again after every reconnect
//! that needed a fresh session. Protection settings are kept in memory, so they survive
//! reconnects but not process restarts.

use dioxus_logger::tracing;
use serenity::all::{ActivityData, Context, Ready};

use crate::state::BotState;

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `state` - Shared bot state, used to report how many guilds have settings
/// - `ctx` - Discord context for setting activity status
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(state: &BotState, ctx: Context, ready: Ready) {
    tracing::info!(
        "{} is connected to Discord ({} guilds, {} with antinuke settings)",
        ready.user.name,
        ready.guilds.len(),
        state.registry.guild_count().await
    );

    ctx.set_activity(Some(ActivityData::watching("for nukes")));
}
