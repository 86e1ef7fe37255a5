use dioxus_logger::tracing;
use serenity::all::{Context, GuildChannel};

use crate::bot::handler::correlate;
use crate::model::antinuke::WatchedEvent;
use crate::state::BotState;

/// Handles the channel_create event when a channel is created in a guild.
///
/// Every channel type counts; an unauthorized voice channel or category is as much a
/// nuke attempt as a text channel.
pub async fn handle_channel_create(state: &BotState, ctx: Context, channel: GuildChannel) {
    tracing::debug!(
        "Channel {} ({:?}) created in guild {}",
        channel.name,
        channel.kind,
        channel.guild_id
    );

    let event = WatchedEvent::ChannelCreated {
        guild_id: channel.guild_id,
        channel_id: channel.id,
    };

    correlate(state, &ctx, event).await;
}
