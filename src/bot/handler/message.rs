use dioxus_logger::tracing;
use serenity::all::{Context, Message};

use crate::controller::antinuke::{AntinukeCommand, AntinukeController};
use crate::data::discord::{GuildPlatform, SerenityGuildPlatform};
use crate::state::BotState;

/// Handle message creation in a channel
///
/// Runs antinuke configuration commands sent in guild channels and replies in the same
/// channel. Messages from bots, direct messages and unrelated messages are ignored.
pub async fn handle_message(state: &BotState, ctx: Context, message: Message) {
    if message.author.bot {
        return;
    }

    let Some(guild_id) = message.guild_id else {
        return;
    };

    let Some(command) = AntinukeCommand::parse(&state.command_prefix, &message.content) else {
        return;
    };

    tracing::debug!(
        "Antinuke command {:?} from {} in guild {}",
        command,
        message.author.id,
        guild_id
    );

    let platform = SerenityGuildPlatform::new(&ctx, state.antinuke.platform_timeout);
    let reply = AntinukeController::new(&platform, &state.registry, &state.command_prefix)
        .execute(guild_id, message.author.id, command)
        .await;

    if let Err(e) = platform.send_reply(message.channel_id, &reply).await {
        tracing::error!(
            "Failed to reply to command in channel {} of guild {}: {}",
            message.channel_id,
            guild_id,
            e
        );
    }
}
