use dioxus_logger::tracing;
use serenity::all::{Context, Role};

use crate::bot::handler::correlate;
use crate::model::antinuke::WatchedEvent;
use crate::state::BotState;

/// Handles the guild_role_create event when a role is created in a guild.
pub async fn handle_guild_role_create(state: &BotState, ctx: Context, new: Role) {
    tracing::debug!("Role {} created in guild {}", new.name, new.guild_id);

    let event = WatchedEvent::RoleCreated {
        guild_id: new.guild_id,
        role_id: new.id,
    };

    correlate(state, &ctx, event).await;
}
