//! Member event handlers feeding the antinuke engine.
//!
//! Discord has no dedicated kick event: a kicked member arrives as an ordinary member
//! removal. Every removal is therefore checked against the kick audit log, and removals
//! without a matching kick entry (leaves, bans) end without attribution.

use serenity::all::{Context, GuildId, Member, User};

use crate::bot::handler::correlate;
use crate::model::antinuke::WatchedEvent;
use crate::state::BotState;

/// Handles the guild_ban_addition event when a user is banned from a guild.
pub async fn handle_guild_ban_addition(
    state: &BotState,
    ctx: Context,
    guild_id: GuildId,
    banned_user: User,
) {
    let event = WatchedEvent::MemberBanned {
        guild_id,
        user_id: banned_user.id,
    };

    correlate(state, &ctx, event).await;
}

/// Handles the guild_member_removal event, treating it as a potential kick.
pub async fn handle_guild_member_removal(
    state: &BotState,
    ctx: Context,
    guild_id: GuildId,
    user: User,
    _member_data_if_available: Option<Member>,
) {
    // The bot leaving a guild cannot be remediated from inside it
    if user.id == ctx.cache.current_user().id {
        return;
    }

    let event = WatchedEvent::MemberKicked {
        guild_id,
        user_id: user.id,
    };

    correlate(state, &ctx, event).await;
}
