use dioxus_logger::tracing;
use serenity::all::{Context, EventHandler, GuildChannel, GuildId, Member, Message, Ready, Role, User};
use serenity::async_trait;

use crate::data::discord::SerenityGuildPlatform;
use crate::model::antinuke::WatchedEvent;
use crate::service::antinuke::EventCorrelator;
use crate::state::BotState;

pub mod channel;
pub mod member;
pub mod message;
pub mod ready;
pub mod role;

/// Discord bot event handler
pub struct Handler {
    pub state: BotState,
}

impl Handler {
    pub fn new(state: BotState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(&self.state, ctx, ready).await;
    }

    /// Called when a user is banned from a guild
    async fn guild_ban_addition(&self, ctx: Context, guild_id: GuildId, banned_user: User) {
        member::handle_guild_ban_addition(&self.state, ctx, guild_id, banned_user).await;
    }

    /// Called when a member leaves a guild, is kicked, or is banned
    async fn guild_member_removal(
        &self,
        ctx: Context,
        guild_id: GuildId,
        user: User,
        member_data_if_available: Option<Member>,
    ) {
        member::handle_guild_member_removal(
            &self.state,
            ctx,
            guild_id,
            user,
            member_data_if_available,
        )
        .await;
    }

    /// Called when a channel is created in a guild
    async fn channel_create(&self, ctx: Context, channel: GuildChannel) {
        channel::handle_channel_create(&self.state, ctx, channel).await;
    }

    /// Called when a role is created in a guild
    async fn guild_role_create(&self, ctx: Context, new: Role) {
        role::handle_guild_role_create(&self.state, ctx, new).await;
    }

    /// Called when a message is sent in a channel
    async fn message(&self, ctx: Context, message: Message) {
        message::handle_message(&self.state, ctx, message).await;
    }
}

/// Runs the antinuke engine for a watched event and logs how it ended.
async fn correlate(state: &BotState, ctx: &Context, event: WatchedEvent) {
    let platform = SerenityGuildPlatform::new(ctx, state.antinuke.platform_timeout);

    let outcome = EventCorrelator::new(&platform, &state.registry, &state.antinuke)
        .handle(event)
        .await;

    tracing::debug!(
        "Antinuke {} in guild {} ended with {:?}",
        event.kind(),
        event.guild_id(),
        outcome
    );
}
