//! Serenity-backed implementation of the guild platform port.
//!
//! Reads prefer the gateway cache and fall back to the HTTP API when the guild or member
//! is not cached. Every HTTP call is bounded by the configured platform timeout so a slow
//! Discord API cannot leave an event task hanging.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dioxus_logger::tracing;
use serenity::all::{
    ChannelId, ChannelType, Context, CreateMessage, GuildChannel, GuildId, Member, Permissions,
    RoleId, UserId,
};
use serenity::async_trait;
use serenity::cache::Cache;
use serenity::http::Http;
use serenity::model::guild::audit_log::{Action, ChannelAction, MemberAction, RoleAction};

use crate::data::discord::platform::GuildPlatform;
use crate::error::platform::PlatformError;
use crate::model::antinuke::{ActionKind, AuditEntry, NotificationChannel};
use crate::model::reply::Reply;

pub struct SerenityGuildPlatform {
    http: Arc<Http>,
    cache: Arc<Cache>,
    bot_id: UserId,
    timeout: Duration,
}

impl SerenityGuildPlatform {
    /// Creates a platform handle from an event context.
    ///
    /// # Arguments
    /// - `ctx` - Discord context of the event being handled
    /// - `timeout` - Upper bound for each HTTP call
    pub fn new(ctx: &Context, timeout: Duration) -> Self {
        Self {
            http: ctx.http.clone(),
            cache: ctx.cache.clone(),
            bot_id: ctx.cache.current_user().id,
            timeout,
        }
    }

    /// Runs a Serenity call under the platform timeout.
    async fn bounded<T, F>(&self, call: F) -> Result<T, PlatformError>
    where
        F: Future<Output = Result<T, serenity::Error>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(PlatformError::from),
            Err(_) => Err(PlatformError::Timeout),
        }
    }

    /// Looks up a guild member, or `None` if the user is not in the guild.
    async fn member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<Member>, PlatformError> {
        let cached = self
            .cache
            .guild(guild_id)
            .and_then(|guild| guild.members.get(&user_id).cloned());
        if let Some(member) = cached {
            return Ok(Some(member));
        }

        // The member cache is partial for large guilds, so a miss is not proof of absence
        match self.bounded(self.http.get_member(guild_id, user_id)).await {
            Ok(member) => Ok(Some(member)),
            Err(PlatformError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Text and announcement channels ordered as Discord displays them.
fn notification_candidates(channels: Vec<GuildChannel>) -> Vec<GuildChannel> {
    let mut candidates: Vec<GuildChannel> = channels
        .into_iter()
        .filter(|channel| matches!(channel.kind, ChannelType::Text | ChannelType::News))
        .collect();
    candidates.sort_by_key(|channel| (channel.position, channel.id));
    candidates
}

fn can_send(permissions: Permissions) -> bool {
    permissions.view_channel() && permissions.send_messages()
}

fn audit_action(kind: ActionKind) -> Action {
    match kind {
        ActionKind::Ban => Action::Member(MemberAction::BanAdd),
        ActionKind::Kick => Action::Member(MemberAction::Kick),
        ActionKind::ChannelCreate => Action::Channel(ChannelAction::Create),
        ActionKind::RoleCreate => Action::Role(RoleAction::Create),
    }
}

#[async_trait]
impl GuildPlatform for SerenityGuildPlatform {
    fn bot_id(&self) -> UserId {
        self.bot_id
    }

    async fn audit_entries(
        &self,
        guild_id: GuildId,
        kind: ActionKind,
        limit: u8,
    ) -> Result<Vec<AuditEntry>, PlatformError> {
        let logs = self
            .bounded(guild_id.audit_logs(
                &self.http,
                Some(audit_action(kind)),
                None,
                None,
                Some(limit),
            ))
            .await?;

        let entries = logs
            .entries
            .into_iter()
            .map(|entry| AuditEntry {
                actor: entry.user_id,
                target: entry.target_id.map(|id| id.get()),
                action_kind: kind,
                recorded_at: DateTime::from_timestamp(entry.id.created_at().unix_timestamp(), 0)
                    .unwrap_or_else(Utc::now),
            })
            .collect();

        Ok(entries)
    }

    async fn guild_owner(&self, guild_id: GuildId) -> Result<UserId, PlatformError> {
        let cached = self.cache.guild(guild_id).map(|guild| guild.owner_id);
        if let Some(owner_id) = cached {
            return Ok(owner_id);
        }

        let guild = self.bounded(self.http.get_guild(guild_id)).await?;
        Ok(guild.owner_id)
    }

    async fn is_administrator(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<bool, PlatformError> {
        let Some(member) = self.member(guild_id, user_id).await? else {
            return Ok(false);
        };

        let cached = self
            .cache
            .guild(guild_id)
            .map(|guild| guild.member_permissions(&member));
        let permissions = match cached {
            Some(permissions) => permissions,
            None => self
                .bounded(self.http.get_guild(guild_id))
                .await?
                .member_permissions(&member),
        };

        Ok(permissions.administrator())
    }

    async fn ban(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> Result<(), PlatformError> {
        self.bounded(guild_id.ban_with_reason(&self.http, user_id, 0, reason))
            .await
    }

    async fn delete_channel(&self, channel_id: ChannelId) -> Result<(), PlatformError> {
        self.bounded(channel_id.delete(&self.http)).await.map(|_| ())
    }

    async fn delete_role(&self, guild_id: GuildId, role_id: RoleId) -> Result<(), PlatformError> {
        self.bounded(guild_id.delete_role(&self.http, role_id)).await
    }

    async fn text_channels(
        &self,
        guild_id: GuildId,
    ) -> Result<Vec<NotificationChannel>, PlatformError> {
        let channels = self.bounded(self.http.get_channels(guild_id)).await?;
        let channels = notification_candidates(channels);

        tracing::debug!(
            "Found {} text channels in guild {}",
            channels.len(),
            guild_id
        );

        let Some(bot) = self.member(guild_id, self.bot_id).await? else {
            return Ok(Vec::new());
        };

        let cached = self.cache.guild(guild_id).map(|guild| {
            channels
                .iter()
                .map(|channel| can_send(guild.user_permissions_in(channel, &bot)))
                .collect::<Vec<_>>()
        });
        let sendable = match cached {
            Some(sendable) => sendable,
            None => {
                let guild = self.bounded(self.http.get_guild(guild_id)).await?;
                channels
                    .iter()
                    .map(|channel| can_send(guild.user_permissions_in(channel, &bot)))
                    .collect()
            }
        };

        Ok(channels
            .into_iter()
            .zip(sendable)
            .map(|(channel, allowed)| NotificationChannel {
                id: channel.id,
                name: channel.name,
                can_send: allowed,
            })
            .collect())
    }

    async fn send_reply(&self, channel_id: ChannelId, reply: &Reply) -> Result<(), PlatformError> {
        let message = CreateMessage::new().embed(reply.to_embed());

        self.bounded(channel_id.send_message(&self.http, message))
            .await
            .map(|_| ())
    }
}
