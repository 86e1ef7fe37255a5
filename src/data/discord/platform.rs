use serenity::all::{ChannelId, GuildId, RoleId, UserId};
use serenity::async_trait;

use crate::error::platform::PlatformError;
use crate::model::antinuke::{ActionKind, AuditEntry, NotificationChannel};
use crate::model::reply::Reply;

/// Guild operations the antinuke engine and its configuration commands depend on.
///
/// Every call may suspend on network I/O. Implementations report Discord's 403 and 404
/// answers as `PlatformError::Forbidden` and `PlatformError::NotFound` so callers can
/// tell a missing permission apart from an entity that is already gone.
#[async_trait]
pub trait GuildPlatform: Send + Sync {
    /// User ID of the bot itself.
    fn bot_id(&self) -> UserId;

    /// Most recent audit log entries of the given kind, newest first, at most `limit`.
    async fn audit_entries(
        &self,
        guild_id: GuildId,
        kind: ActionKind,
        limit: u8,
    ) -> Result<Vec<AuditEntry>, PlatformError>;

    async fn guild_owner(&self, guild_id: GuildId) -> Result<UserId, PlatformError>;

    /// Whether the user holds the administrator permission in the guild. A user who is
    /// not a member of the guild holds no permissions.
    async fn is_administrator(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<bool, PlatformError>;

    async fn ban(&self, guild_id: GuildId, user_id: UserId, reason: &str)
        -> Result<(), PlatformError>;

    async fn delete_channel(&self, channel_id: ChannelId) -> Result<(), PlatformError>;

    async fn delete_role(&self, guild_id: GuildId, role_id: RoleId) -> Result<(), PlatformError>;

    /// Text and announcement channels of the guild in display order, flagged with whether
    /// the bot may post.
    async fn text_channels(
        &self,
        guild_id: GuildId,
    ) -> Result<Vec<NotificationChannel>, PlatformError>;

    async fn send_reply(&self, channel_id: ChannelId, reply: &Reply) -> Result<(), PlatformError>;
}
