//! Antinuke domain models.
//!
//! Covers per-guild protection settings, the gateway events the engine watches, what the
//! audit log says about them, how the responsible actor was classified and how each
//! remediation step and correlation run ended.

use std::fmt;

use chrono::{DateTime, Utc};
use serenity::all::{ChannelId, GuildId, RoleId, UserId};

use crate::error::platform::PlatformError;

/// Protection settings for a single guild.
///
/// A guild without a stored state behaves exactly like one with `enabled == false` and an
/// empty whitelist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProtectionState {
    /// Whether destructive actions in the guild are watched and punished.
    pub enabled: bool,
    /// Users exempt from punishment, in the order they were added.
    pub whitelist: Vec<UserId>,
}

/// Point-in-time copy of a guild's protection settings for status reporting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProtectionSnapshot {
    pub enabled: bool,
    /// Whitelisted users in insertion order.
    pub whitelist: Vec<UserId>,
}

/// Result of adding a user to a guild whitelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhitelistAdd {
    /// The user was already whitelisted and nothing changed.
    pub already: bool,
}

/// Result of removing a user from a guild whitelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhitelistRemove {
    /// The user was whitelisted and has been removed.
    pub removed: bool,
}

/// Destructive action types the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Ban,
    Kick,
    ChannelCreate,
    RoleCreate,
}

impl ActionKind {
    /// Audit log reason attached to the ban issued against the responsible actor.
    pub fn ban_reason(self) -> &'static str {
        match self {
            ActionKind::Ban => "Antinuke: Unauthorized ban",
            ActionKind::Kick => "Antinuke: Unauthorized kick",
            ActionKind::ChannelCreate => "Antinuke: Unauthorized channel creation",
            ActionKind::RoleCreate => "Antinuke: Unauthorized role creation",
        }
    }

    /// Human-readable description used in announcements.
    pub fn description(self) -> &'static str {
        match self {
            ActionKind::Ban => "Unauthorized ban attempt",
            ActionKind::Kick => "Unauthorized kick attempt",
            ActionKind::ChannelCreate => "Unauthorized channel creation",
            ActionKind::RoleCreate => "Unauthorized role creation",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Ban => "ban",
            ActionKind::Kick => "kick",
            ActionKind::ChannelCreate => "channel_create",
            ActionKind::RoleCreate => "role_create",
        };
        f.write_str(name)
    }
}

/// The entity a watched event concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditTarget {
    User(UserId),
    Channel(ChannelId),
    Role(RoleId),
}

impl AuditTarget {
    /// Raw snowflake, as stored in an audit log entry's target ID.
    pub fn raw_id(self) -> u64 {
        match self {
            AuditTarget::User(id) => id.get(),
            AuditTarget::Channel(id) => id.get(),
            AuditTarget::Role(id) => id.get(),
        }
    }
}

/// A gateway event the antinuke engine correlates against the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchedEvent {
    MemberBanned { guild_id: GuildId, user_id: UserId },
    MemberKicked { guild_id: GuildId, user_id: UserId },
    ChannelCreated { guild_id: GuildId, channel_id: ChannelId },
    RoleCreated { guild_id: GuildId, role_id: RoleId },
}

impl WatchedEvent {
    pub fn guild_id(&self) -> GuildId {
        match *self {
            WatchedEvent::MemberBanned { guild_id, .. }
            | WatchedEvent::MemberKicked { guild_id, .. }
            | WatchedEvent::ChannelCreated { guild_id, .. }
            | WatchedEvent::RoleCreated { guild_id, .. } => guild_id,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            WatchedEvent::MemberBanned { .. } => ActionKind::Ban,
            WatchedEvent::MemberKicked { .. } => ActionKind::Kick,
            WatchedEvent::ChannelCreated { .. } => ActionKind::ChannelCreate,
            WatchedEvent::RoleCreated { .. } => ActionKind::RoleCreate,
        }
    }

    pub fn target(&self) -> AuditTarget {
        match *self {
            WatchedEvent::MemberBanned { user_id, .. }
            | WatchedEvent::MemberKicked { user_id, .. } => AuditTarget::User(user_id),
            WatchedEvent::ChannelCreated { channel_id, .. } => AuditTarget::Channel(channel_id),
            WatchedEvent::RoleCreated { role_id, .. } => AuditTarget::Role(role_id),
        }
    }
}

/// One audit log entry, reduced to what attribution needs.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    /// User responsible for the action.
    pub actor: UserId,
    /// Raw ID of the affected entity, if Discord recorded one.
    pub target: Option<u64>,
    pub action_kind: ActionKind,
    /// Derived from the entry's snowflake ID.
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Whether this entry records an action against `target`.
    pub fn concerns(&self, target: AuditTarget) -> bool {
        self.target == Some(target.raw_id())
    }

    /// Whether this entry was recorded no more than `max_age` before `now`.
    ///
    /// Entries dated after `now` count as recent; Discord's clock and ours may disagree
    /// by a little.
    pub fn is_recent(&self, now: DateTime<Utc>, max_age: std::time::Duration) -> bool {
        match (now - self.recorded_at).to_std() {
            Ok(age) => age <= max_age,
            Err(_) => true,
        }
    }
}

/// Why an actor is exempt from punishment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExemptReason {
    /// The actor is this bot.
    Bot,
    Owner,
    Administrator,
    Whitelisted,
}

impl fmt::Display for ExemptReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            ExemptReason::Bot => "bot itself",
            ExemptReason::Owner => "guild owner",
            ExemptReason::Administrator => "administrator",
            ExemptReason::Whitelisted => "whitelisted",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Exempt(ExemptReason),
    Punish,
}

/// Classification of the actor responsible for a watched event.
///
/// Rules are evaluated in order and stop at the first match, so flags belonging to rules
/// after the matching one are left `false` without being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtectedAction {
    pub actor: UserId,
    pub is_self: bool,
    pub is_owner: bool,
    pub is_admin: bool,
    pub is_whitelisted: bool,
    pub verdict: Verdict,
}

/// Result of one remediation step (deleting an entity or banning a user).
#[derive(Debug, Clone, PartialEq)]
pub enum RemediationOutcome {
    Ok,
    /// The bot lacks permission or sits too low in the role hierarchy.
    Forbidden,
    /// The target no longer exists.
    NotFound,
    Failed(String),
}

impl From<Result<(), PlatformError>> for RemediationOutcome {
    fn from(result: Result<(), PlatformError>) -> Self {
        match result {
            Ok(()) => RemediationOutcome::Ok,
            Err(PlatformError::Forbidden) => RemediationOutcome::Forbidden,
            Err(PlatformError::NotFound) => RemediationOutcome::NotFound,
            Err(err) => RemediationOutcome::Failed(err.to_string()),
        }
    }
}

/// How a single correlation run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CorrelationOutcome {
    /// Protection is off for the guild.
    Disabled,
    /// No matching audit log entry was found.
    Unattributed,
    Exempt(ExemptReason),
    /// The actor's authority could not be determined, so nothing was done.
    ClassificationFailed,
    /// The ban against the actor did not go through.
    RemediationFailed(RemediationOutcome),
    /// Discord no longer knows the actor; there is nobody left to ban.
    ActorGone,
    Remediated {
        /// Whether the announcement reached a channel.
        announced: bool,
    },
}

/// A guild text channel considered for announcements.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationChannel {
    pub id: ChannelId,
    pub name: String,
    /// The bot can view the channel and send messages in it.
    pub can_send: bool,
}
