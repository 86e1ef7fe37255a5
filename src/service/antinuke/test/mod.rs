//! Shared fixtures for antinuke service tests.
//!
//! `FakePlatform` stands in for Discord: tests seed it with guild facts (owner,
//! administrators, channels, audit log batches) and inspect what the engine did afterwards
//! (bans, deletions, posted replies).

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use chrono::{Duration, Utc};
use serenity::all::{ChannelId, GuildId, RoleId, UserId};
use serenity::async_trait;

use crate::config::{AntinukeConfig, AuditRetryPolicy};
use crate::data::discord::GuildPlatform;
use crate::error::platform::PlatformError;
use crate::model::antinuke::{ActionKind, AuditEntry, AuditTarget, NotificationChannel};
use crate::model::reply::Reply;

mod correlator;
mod notifier;

pub const GUILD: u64 = 1000;
pub const BOT: u64 = 1;
pub const OWNER: u64 = 2;
pub const ADMIN: u64 = 3;
pub const MEMBER: u64 = 4;

pub fn guild_id() -> GuildId {
    GuildId::new(GUILD)
}

pub fn user(id: u64) -> UserId {
    UserId::new(id)
}

/// Config that performs a single immediate audit lookup.
pub fn single_lookup_config() -> AntinukeConfig {
    AntinukeConfig {
        audit_retry: AuditRetryPolicy::single(),
        ..AntinukeConfig::default()
    }
}

/// Audit entry recording `kind` by `actor` against `target`.
pub fn entry(actor: u64, kind: ActionKind, target: AuditTarget) -> AuditEntry {
    AuditEntry {
        actor: user(actor),
        target: Some(target.raw_id()),
        action_kind: kind,
        recorded_at: Utc::now(),
    }
}

/// Audit entry like `entry`, recorded `age` ago.
pub fn aged_entry(actor: u64, kind: ActionKind, target: AuditTarget, age: Duration) -> AuditEntry {
    AuditEntry {
        recorded_at: Utc::now() - age,
        ..entry(actor, kind, target)
    }
}

pub fn text_channel(id: u64, name: &str, can_send: bool) -> NotificationChannel {
    NotificationChannel {
        id: ChannelId::new(id),
        name: name.to_string(),
        can_send,
    }
}

#[derive(Default)]
pub struct FakePlatform {
    owner: Option<UserId>,
    /// Guild members and whether each holds the administrator permission.
    members: HashMap<UserId, bool>,
    channels: Vec<NotificationChannel>,
    /// Successive results of audit log lookups; the last one repeats.
    audit_batches: Mutex<VecDeque<Result<Vec<AuditEntry>, PlatformError>>>,
    ban_result: Option<PlatformError>,
    delete_result: Option<PlatformError>,
    failing_channels: Vec<ChannelId>,
    owner_lookup_fails: bool,

    pub audit_calls: Mutex<u32>,
    pub bans: Mutex<Vec<(UserId, String)>>,
    pub deleted_channels: Mutex<Vec<ChannelId>>,
    pub deleted_roles: Mutex<Vec<RoleId>>,
    pub sent: Mutex<Vec<(ChannelId, Reply)>>,
}

impl FakePlatform {
    /// A guild owned by `OWNER` with an administrator `ADMIN`, a plain `MEMBER`, and the
    /// bot, which is an administrator too.
    pub fn new() -> Self {
        let mut members = HashMap::new();
        members.insert(user(BOT), true);
        members.insert(user(OWNER), false);
        members.insert(user(ADMIN), true);
        members.insert(user(MEMBER), false);

        Self {
            owner: Some(user(OWNER)),
            members,
            ..Self::default()
        }
    }

    pub fn with_audit_batch(self, entries: Vec<AuditEntry>) -> Self {
        self.audit_batches.lock().unwrap().push_back(Ok(entries));
        self
    }

    pub fn with_audit_error(self, error: PlatformError) -> Self {
        self.audit_batches.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_channels(mut self, channels: Vec<NotificationChannel>) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_ban_error(mut self, error: PlatformError) -> Self {
        self.ban_result = Some(error);
        self
    }

    pub fn with_delete_error(mut self, error: PlatformError) -> Self {
        self.delete_result = Some(error);
        self
    }

    pub fn with_failing_channel(mut self, channel_id: u64) -> Self {
        self.failing_channels.push(ChannelId::new(channel_id));
        self
    }

    pub fn with_failing_owner_lookup(mut self) -> Self {
        self.owner_lookup_fails = true;
        self
    }

    pub fn without_member(mut self, user_id: u64) -> Self {
        self.members.remove(&user(user_id));
        self
    }

    pub fn banned_users(&self) -> Vec<UserId> {
        self.bans.lock().unwrap().iter().map(|(id, _)| *id).collect()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl GuildPlatform for FakePlatform {
    fn bot_id(&self) -> UserId {
        user(BOT)
    }

    async fn audit_entries(
        &self,
        _guild_id: GuildId,
        _kind: ActionKind,
        limit: u8,
    ) -> Result<Vec<AuditEntry>, PlatformError> {
        *self.audit_calls.lock().unwrap() += 1;

        let mut batches = self.audit_batches.lock().unwrap();
        let batch = if batches.len() > 1 {
            batches.pop_front()
        } else {
            batches.front().cloned()
        };

        match batch {
            Some(Ok(entries)) => Ok(entries.into_iter().take(limit as usize).collect()),
            Some(Err(e)) => Err(e),
            None => Ok(Vec::new()),
        }
    }

    async fn guild_owner(&self, _guild_id: GuildId) -> Result<UserId, PlatformError> {
        if self.owner_lookup_fails {
            return Err(PlatformError::Timeout);
        }
        self.owner.ok_or(PlatformError::NotFound)
    }

    async fn is_administrator(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
    ) -> Result<bool, PlatformError> {
        Ok(self.members.get(&user_id).copied().unwrap_or(false))
    }

    async fn ban(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> Result<(), PlatformError> {
        if let Some(e) = &self.ban_result {
            return Err(e.clone());
        }
        self.bans
            .lock()
            .unwrap()
            .push((user_id, reason.to_string()));
        Ok(())
    }

    async fn delete_channel(&self, channel_id: ChannelId) -> Result<(), PlatformError> {
        if let Some(e) = &self.delete_result {
            return Err(e.clone());
        }
        self.deleted_channels.lock().unwrap().push(channel_id);
        Ok(())
    }

    async fn delete_role(&self, _guild_id: GuildId, role_id: RoleId) -> Result<(), PlatformError> {
        if let Some(e) = &self.delete_result {
            return Err(e.clone());
        }
        self.deleted_roles.lock().unwrap().push(role_id);
        Ok(())
    }

    async fn text_channels(
        &self,
        _guild_id: GuildId,
    ) -> Result<Vec<NotificationChannel>, PlatformError> {
        Ok(self.channels.clone())
    }

    async fn send_reply(&self, channel_id: ChannelId, reply: &Reply) -> Result<(), PlatformError> {
        if self.failing_channels.contains(&channel_id) {
            return Err(PlatformError::Other("send failed".to_string()));
        }
        self.sent.lock().unwrap().push((channel_id, reply.clone()));
        Ok(())
    }
}
