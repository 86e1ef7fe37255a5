//! In-memory store of per-guild antinuke settings.
//!
//! This module provides `GuildProtectionRegistry`, the single owner of every guild's
//! `ProtectionState`. Settings live for the lifetime of the process only; a restart
//! resets every guild to disabled with an empty whitelist.

use std::collections::HashMap;
use std::sync::Arc;

use serenity::all::{GuildId, UserId};
use tokio::sync::RwLock;

use crate::model::antinuke::{ProtectionSnapshot, ProtectionState, WhitelistAdd, WhitelistRemove};

/// Shared handle to the per-guild protection settings.
///
/// Cloning is cheap and every clone sees the same state, so the registry is created once
/// at startup and handed to the event handlers and command handlers that need it. Each
/// mutation is a single overwrite or set operation performed under one write lock.
#[derive(Clone, Default)]
pub struct GuildProtectionRegistry {
    guilds: Arc<RwLock<HashMap<GuildId, ProtectionState>>>,
}

impl GuildProtectionRegistry {
    /// Creates an empty registry where every guild is disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns protection on or off for a guild.
    ///
    /// Overwrites any previous value and creates the guild entry if needed.
    pub async fn set_enabled(&self, guild_id: GuildId, enabled: bool) {
        self.guilds
            .write()
            .await
            .entry(guild_id)
            .or_default()
            .enabled = enabled;
    }

    /// Whether protection is on for a guild.
    ///
    /// Unknown guilds are disabled; no entry is created.
    pub async fn is_enabled(&self, guild_id: GuildId) -> bool {
        self.guilds
            .read()
            .await
            .get(&guild_id)
            .is_some_and(|state| state.enabled)
    }

    /// Adds a user to a guild's whitelist.
    ///
    /// # Returns
    /// - `WhitelistAdd { already: false }` - User was added
    /// - `WhitelistAdd { already: true }` - User was already whitelisted, nothing changed
    pub async fn add_to_whitelist(&self, guild_id: GuildId, user_id: UserId) -> WhitelistAdd {
        let mut guilds = self.guilds.write().await;
        let state = guilds.entry(guild_id).or_default();

        if state.whitelist.contains(&user_id) {
            return WhitelistAdd { already: true };
        }

        state.whitelist.push(user_id);
        WhitelistAdd { already: false }
    }

    /// Removes a user from a guild's whitelist.
    ///
    /// # Returns
    /// - `WhitelistRemove { removed: true }` - User was whitelisted and has been removed
    /// - `WhitelistRemove { removed: false }` - Guild unknown or user not whitelisted
    pub async fn remove_from_whitelist(&self, guild_id: GuildId, user_id: UserId) -> WhitelistRemove {
        let mut guilds = self.guilds.write().await;

        let Some(state) = guilds.get_mut(&guild_id) else {
            return WhitelistRemove { removed: false };
        };

        let before = state.whitelist.len();
        state.whitelist.retain(|id| *id != user_id);

        WhitelistRemove {
            removed: state.whitelist.len() != before,
        }
    }

    pub async fn is_whitelisted(&self, guild_id: GuildId, user_id: UserId) -> bool {
        self.guilds
            .read()
            .await
            .get(&guild_id)
            .is_some_and(|state| state.whitelist.contains(&user_id))
    }

    /// Copies a guild's settings for status reporting.
    ///
    /// The whitelist keeps insertion order. Unknown guilds yield a disabled snapshot
    /// with an empty whitelist; no entry is created.
    pub async fn snapshot(&self, guild_id: GuildId) -> ProtectionSnapshot {
        self.guilds
            .read()
            .await
            .get(&guild_id)
            .map(|state| ProtectionSnapshot {
                enabled: state.enabled,
                whitelist: state.whitelist.clone(),
            })
            .unwrap_or_default()
    }

    /// Number of guilds with a stored entry.
    pub async fn guild_count(&self) -> usize {
        self.guilds.read().await.len()
    }
}
