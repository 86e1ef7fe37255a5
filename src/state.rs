//! Shared state handed to every gateway event handler.
//!
//! Created once during startup and cloned into the Serenity event handler. All fields
//! are cheap to clone:
//! - `GuildProtectionRegistry` uses an `Arc` internally, so clones share guild settings
//! - `AntinukeConfig` and the command prefix are small immutable values

use crate::config::{AntinukeConfig, Config};
use crate::service::antinuke::GuildProtectionRegistry;

#[derive(Clone)]
pub struct BotState {
    /// Per-guild antinuke settings, mutated only by configuration commands.
    pub registry: GuildProtectionRegistry,

    /// Audit lookup and timeout tuning for the antinuke engine.
    pub antinuke: AntinukeConfig,

    /// Prefix that marks a message as a command, e.g. `!`.
    pub command_prefix: String,
}

impl BotState {
    /// Creates bot state with an empty registry.
    pub fn new(config: &Config) -> Self {
        Self {
            registry: GuildProtectionRegistry::new(),
            antinuke: config.antinuke.clone(),
            command_prefix: config.command_prefix.clone(),
        }
    }
}
