//! Antinuke configuration commands.
//!
//! | Command | Effect |
//! |---|---|
//! | `antinuke` | Show whether protection is on |
//! | `antinuke on` / `antinuke off` | Turn protection on or off |
//! | `whitelist <member>` | Exempt a member from punishment |
//! | `unwhitelist <member>` | Remove the exemption |
//! | `antinukestatus` | Show protection state and whitelisted members |
//!
//! Every command requires the invoker to be the guild owner or an administrator; anyone
//! else gets an error reply and the registry is not touched.

use dioxus_logger::tracing;
use serenity::all::{GuildId, UserId};

use crate::data::discord::GuildPlatform;
use crate::error::command::CommandError;
use crate::model::reply::Reply;
use crate::service::antinuke::{AuthorityClassifier, GuildProtectionRegistry};
use crate::util::parse::parse_user_id;

/// Discord caps embed field values at 1024 characters.
const FIELD_VALUE_LIMIT: usize = 1024;

/// A parsed antinuke configuration command.
#[derive(Debug, Clone, PartialEq)]
pub enum AntinukeCommand {
    Toggle { mode: Option<String> },
    Whitelist { member: Option<String> },
    Unwhitelist { member: Option<String> },
    Status,
}

impl AntinukeCommand {
    /// Parses a message into a command.
    ///
    /// # Arguments
    /// - `prefix` - Command prefix, e.g. `!`
    /// - `content` - Raw message content
    ///
    /// # Returns
    /// - `Some(AntinukeCommand)` - The message invokes one of the antinuke commands
    /// - `None` - Not a command, or a command handled elsewhere
    pub fn parse(prefix: &str, content: &str) -> Option<Self> {
        let rest = content.trim().strip_prefix(prefix)?;
        let mut parts = rest.split_whitespace();
        let name = parts.next()?.to_lowercase();
        let argument = parts.next().map(str::to_string);

        match name.as_str() {
            "antinuke" => Some(Self::Toggle { mode: argument }),
            "whitelist" => Some(Self::Whitelist { member: argument }),
            "unwhitelist" => Some(Self::Unwhitelist { member: argument }),
            "antinukestatus" => Some(Self::Status),
            _ => None,
        }
    }
}

pub struct AntinukeController<'a, P: GuildPlatform> {
    platform: &'a P,
    registry: &'a GuildProtectionRegistry,
    prefix: &'a str,
}

impl<'a, P: GuildPlatform> AntinukeController<'a, P> {
    pub fn new(platform: &'a P, registry: &'a GuildProtectionRegistry, prefix: &'a str) -> Self {
        Self {
            platform,
            registry,
            prefix,
        }
    }

    /// Runs a command on behalf of `invoker` and returns the reply to send.
    pub async fn execute(
        &self,
        guild_id: GuildId,
        invoker: UserId,
        command: AntinukeCommand,
    ) -> Reply {
        match self.try_execute(guild_id, invoker, command).await {
            Ok(reply) => reply,
            Err(e) => {
                if let CommandError::Platform(ref source) = e {
                    tracing::warn!(
                        "Failed to check command authority of {} in guild {}: {}",
                        invoker,
                        guild_id,
                        source
                    );
                }
                Reply::error(e.to_string())
            }
        }
    }

    async fn try_execute(
        &self,
        guild_id: GuildId,
        invoker: UserId,
        command: AntinukeCommand,
    ) -> Result<Reply, CommandError> {
        let classifier = AuthorityClassifier::new(self.platform, self.registry);
        if !classifier.has_authority(guild_id, invoker).await? {
            tracing::debug!(
                "Rejected antinuke command from {} in guild {}",
                invoker,
                guild_id
            );
            return Err(CommandError::MissingPermission);
        }

        match command {
            AntinukeCommand::Toggle { mode: None } => {
                let status = status_label(self.registry.is_enabled(guild_id).await);
                Ok(Reply::new(
                    "Antinuke Status",
                    format!("Antinuke is currently **{}**", status),
                ))
            }
            AntinukeCommand::Toggle { mode: Some(mode) } => {
                match mode.to_lowercase().as_str() {
                    "on" => {
                        self.registry.set_enabled(guild_id, true).await;
                        tracing::info!("Antinuke enabled in guild {} by {}", guild_id, invoker);
                        Ok(Reply::success("Antinuke protection is now **ENABLED**"))
                    }
                    "off" => {
                        self.registry.set_enabled(guild_id, false).await;
                        tracing::info!("Antinuke disabled in guild {} by {}", guild_id, invoker);
                        Ok(Reply::new(
                            "Antinuke Status",
                            "Antinuke protection is now **DISABLED**",
                        ))
                    }
                    _ => Err(CommandError::InvalidMode {
                        prefix: self.prefix.to_string(),
                    }),
                }
            }
            AntinukeCommand::Whitelist { member } => {
                let user_id = self.member_argument(member, "whitelist")?;

                if self.registry.add_to_whitelist(guild_id, user_id).await.already {
                    return Ok(Reply::new(
                        "Whitelist",
                        format!("<@{}> is already whitelisted", user_id),
                    ));
                }

                tracing::info!("Whitelisted {} in guild {}", user_id, guild_id);
                Ok(Reply::success(format!(
                    "<@{}> is now whitelisted from antinuke",
                    user_id
                )))
            }
            AntinukeCommand::Unwhitelist { member } => {
                let user_id = self.member_argument(member, "unwhitelist")?;

                if !self
                    .registry
                    .remove_from_whitelist(guild_id, user_id)
                    .await
                    .removed
                {
                    return Ok(Reply::error(format!("<@{}> is not in whitelist", user_id)));
                }

                tracing::info!("Removed {} from whitelist in guild {}", user_id, guild_id);
                Ok(Reply::success(format!(
                    "<@{}> is removed from whitelist",
                    user_id
                )))
            }
            AntinukeCommand::Status => {
                let snapshot = self.registry.snapshot(guild_id).await;
                let mentions: Vec<String> = snapshot
                    .whitelist
                    .iter()
                    .map(|id| format!("<@{}>", id))
                    .collect();

                Ok(Reply::new(
                    "Antinuke Settings",
                    format!("Status: **{}**", status_label(snapshot.enabled)),
                )
                .field("Whitelisted Users", join_limited(&mentions), false))
            }
        }
    }

    fn member_argument(
        &self,
        member: Option<String>,
        command: &'static str,
    ) -> Result<UserId, CommandError> {
        let Some(member) = member else {
            return Err(CommandError::MissingMember {
                prefix: self.prefix.to_string(),
                command,
            });
        };

        parse_user_id(&member).ok_or(CommandError::InvalidMember(member))
    }
}

fn status_label(enabled: bool) -> &'static str {
    if enabled {
        "ENABLED"
    } else {
        "DISABLED"
    }
}

/// Joins values with `, `, stopping before the embed field limit is exceeded.
fn join_limited(values: &[String]) -> String {
    if values.is_empty() {
        return "None".to_string();
    }

    let mut joined = String::new();
    for (index, value) in values.iter().enumerate() {
        let remaining = values.len() - index;
        let suffix = format!(" and {} more", remaining);
        let separator = if joined.is_empty() { "" } else { ", " };

        if joined.len() + separator.len() + value.len() + suffix.len() > FIELD_VALUE_LIMIT {
            joined.push_str(&suffix);
            return joined;
        }

        joined.push_str(separator);
        joined.push_str(value);
    }

    joined
}
