//! Announcement of antinuke actions inside the affected guild.

use dioxus_logger::tracing;
use serenity::all::GuildId;

use crate::data::discord::GuildPlatform;
use crate::model::reply::Reply;

pub struct NotificationDispatcher<'a, P: GuildPlatform> {
    platform: &'a P,
}

impl<'a, P: GuildPlatform> NotificationDispatcher<'a, P> {
    pub fn new(platform: &'a P) -> Self {
        Self { platform }
    }

    /// Posts `reply` to the first text channel the bot can write in.
    ///
    /// Channels are tried in display order; a channel whose send fails is skipped and the
    /// next eligible one is tried. Delivery stops at the first success, so at most one
    /// message is posted.
    ///
    /// # Returns
    /// - `true` - The announcement was delivered
    /// - `false` - No eligible channel, channel listing failed, or every send failed
    pub async fn announce(&self, guild_id: GuildId, reply: &Reply) -> bool {
        let channels = match self.platform.text_channels(guild_id).await {
            Ok(channels) => channels,
            Err(e) => {
                tracing::warn!("Failed to list channels of guild {}: {}", guild_id, e);
                return false;
            }
        };

        for channel in channels.iter().filter(|channel| channel.can_send) {
            match self.platform.send_reply(channel.id, reply).await {
                Ok(()) => {
                    tracing::debug!(
                        "Posted antinuke announcement to #{} ({}) in guild {}",
                        channel.name,
                        channel.id,
                        guild_id
                    );
                    return true;
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to post antinuke announcement to #{} ({}) in guild {}: {}",
                        channel.name,
                        channel.id,
                        guild_id,
                        e
                    );
                }
            }
        }

        tracing::warn!(
            "No channel available for antinuke announcement in guild {}",
            guild_id
        );

        false
    }
}
