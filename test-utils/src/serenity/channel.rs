//! Test factory for creating Serenity GuildChannel objects.

use serenity::all::{ChannelType, GuildChannel};

/// Creates a test Serenity GuildChannel of the given kind.
///
/// The channel has no permission overwrites, no topic and no parent category.
///
/// # Arguments
/// - `channel_id` - Discord channel ID (snowflake)
/// - `guild_id` - Guild the channel belongs to
/// - `name` - Channel name
/// - `kind` - Channel type, e.g. `ChannelType::Text` or `ChannelType::News`
/// - `position` - Sorting position in the channel list
///
/// # Returns
/// - `GuildChannel` - A valid Serenity GuildChannel struct for testing
///
/// # Panics
/// - If the JSON cannot be deserialized into a GuildChannel (indicates invalid test data)
pub fn create_test_channel(
    channel_id: u64,
    guild_id: u64,
    name: &str,
    kind: ChannelType,
    position: u16,
) -> GuildChannel {
    serde_json::from_value(serde_json::json!({
        "id": channel_id.to_string(),
        "guild_id": guild_id.to_string(),
        "type": u8::from(kind),
        "name": name,
        "position": position,
        "permission_overwrites": [],
        "nsfw": false,
    }))
    .expect("Failed to create test channel - invalid JSON structure")
}
