use serenity::all::UserId;

/// Parses a user ID from a mention (`<@id>` or `<@!id>`) or a bare ID
///
/// # Arguments
/// - `value` - The command argument to parse
///
/// # Returns
/// - `Some(UserId)` - Successfully parsed a non-zero snowflake
/// - `None` - The argument is not a user mention or ID
pub fn parse_user_id(value: &str) -> Option<UserId> {
    let value = value.trim();
    let raw = match value.strip_prefix("<@").and_then(|v| v.strip_suffix('>')) {
        Some(inner) => inner.strip_prefix('!').unwrap_or(inner),
        None => value,
    };

    match raw.parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(id) => Some(UserId::new(id)),
    }
}
