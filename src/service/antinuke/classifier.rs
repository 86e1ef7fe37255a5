//! Decides whether the actor behind a watched event may be punished.

use serenity::all::{GuildId, UserId};

use crate::data::discord::GuildPlatform;
use crate::error::platform::PlatformError;
use crate::model::antinuke::{ExemptReason, ProtectedAction, Verdict};
use crate::service::antinuke::registry::GuildProtectionRegistry;

pub struct AuthorityClassifier<'a, P: GuildPlatform> {
    platform: &'a P,
    registry: &'a GuildProtectionRegistry,
}

impl<'a, P: GuildPlatform> AuthorityClassifier<'a, P> {
    pub fn new(platform: &'a P, registry: &'a GuildProtectionRegistry) -> Self {
        Self { platform, registry }
    }

    /// Classifies an actor, first matching rule wins:
    ///
    /// 1. the bot itself
    /// 2. the guild owner
    /// 3. a member holding the administrator permission
    /// 4. a user on the guild's whitelist
    /// 5. anyone else is punished
    ///
    /// A user who is no longer a member of the guild holds no permissions.
    ///
    /// # Returns
    /// - `Ok(ProtectedAction)` - Classification with the verdict
    /// - `Err(PlatformError)` - Owner or permission lookup failed; authority is unknown
    pub async fn classify(
        &self,
        guild_id: GuildId,
        actor: UserId,
    ) -> Result<ProtectedAction, PlatformError> {
        let mut action = ProtectedAction {
            actor,
            is_self: false,
            is_owner: false,
            is_admin: false,
            is_whitelisted: false,
            verdict: Verdict::Punish,
        };

        if actor == self.platform.bot_id() {
            action.is_self = true;
            action.verdict = Verdict::Exempt(ExemptReason::Bot);
            return Ok(action);
        }

        if actor == self.platform.guild_owner(guild_id).await? {
            action.is_owner = true;
            action.verdict = Verdict::Exempt(ExemptReason::Owner);
            return Ok(action);
        }

        if self.platform.is_administrator(guild_id, actor).await? {
            action.is_admin = true;
            action.verdict = Verdict::Exempt(ExemptReason::Administrator);
            return Ok(action);
        }

        if self.registry.is_whitelisted(guild_id, actor).await {
            action.is_whitelisted = true;
            action.verdict = Verdict::Exempt(ExemptReason::Whitelisted);
        }

        Ok(action)
    }

    /// Whether a user may run antinuke configuration commands: owner or administrator.
    pub async fn has_authority(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<bool, PlatformError> {
        if user_id == self.platform.guild_owner(guild_id).await? {
            return Ok(true);
        }

        self.platform.is_administrator(guild_id, user_id).await
    }
}
