//! Event correlation and response.
//!
//! `EventCorrelator` drives one watched event through a fixed sequence of stages:
//!
//! ```text
//! Idle -> Attributing -> Classifying -> Remediating -> Notifying -> Idle
//! ```
//!
//! Any stage may end the run early: protection disabled, no audit log entry, an exempt
//! actor, unknown authority, or a ban that did not go through. The run never returns an
//! error because it executes inside the gateway dispatch of a single guild; every failure
//! is logged and folded into the returned `CorrelationOutcome`.

use dioxus_logger::tracing;
use serenity::all::UserId;

use crate::config::AntinukeConfig;
use crate::data::discord::GuildPlatform;
use crate::model::antinuke::{
    AuditEntry, CorrelationOutcome, ProtectedAction, RemediationOutcome, Verdict, WatchedEvent,
};
use crate::model::reply::Reply;
use crate::service::antinuke::{
    classifier::AuthorityClassifier, notifier::NotificationDispatcher,
    registry::GuildProtectionRegistry, resolver::AuditTrailResolver,
};

/// Progress of a single correlation run.
enum Stage {
    Attributing,
    Classifying(AuditEntry),
    Remediating(ProtectedAction),
    Notifying {
        actor: UserId,
        /// Outcome of deleting the created channel or role, if the event created one.
        reverted: Option<RemediationOutcome>,
    },
    Done(CorrelationOutcome),
}

pub struct EventCorrelator<'a, P: GuildPlatform> {
    platform: &'a P,
    registry: &'a GuildProtectionRegistry,
    config: &'a AntinukeConfig,
}

impl<'a, P: GuildPlatform> EventCorrelator<'a, P> {
    pub fn new(
        platform: &'a P,
        registry: &'a GuildProtectionRegistry,
        config: &'a AntinukeConfig,
    ) -> Self {
        Self {
            platform,
            registry,
            config,
        }
    }

    /// Reacts to a watched event.
    ///
    /// For ban and kick events the moderator who issued them is banned. For channel and
    /// role creation the new entity is deleted first and its creator banned afterwards.
    /// An announcement is posted only when the ban succeeded.
    pub async fn handle(&self, event: WatchedEvent) -> CorrelationOutcome {
        let guild_id = event.guild_id();

        if !self.registry.is_enabled(guild_id).await {
            return CorrelationOutcome::Disabled;
        }

        let mut stage = Stage::Attributing;
        loop {
            stage = match stage {
                Stage::Attributing => self.attribute(&event).await,
                Stage::Classifying(entry) => self.classify(&event, entry).await,
                Stage::Remediating(action) => self.remediate(&event, action.actor).await,
                Stage::Notifying { actor, reverted } => {
                    self.notify(&event, actor, reverted).await
                }
                Stage::Done(outcome) => return outcome,
            };
        }
    }

    async fn attribute(&self, event: &WatchedEvent) -> Stage {
        let resolver = AuditTrailResolver::new(self.platform, self.config);

        match resolver
            .resolve_actor(event.guild_id(), event.kind(), event.target())
            .await
        {
            Some(entry) => Stage::Classifying(entry),
            None => Stage::Done(CorrelationOutcome::Unattributed),
        }
    }

    async fn classify(&self, event: &WatchedEvent, entry: AuditEntry) -> Stage {
        let guild_id = event.guild_id();
        let classifier = AuthorityClassifier::new(self.platform, self.registry);

        let action = match classifier.classify(guild_id, entry.actor).await {
            Ok(action) => action,
            Err(e) => {
                tracing::warn!(
                    "Could not determine authority of {} for {} in guild {}: {}",
                    entry.actor,
                    event.kind(),
                    guild_id,
                    e
                );
                return Stage::Done(CorrelationOutcome::ClassificationFailed);
            }
        };

        match action.verdict {
            Verdict::Exempt(reason) => {
                tracing::debug!(
                    "Ignoring {} by {} in guild {}: {}",
                    event.kind(),
                    action.actor,
                    guild_id,
                    reason
                );
                Stage::Done(CorrelationOutcome::Exempt(reason))
            }
            Verdict::Punish => Stage::Remediating(action),
        }
    }

    async fn remediate(&self, event: &WatchedEvent, actor: UserId) -> Stage {
        let guild_id = event.guild_id();
        let kind = event.kind();

        let reverted = match *event {
            WatchedEvent::MemberBanned { .. } | WatchedEvent::MemberKicked { .. } => None,
            WatchedEvent::ChannelCreated { channel_id, .. } => {
                Some(RemediationOutcome::from(
                    self.platform.delete_channel(channel_id).await,
                ))
            }
            WatchedEvent::RoleCreated { guild_id, role_id } => Some(RemediationOutcome::from(
                self.platform.delete_role(guild_id, role_id).await,
            )),
        };

        // A failed delete does not stop the ban; the actor still has to go
        match &reverted {
            None | Some(RemediationOutcome::Ok) => {}
            Some(RemediationOutcome::NotFound) => {
                tracing::debug!(
                    "Entity {} from {} in guild {} was already removed",
                    event.target().raw_id(),
                    kind,
                    guild_id
                );
            }
            Some(RemediationOutcome::Forbidden) => {
                tracing::warn!(
                    "Missing permission to delete {} created in guild {}",
                    event.target().raw_id(),
                    guild_id
                );
            }
            Some(RemediationOutcome::Failed(reason)) => {
                tracing::warn!(
                    "Failed to delete {} created in guild {}: {}",
                    event.target().raw_id(),
                    guild_id,
                    reason
                );
            }
        }

        let banned = RemediationOutcome::from(
            self.platform.ban(guild_id, actor, kind.ban_reason()).await,
        );

        match banned {
            RemediationOutcome::Ok => {
                tracing::info!(
                    "Antinuke banned {} in guild {} for {}",
                    actor,
                    guild_id,
                    kind
                );
                Stage::Notifying { actor, reverted }
            }
            RemediationOutcome::NotFound => {
                tracing::debug!(
                    "User {} is unknown to Discord, nothing to ban in guild {}",
                    actor,
                    guild_id
                );
                Stage::Done(CorrelationOutcome::ActorGone)
            }
            RemediationOutcome::Forbidden => {
                tracing::warn!(
                    "Missing permission to ban {} in guild {} after {}; check the bot's role position",
                    actor,
                    guild_id,
                    kind
                );
                Stage::Done(CorrelationOutcome::RemediationFailed(banned))
            }
            RemediationOutcome::Failed(ref reason) => {
                tracing::warn!(
                    "Failed to ban {} in guild {} after {}: {}",
                    actor,
                    guild_id,
                    kind,
                    reason
                );
                Stage::Done(CorrelationOutcome::RemediationFailed(banned))
            }
        }
    }

    async fn notify(
        &self,
        event: &WatchedEvent,
        actor: UserId,
        reverted: Option<RemediationOutcome>,
    ) -> Stage {
        let reply = announcement(event, actor, reverted.as_ref());
        let announced = NotificationDispatcher::new(self.platform)
            .announce(event.guild_id(), &reply)
            .await;

        Stage::Done(CorrelationOutcome::Remediated { announced })
    }
}

/// Builds the announcement for a completed remediation.
pub fn announcement(
    event: &WatchedEvent,
    actor: UserId,
    reverted: Option<&RemediationOutcome>,
) -> Reply {
    let removed = matches!(
        reverted,
        Some(RemediationOutcome::Ok) | Some(RemediationOutcome::NotFound)
    );

    let action_taken = match event {
        WatchedEvent::MemberBanned { .. } => "Banned the moderator who issued the ban".to_string(),
        WatchedEvent::MemberKicked { .. } => {
            "Banned the moderator who issued the kick".to_string()
        }
        WatchedEvent::ChannelCreated { .. } if removed => {
            "Deleted the new channel and banned its creator".to_string()
        }
        WatchedEvent::RoleCreated { .. } if removed => {
            "Deleted the new role and banned its creator".to_string()
        }
        WatchedEvent::ChannelCreated { channel_id, .. } => format!(
            "Banned the creator; channel <#{}> could not be deleted",
            channel_id
        ),
        WatchedEvent::RoleCreated { role_id, .. } => format!(
            "Banned the creator; role <@&{}> could not be deleted",
            role_id
        ),
    };

    Reply::success(format!(
        "Antinuke triggered!\n\n**Banned:** <@{}>\n**Reason:** {}",
        actor,
        event.kind().description()
    ))
    .field("Action taken", action_taken, false)
}
