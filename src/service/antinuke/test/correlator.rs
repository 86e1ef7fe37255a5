use super::*;
use crate::model::antinuke::{CorrelationOutcome, ExemptReason, RemediationOutcome, WatchedEvent};
use crate::service::antinuke::{EventCorrelator, GuildProtectionRegistry};

const NEW_CHANNEL: u64 = 777;
const NEW_ROLE: u64 = 888;
const VICTIM: u64 = 99;

fn channel_created() -> WatchedEvent {
    WatchedEvent::ChannelCreated {
        guild_id: guild_id(),
        channel_id: ChannelId::new(NEW_CHANNEL),
    }
}

fn role_created() -> WatchedEvent {
    WatchedEvent::RoleCreated {
        guild_id: guild_id(),
        role_id: RoleId::new(NEW_ROLE),
    }
}

fn member_banned() -> WatchedEvent {
    WatchedEvent::MemberBanned {
        guild_id: guild_id(),
        user_id: user(VICTIM),
    }
}

fn member_kicked() -> WatchedEvent {
    WatchedEvent::MemberKicked {
        guild_id: guild_id(),
        user_id: user(VICTIM),
    }
}

/// Platform whose audit log attributes `event` to `actor`, with one postable channel.
fn platform_for(event: &WatchedEvent, actor: u64) -> FakePlatform {
    FakePlatform::new()
        .with_audit_batch(vec![entry(actor, event.kind(), event.target())])
        .with_channels(vec![
            text_channel(10, "rules", false),
            text_channel(20, "general", true),
        ])
}

async fn enabled_registry() -> GuildProtectionRegistry {
    let registry = GuildProtectionRegistry::new();
    registry.set_enabled(guild_id(), true).await;
    registry
}

fn assert_untouched(platform: &FakePlatform) {
    assert!(platform.bans.lock().unwrap().is_empty());
    assert!(platform.deleted_channels.lock().unwrap().is_empty());
    assert!(platform.deleted_roles.lock().unwrap().is_empty());
    assert_eq!(platform.sent_count(), 0);
}

/// Tests a guild that never configured protection is left alone.
///
/// Expected: Disabled, no audit lookup, no remediation
#[tokio::test]
async fn unconfigured_guild_is_ignored() {
    let event = channel_created();
    let platform = platform_for(&event, MEMBER);
    let registry = GuildProtectionRegistry::new();
    let config = single_lookup_config();

    let outcome = EventCorrelator::new(&platform, &registry, &config)
        .handle(event)
        .await;

    assert_eq!(outcome, CorrelationOutcome::Disabled);
    assert_eq!(*platform.audit_calls.lock().unwrap(), 0);
    assert_untouched(&platform);
}

/// Tests a guild that turned protection off is left alone.
///
/// Expected: Disabled, no remediation
#[tokio::test]
async fn disabled_guild_is_ignored() {
    let event = role_created();
    let platform = platform_for(&event, MEMBER);
    let registry = GuildProtectionRegistry::new();
    registry.set_enabled(guild_id(), true).await;
    registry.set_enabled(guild_id(), false).await;
    let config = single_lookup_config();

    let outcome = EventCorrelator::new(&platform, &registry, &config)
        .handle(event)
        .await;

    assert_eq!(outcome, CorrelationOutcome::Disabled);
    assert_untouched(&platform);
}

/// Tests a role created by the guild owner is kept.
///
/// Expected: Exempt(Owner), role not deleted, owner not banned
#[tokio::test]
async fn owner_role_creation_is_allowed() {
    let event = role_created();
    let platform = platform_for(&event, OWNER);
    let registry = enabled_registry().await;
    let config = single_lookup_config();

    let outcome = EventCorrelator::new(&platform, &registry, &config)
        .handle(event)
        .await;

    assert_eq!(outcome, CorrelationOutcome::Exempt(ExemptReason::Owner));
    assert_untouched(&platform);
}

/// Tests a channel created by an administrator is kept.
///
/// Expected: Exempt(Administrator), no remediation
#[tokio::test]
async fn admin_channel_creation_is_allowed() {
    let event = channel_created();
    let platform = platform_for(&event, ADMIN);
    let registry = enabled_registry().await;
    let config = single_lookup_config();

    let outcome = EventCorrelator::new(&platform, &registry, &config)
        .handle(event)
        .await;

    assert_eq!(
        outcome,
        CorrelationOutcome::Exempt(ExemptReason::Administrator)
    );
    assert_untouched(&platform);
}

/// Tests an unauthorized channel creation is reverted and punished.
///
/// Expected: channel deleted, creator banned for channel creation, one announcement in
/// the first eligible channel
#[tokio::test]
async fn unauthorized_channel_creation_is_remediated() {
    let event = channel_created();
    let platform = platform_for(&event, MEMBER);
    let registry = enabled_registry().await;
    let config = single_lookup_config();

    let outcome = EventCorrelator::new(&platform, &registry, &config)
        .handle(event)
        .await;

    assert_eq!(outcome, CorrelationOutcome::Remediated { announced: true });
    assert_eq!(
        *platform.deleted_channels.lock().unwrap(),
        vec![ChannelId::new(NEW_CHANNEL)]
    );
    assert_eq!(
        *platform.bans.lock().unwrap(),
        vec![(
            user(MEMBER),
            "Antinuke: Unauthorized channel creation".to_string()
        )]
    );

    let sent = platform.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, ChannelId::new(20));
    assert!(sent[0].1.description.contains("<@4>"));
    assert!(sent[0]
        .1
        .description
        .contains("Unauthorized channel creation"));
}

/// Tests an unauthorized role creation is reverted and punished.
///
/// Expected: role deleted, creator banned for role creation
#[tokio::test]
async fn unauthorized_role_creation_is_remediated() {
    let event = role_created();
    let platform = platform_for(&event, MEMBER);
    let registry = enabled_registry().await;
    let config = single_lookup_config();

    let outcome = EventCorrelator::new(&platform, &registry, &config)
        .handle(event)
        .await;

    assert_eq!(outcome, CorrelationOutcome::Remediated { announced: true });
    assert_eq!(
        *platform.deleted_roles.lock().unwrap(),
        vec![RoleId::new(NEW_ROLE)]
    );
    assert_eq!(
        *platform.bans.lock().unwrap(),
        vec![(user(MEMBER), "Antinuke: Unauthorized role creation".to_string())]
    );
}

/// Tests an unauthorized ban punishes the moderator, not the victim.
///
/// Expected: moderator banned with the ban reason, victim untouched
#[tokio::test]
async fn unauthorized_ban_bans_the_moderator() {
    let event = member_banned();
    let platform = platform_for(&event, MEMBER);
    let registry = enabled_registry().await;
    let config = single_lookup_config();

    let outcome = EventCorrelator::new(&platform, &registry, &config)
        .handle(event)
        .await;

    assert_eq!(outcome, CorrelationOutcome::Remediated { announced: true });
    assert_eq!(
        *platform.bans.lock().unwrap(),
        vec![(user(MEMBER), "Antinuke: Unauthorized ban".to_string())]
    );
}

/// Tests an unauthorized kick bans the moderator.
///
/// Expected: moderator banned with the kick reason
#[tokio::test]
async fn unauthorized_kick_bans_the_moderator() {
    let event = member_kicked();
    let platform = platform_for(&event, MEMBER);
    let registry = enabled_registry().await;
    let config = single_lookup_config();

    let outcome = EventCorrelator::new(&platform, &registry, &config)
        .handle(event)
        .await;

    assert_eq!(outcome, CorrelationOutcome::Remediated { announced: true });
    assert_eq!(platform.banned_users(), vec![user(MEMBER)]);
    assert_eq!(
        platform.bans.lock().unwrap()[0].1,
        "Antinuke: Unauthorized kick"
    );
}

/// Tests the bot's own bans do not re-enter remediation.
///
/// Expected: Exempt(Bot), nobody banned
#[tokio::test]
async fn bot_actions_are_never_punished() {
    let event = member_banned();
    let platform = platform_for(&event, BOT);
    let registry = enabled_registry().await;
    let config = single_lookup_config();

    let outcome = EventCorrelator::new(&platform, &registry, &config)
        .handle(event)
        .await;

    assert_eq!(outcome, CorrelationOutcome::Exempt(ExemptReason::Bot));
    assert_untouched(&platform);
}

/// Tests a whitelisted member is not punished.
///
/// Expected: Exempt(Whitelisted), channel kept
#[tokio::test]
async fn whitelisted_member_is_not_punished() {
    let event = channel_created();
    let platform = platform_for(&event, MEMBER);
    let registry = enabled_registry().await;
    registry.add_to_whitelist(guild_id(), user(MEMBER)).await;
    let config = single_lookup_config();

    let outcome = EventCorrelator::new(&platform, &registry, &config)
        .handle(event)
        .await;

    assert_eq!(outcome, CorrelationOutcome::Exempt(ExemptReason::Whitelisted));
    assert_untouched(&platform);
}

/// Tests a missing audit log entry stops the run.
///
/// Expected: Unattributed, no remediation and no announcement
#[tokio::test]
async fn missing_audit_entry_aborts() {
    let event = channel_created();
    let platform = FakePlatform::new()
        .with_audit_batch(Vec::new())
        .with_channels(vec![text_channel(20, "general", true)]);
    let registry = enabled_registry().await;
    let config = single_lookup_config();

    let outcome = EventCorrelator::new(&platform, &registry, &config)
        .handle(event)
        .await;

    assert_eq!(outcome, CorrelationOutcome::Unattributed);
    assert_untouched(&platform);
}

/// Tests a member leaving on their own is not blamed on an old kick.
///
/// Expected: Unattributed, the moderator from the earlier kick is not banned
#[tokio::test]
async fn old_kick_entry_is_not_attributed() {
    let event = member_kicked();
    let platform = FakePlatform::new()
        .with_audit_batch(vec![aged_entry(
            MEMBER,
            ActionKind::Kick,
            event.target(),
            chrono::Duration::days(90),
        )])
        .with_channels(vec![text_channel(20, "general", true)]);
    let registry = enabled_registry().await;
    let config = single_lookup_config();

    let outcome = EventCorrelator::new(&platform, &registry, &config)
        .handle(event)
        .await;

    assert_eq!(outcome, CorrelationOutcome::Unattributed);
    assert_untouched(&platform);
}

/// Tests remediation stands when nothing can be announced.
///
/// Expected: channel deleted and creator banned, announced=false
#[tokio::test]
async fn remediation_completes_without_notification_channel() {
    let event = channel_created();
    let platform = FakePlatform::new()
        .with_audit_batch(vec![entry(MEMBER, event.kind(), event.target())])
        .with_channels(vec![text_channel(10, "rules", false)]);
    let registry = enabled_registry().await;
    let config = single_lookup_config();

    let outcome = EventCorrelator::new(&platform, &registry, &config)
        .handle(event)
        .await;

    assert_eq!(outcome, CorrelationOutcome::Remediated { announced: false });
    assert_eq!(platform.deleted_channels.lock().unwrap().len(), 1);
    assert_eq!(platform.banned_users(), vec![user(MEMBER)]);
    assert_eq!(platform.sent_count(), 0);
}

/// Tests a forbidden ban is suppressed without an announcement.
///
/// Expected: RemediationFailed(Forbidden), no message
#[tokio::test]
async fn forbidden_ban_is_suppressed() {
    let event = member_banned();
    let platform = platform_for(&event, MEMBER).with_ban_error(PlatformError::Forbidden);
    let registry = enabled_registry().await;
    let config = single_lookup_config();

    let outcome = EventCorrelator::new(&platform, &registry, &config)
        .handle(event)
        .await;

    assert_eq!(
        outcome,
        CorrelationOutcome::RemediationFailed(RemediationOutcome::Forbidden)
    );
    assert_eq!(platform.sent_count(), 0);
}

/// Tests an actor Discord no longer knows ends the run quietly.
///
/// Expected: ActorGone, no message
#[tokio::test]
async fn unknown_actor_ends_quietly() {
    let event = member_kicked();
    let platform = platform_for(&event, MEMBER).with_ban_error(PlatformError::NotFound);
    let registry = enabled_registry().await;
    let config = single_lookup_config();

    let outcome = EventCorrelator::new(&platform, &registry, &config)
        .handle(event)
        .await;

    assert_eq!(outcome, CorrelationOutcome::ActorGone);
    assert_eq!(platform.sent_count(), 0);
}

/// Tests a channel that is already gone does not stop the ban.
///
/// Expected: creator banned and announcement says the channel was deleted
#[tokio::test]
async fn already_deleted_channel_still_bans() {
    let event = channel_created();
    let platform = platform_for(&event, MEMBER).with_delete_error(PlatformError::NotFound);
    let registry = enabled_registry().await;
    let config = single_lookup_config();

    let outcome = EventCorrelator::new(&platform, &registry, &config)
        .handle(event)
        .await;

    assert_eq!(outcome, CorrelationOutcome::Remediated { announced: true });
    assert_eq!(platform.banned_users(), vec![user(MEMBER)]);
    let sent = platform.sent.lock().unwrap();
    assert_eq!(
        sent[0].1.fields[0].value,
        "Deleted the new channel and banned its creator"
    );
}

/// Tests a forbidden delete still bans and the announcement says so.
///
/// Expected: creator banned, announcement mentions the undeleted role
#[tokio::test]
async fn forbidden_delete_still_bans() {
    let event = role_created();
    let platform = platform_for(&event, MEMBER).with_delete_error(PlatformError::Forbidden);
    let registry = enabled_registry().await;
    let config = single_lookup_config();

    let outcome = EventCorrelator::new(&platform, &registry, &config)
        .handle(event)
        .await;

    assert_eq!(outcome, CorrelationOutcome::Remediated { announced: true });
    assert_eq!(platform.banned_users(), vec![user(MEMBER)]);
    let sent = platform.sent.lock().unwrap();
    assert!(sent[0].1.fields[0].value.contains("could not be deleted"));
}

/// Tests unknown authority means no punishment.
///
/// Expected: ClassificationFailed, no remediation
#[tokio::test]
async fn classification_failure_aborts() {
    let event = channel_created();
    let platform = platform_for(&event, MEMBER).with_failing_owner_lookup();
    let registry = enabled_registry().await;
    let config = single_lookup_config();

    let outcome = EventCorrelator::new(&platform, &registry, &config)
        .handle(event)
        .await;

    assert_eq!(outcome, CorrelationOutcome::ClassificationFailed);
    assert_untouched(&platform);
}
