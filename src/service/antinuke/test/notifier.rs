use super::*;
use crate::service::antinuke::NotificationDispatcher;

/// Tests delivery goes to the first channel the bot can post in.
///
/// Expected: true, exactly one message in channel 20
#[tokio::test]
async fn announces_in_first_eligible_channel() {
    let platform = FakePlatform::new().with_channels(vec![
        text_channel(10, "rules", false),
        text_channel(20, "general", true),
        text_channel(30, "logs", true),
    ]);

    let delivered = NotificationDispatcher::new(&platform)
        .announce(guild_id(), &Reply::success("Antinuke triggered!"))
        .await;

    assert!(delivered);
    let sent = platform.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, ChannelId::new(20));
}

/// Tests a failing channel is skipped in favour of the next eligible one.
///
/// Expected: true, message delivered to channel 30 only
#[tokio::test]
async fn skips_channel_whose_send_fails() {
    let platform = FakePlatform::new()
        .with_channels(vec![
            text_channel(20, "general", true),
            text_channel(30, "logs", true),
        ])
        .with_failing_channel(20);

    let delivered = NotificationDispatcher::new(&platform)
        .announce(guild_id(), &Reply::success("Antinuke triggered!"))
        .await;

    assert!(delivered);
    let sent = platform.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, ChannelId::new(30));
}

/// Tests nothing is sent when no channel is eligible.
///
/// Expected: false, no messages
#[tokio::test]
async fn reports_false_without_eligible_channel() {
    let platform = FakePlatform::new().with_channels(vec![text_channel(10, "rules", false)]);

    let delivered = NotificationDispatcher::new(&platform)
        .announce(guild_id(), &Reply::success("Antinuke triggered!"))
        .await;

    assert!(!delivered);
    assert_eq!(platform.sent_count(), 0);
}
