//! Attribution of watched events to the user responsible for them.
//!
//! Discord delivers the gateway event before the matching audit log entry is guaranteed
//! to be readable, so a lookup can come back without the entry. The resolver retries a
//! bounded number of times with a growing delay and then gives up; the caller must treat
//! a miss as "cannot attribute" and do nothing rather than guess.

use chrono::Utc;
use dioxus_logger::tracing;
use serenity::all::GuildId;

use crate::config::AntinukeConfig;
use crate::data::discord::GuildPlatform;
use crate::model::antinuke::{ActionKind, AuditEntry, AuditTarget};

pub struct AuditTrailResolver<'a, P: GuildPlatform> {
    platform: &'a P,
    config: &'a AntinukeConfig,
}

impl<'a, P: GuildPlatform> AuditTrailResolver<'a, P> {
    pub fn new(platform: &'a P, config: &'a AntinukeConfig) -> Self {
        Self { platform, config }
    }

    /// Finds the audit log entry recording `kind` against `target`.
    ///
    /// Each attempt inspects the `audit_lookback` most recent entries of the given kind,
    /// newest first, and returns the first one whose target matches and that was recorded
    /// within `audit_max_age`. Older entries record an earlier action against the same
    /// target, such as a kick from before the user rejoined. Failed lookups count as
    /// attempts and are logged.
    ///
    /// # Arguments
    /// - `guild_id` - Guild the event happened in
    /// - `kind` - Audit log action type to filter on
    /// - `target` - Entity the event concerns
    ///
    /// # Returns
    /// - `Some(AuditEntry)` - Matching entry, carrying the responsible actor
    /// - `None` - No matching entry within the retry budget
    pub async fn resolve_actor(
        &self,
        guild_id: GuildId,
        kind: ActionKind,
        target: AuditTarget,
    ) -> Option<AuditEntry> {
        let retry = &self.config.audit_retry;
        let attempts = retry.attempts.max(1);

        for attempt in 1..=attempts {
            match self
                .platform
                .audit_entries(guild_id, kind, self.config.audit_lookback)
                .await
            {
                Ok(entries) => {
                    let now = Utc::now();
                    let (recent, stale): (Vec<_>, Vec<_>) = entries
                        .into_iter()
                        .filter(|entry| entry.concerns(target))
                        .partition(|entry| entry.is_recent(now, self.config.audit_max_age));

                    if let Some(entry) = recent.into_iter().next() {
                        tracing::debug!(
                            "Attributed {} of {} in guild {} to {} on attempt {}",
                            kind,
                            target.raw_id(),
                            guild_id,
                            entry.actor,
                            attempt
                        );
                        return Some(entry);
                    }

                    if let Some(entry) = stale.first() {
                        tracing::debug!(
                            "Skipped stale {} entry for {} in guild {} recorded at {}",
                            kind,
                            target.raw_id(),
                            guild_id,
                            entry.recorded_at
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to read {} audit log for guild {} (attempt {}/{}): {}",
                        kind,
                        guild_id,
                        attempt,
                        attempts,
                        e
                    );
                }
            }

            if attempt < attempts {
                tokio::time::sleep(retry.delay_after(attempt)).await;
            }
        }

        tracing::debug!(
            "No {} audit log entry for {} in guild {} after {} attempts",
            kind,
            target.raw_id(),
            guild_id,
            attempts
        );

        None
    }
}
