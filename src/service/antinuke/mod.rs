//! Antinuke protection engine.
//!
//! Watches privileged guild events (bans, kicks, channel and role creation), finds out
//! from the audit log who performed them, and bans the responsible user when they had no
//! authority to do so. The pieces, leaf-first:
//!
//! - `registry` - Per-guild enabled flag and whitelist, kept in memory
//! - `resolver` - Attributes an event to an actor via the audit log, with bounded retry
//! - `classifier` - Decides whether an actor is exempt (bot, owner, admin, whitelisted)
//! - `notifier` - Posts announcements to the first channel the bot can write in
//! - `correlator` - Drives one event through attribution, classification, remediation
//!   and notification
//!
//! Runs for different events are independent tasks. They only read the registry, which
//! is mutated solely by configuration commands.

pub mod classifier;
pub mod correlator;
pub mod notifier;
pub mod registry;
pub mod resolver;

pub use classifier::AuthorityClassifier;
pub use correlator::EventCorrelator;
pub use notifier::NotificationDispatcher;
pub use registry::GuildProtectionRegistry;
pub use resolver::AuditTrailResolver;

#[cfg(test)]
pub(crate) mod test;
