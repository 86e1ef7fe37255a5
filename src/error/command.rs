use thiserror::Error;

use crate::error::platform::PlatformError;

/// Errors reported back to the user who invoked a configuration command.
///
/// None of these mutate protection state; the command handler renders them as an
/// error reply in the channel the command was sent from.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invoker is neither the guild owner nor holds the administrator permission.
    #[error("You need the **Administrator** permission to use this command")]
    MissingPermission,

    /// `antinuke` was given a mode other than `on` or `off`.
    #[error("Use `{prefix}antinuke on` or `{prefix}antinuke off`")]
    InvalidMode {
        /// Command prefix to show in the usage hint
        prefix: String,
    },

    /// A member argument was required but not given.
    #[error("Usage: `{prefix}{command} <member>`")]
    MissingMember {
        /// Command prefix to show in the usage hint
        prefix: String,
        /// Name of the command that was invoked
        command: &'static str,
    },

    /// Member argument is neither a mention nor a user ID.
    #[error("`{0}` is not a valid member mention or ID")]
    InvalidMember(String),

    /// Looking up the invoker's authority failed.
    #[error("Could not verify your permissions, please try again")]
    Platform(#[from] PlatformError),
}
