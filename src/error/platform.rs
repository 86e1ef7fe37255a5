use serenity::http::HttpError;
use thiserror::Error;

/// Failure of a single Discord API call made on behalf of the antinuke engine.
///
/// The variants mirror what the engine needs to distinguish: a call the bot is not
/// allowed to make, a call against something that no longer exists, a call that never
/// answered, and everything else.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    /// Discord rejected the call with 403, usually missing permission or role hierarchy.
    #[error("Missing permission for Discord API call")]
    Forbidden,

    /// Discord answered 404; the channel, role, member or guild is gone.
    #[error("Discord entity not found")]
    NotFound,

    /// The call did not complete within the configured platform timeout.
    #[error("Discord API call timed out")]
    Timeout,

    /// Any other failure, with the rendered source error.
    #[error("Discord API call failed: {0}")]
    Other(String),
}

/// Classifies Serenity errors by the HTTP status Discord answered with.
impl From<serenity::Error> for PlatformError {
    fn from(err: serenity::Error) -> Self {
        if let serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) = &err {
            match response.status_code.as_u16() {
                403 => return PlatformError::Forbidden,
                404 => return PlatformError::NotFound,
                _ => {}
            }
        }

        PlatformError::Other(err.to_string())
    }
}
