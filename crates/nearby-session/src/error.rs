//! Error types for the session layer.

use nearby_protocol::UserId;

/// Errors raised locally, before any request is made.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The host container supplied no identity blob.
    ///
    /// Not recoverable from inside the session: the user has to reopen
    /// the app from the host so it can issue one.
    #[error("no identity credential from the host container; open the app from the bot")]
    MissingCredential,

    /// An operation that needs identity was attempted before registering.
    #[error("not registered yet; register first")]
    NotRegistered,

    /// Register was called on a session that already has a user.
    #[error("already registered as {0}")]
    AlreadyRegistered(UserId),
}
