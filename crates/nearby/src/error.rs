//! Unified error type for the nearby client.

use nearby_geo::LocationError;
use nearby_protocol::ProtocolError;
use nearby_session::SessionError;
use nearby_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert layer errors
/// automatically. Use [`NearbyError::kind`] to branch on what happened
/// without matching the nested enums.
#[derive(Debug, thiserror::Error)]
pub enum NearbyError {
    /// Rejected locally by the session (credential, registration state).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// No location fix could be obtained.
    #[error(transparent)]
    Location(#[from] LocationError),

    /// The request failed on the way to or at the service.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service answered with something we couldn't read.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Coarse classification of a [`NearbyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No identity blob from the host.
    MissingCredential,
    /// Identity required but nobody registered.
    NotRegistered,
    /// Register called twice in one session.
    AlreadyRegistered,
    /// The location provider failed, refused, or timed out.
    LocationUnavailable,
    /// Non-success status from the service.
    RemoteError,
    /// The request never completed.
    NetworkError,
    /// The response didn't match the expected shape.
    MalformedResponse,
    /// The client was built with an unusable base URL or header name.
    InvalidConfig,
}

impl NearbyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Session(SessionError::MissingCredential) => ErrorKind::MissingCredential,
            Self::Session(SessionError::NotRegistered) => ErrorKind::NotRegistered,
            Self::Session(SessionError::AlreadyRegistered(_)) => ErrorKind::AlreadyRegistered,
            Self::Location(_) => ErrorKind::LocationUnavailable,
            Self::Transport(TransportError::Remote { .. }) => ErrorKind::RemoteError,
            Self::Transport(TransportError::Network(_)) => ErrorKind::NetworkError,
            Self::Transport(TransportError::InvalidConfig(_)) => ErrorKind::InvalidConfig,
            Self::Protocol(_) => ErrorKind::MalformedResponse,
        }
    }

    /// Whether invoking the operation again (possibly after an obvious
    /// user action like registering or granting permission) can succeed.
    ///
    /// A missing credential needs the app reopened from the host, and a
    /// second registration is never accepted in the same session. Client
    /// errors from the service (4xx other than 408/429) won't change on
    /// retry either.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Session(
                SessionError::MissingCredential | SessionError::AlreadyRegistered(_),
            ) => false,
            Self::Session(SessionError::NotRegistered) | Self::Location(_) => true,
            Self::Transport(TransportError::Remote { status, .. }) => {
                !(400..500).contains(status) || matches!(*status, 408 | 429)
            }
            Self::Transport(TransportError::Network(_)) => true,
            Self::Transport(TransportError::InvalidConfig(_)) | Self::Protocol(_) => false,
        }
    }
}
