/// Errors that can occur in the transport layer.
///
/// A failed exchange is always either `Remote` or `Network`, so callers
/// have a single channel to match on.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The service answered, but with a non-success status.
    ///
    /// `body` is the response text exactly as received, kept for
    /// diagnostics and user-visible status lines.
    #[error("remote error {status}: {body}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Response body text, verbatim.
        body: String,
    },

    /// The exchange could not be completed (offline, DNS, refused, reset).
    #[error("network error: {0}")]
    Network(String),

    /// The transport could not be configured (bad base URL or header name).
    #[error("invalid transport configuration: {0}")]
    InvalidConfig(String),
}

impl TransportError {
    /// Returns the HTTP status for [`TransportError::Remote`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            Self::Network(_) | Self::InvalidConfig(_) => None,
        }
    }
}
