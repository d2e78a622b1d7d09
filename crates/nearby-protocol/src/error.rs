//! Error types for the protocol layer.
//!
//! A `ProtocolError` means the bytes were fine as far as the network is
//! concerned, but they did not have the shape we expected.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization of a request body failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// A response body could not be parsed into the expected type.
    ///
    /// Common causes: the service changed a field name, returned an
    /// HTML error page with a 200, or truncated the body.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A value is structurally valid but breaks a domain rule, such as a
    /// latitude outside [-90, 90].
    #[error("invalid value: {0}")]
    InvalidValue(String),
}
