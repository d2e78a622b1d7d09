//! The host container's identity assertion.
//!
//! The chat platform hands the mini-app an opaque, signed blob proving
//! who the user is. The client never looks inside it: the service
//! validates the signature, and all we do is forward the string.
//!
//! [`CredentialSource`] is the seam to the host. Production code reads
//! the blob from wherever the container exposes it; tests and the demo
//! binary use [`StaticCredential`].

use std::fmt;

use crate::SessionError;

/// The identity-assertion blob, guaranteed non-empty.
///
/// `Debug` never prints the contents, so the blob can't leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct InitData(String);

impl InitData {
    /// Wraps a raw blob.
    ///
    /// # Errors
    /// Returns [`SessionError::MissingCredential`] if `raw` is empty.
    pub fn new(raw: impl Into<String>) -> Result<Self, SessionError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(SessionError::MissingCredential);
        }
        Ok(Self(raw))
    }

    /// The blob, exactly as the host supplied it.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper, returning the raw blob.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for InitData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InitData(<{} bytes>)", self.0.len())
    }
}

/// Supplies the host container's identity blob.
///
/// # Example
///
/// ```rust
/// use nearby_session::{CredentialSource, InitData, SessionError};
///
/// /// Reads the blob from an environment variable.
/// struct EnvCredential;
///
/// impl CredentialSource for EnvCredential {
///     fn init_data(&self) -> Result<InitData, SessionError> {
///         let raw = std::env::var("NEARBY_INIT_DATA").unwrap_or_default();
///         InitData::new(raw)
///     }
/// }
/// ```
pub trait CredentialSource: Send + Sync + 'static {
    /// Returns the blob, or [`SessionError::MissingCredential`] if the
    /// host didn't provide one.
    fn init_data(&self) -> Result<InitData, SessionError>;
}

/// A credential fixed at construction time.
#[derive(Debug, Clone, Default)]
pub struct StaticCredential(Option<InitData>);

impl StaticCredential {
    /// Holds `raw` as the blob. An empty string means "no credential".
    pub fn new(raw: impl Into<String>) -> Self {
        Self(InitData::new(raw).ok())
    }

    /// A source that never has a credential.
    pub fn missing() -> Self {
        Self(None)
    }
}

impl CredentialSource for StaticCredential {
    fn init_data(&self) -> Result<InitData, SessionError> {
        self.0.clone().ok_or(SessionError::MissingCredential)
    }
}
