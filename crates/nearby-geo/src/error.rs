use std::time::Duration;

/// Why a location fix could not be obtained.
///
/// Every variant is a "location unavailable" condition from the
/// client's point of view; the split exists so status lines can say
/// what to do about it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    /// The device or host has no geolocation capability at all.
    #[error("geolocation is not supported")]
    Unsupported,

    /// The user (or host policy) refused access.
    #[error("location access denied: {0}")]
    PermissionDenied(String),

    /// The provider tried and failed.
    #[error("location unavailable: {0}")]
    Unavailable(String),

    /// No fix arrived within the configured timeout.
    #[error("location request timed out after {0:?}")]
    Timeout(Duration),

    /// The provider returned coordinates outside valid ranges.
    #[error("provider returned an invalid fix: {0}")]
    InvalidFix(String),
}
