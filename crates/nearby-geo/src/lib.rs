//! One-shot geolocation for the nearby client.
//!
//! A [`LocationProvider`] is asked for a single fresh fix and answers
//! once, either with a [`Coordinate`] or a [`LocationError`]. There is
//! no watch/subscribe mode: every heartbeat asks again.
//!
//! # Timeouts
//!
//! Providers receive the [`LocateOptions`] and may honor the timeout
//! themselves, but [`locate_fresh`] enforces it regardless with
//! `tokio::time::timeout`. A provider that never answers can't stall a
//! heartbeat past `options.timeout`.
//!
//! ```ignore
//! let fix = nearby_geo::locate_fresh(&provider, &LocateOptions::default()).await?;
//! ```

mod error;

pub use error::LocationError;

use std::future::Future;
use std::time::Duration;

use nearby_protocol::Coordinate;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How hard to try for a fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocateOptions {
    /// Ask for GPS-grade accuracy rather than a network estimate.
    pub high_accuracy: bool,
    /// Oldest cached fix the provider may return. Zero forces a new one.
    pub maximum_age: Duration,
    /// Give up after this long.
    pub timeout: Duration,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            maximum_age: Duration::ZERO,
            timeout: Duration::from_secs(15),
        }
    }
}

impl LocateOptions {
    /// Default options with a different timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Produces a single location fix on request.
pub trait LocationProvider: Send + Sync + 'static {
    /// Resolves to the device's current coordinate.
    ///
    /// # Errors
    /// Any [`LocationError`] except `Timeout`, which [`locate_fresh`]
    /// produces itself.
    fn locate(
        &self,
        options: &LocateOptions,
    ) -> impl Future<Output = Result<Coordinate, LocationError>> + Send;
}

/// Requests a fix, enforcing the timeout and validating the result.
///
/// # Errors
/// - whatever the provider reports
/// - [`LocationError::Timeout`] if it doesn't answer within `options.timeout`
/// - [`LocationError::InvalidFix`] if the coordinate is out of range
pub async fn locate_fresh<P: LocationProvider>(
    provider: &P,
    options: &LocateOptions,
) -> Result<Coordinate, LocationError> {
    tracing::debug!(
        high_accuracy = options.high_accuracy,
        timeout_ms = options.timeout.as_millis() as u64,
        "requesting location fix"
    );

    let coordinate = tokio::time::timeout(options.timeout, provider.locate(options))
        .await
        .map_err(|_| LocationError::Timeout(options.timeout))??;

    coordinate
        .validate()
        .map_err(|e| LocationError::InvalidFix(e.to_string()))?;
    Ok(coordinate)
}

// ---------------------------------------------------------------------------
// Stock providers
// ---------------------------------------------------------------------------

/// Always reports the same coordinate.
///
/// For hosts where the position is known up front (a command-line flag,
/// a kiosk), and for tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocation(pub Coordinate);

impl LocationProvider for FixedLocation {
    async fn locate(
        &self,
        _options: &LocateOptions,
    ) -> Result<Coordinate, LocationError> {
        Ok(self.0)
    }
}

/// A host with no geolocation capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

impl LocationProvider for NoLocation {
    async fn locate(
        &self,
        _options: &LocateOptions,
    ) -> Result<Coordinate, LocationError> {
        Err(LocationError::Unsupported)
    }
}
