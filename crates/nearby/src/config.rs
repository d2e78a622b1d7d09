//! Client configuration.

use std::time::Duration;

use nearby_geo::LocateOptions;

/// Settings for a [`NearbyClient`](crate::NearbyClient).
///
/// Start from `ClientConfig::default()` and override what you need:
///
/// ```rust
/// use std::time::Duration;
/// use nearby::ClientConfig;
///
/// let config = ClientConfig::default()
///     .base_url("https://likes.example.com")
///     .locate_timeout(Duration::from_secs(10))
///     .auto_heartbeat(false);
/// assert_eq!(config.base_url, "https://likes.example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Root URL of the remote service.
    pub base_url: String,

    /// Header carrying the registered user's id.
    pub identity_header: String,

    /// Options passed to the location provider on every heartbeat.
    pub locate: LocateOptions,

    /// When Nearby is requested without a cached coordinate, send a
    /// heartbeat first instead of asking the user to.
    pub auto_heartbeat: bool,

    /// Re-run discovery after a successful like so the list shows the
    /// updated counts.
    pub refresh_after_like: bool,

    /// Maximum leaderboard rows to request. `None` uses the service
    /// default (50).
    pub leaderboard_limit: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            identity_header: "X-User-Id".to_string(),
            locate: LocateOptions::default(),
            auto_heartbeat: true,
            refresh_after_like: true,
            leaderboard_limit: None,
        }
    }
}

impl ClientConfig {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn identity_header(mut self, header: impl Into<String>) -> Self {
        self.identity_header = header.into();
        self
    }

    pub fn locate(mut self, options: LocateOptions) -> Self {
        self.locate = options;
        self
    }

    /// Shorthand for changing only the location timeout.
    pub fn locate_timeout(mut self, timeout: Duration) -> Self {
        self.locate.timeout = timeout;
        self
    }

    pub fn auto_heartbeat(mut self, enabled: bool) -> Self {
        self.auto_heartbeat = enabled;
        self
    }

    pub fn refresh_after_like(mut self, enabled: bool) -> Self {
        self.refresh_after_like = enabled;
        self
    }

    pub fn leaderboard_limit(mut self, limit: Option<u32>) -> Self {
        self.leaderboard_limit = limit;
        self
    }
}
