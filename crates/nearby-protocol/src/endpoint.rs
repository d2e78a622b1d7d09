//! The endpoint table of the remote service.

use nearby_transport::{ApiRequest, Method};

use crate::UserId;

/// One of the six operations the service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `POST /api/register`
    Register,
    /// `POST /api/heartbeat`
    Heartbeat,
    /// `GET /api/nearby?lat=..&lon=..`
    Nearby,
    /// `POST /api/like`
    Like,
    /// `GET /api/profile/{id}`
    Profile(UserId),
    /// `GET /api/leaderboard`
    Leaderboard,
}

impl Endpoint {
    pub fn method(self) -> Method {
        match self {
            Self::Register | Self::Heartbeat | Self::Like => Method::Post,
            Self::Nearby | Self::Profile(_) | Self::Leaderboard => Method::Get,
        }
    }

    pub fn path(self) -> String {
        match self {
            Self::Register => "/api/register".to_string(),
            Self::Heartbeat => "/api/heartbeat".to_string(),
            Self::Nearby => "/api/nearby".to_string(),
            Self::Like => "/api/like".to_string(),
            Self::Profile(id) => format!("/api/profile/{}", id.0),
            Self::Leaderboard => "/api/leaderboard".to_string(),
        }
    }

    /// Whether the session must be registered before calling this.
    ///
    /// The leaderboard is public and registration is how identity is
    /// obtained in the first place; everything else is per-user.
    pub fn requires_identity(self) -> bool {
        !matches!(self, Self::Register | Self::Leaderboard)
    }

    /// A bare request for this endpoint, ready for query/body/identity.
    pub fn request(self) -> ApiRequest {
        ApiRequest::new(self.method(), self.path())
    }
}
