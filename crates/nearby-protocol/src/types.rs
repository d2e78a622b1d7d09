//! Core types for the service's wire format.
//!
//! Every record here travels as JSON between the client and the remote
//! service. Field names follow the service exactly (snake_case), so
//! most structs need no renames.
//!
//! Response records are lenient: optional profile fields default to
//! `None` and counters default to zero, because the service omits what it
//! doesn't know. Request records are strict.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// The service's internal identifier for a registered user.
///
/// Not the chat platform's user id: the service assigns this on
/// registration and the client echoes it back in the identity header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl UserId {
    /// The value sent in the identity header: the bare decimal id.
    pub fn header_value(self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Coordinate
// ---------------------------------------------------------------------------

/// A latitude/longitude pair in decimal degrees.
///
/// Deserialization runs the same range checks as [`Coordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    /// Latitude, [-90, 90].
    pub lat: f64,
    /// Longitude, [-180, 180].
    pub lon: f64,
}

impl Coordinate {
    /// Creates a coordinate, rejecting out-of-range or non-finite values.
    pub fn new(lat: f64, lon: f64) -> Result<Self, ProtocolError> {
        let coordinate = Self { lat, lon };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Checks the ranges of an existing coordinate.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(ProtocolError::InvalidValue(format!(
                "latitude {} outside [-90, 90]",
                self.lat
            )));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(ProtocolError::InvalidValue(format!(
                "longitude {} outside [-180, 180]",
                self.lon
            )));
        }
        Ok(())
    }
}

/// Unchecked wire form of [`Coordinate`].
#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = ProtocolError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// `@username`, falling back to `@first_name`, then `@user`.
fn handle(username: Option<&str>, first_name: Option<&str>) -> String {
    let name = username
        .filter(|s| !s.is_empty())
        .or(first_name.filter(|s| !s.is_empty()))
        .unwrap_or("user");
    format!("@{name}")
}

/// A registered user as the service describes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    /// Chat platform id. Present in full responses, absent in minimal ones.
    #[serde(default)]
    pub tg_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub likes_received: u64,
}

impl UserProfile {
    /// Name to show in lists and status lines.
    pub fn display_name(&self) -> String {
        handle(self.username.as_deref(), self.first_name.as_deref())
    }
}

/// Another user within range of the last submitted coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyUser {
    pub id: UserId,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Distance from the query point, in meters.
    pub distance_m: f64,
    #[serde(default)]
    pub likes_received: u64,
}

impl NearbyUser {
    /// Name to show in lists and status lines.
    pub fn display_name(&self) -> String {
        handle(self.username.as_deref(), self.first_name.as_deref())
    }

    /// Avatar reference, if the service supplied a usable one.
    ///
    /// Loading it is the renderer's business; a broken avatar never
    /// becomes a client error.
    pub fn avatar(&self) -> Option<&str> {
        self.photo_url.as_deref().filter(|s| !s.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of `POST /api/register`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    /// The host container's identity blob, forwarded untouched.
    pub init_data: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("init_data", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /api/heartbeat`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeartbeatRequest {
    pub lat: f64,
    pub lon: f64,
}

impl From<Coordinate> for HeartbeatRequest {
    fn from(c: Coordinate) -> Self {
        Self { lat: c.lat, lon: c.lon }
    }
}

/// Body of `POST /api/like`.
///
/// The service checks proximity against its own record of both users'
/// last pings; `lat`/`lon` are the liker's last known fix and are sent
/// only when the session has one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LikeRequest {
    pub target_user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

impl LikeRequest {
    /// Builds a like for `target`, attaching `from` when known.
    pub fn new(target: UserId, from: Option<Coordinate>) -> Self {
        Self {
            target_user_id: target,
            lat: from.map(|c| c.lat),
            lon: from.map(|c| c.lon),
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// The part of the heartbeat response the client uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct HeartbeatAck {
    #[serde(default)]
    pub likes_received: u64,
}

/// Response of `POST /api/like`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct LikeOutcome {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub message: String,
}

/// One row of `GET /api/leaderboard`, in rank order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardItem {
    pub user: UserProfile,
    #[serde(default)]
    pub likes_received: u64,
}

/// A like recorded by the service, as listed in a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikeEvent {
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub lat: f64,
    pub lon: f64,
    /// The service stores naive UTC timestamps; both forms are accepted.
    #[serde(deserialize_with = "utc_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Response of `GET /api/profile/{id}`, relative to the viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user: UserProfile,
    #[serde(default)]
    pub you_liked_them: bool,
    #[serde(default)]
    pub they_liked_you: bool,
    #[serde(default)]
    pub last_location: Option<Coordinate>,
    #[serde(default)]
    pub recent_likes: Vec<LikeEvent>,
}

impl Profile {
    /// Both sides have liked each other.
    pub fn is_mutual(&self) -> bool {
        self.you_liked_them && self.they_liked_you
    }
}

fn utc_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(with_offset.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}
