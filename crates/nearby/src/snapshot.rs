//! Results of the client operations.
//!
//! Everything here is a snapshot: produced by one call, never updated
//! in place, superseded by the next call of the same kind.

use nearby_protocol::{Coordinate, LeaderboardItem, NearbyUser, UserProfile};
use serde::Serialize;

/// An accepted heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeartbeatReport {
    /// The coordinate that was submitted and is now cached in the session.
    pub coordinate: Coordinate,
    /// Likes received so far, as reported by the service.
    pub likes_received: u64,
}

/// Users within range of a coordinate, closest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbySnapshot {
    /// The coordinate the query was made from.
    pub origin: Coordinate,
    pub users: Vec<NearbyUser>,
}

impl NearbySnapshot {
    /// "Nobody nearby" is a valid answer, not a failure.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }
}

/// Result of a discovery request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Discovery {
    /// No coordinate cached yet. A heartbeat must succeed first; the
    /// caller decides whether to send one or to ask the user.
    NeedsFix,
    /// The service answered.
    Found(NearbySnapshot),
}

/// A like the service accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LikeResult {
    /// Human-readable outcome, never empty.
    pub message: String,
}

/// One leaderboard row with its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    /// 1-based position in the service's ordering.
    pub rank: u32,
    pub user: UserProfile,
    pub likes_received: u64,
}

/// The most-liked users, in the order the service returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Leaderboard {
    pub entries: Vec<RankedEntry>,
}

impl Leaderboard {
    /// Assigns ranks by position. The service sends no rank field.
    pub fn from_items(items: Vec<LeaderboardItem>) -> Self {
        let entries = items
            .into_iter()
            .zip(1u32..)
            .map(|(item, rank)| RankedEntry {
                rank,
                user: item.user,
                likes_received: item.likes_received,
            })
            .collect();
        Self { entries }
    }

    pub fn top(&self) -> Option<&RankedEntry> {
        self.entries.first()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
