//! Session state: who the user is and where they last were.
//!
//! A session starts empty when the app opens and dies with it. It holds
//! two facts, each with its own write rule:
//!
//! - the registered user, set once by a successful Register and never
//!   replaced;
//! - the last coordinate, overwritten by every successful Heartbeat.
//!
//! ```text
//!   Anonymous ──(bind_user)──→ Registered ──(record_fix)──→ Located
//!                                                 ↑             │
//!                                                 └─(record_fix)┘
//! ```

use nearby_protocol::{Coordinate, UserId, UserProfile};

use crate::SessionError;

// ---------------------------------------------------------------------------
// SessionPhase
// ---------------------------------------------------------------------------

/// Where a session is in its lifecycle, derived from what it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nobody registered yet. Only Register and Leaderboard are allowed.
    Anonymous,
    /// Registered, but no coordinate submitted yet.
    Registered,
    /// Registered with at least one accepted heartbeat.
    Located,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The client's in-memory session.
///
/// All fields are private so the write rules above can't be bypassed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    user: Option<UserProfile>,
    last_coordinate: Option<Coordinate>,
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the registered user. Succeeds once per session.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyRegistered`] if a user is already
    /// bound; the existing user is kept.
    pub fn bind_user(&mut self, profile: UserProfile) -> Result<UserId, SessionError> {
        if let Some(existing) = &self.user {
            return Err(SessionError::AlreadyRegistered(existing.id));
        }
        let user_id = profile.id;
        self.user = Some(profile);
        tracing::info!(%user_id, "session registered");
        Ok(user_id)
    }

    /// Returns the user id, or fails if nobody has registered.
    ///
    /// # Errors
    /// Returns [`SessionError::NotRegistered`].
    pub fn require_user(&self) -> Result<UserId, SessionError> {
        self.user_id().ok_or(SessionError::NotRegistered)
    }

    /// Records an accepted heartbeat.
    ///
    /// Overwrites the coordinate unconditionally and refreshes the cached
    /// like count on the profile.
    pub fn record_fix(&mut self, coordinate: Coordinate, likes_received: u64) {
        self.last_coordinate = Some(coordinate);
        if let Some(user) = &mut self.user {
            user.likes_received = likes_received;
        }
        tracing::debug!(%coordinate, likes_received, "location recorded");
    }

    /// The registered user's id, if any.
    pub fn user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|u| u.id)
    }

    /// The registered user's profile as last reported by the service.
    pub fn profile(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// The coordinate of the last accepted heartbeat.
    pub fn last_coordinate(&self) -> Option<Coordinate> {
        self.last_coordinate
    }

    /// Identity header value for outgoing requests.
    pub fn identity(&self) -> Option<String> {
        self.user_id().map(UserId::header_value)
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.user, &self.last_coordinate) {
            (None, _) => SessionPhase::Anonymous,
            (Some(_), None) => SessionPhase::Registered,
            (Some(_), Some(_)) => SessionPhase::Located,
        }
    }
}
