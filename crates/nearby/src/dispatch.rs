//! The presentation boundary: run an action, never fail.
//!
//! UI code (buttons, a console loop, a web view bridge) maps user input
//! to an [`Action`] and renders the returned [`Outcome`]. Every error is
//! caught here and turned into a status line, so nothing a user can do
//! propagates out as an `Err` or a panic.

use nearby_geo::LocationProvider;
use nearby_protocol::{Codec, Profile, UserId, UserProfile};
use nearby_session::CredentialSource;
use nearby_transport::Transport;
use serde::Serialize;

use crate::{
    Discovery, HeartbeatReport, Leaderboard, LikeResult, NearbyClient,
    NearbyError, NearbySnapshot,
};

/// Something the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Register,
    Heartbeat,
    Nearby,
    Like(UserId),
    Leaderboard,
    Profile(UserId),
}

/// Data for the renderer, alongside the status line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum View {
    /// Nothing new to draw; the status line says it all.
    None,
    Registered(UserProfile),
    LocationUpdated(HeartbeatReport),
    Nearby(NearbySnapshot),
    /// A like went through. `refreshed` holds the re-queried nearby list
    /// when refresh-after-like is on and the refresh succeeded.
    Liked {
        result: LikeResult,
        refreshed: Option<NearbySnapshot>,
    },
    Leaderboard(Leaderboard),
    Profile(Profile),
}

/// What to show after an action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub status: String,
    pub view: View,
}

impl Outcome {
    fn new(status: impl Into<String>, view: View) -> Self {
        Self {
            status: status.into(),
            view,
        }
    }

    fn failed(prefix: &str, err: &NearbyError) -> Self {
        tracing::warn!(kind = ?err.kind(), error = %err, "{prefix}");
        Self::new(format!("{prefix}: {err}"), View::None)
    }
}

/// Runs `action` against `client`, converting any error into a status line.
pub async fn dispatch<T, L, K, C>(client: &NearbyClient<T, L, K, C>, action: Action) -> Outcome
where
    T: Transport,
    L: LocationProvider,
    K: CredentialSource,
    C: Codec,
{
    match action {
        Action::Register => match client.register().await {
            Ok(profile) => Outcome::new(
                format!("OK, you are {} ({})", profile.id, profile.display_name()),
                View::Registered(profile),
            ),
            Err(e) => Outcome::failed("Registration failed", &e),
        },

        Action::Heartbeat => match client.heartbeat().await {
            Ok(report) => Outcome::new(
                format!("Location updated. Likes: {}", report.likes_received),
                View::LocationUpdated(report),
            ),
            Err(e) => Outcome::failed("Location/heartbeat failed", &e),
        },

        Action::Nearby => match nearby(client).await {
            Ok(Some(snapshot)) => nearby_outcome(snapshot),
            Ok(None) => Outcome::new("Location needed: send a heartbeat first.", View::None),
            Err(e) => Outcome::failed("Nearby failed", &e),
        },

        Action::Like(target) => match client.like(target).await {
            Ok(result) => {
                let refreshed = if client.config().refresh_after_like {
                    refresh_after_like(client).await
                } else {
                    None
                };
                Outcome::new(result.message.clone(), View::Liked { result, refreshed })
            }
            Err(e) => Outcome::failed("Like failed", &e),
        },

        Action::Leaderboard => match client.leaderboard().await {
            Ok(board) if board.is_empty() => {
                Outcome::new("No likes yet.", View::Leaderboard(board))
            }
            Ok(board) => Outcome::new(
                format!("Top {} by likes.", board.entries.len()),
                View::Leaderboard(board),
            ),
            Err(e) => Outcome::failed("Leaderboard failed", &e),
        },

        Action::Profile(target) => match client.profile(target).await {
            Ok(profile) => {
                let status = if profile.is_mutual() {
                    format!("{}: you like each other.", profile.user.display_name())
                } else {
                    profile.user.display_name()
                };
                Outcome::new(status, View::Profile(profile))
            }
            Err(e) => Outcome::failed("Profile failed", &e),
        },
    }
}

/// Discovery honoring `auto_heartbeat`; `None` means a fix is needed
/// and the client isn't allowed to get one on its own.
async fn nearby<T, L, K, C>(
    client: &NearbyClient<T, L, K, C>,
) -> Result<Option<NearbySnapshot>, NearbyError>
where
    T: Transport,
    L: LocationProvider,
    K: CredentialSource,
    C: Codec,
{
    if client.config().auto_heartbeat {
        return client.discover_nearby_with_fix().await.map(Some);
    }
    match client.discover_nearby().await? {
        Discovery::Found(snapshot) => Ok(Some(snapshot)),
        Discovery::NeedsFix => Ok(None),
    }
}

fn nearby_outcome(snapshot: NearbySnapshot) -> Outcome {
    if snapshot.is_empty() {
        Outcome::new("Nobody nearby.", View::Nearby(snapshot))
    } else {
        Outcome::new(
            format!("Found {} nearby.", snapshot.len()),
            View::Nearby(snapshot),
        )
    }
}

/// A failed refresh is logged and dropped: the like itself succeeded.
async fn refresh_after_like<T, L, K, C>(
    client: &NearbyClient<T, L, K, C>,
) -> Option<NearbySnapshot>
where
    T: Transport,
    L: LocationProvider,
    K: CredentialSource,
    C: Codec,
{
    match client.discover_nearby().await {
        Ok(Discovery::Found(snapshot)) => Some(snapshot),
        Ok(Discovery::NeedsFix) => None,
        Err(e) => {
            tracing::warn!(error = %e, "refresh after like failed");
            None
        }
    }
}
