//! # nearby
//!
//! Client core for a proximity "likes" mini-app running inside a chat
//! platform's web view.
//!
//! A user registers with the identity blob the host container hands
//! out, submits their location ("heartbeat"), discovers other users
//! within range, likes them, and browses the leaderboard. This crate is
//! the state machine behind those buttons; rendering is up to you.
//!
//! ## Layers
//!
//! ```text
//! dispatch (Action → Outcome)      ← presentation boundary, never fails
//!     ↓
//! NearbyClient operations          ← preconditions, sequencing
//!     ↓                ↓
//! Session          LocationProvider
//!     ↓
//! Codec → Transport                ← one request per call, no retries
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nearby::prelude::*;
//!
//! # async fn demo() -> Result<(), NearbyError> {
//! let here = Coordinate::new(55.75, 37.61)?;
//! let client = NearbyClientBuilder::new()
//!     .base_url("https://likes.example.com")
//!     .build(FixedLocation(here), StaticCredential::new("query_id=..."))?;
//!
//! client.register().await?;
//! client.heartbeat().await?;
//! let snapshot = client.discover_nearby_with_fix().await?;
//! if let Some(first) = snapshot.users.first() {
//!     let liked = client.like(first.id).await?;
//!     println!("{}", liked.message);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod dispatch;
mod error;
mod snapshot;

pub use client::{DEFAULT_LIKE_MESSAGE, NearbyClient, NearbyClientBuilder};
pub use config::ClientConfig;
pub use dispatch::{Action, Outcome, View, dispatch};
pub use error::{ErrorKind, NearbyError};
pub use snapshot::{
    Discovery, HeartbeatReport, Leaderboard, LikeResult, NearbySnapshot,
    RankedEntry,
};

/// Everything needed to build a client and run actions.
pub mod prelude {
    pub use crate::{
        Action, ClientConfig, DEFAULT_LIKE_MESSAGE, Discovery, ErrorKind,
        HeartbeatReport, Leaderboard, LikeResult, NearbyClient,
        NearbyClientBuilder, NearbyError, NearbySnapshot, Outcome, RankedEntry,
        View, dispatch,
    };
    pub use nearby_geo::{
        FixedLocation, LocateOptions, LocationError, LocationProvider,
        NoLocation,
    };
    pub use nearby_protocol::{
        Coordinate, NearbyUser, Profile, UserId, UserProfile,
    };
    pub use nearby_session::{
        CredentialSource, InitData, Session, SessionError, SessionPhase,
        StaticCredential,
    };
    #[cfg(feature = "http")]
    pub use nearby_transport::HttpTransport;
    pub use nearby_transport::{ApiRequest, Method, Transport, TransportError};
}
