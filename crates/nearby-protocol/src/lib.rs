//! Wire protocol for the nearby client.
//!
//! This crate defines what the client and the remote service say to
//! each other:
//!
//! - **Types** ([`UserProfile`], [`NearbyUser`], [`Profile`], request
//!   bodies, etc.) — the records that travel as JSON.
//! - **Endpoints** ([`Endpoint`]) — method, path, and whether identity
//!   is required, for each of the six service operations.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how records become
//!   bytes and back.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! ```text
//! Transport (bytes) → Protocol (typed records) → Session / Client
//! ```

mod codec;
mod endpoint;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use endpoint::Endpoint;
pub use error::ProtocolError;
pub use types::{
    Coordinate, HeartbeatAck, HeartbeatRequest, LeaderboardItem, LikeEvent,
    LikeOutcome, LikeRequest, NearbyUser, Profile, RegisterRequest, UserId,
    UserProfile,
};
