//! Session state for the nearby client.
//!
//! This crate holds what the client knows about the current user:
//!
//! 1. **Credentials** — the host container's opaque identity blob
//!    ([`InitData`], [`CredentialSource`])
//! 2. **Session** — the registered user and their last coordinate
//!    ([`Session`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Client operations (above)  ← read identity/location, write on success
//!     ↕
//! Session Layer (this crate)  ← enforces set-once identity
//!     ↕
//! Protocol Layer (below)  ← provides UserId, Coordinate, UserProfile
//! ```
//!
//! Nothing here is persisted; a session lives exactly as long as the
//! client that owns it.

mod credential;
mod error;
mod session;

pub use credential::{CredentialSource, InitData, StaticCredential};
pub use error::SessionError;
pub use session::{Session, SessionPhase};
