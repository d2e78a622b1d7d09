//! `NearbyClient`: the five interaction operations over one session.
//!
//! Every operation follows the same shape:
//!
//! 1. check local preconditions (credential, registration, cached fix)
//!    and fail before touching the network if they don't hold;
//! 2. make exactly one request per step, in order;
//! 3. write to the session only after the service accepted the request.
//!
//! The session sits behind an async mutex that is only ever held for a
//! read or a write, never across a request or a location fix. Two
//! concurrent operations therefore interleave at their suspension points
//! and the later response wins; nothing is deduplicated or cancelled.

use nearby_geo::{LocationProvider, locate_fresh};
use nearby_protocol::{
    Codec, Coordinate, Endpoint, HeartbeatAck, HeartbeatRequest, JsonCodec,
    LeaderboardItem, LikeOutcome, LikeRequest, NearbyUser, Profile,
    RegisterRequest, UserId, UserProfile,
};
use nearby_session::{CredentialSource, Session, SessionError};
use nearby_transport::{ApiRequest, Transport};
#[cfg(feature = "http")]
use nearby_transport::HttpTransport;
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;

use crate::{
    ClientConfig, Discovery, HeartbeatReport, Leaderboard, LikeResult,
    NearbyError, NearbySnapshot,
};

/// Shown when the service accepts a like without saying anything.
pub const DEFAULT_LIKE_MESSAGE: &str = "Liked!";

/// Builder for a [`NearbyClient`].
///
/// # Example
///
/// ```rust,no_run
/// use nearby::prelude::*;
///
/// # fn demo() -> Result<(), NearbyError> {
/// let here = Coordinate::new(55.75, 37.61)?;
/// let client = NearbyClientBuilder::new()
///     .base_url("https://likes.example.com")
///     .build(FixedLocation(here), StaticCredential::new("query_id=..."))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct NearbyClientBuilder {
    config: ClientConfig,
}

impl NearbyClientBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the service root URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config = self.config.base_url(url);
        self
    }

    /// Builds a client that talks HTTP to `config.base_url`.
    #[cfg(feature = "http")]
    pub fn build<L, K>(
        self,
        locator: L,
        credentials: K,
    ) -> Result<NearbyClient<HttpTransport, L, K>, NearbyError>
    where
        L: LocationProvider,
        K: CredentialSource,
    {
        let transport = HttpTransport::with_identity_header(
            &self.config.base_url,
            &self.config.identity_header,
        )?;
        Ok(NearbyClient::new(transport, locator, credentials, self.config))
    }

    /// Builds a client over any transport.
    pub fn build_with_transport<T, L, K>(
        self,
        transport: T,
        locator: L,
        credentials: K,
    ) -> NearbyClient<T, L, K>
    where
        T: Transport,
        L: LocationProvider,
        K: CredentialSource,
    {
        NearbyClient::new(transport, locator, credentials, self.config)
    }
}

/// A single user's session with the remote service.
///
/// Generic over its collaborators so each can be swapped independently:
/// `T` delivers requests, `L` produces location fixes, `K` supplies the
/// host credential, and `C` encodes bodies.
pub struct NearbyClient<T, L, K, C = JsonCodec> {
    transport: T,
    locator: L,
    credentials: K,
    codec: C,
    config: ClientConfig,
    session: Mutex<Session>,
}

impl<T, L, K> NearbyClient<T, L, K, JsonCodec>
where
    T: Transport,
    L: LocationProvider,
    K: CredentialSource,
{
    /// Creates a client with an empty session and the JSON codec.
    pub fn new(transport: T, locator: L, credentials: K, config: ClientConfig) -> Self {
        Self {
            transport,
            locator,
            credentials,
            codec: JsonCodec,
            config,
            session: Mutex::new(Session::new()),
        }
    }
}

impl<T, L, K, C> NearbyClient<T, L, K, C>
where
    T: Transport,
    L: LocationProvider,
    K: CredentialSource,
    C: Codec,
{
    /// Swaps the codec, keeping everything else.
    pub fn with_codec<C2: Codec>(self, codec: C2) -> NearbyClient<T, L, K, C2> {
        NearbyClient {
            transport: self.transport,
            locator: self.locator,
            credentials: self.credentials,
            codec,
            config: self.config,
            session: self.session,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// A copy of the current session state.
    pub async fn session(&self) -> Session {
        self.session.lock().await.clone()
    }

    // -----------------------------------------------------------------------
    // Register
    // -----------------------------------------------------------------------

    /// Registers the host user with the service and binds the session.
    ///
    /// # Errors
    /// - [`SessionError::MissingCredential`] — the host gave no blob;
    ///   nothing is sent
    /// - [`SessionError::AlreadyRegistered`] — this session already has
    ///   a user; nothing is sent
    /// - transport/protocol errors — the session stays unregistered
    ///
    /// Two registers racing on a fresh session both reach the service.
    /// If both come back as the same user, both succeed.
    pub async fn register(&self) -> Result<UserProfile, NearbyError> {
        let init_data = self.credentials.init_data()?;
        if let Some(existing) = self.session.lock().await.user_id() {
            return Err(SessionError::AlreadyRegistered(existing).into());
        }

        let body = RegisterRequest {
            init_data: init_data.into_inner(),
        };
        let profile: UserProfile = self.post(Endpoint::Register, &body).await?;

        // A concurrent register may have bound the same user while this
        // request was in flight; the service accepted both.
        match self.session.lock().await.bind_user(profile.clone()) {
            Ok(_) => {}
            Err(SessionError::AlreadyRegistered(existing)) if existing == profile.id => {
                tracing::debug!(user_id = %existing, "concurrent register already bound");
                return Ok(profile);
            }
            Err(e) => return Err(e.into()),
        }
        tracing::info!(
            user_id = %profile.id,
            name = %profile.display_name(),
            "registered"
        );
        Ok(profile)
    }

    // -----------------------------------------------------------------------
    // Heartbeat
    // -----------------------------------------------------------------------

    /// Gets a fresh fix and submits it.
    ///
    /// The coordinate is cached in the session only once the service has
    /// accepted it, so a failed heartbeat leaves the previous fix intact.
    ///
    /// # Errors
    /// - [`SessionError::NotRegistered`]
    /// - [`nearby_geo::LocationError`] — no request is sent
    /// - transport/protocol errors
    pub async fn heartbeat(&self) -> Result<HeartbeatReport, NearbyError> {
        self.session.lock().await.require_user()?;

        let coordinate = locate_fresh(&self.locator, &self.config.locate).await?;
        let ack: HeartbeatAck = self
            .post(Endpoint::Heartbeat, &HeartbeatRequest::from(coordinate))
            .await?;

        self.session
            .lock()
            .await
            .record_fix(coordinate, ack.likes_received);
        Ok(HeartbeatReport {
            coordinate,
            likes_received: ack.likes_received,
        })
    }

    // -----------------------------------------------------------------------
    // Discover-Nearby
    // -----------------------------------------------------------------------

    /// Lists users near the last accepted heartbeat.
    ///
    /// Returns [`Discovery::NeedsFix`] without a request when no
    /// heartbeat has succeeded yet.
    ///
    /// # Errors
    /// - [`SessionError::NotRegistered`]
    /// - transport/protocol errors
    pub async fn discover_nearby(&self) -> Result<Discovery, NearbyError> {
        let origin = {
            let session = self.session.lock().await;
            session.require_user()?;
            session.last_coordinate()
        };
        match origin {
            Some(origin) => Ok(Discovery::Found(self.query_nearby(origin).await?)),
            None => Ok(Discovery::NeedsFix),
        }
    }

    /// Like [`discover_nearby`](Self::discover_nearby), but sends a
    /// heartbeat first when no fix is cached.
    ///
    /// # Errors
    /// As `discover_nearby`, plus any heartbeat error, unchanged.
    pub async fn discover_nearby_with_fix(&self) -> Result<NearbySnapshot, NearbyError> {
        match self.discover_nearby().await? {
            Discovery::Found(snapshot) => Ok(snapshot),
            Discovery::NeedsFix => {
                tracing::debug!("no cached fix, sending heartbeat before discovery");
                let report = self.heartbeat().await?;
                self.query_nearby(report.coordinate).await
            }
        }
    }

    async fn query_nearby(&self, origin: Coordinate) -> Result<NearbySnapshot, NearbyError> {
        let request = Endpoint::Nearby
            .request()
            .query("lat", origin.lat)
            .query("lon", origin.lon);
        let users: Vec<NearbyUser> = self.send(Endpoint::Nearby, request).await?;
        tracing::debug!(%origin, count = users.len(), "nearby snapshot");
        Ok(NearbySnapshot { origin, users })
    }

    // -----------------------------------------------------------------------
    // Like
    // -----------------------------------------------------------------------

    /// Sends a like to `target`.
    ///
    /// The target is not validated locally; the service decides whether
    /// it exists, is in range, or was liked too recently. Session state
    /// is read (for the liker's last fix) but never written.
    ///
    /// # Errors
    /// - [`SessionError::NotRegistered`]
    /// - transport/protocol errors
    pub async fn like(&self, target: UserId) -> Result<LikeResult, NearbyError> {
        let from = {
            let session = self.session.lock().await;
            session.require_user()?;
            session.last_coordinate()
        };

        let outcome: LikeOutcome = self
            .post(Endpoint::Like, &LikeRequest::new(target, from))
            .await?;
        let message = if outcome.message.trim().is_empty() {
            DEFAULT_LIKE_MESSAGE.to_string()
        } else {
            outcome.message
        };
        tracing::info!(%target, "like accepted");
        Ok(LikeResult { message })
    }

    // -----------------------------------------------------------------------
    // Leaderboard / Profile
    // -----------------------------------------------------------------------

    /// Fetches the most-liked users. Needs no registration.
    pub async fn leaderboard(&self) -> Result<Leaderboard, NearbyError> {
        let mut request = Endpoint::Leaderboard.request();
        if let Some(limit) = self.config.leaderboard_limit {
            request = request.query("limit", limit);
        }
        let items: Vec<LeaderboardItem> = self.send(Endpoint::Leaderboard, request).await?;
        Ok(Leaderboard::from_items(items))
    }

    /// Fetches `target`'s profile as seen by the registered user.
    ///
    /// # Errors
    /// - [`SessionError::NotRegistered`]
    /// - transport/protocol errors
    pub async fn profile(&self, target: UserId) -> Result<Profile, NearbyError> {
        self.session.lock().await.require_user()?;
        let endpoint = Endpoint::Profile(target);
        self.send(endpoint, endpoint.request()).await
    }

    // -----------------------------------------------------------------------
    // Request plumbing
    // -----------------------------------------------------------------------

    async fn post<B, R>(&self, endpoint: Endpoint, body: &B) -> Result<R, NearbyError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let request = endpoint.request().body(self.codec.encode(body)?);
        self.send(endpoint, request).await
    }

    /// Attaches identity, sends once, decodes the body.
    async fn send<R: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: ApiRequest,
    ) -> Result<R, NearbyError> {
        let identity = self.session.lock().await.identity();
        if endpoint.requires_identity() && identity.is_none() {
            return Err(SessionError::NotRegistered.into());
        }
        let request = request.identity(identity);

        tracing::debug!(%request, "sending request");
        let bytes = self.transport.send(request).await.inspect_err(|e| {
            tracing::debug!(?endpoint, error = %e, "request failed");
        })?;
        Ok(self.codec.decode_body(&bytes)?)
    }
}
