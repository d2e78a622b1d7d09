//! Fakes shared by the client and dispatch tests.
//!
//! Each fake is a cheap `Clone` over shared state, so a test can hand
//! one copy to the client and keep another to inspect afterwards.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use nearby::prelude::*;

// =========================================================================
// Transport
// =========================================================================

/// Replays scripted responses in order and records every request.
#[derive(Clone, Default)]
pub struct FakeTransport {
    replies: Arc<Mutex<VecDeque<Result<Vec<u8>, TransportError>>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a 2xx response with this JSON body.
    pub fn reply(&self, json: &str) -> &Self {
        self.push(Ok(json.as_bytes().to_vec()))
    }

    /// Queues a non-2xx response.
    pub fn fail(&self, status: u16, body: &str) -> &Self {
        self.push(Err(TransportError::Remote {
            status,
            body: body.to_string(),
        }))
    }

    /// Queues a network failure.
    pub fn offline(&self) -> &Self {
        self.push(Err(TransportError::Network("connection refused".into())))
    }

    fn push(&self, reply: Result<Vec<u8>, TransportError>) -> &Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("at least one request")
    }

    /// The last request's body as JSON.
    pub fn last_body(&self) -> serde_json::Value {
        let body = self.last_request().body.expect("request had a body");
        serde_json::from_slice(&body).expect("body is JSON")
    }
}

impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<Vec<u8>, TransportError> {
        self.requests.lock().unwrap().push(request);
        let next = self.replies.lock().unwrap().pop_front();
        // Yield so concurrent operations really interleave here.
        tokio::task::yield_now().await;
        next.unwrap_or_else(|| Err(TransportError::Network("no scripted reply".into())))
    }
}

// =========================================================================
// Location
// =========================================================================

/// Returns scripted fixes in order and counts how often it was asked.
#[derive(Clone, Default)]
pub struct ScriptedLocation {
    fixes: Arc<Mutex<VecDeque<Result<Coordinate, LocationError>>>>,
    calls: Arc<Mutex<usize>>,
}

impl ScriptedLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(lat: f64, lon: f64) -> Self {
        let provider = Self::new();
        provider.then_at(lat, lon);
        provider
    }

    pub fn then_at(&self, lat: f64, lon: f64) -> &Self {
        let fix = Coordinate::new(lat, lon).expect("valid test coordinate");
        self.fixes.lock().unwrap().push_back(Ok(fix));
        self
    }

    pub fn then_fail(&self, err: LocationError) -> &Self {
        self.fixes.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl LocationProvider for ScriptedLocation {
    async fn locate(&self, _options: &LocateOptions) -> Result<Coordinate, LocationError> {
        *self.calls.lock().unwrap() += 1;
        let next = self.fixes.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(LocationError::Unavailable("no scripted fix".into())))
    }
}

// =========================================================================
// Client construction
// =========================================================================

pub type TestClient = NearbyClient<FakeTransport, ScriptedLocation, StaticCredential>;

pub fn client_with(
    transport: &FakeTransport,
    location: &ScriptedLocation,
    config: ClientConfig,
) -> TestClient {
    NearbyClientBuilder::new().config(config).build_with_transport(
        transport.clone(),
        location.clone(),
        StaticCredential::new("abc123"),
    )
}

pub fn client(transport: &FakeTransport, location: &ScriptedLocation) -> TestClient {
    client_with(transport, location, ClientConfig::default())
}

/// A client that has already registered as user 42.
pub async fn registered_client(
    transport: &FakeTransport,
    location: &ScriptedLocation,
    config: ClientConfig,
) -> TestClient {
    transport.reply(r#"{"id":42,"username":"nik","likes_received":0}"#);
    let client = client_with(transport, location, config);
    client.register().await.expect("registration should succeed");
    client
}

pub fn coord(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).expect("valid test coordinate")
}
