//! Transport abstraction layer for the nearby client.
//!
//! Provides the [`Transport`] trait that abstracts over how a request
//! reaches the remote service, plus the [`ApiRequest`] it carries.
//!
//! A transport moves bytes. It does not know what the endpoints mean or
//! how bodies are encoded; that belongs to the protocol layer above.
//!
//! # Feature Flags
//!
//! - `http` (default) — HTTP transport via `reqwest`

mod error;
#[cfg(feature = "http")]
mod http;

pub use error::TransportError;
#[cfg(feature = "http")]
pub use http::{DEFAULT_IDENTITY_HEADER, HttpTransport};

use std::fmt;
use std::future::Future;

/// The request methods the remote service uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read-only query.
    Get,
    /// State-changing submission.
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// A single request to the remote service.
///
/// `body` is already-encoded JSON. `identity` is the string form of the
/// registered user's id; transports attach it as a header only when it
/// is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Request method.
    pub method: Method,
    /// Path relative to the service base, e.g. `/api/nearby`.
    pub path: String,
    /// Query parameters, in order.
    pub query: Vec<(String, String)>,
    /// Encoded request body.
    pub body: Option<Vec<u8>>,
    /// Identity header value, once the session is registered.
    pub identity: Option<String>,
}

impl ApiRequest {
    /// Creates a request with no query, body, or identity.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            identity: None,
        }
    }

    /// Appends a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Sets the encoded body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets (or clears) the identity header value.
    pub fn identity(mut self, identity: Option<String>) -> Self {
        self.identity = identity;
        self
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Delivers requests to the remote service.
///
/// Exactly one attempt per call. Retrying is the caller's decision.
pub trait Transport: Send + Sync + 'static {
    /// Sends the request and returns the raw body of a success response.
    ///
    /// The body may be empty.
    ///
    /// # Errors
    /// - [`TransportError::Remote`] — the service returned a non-success status
    /// - [`TransportError::Network`] — the exchange could not be completed
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;
}
