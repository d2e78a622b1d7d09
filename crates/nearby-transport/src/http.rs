//! HTTP transport implementation using `reqwest`.

use reqwest::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use reqwest::{Client, Url};

use crate::{ApiRequest, Method, Transport, TransportError};

/// Header the service reads the registered user's id from.
pub const DEFAULT_IDENTITY_HEADER: &str = "X-User-Id";

/// An HTTP-based [`Transport`] rooted at a service base URL.
///
/// The underlying `reqwest::Client` pools connections, so one
/// `HttpTransport` should live for the whole session. No client-side
/// timeout is set; the runtime default applies.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base: Url,
    identity_header: HeaderName,
}

impl HttpTransport {
    /// Creates a transport for the service at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::with_identity_header(base_url, DEFAULT_IDENTITY_HEADER)
    }

    /// Creates a transport that sends the identity under `header`.
    pub fn with_identity_header(
        base_url: &str,
        header: &str,
    ) -> Result<Self, TransportError> {
        let base = Url::parse(base_url).map_err(|e| {
            TransportError::InvalidConfig(format!("base url {base_url:?}: {e}"))
        })?;
        let identity_header = HeaderName::from_bytes(header.as_bytes())
            .map_err(|e| {
                TransportError::InvalidConfig(format!("header {header:?}: {e}"))
            })?;
        tracing::debug!(%base, header, "HTTP transport configured");
        Ok(Self {
            client: Client::new(),
            base,
            identity_header,
        })
    }

    /// Returns the base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url_for(&self, path: &str) -> Result<Url, TransportError> {
        let joined = format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| {
            TransportError::InvalidConfig(format!("path {path:?}: {e}"))
        })
    }
}

impl Transport for HttpTransport {
    async fn send(
        &self,
        request: ApiRequest,
    ) -> Result<Vec<u8>, TransportError> {
        let url = self.url_for(&request.path)?;
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(identity) = &request.identity {
            let value = HeaderValue::from_str(identity).map_err(|e| {
                TransportError::InvalidConfig(format!("identity value: {e}"))
            })?;
            builder = builder.header(self.identity_header.clone(), value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            "response received"
        );

        if !status.is_success() {
            let body = match response.text().await {
                Ok(text) => text,
                Err(_) => status.canonical_reason().unwrap_or_default().to_string(),
            };
            return Err(TransportError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
