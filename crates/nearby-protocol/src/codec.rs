//! Codec trait and implementations for request and response bodies.
//!
//! The transport moves raw bytes; a codec turns those bytes into typed
//! records and back. Keeping this behind a trait means the client never
//! names `serde_json` directly, and a test can swap in a codec that
//! fails on purpose.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because the client holding it is shared
/// across async tasks for the whole session.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a request body into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or
    /// don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;

    /// Decodes a response body, treating an empty body as an empty object.
    ///
    /// The service answers some calls with no content. Decoding those as
    /// `{}` lets records whose fields all have defaults come through
    /// instead of failing on zero bytes.
    fn decode_body<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        if data.iter().all(u8::is_ascii_whitespace) {
            self.decode(b"{}")
        } else {
            self.decode(data)
        }
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// The remote service speaks JSON exclusively, so this is the codec the
/// client is built with by default.
///
/// ## Example
///
/// ```rust
/// use nearby_protocol::{Codec, HeartbeatRequest, JsonCodec, UserProfile};
///
/// let codec = JsonCodec;
///
/// let bytes = codec.encode(&HeartbeatRequest { lat: 55.75, lon: 37.61 }).unwrap();
/// assert_eq!(bytes, br#"{"lat":55.75,"lon":37.61}"#);
///
/// let me: UserProfile = codec.decode_body(br#"{"id":42,"likes_received":3}"#).unwrap();
/// assert_eq!(me.likes_received, 3);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
