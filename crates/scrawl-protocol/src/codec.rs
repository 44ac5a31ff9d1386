//! Codec trait and implementations for serializing events.
//!
//! The protocol layer doesn't care how events become bytes — it just needs
//! something implementing [`Codec`]. [`JsonCodec`] is the default; a compact
//! binary codec could be swapped in without touching any other layer.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Converts values to and from bytes.
///
/// `Send + Sync + 'static` because codecs are shared across connection tasks
/// for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`.
///
/// Human-readable on the wire, which is what the browser frontend speaks and
/// what makes dropped-frame debugging painless.
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
