//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding events.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, an unknown event tag, or a
    /// payload of the wrong shape. The connection handler logs and drops
    /// these frames.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame decoded but violates the protocol at a logical level.
    #[error("invalid event: {0}")]
    InvalidEvent(String),
}
