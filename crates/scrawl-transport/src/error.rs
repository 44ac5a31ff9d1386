//! Error types for the transport layer.

#[cfg(feature = "websocket")]
use tokio_tungstenite::tungstenite;

/// Errors that can occur while listening, accepting, or shuttling frames.
///
/// Listener failures keep their `std::io::Error`; everything past the TCP
/// accept is a WebSocket concern and carries the tungstenite error
/// directly.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The listen address could not be bound.
    #[error("bind failed: {0}")]
    Bind(#[source] std::io::Error),

    /// Accepting a TCP connection failed.
    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),

    /// The WebSocket upgrade handshake failed.
    #[cfg(feature = "websocket")]
    #[error("websocket handshake failed: {0}")]
    Handshake(#[source] tungstenite::Error),

    /// Writing a frame to the peer failed.
    #[cfg(feature = "websocket")]
    #[error("send failed: {0}")]
    Send(#[source] tungstenite::Error),

    /// Reading the next frame from the peer failed.
    #[cfg(feature = "websocket")]
    #[error("receive failed: {0}")]
    Recv(#[source] tungstenite::Error),
}
