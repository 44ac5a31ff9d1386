//! Unified error type for the Scrawl server.

use scrawl_protocol::ProtocolError;
use scrawl_registry::RegistryError;
use scrawl_room::RoomError;
use scrawl_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates the `From` impls, so
/// `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ScrawlError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A registry-level error (names, unknown players).
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A room-level error (codes, membership, game rules).
    #[error(transparent)]
    Room(#[from] RoomError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::Bind(std::io::Error::new(
            std::io::ErrorKind::AddrInUse,
            "port taken",
        ));
        let wrapped: ScrawlError = err.into();
        assert!(matches!(wrapped, ScrawlError::Transport(_)));
        assert!(wrapped.to_string().contains("port taken"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidEvent("bad".into());
        let wrapped: ScrawlError = err.into();
        assert!(matches!(wrapped, ScrawlError::Protocol(_)));
    }

    #[test]
    fn test_from_registry_error() {
        let err = RegistryError::InvalidName;
        let wrapped: ScrawlError = err.into();
        assert!(matches!(wrapped, ScrawlError::Registry(_)));
    }

    #[test]
    fn test_from_room_error() {
        let err = RoomError::NotFound;
        let wrapped: ScrawlError = err.into();
        assert!(matches!(wrapped, ScrawlError::Room(_)));
    }
}
