//! Error types for the room layer.

use scrawl_engine::EngineError;
use scrawl_protocol::RoomCode;

/// Errors that can occur during directory and room-actor operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room exists for the given code.
    #[error("Room not found")]
    NotFound,

    /// The player is already in a different room.
    #[error("You are already in a room")]
    AlreadyIn,

    /// Code minting collided 100 times in a row; the code space is
    /// effectively exhausted.
    #[error("Could not allocate a room code")]
    IdExhausted,

    /// The room's command channel is gone (actor stopped).
    #[error("Room {0} is unavailable")]
    Unavailable(RoomCode),

    /// A game-rule rejection from the engine.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl RoomError {
    /// Stable machine-readable error kind for client error events.
    /// A room whose actor died looks like a missing room to clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound | Self::Unavailable(_) => "not_found",
            Self::AlreadyIn => "already_in",
            Self::IdExhausted => "id_exhausted",
            Self::Engine(e) => e.code(),
        }
    }
}
