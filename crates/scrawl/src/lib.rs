//! # Scrawl
//!
//! Authoritative server for a real-time multiplayer drawing-and-guessing
//! game. Rooms of 2–12 players rotate as drawer; the server owns all state:
//! identities, membership, phases, timers, the secret word, guess
//! adjudication, and scores. Clients are passive reflectors.
//!
//! The heavy lifting lives in the sub-crates; this meta crate assembles
//! them into a runnable server and re-exports the public surface.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use scrawl::ScrawlServer;
//!
//! # async fn run() -> Result<(), scrawl::ScrawlError> {
//! let server = ScrawlServer::builder().bind("0.0.0.0:3000").build().await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::ScrawlError;
pub use server::{ScrawlServer, ScrawlServerBuilder, DEFAULT_PORT};

/// Re-exports everything needed to embed or test the server.
pub mod prelude {
    pub use crate::{ScrawlError, ScrawlServer, ScrawlServerBuilder};

    pub use scrawl_protocol::{
        ClientEvent, Codec, GamePhase, GameView, JsonCodec,
        LeaderboardEntry, MemberView, PlayerId, PlayerView, ProtocolError,
        Recipient, RoomCode, RoomStatus, RoomView, ServerEvent, Settings,
        SettingsInput,
    };

    pub use scrawl_engine::{
        DrawRelay, EngineError, GuessOutcome, Room, RoomState,
    };

    pub use scrawl_registry::{PlayerRegistry, RegistryError, SessionHandle};

    pub use scrawl_room::{RoomDirectory, RoomError, RoomHandle};

    pub use scrawl_timer::{
        Countdown, CountdownEvent, TimerKind, ROUND_BREAK_SECS,
        WORD_SELECTION_SECS,
    };

    pub use scrawl_transport::{
        Connection, ConnectionId, Transport, TransportError,
        WebSocketTransport,
    };
}
