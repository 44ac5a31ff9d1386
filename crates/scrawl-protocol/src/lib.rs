//! Wire protocol for Scrawl.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Identifiers and views** ([`PlayerId`], [`RoomCode`], [`RoomView`],
//!   [`GameView`], …) — the structures that travel on the wire. View types
//!   are client-safe by construction: none of them can carry the secret word.
//! - **Events** ([`ClientEvent`], [`ServerEvent`]) — the named events of the
//!   bidirectional channel, adjacently tagged as
//!   `{"event": "...", "data": {...}}`.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how events are converted
//!   to and from bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! The protocol layer sits between transport (raw bytes) and the room layer
//! (game semantics). It knows nothing about connections, rooms, or timers.

mod codec;
mod error;
mod events;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use events::{ClientEvent, ServerEvent};
pub use types::{
    GamePhase, GameView, LeaderboardEntry, MemberView, PlayerId, PlayerView,
    Recipient, RoomCode, RoomStatus, RoomView, Settings, SettingsInput,
    ROOM_CODE_ALPHABET, ROOM_CODE_LEN,
};
