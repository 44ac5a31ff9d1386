//! Room actors and the room directory for the Scrawl server.
//!
//! One Tokio task per room owns the full room state (membership, settings,
//! game, countdown, stroke relay) and serializes every mutation through its
//! command channel — the "one event at a time per room" contract. The
//! [`RoomDirectory`] is the process-wide index that creates rooms, resolves
//! codes, and enforces the one-room-per-player rule.

mod actor;
mod directory;
mod error;

pub use actor::{spawn_room, LeaveReply, PlayerSender, RoomHandle};
pub use directory::RoomDirectory;
pub use error::RoomError;
