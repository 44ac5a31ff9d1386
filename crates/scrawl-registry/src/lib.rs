//! Process-wide player registry for the Scrawl server.
//!
//! Tracks every connected player and maintains two indices — by transport
//! session handle and by player id — so both lookup directions are O(1).
//!
//! # Concurrency note
//!
//! `PlayerRegistry` is not thread-safe by itself: it is owned by the server
//! and accessed through a mutex at a higher level. Which room a player is in
//! is not tracked here but in the room directory, so membership state has a
//! single home.

mod error;

use std::collections::HashMap;
use std::fmt;

use rand::Rng;
use scrawl_protocol::{PlayerId, PlayerView};
use tracing::debug;

pub use error::RegistryError;

/// Maximum display-name length in characters, after trimming.
pub const MAX_NAME_LEN: usize = 20;

/// Opaque transport session handle. The transport layer's connection id is
/// converted into this at the server boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(pub u64);

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// A registered player.
#[derive(Debug, Clone)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    pub session: SessionHandle,
}

impl PlayerRecord {
    /// The client-safe serialization of this player.
    pub fn view(&self) -> PlayerView {
        PlayerView {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// The registry: every connected player, indexed both ways.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    by_session: HashMap<SessionHandle, PlayerId>,
    by_id: HashMap<PlayerId, PlayerRecord>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a player for a fresh connection: mints a v4 UUID and a
    /// default name of the form `Player042`.
    pub fn create(&mut self, session: SessionHandle) -> &PlayerRecord {
        let id = PlayerId::random();
        let suffix: u32 = rand::rng().random_range(0..1000);
        let record = PlayerRecord {
            id,
            name: format!("Player{suffix:03}"),
            session,
        };
        self.by_session.insert(session, id);
        self.by_id.insert(id, record);
        debug!(player = %id, %session, "player registered");
        self.by_id.get(&id).expect("just inserted")
    }

    /// Validates and applies a rename: trimmed, non-empty, at most
    /// [`MAX_NAME_LEN`] characters.
    pub fn set_name(
        &mut self,
        id: PlayerId,
        raw: &str,
    ) -> Result<&PlayerRecord, RegistryError> {
        let name = raw.trim();
        if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
            return Err(RegistryError::InvalidName);
        }
        let record = self
            .by_id
            .get_mut(&id)
            .ok_or(RegistryError::NotFound(id))?;
        record.name = name.to_string();
        Ok(record)
    }

    /// Removes the player attached to a session. Removing an unknown
    /// session is a no-op, not an error.
    pub fn remove_by_session(
        &mut self,
        session: SessionHandle,
    ) -> Option<PlayerRecord> {
        let id = self.by_session.remove(&session)?;
        let record = self.by_id.remove(&id);
        if let Some(record) = &record {
            debug!(player = %record.id, %session, "player removed");
        }
        record
    }

    /// Looks up a player by session handle.
    pub fn by_session(&self, session: SessionHandle) -> Option<&PlayerRecord> {
        let id = self.by_session.get(&session)?;
        self.by_id.get(id)
    }

    /// Looks up a player by id.
    pub fn get(&self, id: PlayerId) -> Option<&PlayerRecord> {
        self.by_id.get(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
