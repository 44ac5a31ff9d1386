//! Room directory: mints codes, tracks live rooms, and routes players.
//!
//! The directory owns two process-wide maps: room code → actor handle, and
//! player → room code (a player is in at most one room, by construction).
//! All game semantics live behind the handles; the directory only does
//! lookup, creation, and teardown.

use std::collections::HashMap;

use rand::Rng;
use tracing::info;

use scrawl_engine::Room;
use scrawl_protocol::{
    PlayerId, RoomCode, RoomView, Settings,
    ROOM_CODE_ALPHABET, ROOM_CODE_LEN,
};

use crate::actor::{spawn_room, PlayerSender, RoomHandle};
use crate::RoomError;

/// How many collisions code minting tolerates before giving up.
const CODE_MINT_ATTEMPTS: usize = 100;

/// Tracks all live rooms and which player is in which room.
#[derive(Default)]
pub struct RoomDirectory {
    rooms: HashMap<RoomCode, RoomHandle>,
    player_rooms: HashMap<PlayerId, RoomCode>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a code not currently in use.
    fn mint_code<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<RoomCode, RoomError> {
        for _ in 0..CODE_MINT_ATTEMPTS {
            let code: String = (0..ROOM_CODE_LEN)
                .map(|_| {
                    ROOM_CODE_ALPHABET
                        [rng.random_range(0..ROOM_CODE_ALPHABET.len())]
                        as char
                })
                .collect();
            let code = RoomCode::from_canonical(code);
            if !self.rooms.contains_key(&code) {
                return Ok(code);
            }
        }
        Err(RoomError::IdExhausted)
    }

    /// Creates a room with the caller as owner and first member.
    pub fn create(
        &mut self,
        owner: PlayerId,
        owner_name: String,
        settings: Settings,
        sender: PlayerSender,
    ) -> Result<RoomView, RoomError> {
        if self.player_rooms.contains_key(&owner) {
            return Err(RoomError::AlreadyIn);
        }
        let code = self.mint_code(&mut rand::rng())?;
        let room = Room::new(code.clone(), owner, owner_name, settings);
        let view = room.view();
        let handle = spawn_room(room, owner, sender);
        self.rooms.insert(code.clone(), handle);
        self.player_rooms.insert(owner, code.clone());
        info!(room = %code, %owner, "room created");
        Ok(view)
    }

    /// Adds a player to the room with the given (case-insensitive) code.
    pub async fn join(
        &mut self,
        player: PlayerId,
        name: String,
        raw_code: &str,
        sender: PlayerSender,
    ) -> Result<RoomView, RoomError> {
        let code = RoomCode::parse(raw_code).ok_or(RoomError::NotFound)?;

        if let Some(current) = self.player_rooms.get(&player) {
            if *current == code {
                return Err(RoomError::Engine(
                    scrawl_engine::EngineError::Duplicate,
                ));
            }
            return Err(RoomError::AlreadyIn);
        }

        let handle = self.rooms.get(&code).ok_or(RoomError::NotFound)?;
        let view = handle.join(player, name, sender).await?;
        self.player_rooms.insert(player, code);
        Ok(view)
    }

    /// Removes a player from their current room, destroying the room when
    /// it empties. Errors with `NotFound` if the player is in no room.
    pub async fn leave(&mut self, player: PlayerId) -> Result<(), RoomError> {
        let code = self
            .player_rooms
            .remove(&player)
            .ok_or(RoomError::NotFound)?;

        let Some(handle) = self.rooms.get(&code) else {
            return Ok(());
        };
        let reply = handle.leave(player).await?;
        if reply.empty {
            self.destroy(&code).await;
        }
        Ok(())
    }

    /// Propagates a rename to the player's room, if they are in one.
    pub async fn rename(
        &self,
        player: PlayerId,
        name: String,
    ) -> Result<(), RoomError> {
        if let Some(handle) = self.handle_for_player(player) {
            handle.rename(player, name).await?;
        }
        Ok(())
    }

    /// The handle of the room a player is in.
    pub fn handle_for_player(&self, player: PlayerId) -> Option<&RoomHandle> {
        let code = self.player_rooms.get(&player)?;
        self.rooms.get(code)
    }

    /// The room code a player is in, if any.
    pub fn player_room(&self, player: PlayerId) -> Option<&RoomCode> {
        self.player_rooms.get(&player)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Stops a room's actor and drops every index entry pointing at it.
    async fn destroy(&mut self, code: &RoomCode) {
        if let Some(handle) = self.rooms.remove(code) {
            let _ = handle.shutdown().await;
        }
        self.player_rooms.retain(|_, c| c != code);
        info!(room = %code, "room destroyed");
    }

    /// Shuts down every room; used during graceful process shutdown so all
    /// countdowns are cancelled.
    pub async fn shutdown_all(&mut self) {
        for (_, handle) in self.rooms.drain() {
            let _ = handle.shutdown().await;
        }
        self.player_rooms.clear();
    }
}
