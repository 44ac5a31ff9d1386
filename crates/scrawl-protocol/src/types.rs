//! Core protocol types shared by every layer.
//!
//! Everything here is client-safe: these are the shapes that get serialized
//! and pushed over the wire. The secret word of a round is deliberately not
//! representable in any of these types; revealing it is only possible through
//! the explicit reveal events in [`crate::ServerEvent`].

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// Newtype over a v4 UUID so a `PlayerId` can never be confused with a room
/// code or a raw string. `#[serde(transparent)]` serializes it as the plain
/// UUID string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Mints a fresh random id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A room's 6-character `[A-Z0-9]` join code.
///
/// Codes are canonically uppercase; [`RoomCode::parse`] normalizes client
/// input so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

/// The alphabet room codes are minted from.
pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of a room code.
pub const ROOM_CODE_LEN: usize = 6;

impl RoomCode {
    /// Wraps a string that is already canonical (uppercase, 6 chars from the
    /// alphabet). Callers minting codes from [`ROOM_CODE_ALPHABET`] use this.
    pub fn from_canonical(code: String) -> Self {
        debug_assert!(code.len() == ROOM_CODE_LEN);
        debug_assert!(code.bytes().all(|b| ROOM_CODE_ALPHABET.contains(&b)));
        Self(code)
    }

    /// Parses client input: trims, uppercases, and validates the shape.
    /// Returns `None` for anything that cannot be a room code.
    pub fn parse(raw: &str) -> Option<Self> {
        let canon: String = raw.trim().to_ascii_uppercase();
        if canon.len() != ROOM_CODE_LEN {
            return None;
        }
        if !canon.bytes().all(|b| ROOM_CODE_ALPHABET.contains(&b)) {
            return None;
        }
        Some(Self(canon))
    }

    /// The canonical uppercase code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Recipient — who should receive an event?
// ---------------------------------------------------------------------------

/// Specifies who should receive a server event.
///
/// When the room layer processes an inbound event it produces a list of
/// `(Recipient, ServerEvent)` pairs; this enum tells the dispatch loop where
/// to deliver each one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every member of the room.
    All,
    /// One specific member.
    Player(PlayerId),
    /// Every member except one — e.g. stroke fan-out skips the drawer.
    AllExcept(PlayerId),
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Validated per-room settings.
///
/// Always produced by clamping a [`SettingsInput`]; a `Settings` value is in
/// range by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Room capacity, within `[2, 12]`.
    pub max_players: usize,
    /// Seconds the drawer has per round, within `[30, 120]`.
    pub draw_time: u64,
    /// Full rotations through the member list, within `[1, 10]`.
    pub rounds: u32,
    /// Whether letter hints are enabled for this room.
    pub hints: bool,
    /// Extra lowercase words merged into the word pool.
    pub custom_words: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_players: 8,
            draw_time: 80,
            rounds: 3,
            hints: true,
            custom_words: Vec::new(),
        }
    }
}

/// Raw, unvalidated settings as sent by a client.
///
/// Every field is optional and numeric fields are wide integers on purpose:
/// out-of-range input is clamped rather than rejected, so `0` and `999` must
/// both survive deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsInput {
    pub max_players: Option<i64>,
    pub draw_time: Option<i64>,
    pub rounds: Option<i64>,
    pub hints: Option<bool>,
    pub custom_words: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

/// A player as seen outside any room (on connect, after a rename).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
}

/// A room member in the room serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberView {
    pub id: PlayerId,
    pub name: String,
    pub is_owner: bool,
    pub score: u32,
}

/// Room lifecycle status as serialized to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Waiting,
    InGame,
    Finished,
}

/// The canonical room serialization: `{code, ownerId, players, settings,
/// status}`. Never includes game internals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomView {
    pub code: RoomCode,
    pub owner_id: PlayerId,
    pub players: Vec<MemberView>,
    pub settings: Settings,
    pub status: RoomStatus,
}

/// Game phase as serialized to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    WordSelect,
    Drawing,
    RoundEnd,
    GameEnd,
}

/// The canonical game-state serialization.
///
/// There is no field for the selected word, only its mask; the secret cannot
/// travel through this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub phase: GamePhase,
    pub current_round: u32,
    pub total_rounds: u32,
    pub drawer_id: PlayerId,
    pub drawer_index: usize,
    pub guessed_players: Vec<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masked_word: Option<String>,
}

/// One leaderboard row. Rows are ordered by score descending, ties stable in
/// member insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub player_id: PlayerId,
    pub name: String,
    pub score: u32,
}
