//! The named events of the bidirectional channel.
//!
//! Both directions use the same envelope shape, adjacently tagged:
//! `{"event": "join_room", "data": {"roomId": "AB12CD"}}`. Unit events omit
//! `data` entirely. Drawing payloads (coordinates, color, brush size) are
//! opaque [`serde_json::Value`]s — the server relays them uninterpreted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{
    GameView, LeaderboardEntry, PlayerId, PlayerView, RoomView, Settings,
    SettingsInput,
};

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// Events a client may send.
///
/// Payload validation beyond shape (name length, settings ranges, phase
/// preconditions) happens in the engine; undecodable frames are dropped by
/// the connection handler without touching state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    SetPlayerName {
        name: String,
    },
    CreateRoom {
        #[serde(default)]
        settings: Option<SettingsInput>,
    },
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        room_id: String,
    },
    LeaveRoom,
    UpdateRoomSettings {
        settings: SettingsInput,
    },
    StartGame,
    SelectWord {
        word: String,
    },
    DrawStart {
        #[serde(default)]
        payload: Value,
    },
    DrawMove {
        #[serde(default)]
        payload: Value,
    },
    DrawEnd {
        #[serde(default)]
        payload: Value,
    },
    ClearCanvas,
    Guess {
        guess: String,
    },
    PlayAgain,
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// Events the server emits.
///
/// `Clone` matters here: broadcasts clone one composed event per recipient.
/// The only variants that can carry the secret word are the explicit reveals
/// (`DrawingStarted` to the drawer, `CorrectGuess`, `RoundEnded`); the view
/// types used everywhere else cannot contain it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    Connected {
        player: PlayerView,
    },
    PlayerUpdated {
        player: PlayerView,
    },
    RoomCreated {
        room: RoomView,
    },
    RoomJoined {
        room: RoomView,
    },
    RoomLeft,
    RoomUpdated {
        room: RoomView,
    },
    RoomError {
        code: String,
        error: String,
    },
    RoomSettingsUpdated {
        settings: Settings,
    },
    RoomSettingsError {
        code: String,
        error: String,
    },
    GameStarted {
        game: GameView,
    },
    GameError {
        code: String,
        error: String,
    },
    /// Drawer-only: the three word choices and the selection timeout.
    WordOptions {
        options: Vec<String>,
        timeout: u64,
    },
    #[serde(rename_all = "camelCase")]
    WordSelected {
        masked_word: String,
        auto_selected: bool,
    },
    RoundStarted {
        game: GameView,
    },
    /// The drawer's copy carries `word`; everyone else gets the mask only.
    #[serde(rename_all = "camelCase")]
    DrawingStarted {
        masked_word: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        word: Option<String>,
        duration: u64,
    },
    TimerTick {
        remaining: u64,
        #[serde(rename = "type")]
        kind: String,
    },
    DrawStart {
        payload: Value,
    },
    /// Fan-out of a throttle batch; `moves` preserves arrival order.
    DrawMove {
        moves: Vec<Value>,
    },
    DrawEnd {
        payload: Value,
    },
    ClearCanvas,
    #[serde(rename_all = "camelCase")]
    ChatMessage {
        player_id: PlayerId,
        name: String,
        message: String,
        is_correct: bool,
    },
    #[serde(rename_all = "camelCase")]
    CorrectGuess {
        player_id: PlayerId,
        name: String,
        word: String,
    },
    LeaderboardUpdate {
        leaderboard: Vec<LeaderboardEntry>,
    },
    RoundEnded {
        word: String,
        leaderboard: Vec<LeaderboardEntry>,
    },
    #[serde(rename_all = "camelCase")]
    GameEnded {
        leaderboard: Vec<LeaderboardEntry>,
        rounds_played: u32,
    },
    GameReset {
        room: RoomView,
    },
}
