//! Error types for the game engine.
//!
//! Every variant is an *expected* outcome of adversarial or racy client
//! input, not a fault. The display string is what clients see in error
//! events; [`EngineError::code`] is the stable machine-readable kind.

/// Errors produced by engine operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The room has already started (or finished) a game.
    #[error("Room is not accepting players")]
    NotWaiting,

    /// The room is at its `maxPlayers` capacity.
    #[error("Room is full")]
    Full,

    /// The player is already a member of this room.
    #[error("You are already in this room")]
    Duplicate,

    /// The caller is not the room owner.
    #[error("Only the room owner can do that")]
    NotOwner,

    /// `maxPlayers` cannot be reduced below the current member count.
    #[error("Max players cannot be lower than the current player count")]
    TooSmall,

    /// Starting a game requires at least two members.
    #[error("At least 2 players are needed to start")]
    TooFewPlayers,

    /// The operation is not valid in the current phase.
    #[error("That is not possible right now")]
    WrongPhase,

    /// Only the current drawer may draw or pick the word.
    #[error("Only drawer can draw")]
    NotDrawer,

    /// The drawer cannot guess their own word.
    #[error("The drawer cannot guess")]
    DrawerCannotGuess,

    /// The player already guessed correctly this round.
    #[error("You already guessed the word this round")]
    AlreadyGuessed,

    /// The guess is empty after normalization.
    #[error("Guess is too short")]
    TooShort,

    /// The guess exceeds the maximum length.
    #[error("Guess is too long")]
    TooLong,

    /// No word has been selected for this round.
    #[error("No word has been selected")]
    NoWord,
}

impl EngineError {
    /// Stable machine-readable error kind, surfaced next to the display
    /// message in `room_error` / `room_settings_error` / `game_error`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotWaiting => "not_waiting",
            Self::Full => "full",
            Self::Duplicate => "duplicate",
            Self::NotOwner => "not_owner",
            Self::TooSmall => "too_small",
            Self::TooFewPlayers => "too_few_players",
            Self::WrongPhase => "wrong_phase",
            Self::NotDrawer => "not_drawer",
            Self::DrawerCannotGuess => "drawer_cannot_guess",
            Self::AlreadyGuessed => "already_guessed",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::NoWord => "no_word",
        }
    }
}
