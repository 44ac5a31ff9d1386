//! Per-game state: round counters, drawer rotation, the selected word, and
//! who has guessed.
//!
//! A `Game` only exists inside [`crate::RoomState::InGame`] or
//! [`crate::RoomState::Finished`], so the "status/phase pairs" of the
//! protocol are valid by construction: `game_end` is not a phase here but
//! the `Finished` room state.

use std::collections::HashMap;
use std::time::Instant;

use scrawl_protocol::{GamePhase, PlayerId};

use crate::words::SelectedWord;

/// In-game phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    WordSelect,
    Drawing,
    RoundEnd,
}

impl Phase {
    pub(crate) fn as_game_phase(self) -> GamePhase {
        match self {
            Self::WordSelect => GamePhase::WordSelect,
            Self::Drawing => GamePhase::Drawing,
            Self::RoundEnd => GamePhase::RoundEnd,
        }
    }
}

/// How the next rotation picks a drawer.
///
/// `Stay` is set when the current drawer left mid-round: removing them
/// already shifted their successor into the current index, so advancing
/// would skip a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rotation {
    Advance,
    Stay,
}

/// The state of one game, from `start_game` until reset.
#[derive(Debug)]
pub struct Game {
    pub(crate) phase: Phase,
    pub(crate) current_round: u32,
    pub(crate) total_rounds: u32,
    pub(crate) drawer_index: usize,
    pub(crate) drawer_id: PlayerId,
    /// Wall clock at drawing-phase start; scoring weights against it.
    pub(crate) round_start: Option<Instant>,
    /// The round's secret, present only during `Drawing` and `RoundEnd`.
    pub(crate) word: Option<SelectedWord>,
    /// Players who guessed correctly this round, in guess order.
    pub(crate) guessed: Vec<PlayerId>,
    /// First award per player this round; a repeat lookup returns the
    /// original value instead of scoring twice.
    pub(crate) awards: HashMap<PlayerId, u32>,
    pub(crate) rotation: Rotation,
}

impl Game {
    pub(crate) fn new(total_rounds: u32, first_drawer: PlayerId) -> Self {
        Self {
            phase: Phase::WordSelect,
            current_round: 1,
            total_rounds,
            drawer_index: 0,
            drawer_id: first_drawer,
            round_start: None,
            word: None,
            guessed: Vec::new(),
            awards: HashMap::new(),
            rotation: Rotation::Advance,
        }
    }

    /// Resets per-round state for a new drawer and returns to word
    /// selection.
    pub(crate) fn begin_round(&mut self, drawer_index: usize, drawer_id: PlayerId) {
        self.phase = Phase::WordSelect;
        self.drawer_index = drawer_index;
        self.drawer_id = drawer_id;
        self.round_start = None;
        self.word = None;
        self.guessed.clear();
        self.awards.clear();
        self.rotation = Rotation::Advance;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn drawer_id(&self) -> PlayerId {
        self.drawer_id
    }

    pub fn drawer_index(&self) -> usize {
        self.drawer_index
    }

    pub fn has_guessed(&self, id: PlayerId) -> bool {
        self.guessed.contains(&id)
    }

    pub fn guessed_count(&self) -> usize {
        self.guessed.len()
    }
}
