//! The room aggregate: membership, settings, and the game state machine.
//!
//! A `Room` is a plain synchronous value; every operation mutates it and
//! returns a typed outcome for the caller (the room actor) to turn into
//! broadcasts. Nothing here performs I/O or touches a clock on its own —
//! operations that need the time take `now` as an argument.

use std::time::Instant;

use rand::Rng;
use tracing::debug;

use scrawl_protocol::{
    GameView, LeaderboardEntry, MemberView, PlayerId, RoomCode, RoomStatus,
    RoomView, Settings, SettingsInput,
};

use crate::game::{Game, Phase, Rotation};
use crate::words::SelectedWord;
use crate::{guess, score, settings, words, EngineError};

/// A room member. Insertion order in [`Room::members`] *is* the drawer
/// rotation order.
#[derive(Debug, Clone)]
pub struct Member {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
}

/// Room lifecycle. The game record exists exactly when the protocol's
/// `status` is `in_game` or `finished`.
#[derive(Debug)]
pub enum RoomState {
    Waiting,
    InGame(Game),
    Finished(Game),
}

/// Outcome of a member leaving.
#[derive(Debug)]
pub struct Departure {
    /// Set when ownership moved to the first remaining member.
    pub new_owner: Option<PlayerId>,
    /// The room has no members left and should be destroyed.
    pub empty: bool,
    /// Mid-game consequence, if any.
    pub effect: Option<LeaveGameEffect>,
}

/// What a mid-game departure did to the game.
#[derive(Debug, PartialEq, Eq)]
pub enum LeaveGameEffect {
    /// Fewer than two members remain; the game must end now.
    GameBelowMinimum,
    /// The drawer left and the round was aborted. `revealed` carries the
    /// word when one had been selected (ended mid-drawing); `None` means
    /// the round died in word selection and the next drawer starts
    /// immediately.
    RoundAborted { revealed: Option<String> },
    /// Every remaining guesser has now guessed; the round is complete.
    RoundComplete,
}

/// Outcome of ending a round normally.
#[derive(Debug, PartialEq, Eq)]
pub struct RoundSummary {
    /// The revealed word.
    pub word: String,
    /// Points credited to the drawer (50 per correct guesser).
    pub drawer_award: u32,
    /// True when this was the last drawer of the last round.
    pub game_ended: bool,
}

/// Outcome of rotating to the next drawer.
#[derive(Debug, PartialEq, Eq)]
pub enum Progress {
    NextRound {
        /// True when the rotation wrapped and `current_round` advanced.
        round_incremented: bool,
        drawer: PlayerId,
    },
    /// The wrap would exceed `total_rounds`; the caller ends the game.
    GameOver,
}

/// Outcome of adjudicating a guess.
#[derive(Debug, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct {
        /// Points credited to the guesser.
        award: u32,
        /// The revealed word, for the `correct_guess` broadcast.
        word: String,
        /// True when this guess completed the round.
        all_guessed: bool,
    },
    Incorrect {
        /// The chat mask: one `*` per character of the guess.
        masked: String,
    },
}

/// The room aggregate.
#[derive(Debug)]
pub struct Room {
    code: RoomCode,
    owner: PlayerId,
    members: Vec<Member>,
    settings: Settings,
    state: RoomState,
}

impl Room {
    /// Creates a waiting room with the owner as its first member.
    pub fn new(
        code: RoomCode,
        owner: PlayerId,
        owner_name: String,
        settings: Settings,
    ) -> Self {
        Self {
            code,
            owner,
            members: vec![Member {
                id: owner,
                name: owner_name,
                score: 0,
            }],
            settings,
            state: RoomState::Waiting,
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn owner_id(&self) -> PlayerId {
        self.owner
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn is_member(&self, id: PlayerId) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    pub fn game(&self) -> Option<&Game> {
        match &self.state {
            RoomState::Waiting => None,
            RoomState::InGame(g) | RoomState::Finished(g) => Some(g),
        }
    }

    pub fn status(&self) -> RoomStatus {
        match &self.state {
            RoomState::Waiting => RoomStatus::Waiting,
            RoomState::InGame(_) => RoomStatus::InGame,
            RoomState::Finished(_) => RoomStatus::Finished,
        }
    }

    // -----------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------

    /// Adds a member. The directory has already checked that the player is
    /// not in some other room.
    pub fn join(&mut self, id: PlayerId, name: String) -> Result<(), EngineError> {
        if self.is_member(id) {
            return Err(EngineError::Duplicate);
        }
        if !matches!(self.state, RoomState::Waiting) {
            return Err(EngineError::NotWaiting);
        }
        if self.members.len() >= self.settings.max_players {
            return Err(EngineError::Full);
        }
        self.members.push(Member { id, name, score: 0 });
        Ok(())
    }

    /// Updates a member's display name. Returns `false` for non-members.
    pub fn rename(&mut self, id: PlayerId, name: String) -> bool {
        match self.members.iter_mut().find(|m| m.id == id) {
            Some(member) => {
                member.name = name;
                true
            }
            None => false,
        }
    }

    /// Removes a member, promoting a new owner and adjusting any running
    /// game. Returns `None` if the player was not a member.
    pub fn leave(&mut self, id: PlayerId) -> Option<Departure> {
        let idx = self.members.iter().position(|m| m.id == id)?;
        self.members.remove(idx);

        let mut new_owner = None;
        if self.owner == id {
            if let Some(first) = self.members.first() {
                self.owner = first.id;
                new_owner = Some(first.id);
            }
        }

        let empty = self.members.is_empty();
        let effect = if empty {
            None
        } else {
            self.adjust_game_after_leave(id, idx)
        };
        Some(Departure {
            new_owner,
            empty,
            effect,
        })
    }

    /// Collapses the drawer rotation around a departed member.
    fn adjust_game_after_leave(
        &mut self,
        id: PlayerId,
        removed_idx: usize,
    ) -> Option<LeaveGameEffect> {
        let members_len = self.members.len();
        let game = match &mut self.state {
            RoomState::InGame(g) => g,
            _ => return None,
        };

        if members_len < 2 {
            return Some(LeaveGameEffect::GameBelowMinimum);
        }

        if id == game.drawer_id {
            // The successor has shifted into the drawer's index; keep it
            // there for the next rotation.
            game.rotation = Rotation::Stay;
            if game.phase == Phase::RoundEnd {
                // Already between rounds; the pending rotation handles it.
                return None;
            }
            let revealed = match game.phase {
                Phase::Drawing => {
                    game.word.as_ref().map(|w| w.reveal().to_string())
                }
                _ => None,
            };
            game.phase = Phase::RoundEnd;
            debug!(room = %self.code, player = %id, "drawer left, round aborted");
            return Some(LeaveGameEffect::RoundAborted { revealed });
        }

        if removed_idx < game.drawer_index {
            game.drawer_index -= 1;
        }
        if game.phase == Phase::Drawing && all_guessed(&self.members, game) {
            return Some(LeaveGameEffect::RoundComplete);
        }
        None
    }

    // -----------------------------------------------------------------
    // Settings
    // -----------------------------------------------------------------

    /// Owner-only, waiting-only settings update. Input is clamped; the one
    /// hard rejection is shrinking `maxPlayers` below the current member
    /// count.
    pub fn update_settings(
        &mut self,
        caller: PlayerId,
        input: &SettingsInput,
    ) -> Result<&Settings, EngineError> {
        if caller != self.owner {
            return Err(EngineError::NotOwner);
        }
        if !matches!(self.state, RoomState::Waiting) {
            return Err(EngineError::NotWaiting);
        }
        let merged = settings::merged(&self.settings, input);
        if merged.max_players < self.members.len() {
            return Err(EngineError::TooSmall);
        }
        self.settings = merged;
        Ok(&self.settings)
    }

    // -----------------------------------------------------------------
    // Game lifecycle
    // -----------------------------------------------------------------

    /// Starts a game: owner-only, waiting-only, two-player minimum. Scores
    /// reset; the first member becomes the first drawer.
    pub fn start_game(&mut self, caller: PlayerId) -> Result<(), EngineError> {
        if caller != self.owner {
            return Err(EngineError::NotOwner);
        }
        if !matches!(self.state, RoomState::Waiting) {
            return Err(EngineError::NotWaiting);
        }
        if self.members.len() < 2 {
            return Err(EngineError::TooFewPlayers);
        }
        for member in &mut self.members {
            member.score = 0;
        }
        let first_drawer = self.members[0].id;
        self.state = RoomState::InGame(Game::new(self.settings.rounds, first_drawer));
        Ok(())
    }

    /// Ends the drawing phase: credits the drawer, moves to `round_end`,
    /// and reports whether the game is over (last drawer of last round).
    pub fn end_round(&mut self) -> Result<RoundSummary, EngineError> {
        let members_len = self.members.len();
        let game = match &mut self.state {
            RoomState::InGame(g) => g,
            _ => return Err(EngineError::WrongPhase),
        };
        if game.phase != Phase::Drawing {
            return Err(EngineError::WrongPhase);
        }
        let word = game
            .word
            .as_ref()
            .ok_or(EngineError::NoWord)?
            .reveal()
            .to_string();

        let drawer_award = score::drawer_award(game.guessed.len());
        let drawer_id = game.drawer_id;
        game.phase = Phase::RoundEnd;

        let is_last_drawer = game.drawer_index + 1 >= members_len;
        let is_last_round = game.current_round >= game.total_rounds;

        if let Some(drawer) = self.members.iter_mut().find(|m| m.id == drawer_id) {
            drawer.score += drawer_award;
        }

        Ok(RoundSummary {
            word,
            drawer_award,
            game_ended: is_last_drawer && is_last_round,
        })
    }

    /// Rotates to the next drawer and begins its word-selection phase.
    pub fn progress_round(&mut self) -> Result<Progress, EngineError> {
        let members = &self.members;
        let game = match &mut self.state {
            RoomState::InGame(g) => g,
            _ => return Err(EngineError::WrongPhase),
        };
        if game.phase != Phase::RoundEnd {
            return Err(EngineError::WrongPhase);
        }

        let mut idx = match game.rotation {
            Rotation::Advance => game.drawer_index + 1,
            Rotation::Stay => game.drawer_index,
        };
        let mut round_incremented = false;
        if idx >= members.len() {
            idx = 0;
            game.current_round += 1;
            round_incremented = true;
        }
        if round_incremented && game.current_round > game.total_rounds {
            return Ok(Progress::GameOver);
        }

        let drawer = members[idx].id;
        game.begin_round(idx, drawer);
        Ok(Progress::NextRound {
            round_incremented,
            drawer,
        })
    }

    /// Moves the game to its terminal state. Returns the number of rounds
    /// actually played.
    pub fn end_game(&mut self) -> Result<u32, EngineError> {
        let state = std::mem::replace(&mut self.state, RoomState::Waiting);
        match state {
            RoomState::InGame(game) => {
                let rounds_played = game.current_round.min(game.total_rounds);
                self.state = RoomState::Finished(game);
                Ok(rounds_played)
            }
            other => {
                self.state = other;
                Err(EngineError::WrongPhase)
            }
        }
    }

    /// Clears a finished game for a rematch: back to `waiting` with the
    /// same members and settings, scores zeroed.
    pub fn reset_game(&mut self, caller: PlayerId) -> Result<(), EngineError> {
        if caller != self.owner {
            return Err(EngineError::NotOwner);
        }
        if !matches!(self.state, RoomState::Finished(_)) {
            return Err(EngineError::WrongPhase);
        }
        for member in &mut self.members {
            member.score = 0;
        }
        self.state = RoomState::Waiting;
        Ok(())
    }

    // -----------------------------------------------------------------
    // Words
    // -----------------------------------------------------------------

    /// Samples word options for the current drawer.
    pub fn word_options<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Vec<String>, EngineError> {
        match &self.state {
            RoomState::InGame(g) if g.phase == Phase::WordSelect => {
                Ok(words::generate_options(&words::word_pool(&self.settings), rng))
            }
            _ => Err(EngineError::WrongPhase),
        }
    }

    /// Drawer picks the round's word; the room moves to `drawing`.
    /// Returns the masked form for broadcasting.
    pub fn select_word(
        &mut self,
        caller: PlayerId,
        raw: &str,
        now: Instant,
    ) -> Result<String, EngineError> {
        let game = match &mut self.state {
            RoomState::InGame(g) => g,
            _ => return Err(EngineError::WrongPhase),
        };
        if game.phase != Phase::WordSelect {
            return Err(EngineError::WrongPhase);
        }
        if caller != game.drawer_id {
            return Err(EngineError::NotDrawer);
        }
        let normalized = guess::normalize(raw);
        if normalized.is_empty() {
            return Err(EngineError::NoWord);
        }
        let word = SelectedWord::new(normalized);
        let masked = word.masked().to_string();
        game.word = Some(word);
        game.phase = Phase::Drawing;
        game.round_start = Some(now);
        Ok(masked)
    }

    /// Word-selection timeout: the server picks the first of a freshly
    /// sampled option list on the drawer's behalf.
    pub fn auto_select_word<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        now: Instant,
    ) -> Result<String, EngineError> {
        let options = self.word_options(rng)?;
        let pick = options.first().ok_or(EngineError::NoWord)?.clone();
        let drawer = match &self.state {
            RoomState::InGame(g) => g.drawer_id,
            _ => return Err(EngineError::WrongPhase),
        };
        self.select_word(drawer, &pick, now)
    }

    /// The secret word, for the drawer's copy of `drawing_started` and the
    /// reveal events. `None` outside a round.
    pub fn drawer_word(&self) -> Option<String> {
        match &self.state {
            RoomState::InGame(g) => {
                g.word.as_ref().map(|w| w.reveal().to_string())
            }
            _ => None,
        }
    }

    // -----------------------------------------------------------------
    // Drawing / guessing
    // -----------------------------------------------------------------

    /// Validates that `caller` may emit drawing events right now.
    pub fn check_drawer(&self, caller: PlayerId) -> Result<(), EngineError> {
        match &self.state {
            RoomState::InGame(g) if g.phase == Phase::Drawing => {
                if caller == g.drawer_id {
                    Ok(())
                } else {
                    Err(EngineError::NotDrawer)
                }
            }
            _ => Err(EngineError::WrongPhase),
        }
    }

    /// Adjudicates a guess at wall time `now`.
    pub fn submit_guess(
        &mut self,
        caller: PlayerId,
        raw: &str,
        now: Instant,
    ) -> Result<GuessOutcome, EngineError> {
        let draw_time = self.settings.draw_time;
        let game = match &mut self.state {
            RoomState::InGame(g) => g,
            _ => return Err(EngineError::WrongPhase),
        };
        if game.phase != Phase::Drawing {
            return Err(EngineError::WrongPhase);
        }
        if caller == game.drawer_id {
            return Err(EngineError::DrawerCannotGuess);
        }
        if game.guessed.contains(&caller) {
            return Err(EngineError::AlreadyGuessed);
        }
        let word = game.word.as_ref().ok_or(EngineError::NoWord)?;

        let normalized = guess::normalize(raw);
        if normalized.is_empty() {
            return Err(EngineError::TooShort);
        }
        if normalized.chars().count() > guess::MAX_GUESS_LEN {
            return Err(EngineError::TooLong);
        }

        if !word.matches(&normalized) {
            return Ok(GuessOutcome::Incorrect {
                masked: guess::mask_chat(&normalized),
            });
        }

        let revealed = word.reveal().to_string();
        let elapsed = game
            .round_start
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default();
        let award = *game
            .awards
            .entry(caller)
            .or_insert_with(|| score::guesser_award(elapsed, draw_time));
        game.guessed.push(caller);

        if let Some(member) = self.members.iter_mut().find(|m| m.id == caller) {
            member.score += award;
        }

        let all = match &self.state {
            RoomState::InGame(g) => all_guessed(&self.members, g),
            _ => false,
        };
        Ok(GuessOutcome::Correct {
            award,
            word: revealed,
            all_guessed: all,
        })
    }

    /// True when every current non-drawer member has guessed this round.
    pub fn all_guessers_guessed(&self) -> bool {
        match &self.state {
            RoomState::InGame(g) => all_guessed(&self.members, g),
            _ => false,
        }
    }

    // -----------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------

    /// The canonical room serialization.
    pub fn view(&self) -> RoomView {
        RoomView {
            code: self.code.clone(),
            owner_id: self.owner,
            players: self
                .members
                .iter()
                .map(|m| MemberView {
                    id: m.id,
                    name: m.name.clone(),
                    is_owner: m.id == self.owner,
                    score: m.score,
                })
                .collect(),
            settings: self.settings.clone(),
            status: self.status(),
        }
    }

    /// The canonical game-state serialization, if a game exists. Carries
    /// the mask at most — the secret word is not representable in the view.
    pub fn game_view(&self) -> Option<GameView> {
        let (game, phase) = match &self.state {
            RoomState::Waiting => return None,
            RoomState::InGame(g) => (g, g.phase.as_game_phase()),
            RoomState::Finished(g) => (g, scrawl_protocol::GamePhase::GameEnd),
        };
        Some(GameView {
            phase,
            current_round: game.current_round.min(game.total_rounds),
            total_rounds: game.total_rounds,
            drawer_id: game.drawer_id,
            drawer_index: game.drawer_index,
            guessed_players: game.guessed.clone(),
            masked_word: game.word.as_ref().map(|w| w.masked().to_string()),
        })
    }

    /// Leaderboard rows: score descending, ties in member insertion order.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        score::leaderboard(&self.members)
    }
}

/// Whether every non-drawer member has guessed this round. Departed members
/// no longer count toward the threshold.
fn all_guessed(members: &[Member], game: &Game) -> bool {
    members
        .iter()
        .filter(|m| m.id != game.drawer_id)
        .all(|m| game.guessed.contains(&m.id))
}
