//! The per-room game engine for Scrawl.
//!
//! Everything in this crate is synchronous and I/O-free: a [`Room`] is a
//! plain value, operations mutate it and return typed outcomes, and anything
//! time-dependent takes `now` as a parameter. The room actor in
//! `scrawl-room` owns a `Room`, serializes access to it, and turns the
//! outcomes into broadcasts.
//!
//! Module map:
//! - [`room`] — the room aggregate: membership, settings, game lifecycle,
//!   guess adjudication, serialization views.
//! - [`game`] — per-game state: rounds, drawer rotation, the selected word.
//! - [`words`] — word pool, option sampling, masking, hint schedule. The
//!   only module that can read a round's secret.
//! - [`guess`] — guess normalization and chat masking.
//! - [`score`] — time-weighted awards and the leaderboard.
//! - [`drawing`] — stroke throttling and batching.
//! - [`settings`] — clamping of client-supplied settings.

mod error;
pub mod drawing;
pub mod game;
pub mod guess;
pub mod room;
pub mod score;
pub mod settings;
pub mod words;

pub use drawing::{DrawRelay, BATCH_WINDOW, MOVE_INTERVAL};
pub use error::EngineError;
pub use game::{Game, Phase};
pub use room::{
    Departure, GuessOutcome, LeaveGameEffect, Member, Progress, Room,
    RoomState, RoundSummary,
};
pub use words::SelectedWord;
