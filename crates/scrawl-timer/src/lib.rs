//! Single-slot countdown for Scrawl room actors.
//!
//! Each room owns exactly one [`Countdown`]; arming it for a new phase
//! replaces whatever was running, which is how the "at most one timer per
//! room" invariant holds by construction. The countdown emits one
//! [`CountdownEvent::Tick`] per elapsed second — `remaining` decreasing
//! monotonically to 0 — followed by exactly one [`CountdownEvent::Expired`].
//!
//! # Integration
//!
//! The countdown is designed to sit inside a room actor's `tokio::select!`
//! loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands */ }
//!         event = countdown.wait() => { /* tick or expiry */ }
//!     }
//! }
//! ```
//!
//! While disarmed, [`Countdown::wait`] pends forever — `select!` simply
//! services the other branches. [`Countdown::clear`] is idempotent, and
//! because the actor is the only caller, no tick or expiry can be observed
//! after it returns.

use std::fmt;
use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace};

/// Seconds the drawer has to pick a word.
pub const WORD_SELECTION_SECS: u64 = 15;

/// Seconds between `round_ended` and the next drawer's word selection.
pub const ROUND_BREAK_SECS: u64 = 3;

// ---------------------------------------------------------------------------
// Timer kinds
// ---------------------------------------------------------------------------

/// What a countdown is timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// The drawer's word choice window ([`WORD_SELECTION_SECS`]).
    WordSelection,
    /// The drawing phase (duration comes from room settings).
    Drawing,
    /// The pause between rounds ([`ROUND_BREAK_SECS`]).
    RoundBreak,
}

impl TimerKind {
    /// The wire label used in `timer_tick` payloads.
    pub fn label(&self) -> &'static str {
        match self {
            Self::WordSelection => "word_selection",
            Self::Drawing => "drawing",
            Self::RoundBreak => "round_break",
        }
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// An event produced by [`Countdown::wait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// A whole second elapsed; `remaining` seconds are left.
    Tick { kind: TimerKind, remaining: u64 },
    /// The countdown reached its deadline. The slot is now empty.
    Expired { kind: TimerKind },
}

// ---------------------------------------------------------------------------
// Countdown
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Slot {
    kind: TimerKind,
    /// Seconds left; decremented as each tick fires.
    secs_left: u64,
    /// When the next tick is due.
    next_tick: Instant,
    /// Set after the final (zero) tick so the expiry fires on the next
    /// `wait` without sleeping.
    expiry_pending: bool,
}

/// The per-room countdown slot.
#[derive(Debug, Default)]
pub struct Countdown {
    slot: Option<Slot>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the countdown, replacing any running timer.
    pub fn arm(&mut self, kind: TimerKind, duration_secs: u64) {
        if let Some(old) = &self.slot {
            debug!(old = %old.kind, new = %kind, "replacing armed countdown");
        }
        self.slot = Some(Slot {
            kind,
            secs_left: duration_secs,
            next_tick: Instant::now() + Duration::from_secs(1),
            expiry_pending: duration_secs == 0,
        });
    }

    /// Disarms the countdown. Idempotent; nothing fires afterwards.
    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// The kind currently armed, if any.
    pub fn kind(&self) -> Option<TimerKind> {
        self.slot.as_ref().map(|s| s.kind)
    }

    pub fn is_armed(&self) -> bool {
        self.slot.is_some()
    }

    /// Waits for the next tick or expiry. Pends forever while disarmed.
    pub async fn wait(&mut self) -> CountdownEvent {
        let slot = match &mut self.slot {
            Some(slot) => slot,
            None => {
                // Never resolves — select! services other branches.
                std::future::pending::<()>().await;
                unreachable!()
            }
        };

        if slot.expiry_pending {
            let kind = slot.kind;
            self.slot = None;
            return CountdownEvent::Expired { kind };
        }

        time::sleep_until(slot.next_tick).await;
        slot.secs_left -= 1;
        slot.next_tick += Duration::from_secs(1);
        if slot.secs_left == 0 {
            slot.expiry_pending = true;
        }
        trace!(kind = %slot.kind, remaining = slot.secs_left, "countdown tick");
        CountdownEvent::Tick {
            kind: slot.kind,
            remaining: slot.secs_left,
        }
    }
}
