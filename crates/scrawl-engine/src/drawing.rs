//! Stroke relay throttling and batching.
//!
//! The relay is stateless with respect to stroke content: payloads are
//! opaque blobs that are never inspected, only re-ordered into batches.
//! `draw_move` events are rate-limited to one emission per [`MOVE_INTERVAL`];
//! moves landing inside the window accumulate and flush either on the next
//! non-throttled emission or [`BATCH_WINDOW`] after the first buffered move,
//! whichever comes first.

use std::time::{Duration, Instant};

use serde_json::Value;

/// Minimum interval between `draw_move` emissions (30 per second).
pub const MOVE_INTERVAL: Duration = Duration::from_micros(33_333);

/// Maximum time a buffered move waits before a forced flush.
pub const BATCH_WINDOW: Duration = Duration::from_millis(50);

/// Per-room throttle and batch state for stroke fan-out.
#[derive(Debug, Default)]
pub struct DrawRelay {
    last_emit: Option<Instant>,
    pending: Vec<Value>,
    batch_since: Option<Instant>,
}

impl DrawRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts a validated `draw_move`. Returns a batch to emit now, or
    /// `None` if the move was buffered; buffered moves flush at
    /// [`flush_deadline`](Self::flush_deadline).
    pub fn accept_move(&mut self, payload: Value, now: Instant) -> Option<Vec<Value>> {
        let throttled = self
            .last_emit
            .is_some_and(|last| now.duration_since(last) < MOVE_INTERVAL);
        if throttled {
            if self.pending.is_empty() {
                self.batch_since = Some(now);
            }
            self.pending.push(payload);
            None
        } else {
            self.pending.push(payload);
            Some(self.take_batch(now))
        }
    }

    /// Drains the pending batch; called when the batch window elapses.
    pub fn flush_due(&mut self, now: Instant) -> Option<Vec<Value>> {
        if self.pending.is_empty() {
            self.batch_since = None;
            return None;
        }
        Some(self.take_batch(now))
    }

    /// Drains the pending batch ahead of a non-batched event
    /// (`draw_start`, `draw_end`, `clear_canvas`), preserving order.
    pub fn interrupt(&mut self, now: Instant) -> Option<Vec<Value>> {
        self.flush_due(now)
    }

    /// When the pending batch must be force-flushed, if anything is pending.
    pub fn flush_deadline(&self) -> Option<Instant> {
        self.batch_since.map(|since| since + BATCH_WINDOW)
    }

    /// Discards all throttle and batch state; called on round end.
    pub fn reset(&mut self) {
        self.last_emit = None;
        self.pending.clear();
        self.batch_since = None;
    }

    fn take_batch(&mut self, now: Instant) -> Vec<Value> {
        self.last_emit = Some(now);
        self.batch_since = None;
        std::mem::take(&mut self.pending)
    }
}
