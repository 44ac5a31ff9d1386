//! Time-weighted scoring and the leaderboard.

use std::time::Duration;

use scrawl_protocol::LeaderboardEntry;

use crate::room::Member;

/// Points a guesser earns for a correct guess `elapsed` into a round with
/// the given draw time:
///
/// ```text
/// ratio = clamp(elapsed / draw_time, 0, 1)
/// score = max(10, floor(100 + 100 * (1 - ratio)))
/// ```
///
/// A guess at the buzzer is still worth 100; the floor of 10 guards against
/// pathological clock input.
pub fn guesser_award(elapsed: Duration, draw_time_secs: u64) -> u32 {
    let ratio = (elapsed.as_secs_f64() / draw_time_secs as f64).clamp(0.0, 1.0);
    let score = (100.0 + 100.0 * (1.0 - ratio)).floor() as u32;
    score.max(10)
}

/// Points the drawer earns at round end: 50 per correct guesser.
pub fn drawer_award(guessed_count: usize) -> u32 {
    guessed_count as u32 * 50
}

/// Builds the leaderboard: score descending, ties stable in member
/// insertion order.
pub fn leaderboard(members: &[Member]) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = members
        .iter()
        .map(|m| LeaderboardEntry {
            player_id: m.id,
            name: m.name.clone(),
            score: m.score,
        })
        .collect();
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries
}
