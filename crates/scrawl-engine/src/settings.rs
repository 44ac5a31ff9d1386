//! Settings validation.
//!
//! Client-supplied settings are clamped into range, never rejected: sending
//! `maxPlayers: 999` yields a room capped at 12. Custom words are trimmed,
//! lowercased, deduplicated and capped; unusable entries are dropped.

use scrawl_protocol::{Settings, SettingsInput};

/// Allowed room capacity.
pub const MAX_PLAYERS_MIN: i64 = 2;
pub const MAX_PLAYERS_MAX: i64 = 12;

/// Allowed drawing time per round, in seconds.
pub const DRAW_TIME_MIN: i64 = 30;
pub const DRAW_TIME_MAX: i64 = 120;

/// Allowed number of full rotations.
pub const ROUNDS_MIN: i64 = 1;
pub const ROUNDS_MAX: i64 = 10;

/// Maximum length of a single custom word.
pub const CUSTOM_WORD_MAX_LEN: usize = 50;

/// Maximum number of custom words kept per room.
pub const CUSTOM_WORDS_MAX: usize = 50;

/// Merges raw client input onto `base`, clamping every numeric field into
/// range. Absent fields keep their current value, which makes repeated
/// updates with identical input idempotent.
pub fn merged(base: &Settings, input: &SettingsInput) -> Settings {
    Settings {
        max_players: input
            .max_players
            .map(|v| v.clamp(MAX_PLAYERS_MIN, MAX_PLAYERS_MAX) as usize)
            .unwrap_or(base.max_players),
        draw_time: input
            .draw_time
            .map(|v| v.clamp(DRAW_TIME_MIN, DRAW_TIME_MAX) as u64)
            .unwrap_or(base.draw_time),
        rounds: input
            .rounds
            .map(|v| v.clamp(ROUNDS_MIN, ROUNDS_MAX) as u32)
            .unwrap_or(base.rounds),
        hints: input.hints.unwrap_or(base.hints),
        custom_words: input
            .custom_words
            .as_ref()
            .map(|words| sanitize_custom_words(words))
            .unwrap_or_else(|| base.custom_words.clone()),
    }
}

/// Clamps raw input against the defaults; used at room creation.
pub fn sanitize(input: &SettingsInput) -> Settings {
    merged(&Settings::default(), input)
}

/// Trims, lowercases, drops empty and over-long entries, deduplicates
/// preserving first occurrence, and caps the list.
fn sanitize_custom_words(words: &[String]) -> Vec<String> {
    let mut seen = Vec::with_capacity(words.len().min(CUSTOM_WORDS_MAX));
    for word in words {
        let word = word.trim().to_lowercase();
        if word.is_empty() || word.chars().count() > CUSTOM_WORD_MAX_LEN {
            continue;
        }
        if seen.contains(&word) {
            continue;
        }
        seen.push(word);
        if seen.len() == CUSTOM_WORDS_MAX {
            break;
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> SettingsInput {
        SettingsInput::default()
    }

    #[test]
    fn test_sanitize_empty_input_gives_defaults() {
        assert_eq!(sanitize(&input()), Settings::default());
    }

    #[test]
    fn test_max_players_clamps_both_ends() {
        let low = sanitize(&SettingsInput {
            max_players: Some(0),
            ..input()
        });
        assert_eq!(low.max_players, 2);

        let high = sanitize(&SettingsInput {
            max_players: Some(999),
            ..input()
        });
        assert_eq!(high.max_players, 12);
    }

    #[test]
    fn test_draw_time_and_rounds_clamp() {
        let s = sanitize(&SettingsInput {
            draw_time: Some(5),
            rounds: Some(-2),
            ..input()
        });
        assert_eq!(s.draw_time, 30);
        assert_eq!(s.rounds, 1);

        let s = sanitize(&SettingsInput {
            draw_time: Some(100_000),
            rounds: Some(99),
            ..input()
        });
        assert_eq!(s.draw_time, 120);
        assert_eq!(s.rounds, 10);
    }

    #[test]
    fn test_in_range_values_pass_through() {
        let s = sanitize(&SettingsInput {
            max_players: Some(4),
            draw_time: Some(45),
            rounds: Some(5),
            hints: Some(false),
            ..input()
        });
        assert_eq!(s.max_players, 4);
        assert_eq!(s.draw_time, 45);
        assert_eq!(s.rounds, 5);
        assert!(!s.hints);
    }

    #[test]
    fn test_merged_keeps_unspecified_fields() {
        let base = Settings {
            max_players: 4,
            draw_time: 60,
            rounds: 2,
            hints: false,
            custom_words: vec!["cat".into()],
        };
        let merged = merged(
            &base,
            &SettingsInput {
                rounds: Some(7),
                ..input()
            },
        );
        assert_eq!(merged.rounds, 7);
        assert_eq!(merged.max_players, 4);
        assert_eq!(merged.draw_time, 60);
        assert!(!merged.hints);
        assert_eq!(merged.custom_words, vec!["cat".to_string()]);
    }

    #[test]
    fn test_merged_is_idempotent() {
        let patch = SettingsInput {
            max_players: Some(6),
            custom_words: Some(vec!["Dog".into(), "  cat ".into()]),
            ..input()
        };
        let once = merged(&Settings::default(), &patch);
        let twice = merged(&once, &patch);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_custom_words_are_trimmed_lowercased_deduped() {
        let s = sanitize(&SettingsInput {
            custom_words: Some(vec![
                "  Ice Cream ".into(),
                "ice cream".into(),
                "".into(),
                "   ".into(),
                "dog".into(),
            ]),
            ..input()
        });
        assert_eq!(
            s.custom_words,
            vec!["ice cream".to_string(), "dog".to_string()]
        );
    }

    #[test]
    fn test_custom_words_drop_overlong_and_cap_count() {
        let long = "x".repeat(51);
        let many: Vec<String> = (0..80).map(|i| format!("word{i}")).collect();

        let s = sanitize(&SettingsInput {
            custom_words: Some(
                std::iter::once(long).chain(many).collect::<Vec<_>>(),
            ),
            ..input()
        });
        assert_eq!(s.custom_words.len(), CUSTOM_WORDS_MAX);
        assert_eq!(s.custom_words[0], "word0");
    }
}
