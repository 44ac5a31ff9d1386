//! Word pool, option sampling, the selected word, masking, and the hint
//! reveal schedule.
//!
//! [`SelectedWord`] is the only place the secret of a round lives. Its inner
//! string is private to this module; the rest of the engine compares guesses
//! through [`SelectedWord::matches`] and the room layer reveals it only via
//! [`SelectedWord::reveal`] at the explicitly revealing events.

use rand::seq::IndexedRandom;
use rand::Rng;

use scrawl_protocol::Settings;

/// How many word choices the drawer is offered.
pub const OPTION_COUNT: usize = 3;

/// The builtin word pool. All lowercase; room custom words are merged in.
pub const WORDS: &[&str] = &[
    "apple", "airplane", "anchor", "ant", "arrow", "axe", "backpack",
    "balloon", "banana", "barn", "basket", "bat", "beach", "bear", "bed",
    "bee", "bell", "bicycle", "bird", "boat", "book", "boot", "bottle",
    "bowl", "bread", "bridge", "broom", "bus", "butterfly", "cactus", "cake",
    "camel", "camera", "candle", "car", "carrot", "castle", "cat", "chair",
    "cheese", "cherry", "chicken", "church", "circus", "cloud", "clown",
    "comb", "computer", "cookie", "couch", "cow", "crab", "crayon", "crown",
    "cup", "dinosaur", "dog", "dolphin", "donut", "door", "dragon", "drum",
    "duck", "eagle", "ear", "egg", "elephant", "envelope", "eye", "feather",
    "fence", "fire", "fish", "flag", "flower", "fork", "fox", "frog",
    "ghost", "giraffe", "glasses", "glove", "grapes", "guitar", "hammer",
    "hand", "hat", "heart", "helicopter", "horse", "house", "ice cream",
    "igloo", "island", "jacket", "jellyfish", "kangaroo", "key", "kite",
    "ladder", "lamp", "leaf", "lemon", "lighthouse", "lion", "lizard",
    "lobster", "lock", "map", "monkey", "moon", "mountain", "mouse",
    "mushroom", "nose", "octopus", "orange", "owl", "palm tree", "pancake",
    "panda", "parrot", "pencil", "penguin", "piano", "pig", "pillow",
    "pineapple", "pirate", "pizza", "rabbit", "rainbow", "robot", "rocket",
    "rose", "sailboat", "sandwich", "scissors", "shark", "sheep", "shoe",
    "snail", "snake", "snowman", "spider", "spoon", "star", "strawberry",
    "sun", "swing", "sword", "tent", "tiger", "train", "tree", "turtle",
    "umbrella", "violin", "volcano", "whale", "windmill", "zebra",
];

/// Composes the pool for a room: builtin words plus the room's custom words,
/// deduplicated. The pool is computed on demand and never stored.
pub fn word_pool(settings: &Settings) -> Vec<String> {
    let mut pool: Vec<String> = WORDS.iter().map(|w| w.to_string()).collect();
    for word in &settings.custom_words {
        if !pool.iter().any(|existing| existing == word) {
            pool.push(word.clone());
        }
    }
    pool
}

/// Samples up to [`OPTION_COUNT`] distinct words from the pool, uniformly
/// and without replacement. Returns fewer when the pool is smaller.
pub fn generate_options<R: Rng + ?Sized>(
    pool: &[String],
    rng: &mut R,
) -> Vec<String> {
    pool.choose_multiple(rng, OPTION_COUNT).cloned().collect()
}

// ---------------------------------------------------------------------------
// SelectedWord
// ---------------------------------------------------------------------------

/// The secret word of a round together with its client-safe mask.
///
/// Not serializable, and the secret has no public accessor besides
/// [`reveal`](Self::reveal) — view types physically cannot leak it.
#[derive(Debug, Clone)]
pub struct SelectedWord {
    secret: String,
    masked: String,
}

impl SelectedWord {
    /// Wraps an already-normalized (trimmed, lowercased) word.
    pub(crate) fn new(normalized: String) -> Self {
        let masked = mask(&normalized);
        Self {
            secret: normalized,
            masked,
        }
    }

    /// The display mask: `"ice cream"` → `"_ _ _  _ _ _ _ _"`.
    pub fn masked(&self) -> &str {
        &self.masked
    }

    /// Whether a normalized guess matches exactly.
    pub fn matches(&self, normalized_guess: &str) -> bool {
        self.secret == normalized_guess
    }

    /// The secret itself. Callers are the reveal events only: the drawer's
    /// `drawing_started`, `correct_guess`, and `round_ended`.
    pub fn reveal(&self) -> &str {
        &self.secret
    }
}

/// Masks a word for display: every non-space character becomes `_`, the
/// characters of each space-separated group are joined with single spaces,
/// and groups are joined with a double space.
pub fn mask(word: &str) -> String {
    word.split(' ')
        .map(|group| {
            group
                .chars()
                .map(|_| "_")
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("  ")
}

// ---------------------------------------------------------------------------
// Hint schedule
// ---------------------------------------------------------------------------

/// The deterministic letter-reveal order for hints: character offsets
/// congruent to 2 mod 4 first (ascending), then 3, then 1, then 0. Spaces
/// are never revealed (they are visible in the mask already).
///
/// Whether hints fire at all is a room setting; the baseline server computes
/// the schedule but never triggers it.
pub fn hint_schedule(word: &str) -> Vec<usize> {
    let chars: Vec<char> = word.chars().collect();
    let mut order = Vec::new();
    for start in [2usize, 3, 1, 0] {
        let mut i = start;
        while i < chars.len() {
            if chars[i] != ' ' {
                order.push(i);
            }
            i += 4;
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_pool_is_lowercase_and_unique() {
        let unique: HashSet<_> = WORDS.iter().collect();
        assert_eq!(unique.len(), WORDS.len());
        for word in WORDS {
            assert_eq!(*word, word.to_lowercase().as_str());
            assert!(!word.trim().is_empty());
        }
        assert!(WORDS.len() >= 150);
    }

    #[test]
    fn test_mask_single_word() {
        assert_eq!(mask("cat"), "_ _ _");
    }

    #[test]
    fn test_mask_preserves_word_groups() {
        assert_eq!(mask("ice cream"), "_ _ _  _ _ _ _ _");
    }

    #[test]
    fn test_mask_counts_unicode_chars_not_bytes() {
        assert_eq!(mask("héron"), "_ _ _ _ _");
    }

    #[test]
    fn test_word_pool_merges_and_dedupes_custom_words() {
        let settings = Settings {
            custom_words: vec!["cat".into(), "ferris".into()],
            ..Settings::default()
        };
        let pool = word_pool(&settings);
        assert_eq!(
            pool.iter().filter(|w| w.as_str() == "cat").count(),
            1,
            "builtin duplicate must not be added twice"
        );
        assert!(pool.iter().any(|w| w == "ferris"));
        assert_eq!(pool.len(), WORDS.len() + 1);
    }

    #[test]
    fn test_generate_options_distinct_words_from_pool() {
        let pool = word_pool(&Settings::default());
        let mut rng = rand::rng();
        for _ in 0..20 {
            let options = generate_options(&pool, &mut rng);
            assert_eq!(options.len(), OPTION_COUNT);
            let unique: HashSet<_> = options.iter().collect();
            assert_eq!(unique.len(), OPTION_COUNT);
            for word in &options {
                assert!(WORDS.contains(&word.as_str()));
            }
        }
    }

    #[test]
    fn test_generate_options_small_pool_returns_fewer() {
        let pool = vec!["onlyword".to_string()];
        let mut rng = rand::rng();
        let picked = generate_options(&pool, &mut rng);
        assert_eq!(picked, vec!["onlyword".to_string()]);
    }

    #[test]
    fn test_selected_word_masks_and_matches() {
        let word = SelectedWord::new("ice cream".into());
        assert_eq!(word.masked(), "_ _ _  _ _ _ _ _");
        assert!(word.matches("ice cream"));
        assert!(!word.matches("icecream"));
        assert_eq!(word.reveal(), "ice cream");
    }

    #[test]
    fn test_hint_schedule_order() {
        // indices:        012345
        assert_eq!(hint_schedule("abcdef"), vec![2, 3, 1, 5, 0, 4]);
    }

    #[test]
    fn test_hint_schedule_skips_spaces_and_covers_all_letters() {
        let word = "ice cream";
        let schedule = hint_schedule(word);
        let chars: Vec<char> = word.chars().collect();
        assert!(schedule.iter().all(|&i| chars[i] != ' '));
        let revealed: HashSet<_> = schedule.iter().copied().collect();
        assert_eq!(revealed.len(), word.chars().filter(|c| *c != ' ').count());
    }
}
