//! Word/character counting and the manuscript progress indicator.

/// Counts of the plain-text form of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WordCount {
    pub words: usize,
    pub characters: usize,
}

/// Counts whitespace-delimited non-empty tokens and raw characters.
pub fn count(text: &str) -> WordCount {
    WordCount {
        words: text.split_whitespace().count(),
        characters: text.chars().count(),
    }
}

/// Progress toward the manuscript word target, as a percentage in `0..=100`.
pub fn progress_percent(words: usize, target_words: usize) -> f32 {
    if target_words == 0 {
        return 100.0;
    }
    (words as f32 / target_words as f32).min(1.0) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_whitespace_delimited_tokens() {
        let counted = count("hello   world\n\nfoo");
        assert_eq!(counted.words, 3);
        assert_eq!(counted.characters, 18);
    }

    #[test]
    fn empty_buffer_counts_zero() {
        assert_eq!(count(""), WordCount::default());
        assert_eq!(count("   \n\t ").words, 0);
    }

    #[test]
    fn progress_is_clamped_to_one_hundred() {
        assert_eq!(progress_percent(40_000, 80_000), 50.0);
        assert_eq!(progress_percent(200_000, 80_000), 100.0);
        assert_eq!(progress_percent(0, 80_000), 0.0);
    }
}
