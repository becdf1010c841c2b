use std::fmt;

use serde::{Serialize, Serializer};

/// Estimated minutes to read a text, rounded up.
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct ReadingTime {
    minutes: u64,
}

impl ReadingTime {
    pub const DEFAULT_WORDS_PER_MINUTE: u64 = 200;

    /// Zero words read in zero minutes. A zero rate is clamped to one word
    /// per minute.
    pub fn from_words(words: u64, words_per_minute: u64) -> Self {
        let words_per_minute = words_per_minute.max(1);
        Self {
            minutes: words.div_ceil(words_per_minute),
        }
    }

    pub fn minutes(&self) -> u64 {
        self.minutes
    }
}

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.minutes)
    }
}

impl Serialize for ReadingTime {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Number of whitespace separated tokens in a plain text.
pub fn count_words(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

/// Words of a section: its heading, if any, plus every body fragment.
pub fn section_word_count<'a, I>(heading: Option<&str>, fragments: I) -> u64
where
    I: IntoIterator<Item = &'a str>,
{
    heading.map(count_words).unwrap_or_default()
        + fragments.into_iter().map(count_words).sum::<u64>()
}
