//! Word count and reading time estimates.

use std::sync::LazyLock;

use regex::Regex;

/// Assumed reading speed.
pub const WORDS_PER_MINUTE: usize = 200;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));

/// Word count and estimated minutes to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingTime {
    pub words: usize,
    pub minutes: usize,
}

/// Estimate reading time for rendered HTML.
///
/// Tags are stripped with a crude `<...>` pass before counting
/// whitespace-separated words. Minutes round half to even and never drop
/// below one.
pub fn reading_time(html: &str) -> ReadingTime {
    let text = TAG.replace_all(html, "");
    let words = text.split_whitespace().count();
    let minutes = (words as f64 / WORDS_PER_MINUTE as f64).round_ties_even() as usize;

    ReadingTime {
        words,
        minutes: minutes.max(1),
    }
}
