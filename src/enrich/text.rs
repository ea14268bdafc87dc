use regex::Regex;
use std::sync::LazyLock;

/// Platform tag-length allowance used to scale `rel_char_len`.
pub const TAG_CHAR_ALLOWANCE: f64 = 500.0;

// Runs of punctuation/symbols, and underscores (which `\w` would keep)
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:[^\w\s]|_)+").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// Turn raw tags (`"cat|dog, fun!!"`) into space-joined words (`"cat dog fun"`).
pub fn clean_tags(raw: &str) -> String {
    let spaced = SEPARATOR_RE.replace_all(raw, " ");
    WHITESPACE_RE.replace_all(spaced.trim(), " ").into_owned()
}

/// Character length relative to [`TAG_CHAR_ALLOWANCE`]. Can exceed 1.0.
pub fn relative_char_len(cleaned: &str) -> f64 {
    cleaned.chars().count() as f64 / TAG_CHAR_ALLOWANCE
}

/// Number of word tokens.
pub fn word_count(cleaned: &str) -> usize {
    WORD_RE.find_iter(cleaned).count()
}
