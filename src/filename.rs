//! Title-to-filename sanitization.

use crate::defaults;
use regex::Regex;
use std::sync::LazyLock;

/// Characters that may not appear in a filename stem.
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    // SAFETY: hardcoded pattern — always valid
    #[allow(clippy::expect_used)]
    Regex::new(r"[^a-zA-Z0-9 ]+").expect("hardcoded filename pattern")
});

/// Convert a title candidate into a safe filename stem.
///
/// Trims surrounding whitespace and lowercases, deletes every character
/// outside `[a-zA-Z0-9 ]`, replaces each space with a hyphen, and truncates
/// to the first 50 characters. Truncation is not word-boundary-aware, and
/// consecutive spaces become consecutive hyphens. The result may be empty;
/// no uniqueness is guaranteed.
pub fn sanitize_title(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let filtered = DISALLOWED.replace_all(&lowered, "");
    filtered
        .replace(' ', "-")
        .chars()
        .take(defaults::MAX_STEM_CHARS)
        .collect()
}
