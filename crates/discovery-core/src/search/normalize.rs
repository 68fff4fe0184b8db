//! Query and field normalization.

use regex::Regex;
use std::sync::LazyLock;

/// Runs of anything that is not a letter, digit or whitespace.
static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\s]+").unwrap());

/// Lowercase and turn punctuation into whitespace.
pub fn normalize_text(text: &str) -> String {
    PUNCTUATION
        .replace_all(&text.to_lowercase(), " ")
        .into_owned()
}

/// Normalized search terms of a query, in order.
///
/// - "GPT-4 Turbo" → `["gpt", "4", "turbo"]`
/// - "claude_3.5" → `["claude", "3", "5"]`
pub fn query_terms(query: &str) -> Vec<String> {
    normalize_text(query)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// A field value prepared for scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedField {
    /// Words joined by single spaces.
    pub text: String,
    pub words: Vec<String>,
}

impl NormalizedField {
    pub fn new(raw: &str) -> Self {
        let words: Vec<String> = normalize_text(raw)
            .split_whitespace()
            .map(str::to_string)
            .collect();
        Self {
            text: words.join(" "),
            words,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
