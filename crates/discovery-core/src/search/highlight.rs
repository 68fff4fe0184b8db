//! Match highlighting.

use crate::config::HighlightConfig;
use regex::{Captures, Regex};
use tracing::warn;

/// Wrap every case-insensitive occurrence of every whitespace-separated
/// query term in highlight markers.
///
/// Longer terms win when several match at the same position. Terms are
/// matched literally. An empty query returns the text unchanged.
pub fn highlight_matches(text: &str, query: &str) -> String {
    let mut terms: Vec<&str> = query.split_whitespace().collect();
    if terms.is_empty() || text.is_empty() {
        return text.to_string();
    }
    terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    terms.dedup();

    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");

    let pattern = match Regex::new(&format!("(?i)(?:{})", alternation)) {
        Ok(re) => re,
        Err(e) => {
            warn!("Skipping highlight, query did not compile: {}", e);
            return text.to_string();
        }
    };

    pattern
        .replace_all(text, |caps: &Captures| {
            format!("{}{}{}", HighlightConfig::OPEN, &caps[0], HighlightConfig::CLOSE)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_single_term() {
        assert_eq!(
            highlight_matches("Claude 3 Sonnet", "claude"),
            "<mark>Claude</mark> 3 Sonnet"
        );
    }

    #[test]
    fn test_highlight_every_occurrence_and_term() {
        assert_eq!(
            highlight_matches("GPT-4 beats gpt-3", "GPT beats"),
            "<mark>GPT</mark>-4 <mark>beats</mark> <mark>gpt</mark>-3"
        );
    }

    #[test]
    fn test_longer_term_wins() {
        assert_eq!(
            highlight_matches("llama2", "llama llama2"),
            "<mark>llama2</mark>"
        );
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        assert_eq!(highlight_matches("v1.5 v105", "1.5"), "v<mark>1.5</mark> v105");
        assert_eq!(highlight_matches("a+b", "(a"), "a+b");
    }

    #[test]
    fn test_empty_query_is_identity() {
        assert_eq!(highlight_matches("Claude", "   "), "Claude");
        assert_eq!(highlight_matches("", "claude"), "");
    }
}
