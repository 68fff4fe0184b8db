//! Relevance scoring.
//!
//! Each term is scored against each configured field, term scores are summed
//! per field (capped at 1.0), and field scores are combined with the field
//! weights. The final score is clamped to [0, 1].

use super::fuzzy::similarity;
use super::normalize::NormalizedField;
use crate::config::FieldWeights;
use crate::models::{FieldMatch, ModelRecord, SearchOptions};

const FULL_MATCH: f64 = 1.0;
const WORD_MATCH: f64 = 0.9;
const WORD_PREFIX_MATCH: f64 = 0.8;
const SUBSTRING_FACTOR: f64 = 0.7;

/// Maximum relative length difference for a fuzzy word comparison.
const MAX_LENGTH_DISPARITY: f64 = 0.5;
/// Words this short are only fuzzy-compared against short terms.
const SHORT_WORD_LEN: usize = 2;
const SHORT_WORD_MAX_TERM_LEN: usize = 3;

/// Clamp to [0, 1], mapping NaN to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Exact scoring: the first applicable case wins.
pub fn exact_term_score(field: &NormalizedField, term: &str) -> f64 {
    if field.is_empty() || term.is_empty() {
        return 0.0;
    }
    if field.text == term {
        FULL_MATCH
    } else if field.words.iter().any(|w| w == term) {
        WORD_MATCH
    } else if field.words.iter().any(|w| w.starts_with(term)) {
        WORD_PREFIX_MATCH
    } else if field.text.contains(term) {
        let ratio = term.chars().count() as f64 / field.text.chars().count() as f64;
        SUBSTRING_FACTOR * ratio
    } else {
        0.0
    }
}

/// Fuzzy scoring: substring presence is a full match, otherwise the best
/// word similarity that reaches `threshold`.
pub fn fuzzy_term_score(field: &NormalizedField, term: &str, threshold: f64) -> f64 {
    if field.is_empty() || term.is_empty() {
        return 0.0;
    }
    if field.text.contains(term) {
        return FULL_MATCH;
    }

    let term_len = term.chars().count();
    let mut best = 0.0;

    for word in &field.words {
        let word_len = word.chars().count();
        let longest = word_len.max(term_len);
        let disparity = word_len.abs_diff(term_len) as f64 / longest as f64;
        if disparity > MAX_LENGTH_DISPARITY {
            continue;
        }
        if word_len <= SHORT_WORD_LEN && term_len > SHORT_WORD_MAX_TERM_LEN {
            continue;
        }

        let score = similarity(word, term);
        if score >= threshold && score > best {
            best = score;
        }
    }

    best
}

/// Score one record against normalized query terms.
///
/// Returns the clamped score and, when requested, the contributing fields
/// ordered by descending sub-score.
pub fn score_record(
    record: &ModelRecord,
    terms: &[String],
    options: &SearchOptions,
    weights: &FieldWeights,
) -> (f64, Option<Vec<FieldMatch>>) {
    let mut total = 0.0;
    let mut matches = Vec::new();

    for &field in &options.fields {
        let raw = field.value(record);
        let normalized = NormalizedField::new(raw);
        if normalized.is_empty() {
            continue;
        }

        let field_score: f64 = terms
            .iter()
            .map(|term| {
                if options.fuzzy {
                    fuzzy_term_score(&normalized, term, options.fuzzy_threshold)
                } else {
                    exact_term_score(&normalized, term)
                }
            })
            .sum::<f64>()
            .min(1.0);

        if field_score <= 0.0 {
            continue;
        }
        total += weights.weight(field) * field_score;

        if options.include_matches {
            matches.push(FieldMatch {
                field,
                value: raw.to_string(),
                score: clamp_unit(field_score),
            });
        }
    }

    let matches = options.include_matches.then(|| {
        // Stable: equal sub-scores keep the configured field order.
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches
    });

    (clamp_unit(total), matches)
}
