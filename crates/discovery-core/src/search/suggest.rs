//! Query completion suggestions.

use crate::models::{ModelRecord, Suggestion, SuggestionKind};
use std::collections::HashMap;

/// Propose completions for `query` from names, providers, categories and
/// capability labels that contain it.
///
/// Candidates are deduplicated by lowercase text; each carries the number of
/// records it occurs on. Sorted by count descending, then text.
pub fn suggestions(records: &[ModelRecord], query: &str, limit: usize) -> Vec<Suggestion> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut found: Vec<Suggestion> = Vec::new();

    let mut offer = |text: &str, kind: SuggestionKind| {
        let text = text.trim();
        let key = text.to_lowercase();
        if key.is_empty() || !key.contains(&needle) {
            return;
        }
        let slot = *index.entry(key).or_insert_with(|| {
            found.push(Suggestion {
                text: text.to_string(),
                kind,
                count: 0,
            });
            found.len() - 1
        });
        found[slot].count += 1;
    };

    for record in records {
        offer(&record.name, SuggestionKind::Model);
    }
    for record in records {
        offer(&record.provider, SuggestionKind::Provider);
    }
    for record in records {
        offer(&record.category, SuggestionKind::Category);
    }
    for record in records {
        for capability in record.supported_capabilities() {
            offer(capability.label(), SuggestionKind::Capability);
        }
    }

    found.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.text.to_lowercase().cmp(&b.text.to_lowercase()))
    });
    found.truncate(limit);
    found
}
