//! Search option and result types.

use super::record::ModelRecord;
use crate::config::SearchDefaults;
use crate::error::{DiscoveryError, Result};
use serde::{Deserialize, Serialize};

/// A free-text field the search scorer looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchField {
    Name,
    ModelId,
    Provider,
    Description,
    Category,
}

impl SearchField {
    pub const ALL: [SearchField; 5] = [
        SearchField::Name,
        SearchField::ModelId,
        SearchField::Provider,
        SearchField::Description,
        SearchField::Category,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Name => "name",
            SearchField::ModelId => "modelId",
            SearchField::Provider => "provider",
            SearchField::Description => "description",
            SearchField::Category => "category",
        }
    }

    /// Raw value of this field on a record.
    pub fn value<'a>(&self, record: &'a ModelRecord) -> &'a str {
        match self {
            SearchField::Name => &record.name,
            SearchField::ModelId => &record.model_id,
            SearchField::Provider => &record.provider,
            SearchField::Description => &record.description,
            SearchField::Category => &record.category,
        }
    }
}

impl std::fmt::Display for SearchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-call search options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    /// Use edit-distance matching for terms that are not substrings.
    pub fuzzy: bool,
    /// Minimum similarity (0-1) for a fuzzy word match to count.
    pub fuzzy_threshold: f64,
    /// Maximum number of results.
    pub limit: usize,
    /// Results scoring below this (0-1) are dropped.
    pub min_score: f64,
    /// Fields to score, in reporting order.
    pub fields: Vec<SearchField>,
    /// Attach per-field match details to each result.
    pub include_matches: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            fuzzy: SearchDefaults::FUZZY,
            fuzzy_threshold: SearchDefaults::FUZZY_THRESHOLD,
            limit: SearchDefaults::LIMIT,
            min_score: SearchDefaults::MIN_SCORE,
            fields: SearchField::ALL.to_vec(),
            include_matches: false,
        }
    }
}

impl SearchOptions {
    /// Reject options that can only come from a programming error.
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(DiscoveryError::validation("limit", "must be at least 1"));
        }
        if !unit_interval(self.fuzzy_threshold) {
            return Err(DiscoveryError::validation(
                "fuzzyThreshold",
                format!("must be within [0, 1], got {}", self.fuzzy_threshold),
            ));
        }
        if !unit_interval(self.min_score) {
            return Err(DiscoveryError::validation(
                "minScore",
                format!("must be within [0, 1], got {}", self.min_score),
            ));
        }
        if self.fields.is_empty() {
            return Err(DiscoveryError::validation(
                "fields",
                "at least one search field is required",
            ));
        }
        Ok(())
    }
}

fn unit_interval(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

/// How one field contributed to a result's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMatch {
    pub field: SearchField,
    /// The raw field value that matched.
    pub value: String,
    pub score: f64,
}

/// A ranked search hit borrowing the matched record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<'a> {
    pub record: &'a ModelRecord,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<FieldMatch>>,
}

/// Where a suggestion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionKind {
    Model,
    Provider,
    Category,
    Capability,
}

/// A query completion candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub kind: SuggestionKind,
    /// Number of records carrying this value.
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_options() {
        let options = SearchOptions::default();
        assert!(options.fuzzy);
        assert_eq!(options.fuzzy_threshold, 0.6);
        assert_eq!(options.limit, 100);
        assert_eq!(options.min_score, 0.2);
        assert_eq!(options.fields.len(), 5);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_partial_options_from_json() {
        let options: SearchOptions = serde_json::from_value(json!({
            "fuzzy": false,
            "fields": ["name", "modelId"]
        }))
        .unwrap();
        assert!(!options.fuzzy);
        assert_eq!(options.limit, 100);
        assert_eq!(options.fields, vec![SearchField::Name, SearchField::ModelId]);
    }

    #[test]
    fn test_validate_rejects_zero_limit() {
        let options = SearchOptions {
            limit: 0,
            ..Default::default()
        };
        let err = options.validate().unwrap_err();
        assert_eq!(err.field(), Some("limit"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_scores() {
        let options = SearchOptions {
            min_score: 1.5,
            ..Default::default()
        };
        assert_eq!(options.validate().unwrap_err().field(), Some("minScore"));

        let options = SearchOptions {
            fuzzy_threshold: f64::NAN,
            ..Default::default()
        };
        assert_eq!(
            options.validate().unwrap_err().field(),
            Some("fuzzyThreshold")
        );
    }

    #[test]
    fn test_field_value() {
        let record = ModelRecord {
            id: "1".into(),
            model_id: "anthropic/claude".into(),
            ..Default::default()
        };
        assert_eq!(SearchField::ModelId.value(&record), "anthropic/claude");
        assert_eq!(SearchField::Name.value(&record), "");
    }
}
