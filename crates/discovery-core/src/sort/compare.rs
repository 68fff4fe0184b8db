//! Sort key extraction and comparison.

use crate::models::{ModelRecord, SortDirection, SortField};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// A comparable value pulled out of a record for one sort field.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    /// Lowercased text.
    Text(String),
    Number(f64),
    /// UTC instant.
    Date(DateTime<Utc>),
}

impl SortValue {
    /// Ascending comparison of two values of the same field.
    pub fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
            // A field always yields one kind of value.
            _ => Ordering::Equal,
        }
    }
}

/// The value of `field` on `record`, or `None` when it is missing.
///
/// Empty strings, non-finite numbers and unparseable dates count as missing.
pub fn sort_value(record: &ModelRecord, field: SortField) -> Option<SortValue> {
    match field {
        SortField::Name => text(&record.name),
        SortField::Provider => text(&record.provider),
        SortField::Category => text(&record.category),
        SortField::ModelId => text(&record.model_id),
        SortField::Cost => number(record.cost()),
        SortField::InputCost => number(record.input_cost()),
        SortField::OutputCost => number(record.output_cost()),
        SortField::Parameters => number(record.parameter_count()),
        SortField::ContextWindow => number(record.context_tokens()),
        SortField::Accuracy => number(record.accuracy()),
        SortField::Speed => number(record.speed()),
        SortField::Popularity => number(record.popularity()),
        SortField::ReleaseDate => record.release_time().map(SortValue::Date),
        SortField::UpdatedAt => record.update_time().map(SortValue::Date),
    }
}

fn text(value: &str) -> Option<SortValue> {
    let value = value.trim();
    (!value.is_empty()).then(|| SortValue::Text(value.to_lowercase()))
}

fn number(value: Option<f64>) -> Option<SortValue> {
    value.filter(|v| !v.is_nan()).map(SortValue::Number)
}

/// Compare two optional keys. Missing keys go last in either direction.
pub fn compare_keys(
    a: Option<&SortValue>,
    b: Option<&SortValue>,
    direction: SortDirection,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => direction.apply(a.compare(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
