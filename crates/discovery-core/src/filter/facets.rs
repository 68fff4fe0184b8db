//! Distinct filter values and counts for building filter pickers.

use crate::models::{Capability, ModelRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A distinct value and how many records carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

/// Observed numeric span of a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueBounds {
    pub min: f64,
    pub max: f64,
}

/// Observed release date span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

/// Everything a filter UI needs to offer choices for a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub total: usize,
    pub providers: Vec<FacetCount>,
    pub categories: Vec<FacetCount>,
    pub capabilities: Vec<FacetCount>,
    pub cost: Option<ValueBounds>,
    pub parameters: Option<ValueBounds>,
    pub context_window: Option<ValueBounds>,
    pub accuracy: Option<ValueBounds>,
    pub release_dates: Option<DateSpan>,
}

/// Compute filter options for a collection.
pub fn collect(records: &[ModelRecord]) -> FilterOptions {
    FilterOptions {
        total: records.len(),
        providers: distinct(records.iter().map(|r| r.provider.as_str())),
        categories: distinct(records.iter().map(|r| r.category.as_str())),
        capabilities: capability_counts(records),
        cost: bounds(records.iter().filter_map(ModelRecord::cost)),
        parameters: bounds(records.iter().filter_map(ModelRecord::parameter_count)),
        context_window: bounds(records.iter().filter_map(ModelRecord::context_tokens)),
        accuracy: bounds(records.iter().filter_map(ModelRecord::accuracy)),
        release_dates: date_span(records.iter().filter_map(ModelRecord::release_day)),
    }
}

/// Count distinct non-empty values, grouping case-insensitively and keeping
/// the first spelling seen. Sorted by count descending, then value.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<FacetCount> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut facets: Vec<FacetCount> = Vec::new();

    for value in values {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let slot = *index.entry(value.to_lowercase()).or_insert_with(|| {
            facets.push(FacetCount {
                value: value.to_string(),
                count: 0,
            });
            facets.len() - 1
        });
        facets[slot].count += 1;
    }

    sort_facets(&mut facets);
    facets
}

fn capability_counts(records: &[ModelRecord]) -> Vec<FacetCount> {
    let mut facets: Vec<FacetCount> = Capability::ALL
        .iter()
        .map(|capability| FacetCount {
            value: capability.label().to_string(),
            count: records
                .iter()
                .filter(|r| r.capabilities.get(*capability) == Some(true))
                .count(),
        })
        .filter(|f| f.count > 0)
        .collect();
    sort_facets(&mut facets);
    facets
}

fn sort_facets(facets: &mut [FacetCount]) {
    facets.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.value.to_lowercase().cmp(&b.value.to_lowercase()))
    });
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<ValueBounds> {
    values.fold(None, |acc, v| match acc {
        None => Some(ValueBounds { min: v, max: v }),
        Some(b) => Some(ValueBounds {
            min: b.min.min(v),
            max: b.max.max(v),
        }),
    })
}

fn date_span(days: impl Iterator<Item = NaiveDate>) -> Option<DateSpan> {
    days.fold(None, |acc, d| match acc {
        None => Some(DateSpan {
            earliest: d,
            latest: d,
        }),
        Some(s) => Some(DateSpan {
            earliest: s.earliest.min(d),
            latest: s.latest.max(d),
        }),
    })
}
