//! Per-axis filter predicates.
//!
//! Each specified axis of a [`FilterCriteria`] compiles to one independent
//! predicate over a single record. Unspecified axes compile to nothing.

use crate::models::{Capability, FilterCriteria, ModelRecord, NumericRange};

type Test<'c> = Box<dyn Fn(&ModelRecord) -> bool + 'c>;

/// A compiled constraint on one axis.
pub struct AxisPredicate<'c> {
    axis: &'static str,
    test: Test<'c>,
}

impl<'c> AxisPredicate<'c> {
    fn new(axis: &'static str, test: impl Fn(&ModelRecord) -> bool + 'c) -> Self {
        Self {
            axis,
            test: Box::new(test),
        }
    }

    pub fn axis(&self) -> &'static str {
        self.axis
    }

    pub fn matches(&self, record: &ModelRecord) -> bool {
        (self.test)(record)
    }
}

/// Compile criteria into the list of predicates a record must all satisfy.
pub fn compile(criteria: &FilterCriteria) -> Vec<AxisPredicate<'_>> {
    let mut axes = Vec::new();

    if let Some(providers) = criteria.providers.as_ref().filter(|s| !s.is_empty()) {
        axes.push(AxisPredicate::new("provider", move |r| {
            providers.contains(&r.provider)
        }));
    }
    if let Some(categories) = criteria.categories.as_ref().filter(|s| !s.is_empty()) {
        axes.push(AxisPredicate::new("category", move |r| {
            categories.contains(&r.category)
        }));
    }

    let ranges: [(&'static str, Option<NumericRange>, fn(&ModelRecord) -> Option<f64>); 6] = [
        ("cost", criteria.cost, ModelRecord::cost),
        ("parameters", criteria.parameters, ModelRecord::parameter_count),
        ("contextWindow", criteria.context_window, ModelRecord::context_tokens),
        ("accuracy", criteria.accuracy, ModelRecord::accuracy),
        ("speed", criteria.speed, ModelRecord::speed),
        ("popularity", criteria.popularity, ModelRecord::popularity),
    ];
    for (axis, range, value) in ranges {
        if let Some(range) = range.filter(|r| !r.is_unbounded()) {
            axes.push(AxisPredicate::new(axis, move |r| range.admits(value(r))));
        }
    }

    let flags = [
        ("streaming", Capability::Streaming, criteria.streaming),
        ("functionCalling", Capability::FunctionCalling, criteria.function_calling),
        ("vision", Capability::Vision, criteria.vision),
    ];
    for (axis, capability, wanted) in flags {
        if let Some(wanted) = wanted {
            axes.push(AxisPredicate::new(axis, move |r| {
                r.capabilities.get(capability) == Some(wanted)
            }));
        }
    }

    if let Some(text) = criteria.text.as_deref() {
        let terms: Vec<String> = text
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if !terms.is_empty() {
            axes.push(AxisPredicate::new("text", move |r| {
                let haystack = r.searchable_text();
                terms.iter().all(|term| haystack.contains(term.as_str()))
            }));
        }
    }

    if criteria.available_only {
        axes.push(AxisPredicate::new("availableOnly", ModelRecord::is_available));
    }

    if let Some(range) = &criteria.released {
        let (from, to) = range.bounds();
        if from.is_some() || to.is_some() {
            axes.push(AxisPredicate::new("released", move |r| {
                match r.release_time() {
                    // Undated records are never excluded by a date range.
                    None => true,
                    Some(at) => from.map_or(true, |f| at >= f) && to.map_or(true, |t| at <= t),
                }
            }));
        }
    }

    axes
}
