//! Filter criteria.
//!
//! Criteria are plain data. Every axis is optional and an absent axis imposes
//! no restriction. Behaviour lives in [`crate::filter`].

use super::record::{parse_date, ParsedDate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

/// A membership constraint value.
///
/// Deserializes from either a single string or an array of strings and is
/// normalized to a lowercase set. An empty set restricts nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OneOrMany", into = "Vec<String>")]
pub struct ValueSet(BTreeSet<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for ValueSet {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(v) => ValueSet::of([v]),
            OneOrMany::Many(vs) => ValueSet::of(vs),
        }
    }
}

impl From<ValueSet> for Vec<String> {
    fn from(set: ValueSet) -> Self {
        set.0.into_iter().collect()
    }
}

impl ValueSet {
    pub fn of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            values
                .into_iter()
                .map(|v| v.as_ref().trim().to_lowercase())
                .filter(|v| !v.is_empty())
                .collect(),
        )
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, value: &str) -> bool {
        self.0.contains(&value.trim().to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Inclusive numeric bounds.
///
/// The two bounds treat a missing value differently: a minimum excludes
/// records without a value, a maximum lets them through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl NumericRange {
    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// True when neither bound is usable.
    pub fn is_unbounded(&self) -> bool {
        self.min().is_none() && self.max().is_none()
    }

    fn min(&self) -> Option<f64> {
        self.min.filter(|v| !v.is_nan())
    }

    fn max(&self) -> Option<f64> {
        self.max.filter(|v| !v.is_nan())
    }

    pub fn admits(&self, value: Option<f64>) -> bool {
        if let Some(min) = self.min() {
            match value {
                Some(v) if v >= min => {}
                _ => return false,
            }
        }
        if let (Some(max), Some(v)) = (self.max(), value) {
            if v > max {
                return false;
            }
        }
        true
    }
}

/// Inclusive date range over date-like strings; either end may be open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

impl DateRange {
    pub fn new(from: Option<&str>, to: Option<&str>) -> Self {
        Self {
            from: from.map(str::to_string),
            to: to.map(str::to_string),
        }
    }

    /// Parsed bounds as UTC instants. A bound that does not parse is
    /// dropped, leaving that side of the range open.
    ///
    /// `from` is the first instant its value names; `to` is the last, so a
    /// date-only `to` covers that whole day.
    pub fn bounds(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let from = parse_bound("from", &self.from).map(|p| p.start);
        let to = parse_bound("to", &self.to).map(|p| p.end());
        (from, to)
    }
}

fn parse_bound(side: &str, value: &Option<String>) -> Option<ParsedDate> {
    let raw = value.as_deref()?;
    let parsed = parse_date(raw);
    if parsed.is_none() {
        warn!("Ignoring unparseable date range bound {}={:?}", side, raw);
    }
    parsed
}

/// Composite filter criteria, combined with AND semantics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default, alias = "provider")]
    pub providers: Option<ValueSet>,
    #[serde(default, alias = "category")]
    pub categories: Option<ValueSet>,

    #[serde(default)]
    pub cost: Option<NumericRange>,
    #[serde(default)]
    pub parameters: Option<NumericRange>,
    #[serde(default)]
    pub context_window: Option<NumericRange>,
    #[serde(default)]
    pub accuracy: Option<NumericRange>,
    #[serde(default)]
    pub speed: Option<NumericRange>,
    #[serde(default)]
    pub popularity: Option<NumericRange>,

    #[serde(default)]
    pub streaming: Option<bool>,
    #[serde(default)]
    pub function_calling: Option<bool>,
    #[serde(default)]
    pub vision: Option<bool>,

    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub available_only: bool,
    #[serde(default)]
    pub released: Option<DateRange>,
}

impl FilterCriteria {
    /// True when no axis restricts anything.
    pub fn is_empty(&self) -> bool {
        let sets_empty = [&self.providers, &self.categories]
            .into_iter()
            .all(|s| s.as_ref().map_or(true, ValueSet::is_empty));
        let ranges_empty = [
            &self.cost,
            &self.parameters,
            &self.context_window,
            &self.accuracy,
            &self.speed,
            &self.popularity,
        ]
        .into_iter()
        .all(|r| r.as_ref().map_or(true, NumericRange::is_unbounded));
        let text_empty = self
            .text
            .as_deref()
            .map_or(true, |t| t.trim().is_empty());

        sets_empty
            && ranges_empty
            && text_empty
            && self.streaming.is_none()
            && self.function_calling.is_none()
            && self.vision.is_none()
            && !self.available_only
            && self
                .released
                .as_ref()
                .map_or(true, |r| r.from.is_none() && r.to.is_none())
    }
}
