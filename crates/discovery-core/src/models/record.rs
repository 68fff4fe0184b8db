//! Catalog record types.

use chrono::{DateTime, Days, Months, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Per-token pricing of a model, in cost per million tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(default)]
    pub input: Option<f64>,
    #[serde(default)]
    pub output: Option<f64>,
}

impl Pricing {
    /// Blended cost: mean of the present components.
    pub fn blended(&self) -> Option<f64> {
        match (finite(self.input), finite(self.output)) {
            (Some(i), Some(o)) => Some((i + o) / 2.0),
            (Some(v), None) | (None, Some(v)) => Some(v),
            (None, None) => None,
        }
    }
}

/// Quality/usage metrics, each on a 0-100 scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub popularity: Option<f64>,
}

/// Optional capability flags. `None` means unknown, not `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    #[serde(default)]
    pub streaming: Option<bool>,
    #[serde(default)]
    pub function_calling: Option<bool>,
    #[serde(default)]
    pub vision: Option<bool>,
}

impl Capabilities {
    pub fn get(&self, capability: Capability) -> Option<bool> {
        match capability {
            Capability::Streaming => self.streaming,
            Capability::FunctionCalling => self.function_calling,
            Capability::Vision => self.vision,
        }
    }
}

/// A single capability flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    Streaming,
    FunctionCalling,
    Vision,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::Streaming,
        Capability::FunctionCalling,
        Capability::Vision,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Capability::Streaming => "Streaming",
            Capability::FunctionCalling => "Function Calling",
            Capability::Vision => "Vision",
        }
    }
}

/// One catalog entry.
///
/// Text fields default to the empty string, which the engine treats as
/// unknown. Everything else is explicitly optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub model_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Pricing>,
    /// Parameter count, in billions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window: Option<u64>,
    #[serde(default)]
    pub capabilities: Capabilities,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

impl ModelRecord {
    /// Create a record with only an id and a name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Blended cost derived from the pricing sub-structure.
    pub fn cost(&self) -> Option<f64> {
        self.pricing.as_ref().and_then(Pricing::blended)
    }

    pub fn input_cost(&self) -> Option<f64> {
        finite(self.pricing.and_then(|p| p.input))
    }

    pub fn output_cost(&self) -> Option<f64> {
        finite(self.pricing.and_then(|p| p.output))
    }

    pub fn parameter_count(&self) -> Option<f64> {
        finite(self.parameters)
    }

    pub fn context_tokens(&self) -> Option<f64> {
        self.context_window.map(|v| v as f64)
    }

    pub fn accuracy(&self) -> Option<f64> {
        finite(self.metrics.and_then(|m| m.accuracy))
    }

    pub fn speed(&self) -> Option<f64> {
        finite(self.metrics.and_then(|m| m.speed))
    }

    pub fn popularity(&self) -> Option<f64> {
        finite(self.metrics.and_then(|m| m.popularity))
    }

    /// Release instant, if present and parseable.
    pub fn release_time(&self) -> Option<DateTime<Utc>> {
        self.release_date.as_deref().and_then(parse_timestamp)
    }

    /// Release date as a UTC calendar day.
    pub fn release_day(&self) -> Option<NaiveDate> {
        self.release_time().map(|t| t.date_naive())
    }

    /// Last update instant, if present and parseable.
    pub fn update_time(&self) -> Option<DateTime<Utc>> {
        self.updated_at.as_deref().and_then(parse_timestamp)
    }

    /// Lowercased concatenation of every free-text field.
    pub fn searchable_text(&self) -> String {
        [
            self.name.as_str(),
            self.description.as_str(),
            self.provider.as_str(),
            self.model_id.as_str(),
            self.category.as_str(),
        ]
        .join(" ")
        .to_lowercase()
    }

    /// Capabilities explicitly flagged as supported.
    pub fn supported_capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL
            .into_iter()
            .filter(|c| self.capabilities.get(*c) == Some(true))
    }

    /// False only when the record is explicitly marked unavailable.
    pub fn is_available(&self) -> bool {
        self.available != Some(false)
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// How much of a timestamp a date-like string actually specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePrecision {
    Instant,
    Day,
    Month,
}

/// A parsed date-like string: the earliest UTC instant it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDate {
    pub start: DateTime<Utc>,
    pub precision: DatePrecision,
}

impl ParsedDate {
    /// The last instant the string names: the end of its day or month for
    /// date-only and month-only values.
    pub fn end(&self) -> DateTime<Utc> {
        let next = match self.precision {
            DatePrecision::Instant => return self.start,
            DatePrecision::Day => self.start.checked_add_days(Days::new(1)),
            DatePrecision::Month => self.start.checked_add_months(Months::new(1)),
        };
        next.map_or(self.start, |n| n - TimeDelta::nanoseconds(1))
    }
}

/// Parse a date-like string, keeping its precision.
///
/// Accepts RFC 3339 timestamps (converted to UTC), naive
/// `YYYY-MM-DD[T| ]HH:MM:SS` forms (read as UTC), `YYYY-MM-DD`, `YYYY/MM/DD`
/// and `YYYY-MM`. Date-only values start at 00:00 UTC. Anything else is `None`.
pub fn parse_date(value: &str) -> Option<ParsedDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let instant = |start: DateTime<Utc>| ParsedDate {
        start,
        precision: DatePrecision::Instant,
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(instant(ts.with_timezone(&Utc)));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(instant(ts.and_utc()));
        }
    }

    let midnight = |date: NaiveDate, precision| {
        date.and_hms_opt(0, 0, 0).map(|dt| ParsedDate {
            start: dt.and_utc(),
            precision,
        })
    };
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return midnight(date, DatePrecision::Day);
        }
    }

    // Month precision
    if value.len() == 7 {
        let date = NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").ok()?;
        return midnight(date, DatePrecision::Month);
    }

    None
}

/// Parse a date-like string to the earliest UTC instant it names.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    parse_date(value).map(|p| p.start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_camel_case() {
        let record: ModelRecord = serde_json::from_value(json!({
            "id": "gpt-4",
            "name": "GPT-4",
            "modelId": "openai/gpt-4",
            "contextWindow": 8192,
            "capabilities": { "functionCalling": true },
            "metrics": { "accuracy": 86.4 },
            "releaseDate": "2023-03-14"
        }))
        .unwrap();

        assert_eq!(record.model_id, "openai/gpt-4");
        assert_eq!(record.context_window, Some(8192));
        assert_eq!(record.capabilities.function_calling, Some(true));
        assert_eq!(record.capabilities.streaming, None);
        assert_eq!(record.accuracy(), Some(86.4));
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_blended_cost() {
        let mut record = ModelRecord::new("a", "A");
        assert_eq!(record.cost(), None);

        record.pricing = Some(Pricing {
            input: Some(10.0),
            output: Some(30.0),
        });
        assert_eq!(record.cost(), Some(20.0));

        record.pricing = Some(Pricing {
            input: None,
            output: Some(4.0),
        });
        assert_eq!(record.cost(), Some(4.0));

        record.pricing = Some(Pricing {
            input: Some(f64::NAN),
            output: None,
        });
        assert_eq!(record.cost(), None);
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, sec: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, sec))
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let midnight = utc(2024, 3, 15, 0, 0, 0);
        assert_eq!(parse_timestamp("2024-03-15"), Some(midnight));
        assert_eq!(parse_timestamp("2024/03/15"), Some(midnight));
        assert_eq!(parse_timestamp(" 2024-03-15 "), Some(midnight));
        assert_eq!(
            parse_timestamp("2024-03-15T10:20:30Z"),
            Some(utc(2024, 3, 15, 10, 20, 30))
        );
        assert_eq!(
            parse_timestamp("2024-03-15T10:20:30"),
            Some(utc(2024, 3, 15, 10, 20, 30))
        );
        assert_eq!(parse_timestamp("2024-03"), Some(utc(2024, 3, 1, 0, 0, 0)));
    }

    #[test]
    fn test_offsets_convert_to_utc() {
        // 01:00 on the 11th in Tokyo is 16:00 on the 10th in UTC.
        assert_eq!(
            parse_timestamp("2024-01-11T01:00:00+09:00"),
            Some(utc(2024, 1, 10, 16, 0, 0))
        );
        assert!(parse_timestamp("2024-01-11T01:00:00+09:00") < parse_timestamp("2024-01-10T20:00:00Z"));
    }

    #[test]
    fn test_parsed_date_end_covers_precision() {
        let day = parse_date("2024-02-28").unwrap();
        assert_eq!(day.precision, DatePrecision::Day);
        assert_eq!(day.end(), utc(2024, 2, 29, 0, 0, 0) - TimeDelta::nanoseconds(1));

        let month = parse_date("2024-02").unwrap();
        assert_eq!(month.end(), utc(2024, 3, 1, 0, 0, 0) - TimeDelta::nanoseconds(1));

        let instant = parse_date("2024-02-28T12:00:00Z").unwrap();
        assert_eq!(instant.end(), instant.start);
    }

    #[test]
    fn test_parse_date_malformed() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date("2024-13"), None);
    }

    #[test]
    fn test_release_day_is_utc() {
        let mut record = ModelRecord::new("a", "A");
        record.release_date = Some("2024-01-11T01:00:00+09:00".into());
        assert_eq!(record.release_day(), NaiveDate::from_ymd_opt(2024, 1, 10));
    }

    #[test]
    fn test_searchable_text() {
        let record = ModelRecord {
            id: "x".into(),
            name: "Claude 3".into(),
            provider: "Anthropic".into(),
            category: "Chat".into(),
            ..Default::default()
        };
        let text = record.searchable_text();
        assert!(text.contains("claude 3"));
        assert!(text.contains("anthropic"));
        assert!(text.contains("chat"));
    }

    #[test]
    fn test_supported_capabilities_and_availability() {
        let mut record = ModelRecord::new("a", "A");
        record.capabilities.vision = Some(true);
        record.capabilities.streaming = Some(false);

        let caps: Vec<_> = record.supported_capabilities().collect();
        assert_eq!(caps, vec![Capability::Vision]);

        assert!(record.is_available());
        record.available = Some(false);
        assert!(!record.is_available());
    }
}
