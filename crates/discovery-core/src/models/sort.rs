//! Sort keys and sort metadata.

use crate::error::DiscoveryError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// A field the catalog can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Provider,
    Category,
    ModelId,
    Cost,
    InputCost,
    OutputCost,
    Parameters,
    ContextWindow,
    Accuracy,
    Speed,
    Popularity,
    ReleaseDate,
    UpdatedAt,
}

impl SortField {
    pub const ALL: [SortField; 14] = [
        SortField::Name,
        SortField::Provider,
        SortField::Category,
        SortField::ModelId,
        SortField::Cost,
        SortField::InputCost,
        SortField::OutputCost,
        SortField::Parameters,
        SortField::ContextWindow,
        SortField::Accuracy,
        SortField::Speed,
        SortField::Popularity,
        SortField::ReleaseDate,
        SortField::UpdatedAt,
    ];

    /// Look a field up by name.
    ///
    /// Accepts camelCase, snake_case, kebab-case and dotted paths such as
    /// `metrics.accuracy` or `pricing.input`. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | '.' | ' '))
            .collect::<String>()
            .to_lowercase();

        let field = match key.as_str() {
            "name" => SortField::Name,
            "provider" => SortField::Provider,
            "category" => SortField::Category,
            "modelid" => SortField::ModelId,
            "cost" | "price" | "pricing" | "blendedcost" => SortField::Cost,
            "inputcost" | "pricinginput" => SortField::InputCost,
            "outputcost" | "pricingoutput" => SortField::OutputCost,
            "parameters" | "parametercount" | "params" => SortField::Parameters,
            "contextwindow" | "context" => SortField::ContextWindow,
            "accuracy" | "metricsaccuracy" => SortField::Accuracy,
            "speed" | "metricsspeed" => SortField::Speed,
            "popularity" | "metricspopularity" => SortField::Popularity,
            "releasedate" | "released" => SortField::ReleaseDate,
            "updatedat" | "updated" => SortField::UpdatedAt,
            _ => return None,
        };
        Some(field)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Provider => "provider",
            SortField::Category => "category",
            SortField::ModelId => "modelId",
            SortField::Cost => "cost",
            SortField::InputCost => "inputCost",
            SortField::OutputCost => "outputCost",
            SortField::Parameters => "parameters",
            SortField::ContextWindow => "contextWindow",
            SortField::Accuracy => "accuracy",
            SortField::Speed => "speed",
            SortField::Popularity => "popularity",
            SortField::ReleaseDate => "releaseDate",
            SortField::UpdatedAt => "updatedAt",
        }
    }

    /// Human-readable label for sort pickers.
    pub fn label(&self) -> &'static str {
        match self {
            SortField::Name => "Name",
            SortField::Provider => "Provider",
            SortField::Category => "Category",
            SortField::ModelId => "Model ID",
            SortField::Cost => "Cost",
            SortField::InputCost => "Input Cost",
            SortField::OutputCost => "Output Cost",
            SortField::Parameters => "Parameters",
            SortField::ContextWindow => "Context Window",
            SortField::Accuracy => "Accuracy",
            SortField::Speed => "Speed",
            SortField::Popularity => "Popularity",
            SortField::ReleaseDate => "Release Date",
            SortField::UpdatedAt => "Last Updated",
        }
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(DiscoveryError::validation(
                "direction",
                format!("expected asc or desc, got {:?}", s),
            )),
        }
    }
}

impl SortDirection {
    /// Orient an ascending comparison result.
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// One key of a multi-key sort. Higher priority sorts first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortCriterion {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
    #[serde(default)]
    pub priority: i32,
}

impl SortCriterion {
    pub fn new(field: impl Into<String>, direction: SortDirection, priority: i32) -> Self {
        Self {
            field: field.into(),
            direction,
            priority,
        }
    }
}

/// A sortable field and its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortFieldInfo {
    pub field: SortField,
    pub label: String,
}

/// How well a field is populated across a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAvailability {
    pub field: SortField,
    pub present: usize,
    pub total: usize,
    /// Share of records with a value, 0-100.
    pub percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_variants() {
        assert_eq!(SortField::from_name("name"), Some(SortField::Name));
        assert_eq!(
            SortField::from_name("contextWindow"),
            Some(SortField::ContextWindow)
        );
        assert_eq!(
            SortField::from_name("context_window"),
            Some(SortField::ContextWindow)
        );
        assert_eq!(
            SortField::from_name("metrics.accuracy"),
            Some(SortField::Accuracy)
        );
        assert_eq!(
            SortField::from_name("pricing.input"),
            Some(SortField::InputCost)
        );
        assert_eq!(SortField::from_name("colour"), None);
    }

    #[test]
    fn test_as_str_roundtrip() {
        for field in SortField::ALL {
            assert_eq!(SortField::from_name(field.as_str()), Some(field));
        }
    }

    #[test]
    fn test_direction_apply() {
        assert_eq!(SortDirection::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortDirection::Desc.apply(Ordering::Less), Ordering::Greater);
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("DESC".parse::<SortDirection>().ok(), Some(SortDirection::Desc));
        assert_eq!(" ascending ".parse::<SortDirection>().ok(), Some(SortDirection::Asc));

        let err = "sideways".parse::<SortDirection>().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.field(), Some("direction"));
    }

    #[test]
    fn test_criterion_defaults() {
        let criterion: SortCriterion = serde_json::from_str(r#"{"field":"cost"}"#).unwrap();
        assert_eq!(criterion.direction, SortDirection::Asc);
        assert_eq!(criterion.priority, 0);
    }
}
