//! Centralized configuration for the discovery engine.
//!
//! Constant holders carry the documented defaults; [`EngineConfig`] is the
//! construction-time configuration object hosts may build in code or load
//! from JSON.

use crate::error::{DiscoveryError, Result};
use crate::models::{SearchField, SearchOptions};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Search defaults.
pub struct SearchDefaults;

impl SearchDefaults {
    pub const FUZZY: bool = true;
    pub const FUZZY_THRESHOLD: f64 = 0.6;
    pub const LIMIT: usize = 100;
    pub const MIN_SCORE: f64 = 0.2;
    pub const SUGGESTION_LIMIT: usize = 10;
}

/// Result cache defaults.
pub struct CacheDefaults;

impl CacheDefaults {
    pub const TTL: Duration = Duration::from_secs(5 * 60);
    pub const MAX_ENTRIES: u64 = 256;
}

/// Paging defaults for [`crate::engine::DiscoveryQuery`].
pub struct PagingDefaults;

impl PagingDefaults {
    /// Pages are numbered from 1.
    pub const PAGE: usize = 1;
    pub const PAGE_SIZE: usize = 20;
}

/// Markers used by match highlighting.
pub struct HighlightConfig;

impl HighlightConfig {
    pub const OPEN: &'static str = "<mark>";
    pub const CLOSE: &'static str = "</mark>";
}

/// Relative weight of each searchable field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldWeights {
    pub name: f64,
    pub model_id: f64,
    pub provider: f64,
    pub description: f64,
    pub category: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            name: 1.0,
            model_id: 0.9,
            provider: 0.8,
            description: 0.7,
            category: 0.6,
        }
    }
}

impl FieldWeights {
    pub fn weight(&self, field: SearchField) -> f64 {
        match field {
            SearchField::Name => self.name,
            SearchField::ModelId => self.model_id,
            SearchField::Provider => self.provider,
            SearchField::Description => self.description,
            SearchField::Category => self.category,
        }
    }

    fn validate(&self) -> Result<()> {
        for field in SearchField::ALL {
            let weight = self.weight(field);
            if !weight.is_finite() || weight < 0.0 {
                return Err(DiscoveryError::validation(
                    format!("fieldWeights.{}", field),
                    format!("must be a finite, non-negative number, got {}", weight),
                ));
            }
        }
        Ok(())
    }
}

/// Per-service result cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// How long a cached result stays valid.
    pub ttl: Duration,
    /// Maximum cached results per service.
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: CacheDefaults::TTL,
            max_entries: CacheDefaults::MAX_ENTRIES,
        }
    }
}

impl CacheConfig {
    /// A configuration that never caches.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.ttl.is_zero() {
            return Err(DiscoveryError::validation(
                "cache.ttl",
                "must be greater than zero (set enabled = false to turn caching off)",
            ));
        }
        if self.max_entries == 0 {
            return Err(DiscoveryError::validation(
                "cache.maxEntries",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Engine configuration supplied at construction time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Defaults used when a search call passes no options.
    pub search: SearchOptions,
    pub field_weights: FieldWeights,
    pub cache: CacheConfig,
}

impl EngineConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        self.field_weights.validate()?;
        self.cache.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache.ttl, Duration::from_secs(300));
        assert_eq!(config.field_weights.weight(SearchField::Name), 1.0);
        assert_eq!(config.field_weights.weight(SearchField::Category), 0.6);
    }

    #[test]
    fn test_zero_ttl_rejected_only_when_enabled() {
        let mut cache = CacheConfig {
            ttl: Duration::ZERO,
            ..Default::default()
        };
        assert_eq!(cache.validate().unwrap_err().field(), Some("cache.ttl"));

        cache.enabled = false;
        assert!(cache.validate().is_ok());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let config = EngineConfig {
            field_weights: FieldWeights {
                provider: -0.5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            config.validate().unwrap_err().field(),
            Some("fieldWeights.provider")
        );
    }

    #[test]
    fn test_from_json_str() {
        let config = EngineConfig::from_json_str(
            r#"{ "search": { "limit": 25, "fuzzy": false }, "cache": { "maxEntries": 8 } }"#,
        )
        .unwrap();
        assert_eq!(config.search.limit, 25);
        assert!(!config.search.fuzzy);
        assert_eq!(config.search.min_score, 0.2);
        assert_eq!(config.cache.max_entries, 8);
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_from_json_str_rejects_invalid() {
        let err = EngineConfig::from_json_str(r#"{ "search": { "limit": 0 } }"#).unwrap_err();
        assert_eq!(err.field(), Some("limit"));

        let err = EngineConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, DiscoveryError::Json { .. }));
    }
}
