//! Criteria-based filtering.
//!
//! [`FilterService::apply`] keeps the records that satisfy every specified
//! axis of a [`FilterCriteria`]. The output is always an order-preserving
//! subset of the input, borrowed from it.
//!
//! Axes are evaluated one at a time over a shrinking working set, so later
//! axes only see records that survived earlier ones. Evaluation order
//! affects only intermediate sizes, never the result.

mod facets;
mod predicates;

pub use facets::{DateSpan, FacetCount, FilterOptions, ValueBounds};
pub use predicates::AxisPredicate;

use crate::cache::{CacheKey, CacheStats, ResultCache};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::models::{FilterCriteria, ModelRecord};
use std::borrow::Borrow;
use std::sync::Arc;
use tracing::{debug, trace};

/// Applies composite filter criteria to record collections.
pub struct FilterService {
    cache: ResultCache<Arc<[usize]>>,
}

impl Default for FilterService {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterService {
    /// Create a filter service with the default cache settings.
    pub fn new() -> Self {
        Self {
            cache: ResultCache::new("filter", &CacheConfig::default()),
        }
    }

    /// Create a filter service with custom cache settings.
    pub fn with_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cache: ResultCache::new("filter", config),
        })
    }

    /// Keep only the records satisfying every specified constraint.
    pub fn apply<'a>(
        &self,
        records: &'a [ModelRecord],
        criteria: &FilterCriteria,
    ) -> Vec<&'a ModelRecord> {
        self.positions(records, criteria)
            .iter()
            .map(|&i| &records[i])
            .collect()
    }

    /// Number of records that would survive `apply`.
    pub fn count_matching(&self, records: &[ModelRecord], criteria: &FilterCriteria) -> usize {
        self.positions(records, criteria).len()
    }

    /// Distinct values, counts and spans available per axis.
    pub fn available_options(&self, records: &[ModelRecord]) -> FilterOptions {
        facets::collect(records)
    }

    /// Positions (ascending) of the records that pass `criteria`.
    pub(crate) fn positions<R: Borrow<ModelRecord>>(
        &self,
        records: &[R],
        criteria: &FilterCriteria,
    ) -> Arc<[usize]> {
        if records.is_empty() {
            return Arc::from(Vec::new());
        }
        if criteria.is_empty() {
            return (0..records.len()).collect();
        }

        let key = CacheKey::builder("filter")
            .collection(records.iter().map(Borrow::<ModelRecord>::borrow))
            .param("criteria", criteria)
            .finish();

        self.cache
            .get_or_compute(key, || Arc::from(evaluate(records, criteria)))
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

fn evaluate<R: Borrow<ModelRecord>>(records: &[R], criteria: &FilterCriteria) -> Vec<usize> {
    let axes = predicates::compile(criteria);
    let mut survivors: Vec<usize> = (0..records.len()).collect();

    for axis in &axes {
        if survivors.is_empty() {
            break;
        }
        survivors.retain(|&i| axis.matches(Borrow::<ModelRecord>::borrow(&records[i])));
        trace!(
            axis = axis.axis(),
            remaining = survivors.len(),
            "Filter axis applied"
        );
    }

    debug!(
        "Filtered {} records to {} across {} axes",
        records.len(),
        survivors.len(),
        axes.len()
    );
    survivors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Metrics, NumericRange, ValueSet};

    fn provider_records() -> Vec<ModelRecord> {
        ["openai", "anthropic", "google"]
            .iter()
            .enumerate()
            .map(|(i, p)| ModelRecord {
                id: format!("m{}", i),
                name: format!("Model {}", i),
                provider: p.to_string(),
                ..Default::default()
            })
            .collect()
    }

    fn ids(records: &[&ModelRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_provider_membership_keeps_order() {
        let records = provider_records();
        let service = FilterService::new();
        let criteria = FilterCriteria {
            providers: Some(ValueSet::of(["openai", "anthropic"])),
            ..Default::default()
        };

        let result = service.apply(&records, &criteria);
        assert_eq!(ids(&result), vec!["m0", "m1"]);
        assert!(std::ptr::eq(result[0], &records[0]));
    }

    #[test]
    fn test_empty_criteria_returns_everything() {
        let records = provider_records();
        let service = FilterService::new();
        let result = service.apply(&records, &FilterCriteria::default());
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let service = FilterService::new();
        let criteria = FilterCriteria {
            available_only: true,
            ..Default::default()
        };
        assert!(service.apply(&[], &criteria).is_empty());
    }

    #[test]
    fn test_min_excludes_missing_max_includes_missing() {
        let mut records = provider_records();
        records[0].metrics = Some(Metrics {
            accuracy: Some(90.0),
            ..Default::default()
        });
        records[1].metrics = Some(Metrics {
            accuracy: Some(60.0),
            ..Default::default()
        });
        let service = FilterService::new();

        let at_least = FilterCriteria {
            accuracy: Some(NumericRange::at_least(70.0)),
            ..Default::default()
        };
        assert_eq!(ids(&service.apply(&records, &at_least)), vec!["m0"]);

        let at_most = FilterCriteria {
            accuracy: Some(NumericRange::at_most(70.0)),
            ..Default::default()
        };
        assert_eq!(ids(&service.apply(&records, &at_most)), vec!["m1", "m2"]);
    }

    #[test]
    fn test_axes_combine_with_and() {
        let mut records = provider_records();
        records[0].capabilities.vision = Some(true);
        records[2].capabilities.vision = Some(true);
        let service = FilterService::new();

        let criteria = FilterCriteria {
            providers: Some(ValueSet::of(["openai", "anthropic"])),
            vision: Some(true),
            ..Default::default()
        };
        assert_eq!(ids(&service.apply(&records, &criteria)), vec!["m0"]);
        assert_eq!(service.count_matching(&records, &criteria), 1);
    }

    #[test]
    fn test_available_only() {
        let mut records = provider_records();
        records[0].available = Some(false);
        records[1].available = Some(true);
        let service = FilterService::new();
        let criteria = FilterCriteria {
            available_only: true,
            ..Default::default()
        };
        assert_eq!(ids(&service.apply(&records, &criteria)), vec!["m1", "m2"]);
    }

    #[test]
    fn test_repeated_calls_hit_cache() {
        let records = provider_records();
        let service = FilterService::new();
        let criteria = FilterCriteria {
            text: Some("model".into()),
            ..Default::default()
        };

        let first = service.apply(&records, &criteria);
        let second = service.apply(&records, &criteria);
        assert_eq!(ids(&first), ids(&second));

        let stats = service.cache_stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_changed_collection_misses_cache() {
        let mut records = provider_records();
        let service = FilterService::new();
        let criteria = FilterCriteria {
            providers: Some(ValueSet::of(["google"])),
            ..Default::default()
        };

        assert_eq!(service.apply(&records, &criteria).len(), 1);
        records.push(ModelRecord {
            id: "m3".into(),
            provider: "google".into(),
            ..Default::default()
        });
        assert_eq!(service.apply(&records, &criteria).len(), 2);
    }

    #[test]
    fn test_with_config_validates() {
        let config = CacheConfig {
            max_entries: 0,
            ..Default::default()
        };
        assert!(FilterService::with_config(&config).is_err());
        assert!(FilterService::with_config(&CacheConfig::disabled()).is_ok());
    }
}
