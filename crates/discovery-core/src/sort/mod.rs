//! Stable single- and multi-key ordering.
//!
//! Every sort is stable and returns a permutation of its input, borrowed
//! from it. Records missing a sort key always go last, whichever way the key
//! is ordered.

mod compare;

pub use compare::{compare_keys, sort_value, SortValue};

use crate::cache::{CacheKey, CacheStats, ResultCache};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::models::{
    FieldAvailability, ModelRecord, SortCriterion, SortDirection, SortField, SortFieldInfo,
};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

/// A resolved sort key.
pub type SortKey = (SortField, SortDirection);

/// Orders record collections and reports on sortable fields.
pub struct SortService {
    cache: ResultCache<Arc<[usize]>>,
}

impl Default for SortService {
    fn default() -> Self {
        Self::new()
    }
}

impl SortService {
    pub fn new() -> Self {
        Self {
            cache: ResultCache::new("sort", &CacheConfig::default()),
        }
    }

    pub fn with_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cache: ResultCache::new("sort", config),
        })
    }

    /// Sort by a field given by name. Unknown names leave the order as is.
    pub fn sort_models<'a>(
        &self,
        records: &'a [ModelRecord],
        field: &str,
        direction: SortDirection,
    ) -> Vec<&'a ModelRecord> {
        match SortField::from_name(field) {
            Some(field) => self.sort_by_field(records, field, direction),
            None => {
                debug!("Unknown sort field {:?}, keeping input order", field);
                records.iter().collect()
            }
        }
    }

    pub fn sort_by_field<'a>(
        &self,
        records: &'a [ModelRecord],
        field: SortField,
        direction: SortDirection,
    ) -> Vec<&'a ModelRecord> {
        self.permute(records, &[(field, direction)])
    }

    /// Stable sort with a caller-supplied comparator. Never cached.
    pub fn stable_sort<'a, F>(&self, records: &'a [ModelRecord], mut compare: F) -> Vec<&'a ModelRecord>
    where
        F: FnMut(&ModelRecord, &ModelRecord) -> Ordering,
    {
        let mut sorted: Vec<&ModelRecord> = records.iter().collect();
        sorted.sort_by(|a, b| compare(*a, *b));
        sorted
    }

    /// Sort by several keys, highest priority first.
    ///
    /// Equal priorities keep list order. Criteria naming unknown fields are
    /// skipped; with none left the input order is kept.
    pub fn sort_by_multiple_criteria<'a>(
        &self,
        records: &'a [ModelRecord],
        criteria: &[SortCriterion],
    ) -> Vec<&'a ModelRecord> {
        let keys = resolve_criteria(criteria);
        self.permute(records, &keys)
    }

    /// Every sortable field with its display label.
    pub fn available_fields(&self) -> Vec<SortFieldInfo> {
        SortField::ALL
            .iter()
            .map(|&field| SortFieldInfo {
                field,
                label: field.label().to_string(),
            })
            .collect()
    }

    /// Whether any record has a value for `field`.
    pub fn has_data(&self, records: &[ModelRecord], field: SortField) -> bool {
        records.iter().any(|r| sort_value(r, field).is_some())
    }

    pub fn field_availability(&self, records: &[ModelRecord], field: SortField) -> FieldAvailability {
        let present = records
            .iter()
            .filter(|r| sort_value(r, field).is_some())
            .count();
        let total = records.len();
        let percentage = if total == 0 {
            0.0
        } else {
            present as f64 * 100.0 / total as f64
        };
        FieldAvailability {
            field,
            present,
            total,
            percentage,
        }
    }

    /// Availability of every sortable field, in [`SortField::ALL`] order.
    pub fn availability_report(&self, records: &[ModelRecord]) -> Vec<FieldAvailability> {
        SortField::ALL
            .iter()
            .map(|&field| self.field_availability(records, field))
            .collect()
    }

    fn permute<'a>(&self, records: &'a [ModelRecord], keys: &[SortKey]) -> Vec<&'a ModelRecord> {
        self.order(records, keys)
            .iter()
            .map(|&i| &records[i])
            .collect()
    }

    /// Sorted positions into `records`.
    pub(crate) fn order<R: Borrow<ModelRecord>>(&self, records: &[R], keys: &[SortKey]) -> Arc<[usize]> {
        if keys.is_empty() || records.len() < 2 {
            return (0..records.len()).collect();
        }

        let key = CacheKey::builder("sort")
            .collection(records.iter().map(Borrow::<ModelRecord>::borrow))
            .param("keys", keys)
            .finish();

        self.cache
            .get_or_compute(key, || Arc::from(sorted_positions(records, keys)))
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

/// Turn criteria into sort keys, by descending priority, dropping unknown
/// fields.
pub fn resolve_criteria(criteria: &[SortCriterion]) -> Vec<SortKey> {
    let mut ranked: Vec<&SortCriterion> = criteria.iter().collect();
    ranked.sort_by(|a, b| b.priority.cmp(&a.priority));

    ranked
        .into_iter()
        .filter_map(|c| match SortField::from_name(&c.field) {
            Some(field) => Some((field, c.direction)),
            None => {
                debug!("Skipping sort criterion on unknown field {:?}", c.field);
                None
            }
        })
        .collect()
}

fn sorted_positions<R: Borrow<ModelRecord>>(records: &[R], keys: &[SortKey]) -> Vec<usize> {
    // Extract every key once up front.
    let values: Vec<Vec<Option<SortValue>>> = records
        .iter()
        .map(|r| {
            let record = Borrow::<ModelRecord>::borrow(r);
            keys.iter().map(|&(field, _)| sort_value(record, field)).collect()
        })
        .collect();

    let mut positions: Vec<usize> = (0..records.len()).collect();
    positions.sort_by(|&a, &b| {
        keys.iter()
            .enumerate()
            .map(|(k, &(_, direction))| {
                compare_keys(values[a][k].as_ref(), values[b][k].as_ref(), direction)
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });

    debug!("Sorted {} records on {} keys", records.len(), keys.len());
    positions
}
