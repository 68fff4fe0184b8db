//! Property-based tests for the discovery services using proptest.

use discovery_core::{
    CacheConfig, EngineConfig, FilterCriteria, FilterService, Metrics, ModelRecord, NumericRange,
    SearchOptions, SearchService, SortDirection, SortField, SortService, ValueSet,
};
use proptest::prelude::*;

// ============================================================================
// Test helpers
// ============================================================================

fn record_strategy() -> impl Strategy<Value = ModelRecord> {
    (
        "[A-Za-z]{1,8}( [A-Za-z0-9]{1,6}){0,2}",
        prop::sample::select(vec!["openai", "anthropic", "google", "meta", ""]),
        prop::option::of(0.0f64..100.0),
        prop::option::of(0.0f64..100.0),
    )
        .prop_map(|(name, provider, accuracy, speed)| ModelRecord {
            name,
            provider: provider.to_string(),
            metrics: Some(Metrics {
                accuracy,
                speed,
                popularity: None,
            }),
            ..Default::default()
        })
}

/// Records with unique ids derived from their position.
fn catalog_strategy(max: usize) -> impl Strategy<Value = Vec<ModelRecord>> {
    prop::collection::vec(record_strategy(), 0..max).prop_map(|mut records| {
        for (i, record) in records.iter_mut().enumerate() {
            record.id = format!("m{}", i);
        }
        records
    })
}

fn position(records: &[ModelRecord], record: &ModelRecord) -> Option<usize> {
    records.iter().position(|r| std::ptr::eq(r, record))
}

fn ids(records: &[&ModelRecord]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Filter output is drawn from the input and keeps its order.
    #[test]
    fn filter_is_ordered_subset(
        records in catalog_strategy(40),
        min in 0.0f64..100.0,
    ) {
        let service = FilterService::new();
        let criteria = FilterCriteria {
            accuracy: Some(NumericRange::at_least(min)),
            ..Default::default()
        };

        let result = service.apply(&records, &criteria);
        let positions: Vec<usize> = result
            .iter()
            .map(|r| position(&records, r).expect("result borrowed from input"))
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(result.len(), service.count_matching(&records, &criteria));
    }

    /// Empty criteria match everything.
    #[test]
    fn empty_criteria_match_all(records in catalog_strategy(40)) {
        let service = FilterService::new();
        let result = service.apply(&records, &FilterCriteria::default());
        prop_assert_eq!(result.len(), records.len());
    }

    /// Raising a minimum never admits more records.
    #[test]
    fn raising_min_never_grows(
        records in catalog_strategy(40),
        low in 0.0f64..50.0,
        delta in 0.0f64..50.0,
    ) {
        let service = FilterService::new();
        let loose = FilterCriteria {
            speed: Some(NumericRange::at_least(low)),
            ..Default::default()
        };
        let strict = FilterCriteria {
            speed: Some(NumericRange::at_least(low + delta)),
            ..Default::default()
        };
        prop_assert!(
            service.apply(&records, &strict).len() <= service.apply(&records, &loose).len()
        );
    }

    /// Adding an axis never admits more records.
    #[test]
    fn extra_axis_never_grows(
        records in catalog_strategy(40),
        max in 0.0f64..100.0,
    ) {
        let service = FilterService::new();
        let providers = FilterCriteria {
            providers: Some(ValueSet::of(["openai", "meta"])),
            ..Default::default()
        };
        let narrower = FilterCriteria {
            accuracy: Some(NumericRange::at_most(max)),
            ..providers.clone()
        };
        let wide = service.apply(&records, &providers);
        let narrow = service.apply(&records, &narrower);
        prop_assert!(narrow.len() <= wide.len());
        prop_assert!(narrow.iter().all(|r| wide.iter().any(|w| std::ptr::eq(*w, *r))));
    }

    /// Sorting yields a permutation of the input.
    #[test]
    fn sort_is_permutation(
        records in catalog_strategy(40),
        desc in any::<bool>(),
    ) {
        let direction = if desc { SortDirection::Desc } else { SortDirection::Asc };
        let service = SortService::new();
        let sorted = service.sort_by_field(&records, SortField::Name, direction);

        let mut sorted_ids = ids(&sorted);
        let mut input_ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
        sorted_ids.sort();
        input_ids.sort();
        prop_assert_eq!(sorted_ids, input_ids);
    }

    /// Sorting an already sorted collection changes nothing.
    #[test]
    fn sort_is_idempotent(records in catalog_strategy(40)) {
        let service = SortService::new();
        let once: Vec<ModelRecord> = service
            .sort_by_field(&records, SortField::Provider, SortDirection::Asc)
            .into_iter()
            .cloned()
            .collect();
        let twice = service.sort_by_field(&once, SortField::Provider, SortDirection::Asc);
        let once_ids: Vec<String> = once.iter().map(|r| r.id.clone()).collect();
        prop_assert_eq!(ids(&twice), once_ids);
    }

    /// Present values come first, in order; missing values keep input order.
    #[test]
    fn sort_puts_missing_last(
        records in catalog_strategy(40),
        desc in any::<bool>(),
    ) {
        let direction = if desc { SortDirection::Desc } else { SortDirection::Asc };
        let service = SortService::new();
        let sorted = service.sort_by_field(&records, SortField::Accuracy, direction);
        let values: Vec<Option<f64>> = sorted.iter().map(|r| r.accuracy()).collect();

        let present = values.iter().take_while(|v| v.is_some()).count();
        prop_assert!(values[present..].iter().all(Option::is_none));

        let ordered = values[..present].windows(2).all(|w| match direction {
            SortDirection::Asc => w[0] <= w[1],
            SortDirection::Desc => w[0] >= w[1],
        });
        prop_assert!(ordered);

        let missing: Vec<usize> = sorted[present..]
            .iter()
            .filter_map(|r| position(&records, r))
            .collect();
        prop_assert!(missing.windows(2).all(|w| w[0] < w[1]));
    }

    /// Scores are bounded, sorted, above min_score, and capped by limit.
    #[test]
    fn search_scores_are_bounded_and_ranked(
        records in catalog_strategy(40),
        query in "[a-z]{1,6}( [a-z]{1,6})?",
        fuzzy in any::<bool>(),
        limit in 1usize..20,
        min_score in 0.0f64..1.0,
    ) {
        let service = SearchService::new();
        let options = SearchOptions {
            fuzzy,
            limit,
            min_score,
            ..Default::default()
        };

        let results = service.search(&records, &query, Some(&options)).unwrap();
        prop_assert!(results.len() <= limit);
        for result in &results {
            prop_assert!(result.score > 0.0 && result.score <= 1.0);
            prop_assert!(result.score >= min_score);
            prop_assert!(position(&records, result.record).is_some());
        }
        prop_assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    /// Query case never changes the ranking.
    #[test]
    fn search_ignores_case(
        records in catalog_strategy(30),
        query in "[a-z]{2,6}",
    ) {
        // Uncached, so both calls actually score.
        let config = EngineConfig {
            cache: CacheConfig::disabled(),
            ..Default::default()
        };
        let service = SearchService::with_config(&config).unwrap();
        let lower = service.search(&records, &query, None).unwrap();
        let upper = service.search(&records, &query.to_uppercase(), None).unwrap();
        prop_assert_eq!(lower, upper);
        prop_assert_eq!(service.cache_stats().hits, 0);
    }
}
