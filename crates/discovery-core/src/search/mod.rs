//! Ranked free-text search.
//!
//! A query is normalized into terms, every record is scored against the
//! configured fields (see [`scoring`]), and the records that clear
//! `min_score` are returned best-first. Ties keep input order.
//!
//! ```rust,ignore
//! let service = SearchService::new();
//! let hits = service.search(&records, "claude sonnet", None)?;
//! for hit in &hits {
//!     println!("{} {:.2}", hit.record.name, hit.score);
//! }
//! ```

pub mod fuzzy;
mod highlight;
pub mod normalize;
pub mod scoring;
mod suggest;

pub use highlight::highlight_matches;

use crate::cache::{CacheKey, CacheStats, ResultCache};
use crate::config::{EngineConfig, FieldWeights};
use crate::error::Result;
use crate::models::{FieldMatch, ModelRecord, SearchOptions, SearchResult, Suggestion};
use std::borrow::Borrow;
use std::sync::Arc;
use tracing::debug;

/// One ranked match, by position in the searched collection.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Hit {
    pub position: usize,
    pub score: f64,
    pub matches: Option<Vec<FieldMatch>>,
}

/// Scores and ranks records against free-text queries.
pub struct SearchService {
    defaults: SearchOptions,
    weights: FieldWeights,
    cache: ResultCache<Arc<[Hit]>>,
}

impl Default for SearchService {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchService {
    /// Create a search service with the default options, weights and cache.
    pub fn new() -> Self {
        let config = EngineConfig::default();
        Self {
            defaults: config.search,
            weights: config.field_weights,
            cache: ResultCache::new("search", &config.cache),
        }
    }

    /// Create a search service from an engine configuration.
    pub fn with_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            defaults: config.search.clone(),
            weights: config.field_weights,
            cache: ResultCache::new("search", &config.cache),
        })
    }

    /// Options used when a call passes none.
    pub fn default_options(&self) -> &SearchOptions {
        &self.defaults
    }

    /// Rank `records` against `query`.
    ///
    /// A blank query or an empty collection yields no results. Options are
    /// validated before anything else.
    pub fn search<'a>(
        &self,
        records: &'a [ModelRecord],
        query: &str,
        options: Option<&SearchOptions>,
    ) -> Result<Vec<SearchResult<'a>>> {
        let hits = self.hits(records, query, options)?;
        Ok(hits
            .iter()
            .map(|hit| SearchResult {
                record: &records[hit.position],
                score: hit.score,
                matches: hit.matches.clone(),
            })
            .collect())
    }

    /// Ranked hits by position into `records`.
    pub(crate) fn hits<R: Borrow<ModelRecord>>(
        &self,
        records: &[R],
        query: &str,
        options: Option<&SearchOptions>,
    ) -> Result<Arc<[Hit]>> {
        let options = options.unwrap_or(&self.defaults);
        options.validate()?;

        let terms = normalize::query_terms(query);
        if terms.is_empty() {
            debug!("Blank search query, returning no results");
            return Ok(Arc::from(Vec::new()));
        }
        if records.is_empty() {
            return Ok(Arc::from(Vec::new()));
        }

        let key = CacheKey::builder("search")
            .collection(records.iter().map(Borrow::<ModelRecord>::borrow))
            .param("terms", &terms)
            .param("options", options)
            .param("weights", &self.weights)
            .finish();

        Ok(self
            .cache
            .get_or_compute(key, || Arc::from(self.rank(records, &terms, options))))
    }

    fn rank<R: Borrow<ModelRecord>>(
        &self,
        records: &[R],
        terms: &[String],
        options: &SearchOptions,
    ) -> Vec<Hit> {
        let mut hits: Vec<Hit> = records
            .iter()
            .enumerate()
            .filter_map(|(position, record)| {
                let record = Borrow::<ModelRecord>::borrow(record);
                let (score, matches) = scoring::score_record(record, terms, options, &self.weights);
                (score > 0.0 && score >= options.min_score).then_some(Hit {
                    position,
                    score,
                    matches,
                })
            })
            .collect();

        // Stable, so equal scores keep input order.
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        let matched = hits.len();
        hits.truncate(options.limit);

        debug!(
            "Search for {:?} matched {} of {} records, returning {}",
            terms,
            matched,
            records.len(),
            hits.len()
        );
        hits
    }

    /// Completion candidates for a partial query.
    pub fn suggestions(&self, records: &[ModelRecord], query: &str, limit: usize) -> Vec<Suggestion> {
        suggest::suggestions(records, query, limit)
    }

    /// Wrap query term occurrences in `text` with highlight markers.
    pub fn highlight_matches(&self, text: &str, query: &str) -> String {
        highlight::highlight_matches(text, query)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
