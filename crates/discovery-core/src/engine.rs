//! Filter, search and sort composed into one discovery call.

use crate::cache::CacheStats;
use crate::config::{CacheConfig, EngineConfig, FieldWeights, PagingDefaults};
use crate::error::{DiscoveryError, Result};
use crate::filter::{FilterOptions, FilterService};
use crate::models::{FilterCriteria, ModelRecord, SearchOptions, SortCriterion};
use crate::search::{normalize, SearchService};
use crate::sort::{resolve_criteria, SortService};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// One discovery request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscoveryQuery {
    pub criteria: FilterCriteria,
    /// Free-text query. Blank means "no search", keeping the filtered set.
    pub query: Option<String>,
    /// Per-call search options; engine defaults when absent.
    pub search: Option<SearchOptions>,
    /// Explicit ordering. When empty, relevance (or input) order is kept.
    pub sort: Vec<SortCriterion>,
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
}

impl Default for DiscoveryQuery {
    fn default() -> Self {
        Self {
            criteria: FilterCriteria::default(),
            query: None,
            search: None,
            sort: Vec::new(),
            page: PagingDefaults::PAGE,
            page_size: PagingDefaults::PAGE_SIZE,
        }
    }
}

impl DiscoveryQuery {
    pub fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(DiscoveryError::validation("page", "pages are numbered from 1"));
        }
        if self.page_size == 0 {
            return Err(DiscoveryError::validation("pageSize", "must be at least 1"));
        }
        if let Some(options) = &self.search {
            options.validate()?;
        }
        Ok(())
    }

    fn has_search_terms(&self) -> bool {
        self.query
            .as_deref()
            .is_some_and(|q| !normalize::query_terms(q).is_empty())
    }
}

/// A record in a discovery page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredModel<'a> {
    pub record: &'a ModelRecord,
    /// Relevance score, present only when the request searched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// One page of discovery results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryPage<'a> {
    pub items: Vec<DiscoveredModel<'a>>,
    /// Matches across all pages.
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

impl DiscoveryPage<'_> {
    /// Number of pages at this page size; zero when the page size is zero.
    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}

/// Owns one filter, search and sort service built from a shared config.
///
/// # Example
///
/// ```rust,ignore
/// use discovery_core::{DiscoveryEngine, DiscoveryQuery};
///
/// let engine = DiscoveryEngine::builder()
///     .cache_ttl(Duration::from_secs(60))
///     .build()?;
///
/// let page = engine.discover(&records, &DiscoveryQuery {
///     query: Some("llama".into()),
///     ..Default::default()
/// })?;
/// ```
pub struct DiscoveryEngine {
    config: EngineConfig,
    filter: FilterService,
    search: SearchService,
    sort: SortService,
}

impl Default for DiscoveryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscoveryEngine {
    /// Create an engine with the default configuration.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            filter: FilterService::new(),
            search: SearchService::new(),
            sort: SortService::new(),
        }
    }

    /// Create an engine from a configuration, validating it first.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            filter: FilterService::with_config(&config.cache)?,
            search: SearchService::with_config(&config)?,
            sort: SortService::with_config(&config.cache)?,
            config,
        })
    }

    pub fn builder() -> DiscoveryEngineBuilder {
        DiscoveryEngineBuilder::new()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn filter(&self) -> &FilterService {
        &self.filter
    }

    pub fn search(&self) -> &SearchService {
        &self.search
    }

    pub fn sort(&self) -> &SortService {
        &self.sort
    }

    /// Run filter, then search (when the query has terms), then sort (when
    /// criteria are given), and return the requested page.
    pub fn discover<'a>(
        &self,
        records: &'a [ModelRecord],
        query: &DiscoveryQuery,
    ) -> Result<DiscoveryPage<'a>> {
        query.validate()?;

        let filtered: Vec<&'a ModelRecord> = self
            .filter
            .positions(records, &query.criteria)
            .iter()
            .map(|&i| &records[i])
            .collect();

        let mut items: Vec<DiscoveredModel<'a>> = if query.has_search_terms() {
            let text = query.query.as_deref().unwrap_or_default();
            self.search
                .hits(&filtered, text, query.search.as_ref())?
                .iter()
                .map(|hit| DiscoveredModel {
                    record: filtered[hit.position],
                    score: Some(hit.score),
                })
                .collect()
        } else {
            filtered
                .iter()
                .map(|&record| DiscoveredModel {
                    record,
                    score: None,
                })
                .collect()
        };

        let keys = resolve_criteria(&query.sort);
        if !keys.is_empty() {
            let ranked: Vec<&ModelRecord> = items.iter().map(|item| item.record).collect();
            let order = self.sort.order(&ranked, &keys);
            items = order.iter().map(|&i| items[i].clone()).collect();
        }

        let total = items.len();
        let start = (query.page - 1).saturating_mul(query.page_size);
        let items: Vec<DiscoveredModel<'a>> = items
            .into_iter()
            .skip(start)
            .take(query.page_size)
            .collect();

        debug!(
            "Discovered {} of {} records ({} on page {})",
            total,
            records.len(),
            items.len(),
            query.page
        );

        Ok(DiscoveryPage {
            items,
            total,
            page: query.page,
            page_size: query.page_size,
        })
    }

    /// Facet values and bounds for building filter controls.
    pub fn filter_options(&self, records: &[ModelRecord]) -> FilterOptions {
        self.filter.available_options(records)
    }

    /// Drop every cached result in every service.
    pub fn clear_caches(&self) {
        self.filter.clear_cache();
        self.search.clear_cache();
        self.sort.clear_cache();
    }

    /// Cache counters for the filter, search and sort services, in that order.
    pub fn cache_stats(&self) -> Vec<CacheStats> {
        vec![
            self.filter.cache_stats(),
            self.search.cache_stats(),
            self.sort.cache_stats(),
        ]
    }
}

/// Builder for configuring a [`DiscoveryEngine`].
///
/// Starts from [`EngineConfig::default`]. Nothing is validated until
/// [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct DiscoveryEngineBuilder {
    config: EngineConfig,
}

impl DiscoveryEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Search options used when a call passes none.
    pub fn search_options(mut self, options: SearchOptions) -> Self {
        self.config.search = options;
        self
    }

    pub fn field_weights(mut self, weights: FieldWeights) -> Self {
        self.config.field_weights = weights;
        self
    }

    pub fn cache(mut self, cache: CacheConfig) -> Self {
        self.config.cache = cache;
        self
    }

    /// How long cached results stay valid.
    ///
    /// Default: 5 minutes
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache.ttl = ttl;
        self
    }

    /// Maximum cached results per service.
    ///
    /// Default: 256
    pub fn cache_capacity(mut self, max_entries: u64) -> Self {
        self.config.cache.max_entries = max_entries;
        self
    }

    /// Turn result caching off entirely.
    pub fn without_cache(mut self) -> Self {
        self.config.cache.enabled = false;
        self
    }

    pub fn build(self) -> Result<DiscoveryEngine> {
        DiscoveryEngine::with_config(self.config)
    }
}
