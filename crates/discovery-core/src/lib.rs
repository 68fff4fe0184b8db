//! Discovery Core - In-memory filtering, ranked search and sorting for model
//! catalogs.
//!
//! The engine works over a slice of [`ModelRecord`]s the host already holds.
//! It never fetches, persists or renders anything; every call is synchronous
//! and returns references into the caller's slice.
//!
//! - [`FilterService`] keeps records matching every axis of a [`FilterCriteria`]
//! - [`SearchService`] ranks records against a free-text query
//! - [`SortService`] orders records by one or more fields, missing values last
//! - [`DiscoveryEngine`] chains the three and pages the result
//!
//! # Example
//!
//! ```rust,ignore
//! use discovery_core::{DiscoveryEngine, DiscoveryQuery, ModelRecord};
//!
//! fn main() -> discovery_core::Result<()> {
//!     let records: Vec<ModelRecord> = serde_json::from_str(CATALOG_JSON)?;
//!     let engine = DiscoveryEngine::new();
//!
//!     // Rank models mentioning "llama"
//!     let hits = engine.search().search(&records, "llama", None)?;
//!     println!("Search found {} results", hits.len());
//!
//!     // Or filter, search and sort in one go
//!     let page = engine.discover(&records, &DiscoveryQuery {
//!         query: Some("llama".into()),
//!         ..Default::default()
//!     })?;
//!     println!("{} matches, showing {}", page.total, page.items.len());
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod models;
pub mod search;
pub mod sort;

// Re-export commonly used types
pub use cache::CacheStats;
pub use config::{CacheConfig, EngineConfig, FieldWeights};
pub use engine::{
    DiscoveredModel, DiscoveryEngine, DiscoveryEngineBuilder, DiscoveryPage, DiscoveryQuery,
};
pub use error::{DiscoveryError, Result};
pub use filter::{FilterOptions, FilterService};
pub use models::{
    Capabilities, Capability, DateRange, FieldAvailability, FieldMatch, FilterCriteria, Metrics,
    ModelRecord, NumericRange, Pricing, SearchField, SearchOptions, SearchResult, SortCriterion,
    SortDirection, SortField, SortFieldInfo, Suggestion, SuggestionKind, ValueSet,
};
pub use search::{highlight_matches, SearchService};
pub use sort::SortService;
