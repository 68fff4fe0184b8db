//! Result caching for the discovery services.
//!
//! Each service owns a private [`ResultCache`] keyed by a structural
//! [`CacheKey`] over (collection fingerprint, call parameters). Cached values
//! are positions into the caller's collection, so a hit still hands back
//! references to the caller's own records.

mod key;
mod memory;

pub use key::{CacheKey, CacheKeyBuilder};
pub use memory::{CacheStats, ResultCache};
