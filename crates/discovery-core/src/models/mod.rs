//! Data models for the discovery engine.
//!
//! Records, criteria and options are plain serde-friendly data so hosts can
//! ship them as JSON; behaviour lives in the service modules.

mod criteria;
mod record;
mod search;
mod sort;

pub use criteria::*;
pub use record::*;
pub use search::*;
pub use sort::*;
