//! Structural cache keys.
//!
//! Keys are blake3 digests over a namespace, the serialized record
//! collection and the serialized call parameters. Every component is length-prefixed or
//! terminated so that distinct inputs cannot concatenate to the same bytes.

use crate::models::ModelRecord;
use serde::Serialize;
use tracing::debug;

/// JSON never emits this byte, so it safely terminates a serialized value.
const VALUE_TERMINATOR: u8 = 0xff;

/// Digest identifying one cached computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey(blake3::Hash);

impl CacheKey {
    /// Start a key in the given namespace.
    pub fn builder(namespace: &str) -> CacheKeyBuilder {
        let mut builder = CacheKeyBuilder {
            hasher: blake3::Hasher::new(),
            poisoned: false,
        };
        builder.write_str(namespace);
        builder
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }
}

/// Incremental [`CacheKey`] construction.
pub struct CacheKeyBuilder {
    hasher: blake3::Hasher,
    poisoned: bool,
}

impl CacheKeyBuilder {
    /// Mix in the contents of a record collection: every record's full
    /// serialized form, in order, then the length.
    pub fn collection<'a, I>(mut self, records: I) -> Self
    where
        I: IntoIterator<Item = &'a ModelRecord>,
    {
        let mut count: u64 = 0;
        for record in records {
            if let Err(e) = serde_json::to_writer(&mut self.hasher, record) {
                debug!("Record {} is not serializable: {}", record.id, e);
                self.poisoned = true;
            }
            self.hasher.update(&[VALUE_TERMINATOR]);
            count += 1;
        }
        self.hasher.update(&count.to_le_bytes());
        self
    }

    /// Mix in a named, serializable parameter.
    pub fn param<T: Serialize + ?Sized>(mut self, name: &str, value: &T) -> Self {
        self.write_str(name);
        if let Err(e) = serde_json::to_writer(&mut self.hasher, value) {
            debug!("Cache key parameter {} is not serializable: {}", name, e);
            self.poisoned = true;
        }
        self.hasher.update(&[VALUE_TERMINATOR]);
        self
    }

    /// Finish the key. `None` when a parameter could not be serialized, in
    /// which case the caller should skip caching.
    pub fn finish(self) -> Option<CacheKey> {
        if self.poisoned {
            return None;
        }
        Some(CacheKey(self.hasher.finalize()))
    }

    fn write_str(&mut self, value: &str) {
        self.hasher.update(&(value.len() as u64).to_le_bytes());
        self.hasher.update(value.as_bytes());
    }
}
