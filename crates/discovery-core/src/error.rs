//! Error types for the discovery engine.
//!
//! Data-level problems (empty collections, malformed dates, unknown sort
//! fields) never surface here; they degrade to a well-defined no-op. Errors
//! are reserved for invalid configuration or per-call options.

use thiserror::Error;

/// Main error type for the discovery engine.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    // Validation errors
    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },
}

/// Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;

impl From<serde_json::Error> for DiscoveryError {
    fn from(err: serde_json::Error) -> Self {
        DiscoveryError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl DiscoveryError {
    /// Create a validation error for a named parameter.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DiscoveryError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the offending parameter, if this is a validation error.
    pub fn field(&self) -> Option<&str> {
        match self {
            DiscoveryError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Whether the error was caused by caller-supplied parameters.
    pub fn is_validation(&self) -> bool {
        matches!(self, DiscoveryError::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DiscoveryError::validation("limit", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "Validation error for limit: must be at least 1"
        );
        assert_eq!(err.field(), Some("limit"));
    }

    #[test]
    fn test_bad_cache_config_is_validation() {
        let config = crate::config::CacheConfig {
            max_entries: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.field(), Some("cache.maxEntries"));
    }

    #[test]
    fn test_json_conversion() {
        let err: DiscoveryError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, DiscoveryError::Json { .. }));
        assert!(!err.is_validation());
    }
}
