//! Error types for cache operations

use thiserror::Error;

/// Cache domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The key is absent: never inserted, already removed, or swept.
    /// Callers cannot tell these apart, and are not meant to.
    #[error("key not found: {0}")]
    KeyNotFound(String),
}
