use thiserror::Error;

/// Errors surfaced synchronously by cache operations.
///
/// A missing entry is not an error: [`DataCache::get`](crate::DataCache::get)
/// reports it in its result, and invalidating an absent path returns `false`.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Invalid cache path: {reason}")]
    InvalidPath { reason: String },
    #[error("Value serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    pub(crate) fn invalid_path(reason: impl Into<String>) -> Self {
        Self::InvalidPath { reason: reason.into() }
    }

    /// True if this error was caused by a malformed path.
    #[must_use]
    pub fn is_invalid_path(&self) -> bool {
        matches!(self, Self::InvalidPath { .. })
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
