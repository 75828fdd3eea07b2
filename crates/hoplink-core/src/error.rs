use thiserror::Error;

/// A short code that failed validation.
#[derive(Debug, Clone, Error)]
#[error("invalid short code: {0}")]
pub struct InvalidShortCode(pub String);

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("short code already taken: {0}")]
    Conflict(String),
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
    #[error("store operation timed out: {0}")]
    Timeout(String),
    #[error("store query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation timed out: {0}")]
    Timeout(String),
    #[error("cache operation failed: {0}")]
    Operation(String),
}
