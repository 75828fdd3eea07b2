use hoplink_core::StoreError;
use thiserror::Error;

/// Type alias for resolver results.
pub type Result<T> = std::result::Result<T, LinkError>;

/// Errors surfaced to callers of the resolver.
#[derive(Debug, Clone, Error)]
pub enum LinkError {
    /// The URL was rejected by the acceptability policy. The caller must
    /// fix the input.
    #[error("url rejected: {0}")]
    InvalidInput(String),
    /// No free short code was found within the attempt budget. Signals
    /// either a too-short code length or a saturated keyspace.
    #[error("could not find a free short code after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },
    /// The short code has no record at all.
    #[error("short link not found: {0}")]
    NotFound(String),
    /// The record exists but its expiration has passed. Distinct from
    /// `NotFound` so callers can answer differently.
    #[error("short link expired: {0}")]
    Expired(String),
    /// Store or cache I/O failed. Recoverable by retrying with backoff.
    #[error("backend unavailable: {0}")]
    Backend(String),
}

impl From<StoreError> for LinkError {
    fn from(err: StoreError) -> Self {
        // `Conflict` is handled explicitly inside the create loop; any
        // conflict that leaks out here is a backend-level surprise.
        LinkError::Backend(err.to_string())
    }
}
