use thiserror::Error;

/// Errors that can occur when writing to the cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The Redis backend failed.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// The order could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The cache refused the write.
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
