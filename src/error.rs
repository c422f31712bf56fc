//! Cache error types.

use thiserror::Error;

use crate::config::ConfigError;

/// Result alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors that can occur during cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A store command failed. Carries the client error text verbatim.
    #[error("Cache operation failed: {0}")]
    Operation(String),

    /// The server could not be reached, either at construction time or
    /// when checking a connection out of the pool.
    #[error("Cache connection failed: {0}")]
    Connection(String),

    /// A typed accessor read a stored value that cannot represent the
    /// requested type.
    #[error("Type mismatch for key '{key}': expected {expected}, got {found:?}")]
    TypeMismatch {
        /// Logical key the value was read from.
        key: String,
        /// The requested type.
        expected: &'static str,
        /// The stored value that failed coercion.
        found: String,
    },

    /// The configuration handed to the store was rejected.
    #[error("Invalid cache configuration: {0}")]
    Config(#[from] ConfigError),
}
