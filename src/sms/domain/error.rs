//! Error types for SMS domain construction.

use thiserror::Error;

/// Errors returned while building SMS domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SmsDomainError {
    /// An extraction strategy pattern failed to compile.
    #[error("extraction strategy '{name}' has an invalid pattern: {reason}")]
    InvalidPattern {
        /// Strategy name.
        name: &'static str,
        /// Compiler diagnostic.
        reason: String,
    },

    /// A persisted content hash is not 64 lowercase hexadecimal characters.
    #[error("invalid content hash: {0}")]
    InvalidContentHash(String),
}
