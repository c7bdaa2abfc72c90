//! Validation errors for tenant configuration values.

use thiserror::Error;

/// Errors returned while constructing tenant domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TenantDomainError {
    /// The tenant identifier is empty after trimming.
    #[error("tenant id must not be empty")]
    EmptyTenantId,

    /// The tenant identifier contains characters outside `[A-Za-z0-9_-]`.
    #[error("tenant id '{0}' contains invalid characters (only ASCII alphanumerics, '-' and '_' allowed)")]
    InvalidTenantId(String),

    /// The tenant identifier exceeds the storage key limit.
    #[error("tenant id exceeds 64 character limit: {0}")]
    TenantIdTooLong(String),

    /// A messaging destination is empty after trimming.
    #[error("channel destination must not be empty")]
    EmptyDestination,

    /// The tenant has no messaging destinations.
    #[error("tenant {0} has no channel destinations")]
    NoDestinations(String),

    /// The panel username is empty after trimming.
    #[error("panel username must not be empty")]
    EmptyUsername,

    /// A console URL is missing an `http://` or `https://` prefix.
    #[error("{field} '{value}' must start with 'http://' or 'https://'")]
    InvalidUrl {
        /// Name of the offending field.
        field: &'static str,
        /// Rejected value.
        value: String,
    },

    /// The poll interval is shorter than one second.
    #[error("poll interval must be at least 1 second, got {0}s")]
    PollIntervalTooShort(u64),
}
