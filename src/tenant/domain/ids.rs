//! Identifier types for tenants and their messaging destinations.

use super::TenantDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a tenant id; ids double as storage keys.
const MAX_TENANT_ID_LENGTH: usize = 64;

/// Validated tenant identifier.
///
/// Identifiers are assigned by the CRUD layer. Only ASCII alphanumerics,
/// `-` and `_` are accepted so an id can be used verbatim as a file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    /// Creates a validated tenant identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TenantDomainError`] when the trimmed value is empty, too long,
    /// or contains characters outside `[A-Za-z0-9_-]`.
    pub fn new(value: impl Into<String>) -> Result<Self, TenantDomainError> {
        let normalized = value.into().trim().to_owned();

        if normalized.is_empty() {
            return Err(TenantDomainError::EmptyTenantId);
        }

        let is_valid = normalized
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || matches!(character, '-' | '_'));
        if !is_valid {
            return Err(TenantDomainError::InvalidTenantId(normalized));
        }

        if normalized.len() > MAX_TENANT_ID_LENGTH {
            return Err(TenantDomainError::TenantIdTooLong(normalized));
        }

        Ok(Self(normalized))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TenantId {
    type Error = TenantDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TenantId> for String {
    fn from(value: TenantId) -> Self {
        value.0
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A messaging-channel destination such as a chat id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelDestination(String);

impl ChannelDestination {
    /// Creates a destination from a non-empty value.
    ///
    /// # Errors
    ///
    /// Returns [`TenantDomainError::EmptyDestination`] when the trimmed value
    /// is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, TenantDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(TenantDomainError::EmptyDestination);
        }
        Ok(Self(normalized))
    }

    /// Returns the destination as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ChannelDestination {
    type Error = TenantDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChannelDestination> for String {
    fn from(value: ChannelDestination) -> Self {
        value.0
    }
}

impl fmt::Display for ChannelDestination {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
