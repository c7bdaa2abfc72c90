//! Repository port for tenant configuration records.

use crate::tenant::domain::{TenantConfig, TenantId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for configuration store operations.
pub type ConfigStoreResult<T> = Result<T, ConfigStoreError>;

/// Read access to externally owned tenant configuration.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Finds the configuration for a tenant.
    ///
    /// Returns `Ok(None)` when the tenant does not exist.
    async fn find_by_id(&self, tenant_id: &TenantId) -> ConfigStoreResult<Option<TenantConfig>>;

    /// Returns the tenants flagged as running, used to resume agents at boot.
    async fn list_running_ids(&self) -> ConfigStoreResult<Vec<TenantId>>;

    /// Records whether a tenant's agent should be running.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigStoreError::NotFound`] when the tenant does not exist.
    async fn set_running(&self, tenant_id: &TenantId, running: bool) -> ConfigStoreResult<()>;
}

/// Errors returned by configuration store implementations.
#[derive(Debug, Clone, Error)]
pub enum ConfigStoreError {
    /// The tenant was not found.
    #[error("tenant not found: {0}")]
    NotFound(TenantId),

    /// A stored record could not be reconstructed into a valid snapshot.
    #[error("invalid stored tenant configuration: {0}")]
    InvalidStoredData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ConfigStoreError {
    /// Wraps a record decoding or validation failure.
    pub fn invalid_stored_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidStoredData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
