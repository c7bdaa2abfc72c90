//! Durable per-tenant storage for deduplication hashes.

use crate::sms::domain::ContentHash;
use crate::tenant::domain::TenantId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for dedup store operations.
pub type DedupStoreResult<T> = Result<T, DedupStoreError>;

/// Persistence contract for a tenant's notified-message hashes.
#[async_trait]
pub trait DedupStore: Send + Sync {
    /// Loads persisted hashes, oldest first.
    ///
    /// A tenant with no stored state yields an empty list.
    async fn load(&self, tenant_id: &TenantId) -> DedupStoreResult<Vec<ContentHash>>;

    /// Replaces the persisted hashes for a tenant.
    async fn save(&self, tenant_id: &TenantId, hashes: &[ContentHash]) -> DedupStoreResult<()>;
}

/// Errors returned by dedup store implementations.
#[derive(Debug, Clone, Error)]
pub enum DedupStoreError {
    /// Stored state could not be decoded.
    #[error("corrupt dedup state for tenant {tenant_id}: {reason}")]
    Corrupt {
        /// Tenant whose state failed to decode.
        tenant_id: TenantId,
        /// Decoder failure.
        reason: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// Persistence-layer failure.
    #[error("dedup persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DedupStoreError {
    /// Wraps a decoding failure for a tenant's state.
    pub fn corrupt(
        tenant_id: TenantId,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Corrupt {
            tenant_id,
            reason: Arc::new(err),
        }
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
