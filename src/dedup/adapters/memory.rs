//! In-memory dedup store.

use crate::dedup::ports::{DedupStore, DedupStoreError, DedupStoreResult};
use crate::sms::domain::ContentHash;
use crate::tenant::domain::TenantId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory dedup store.
///
/// Clones share state, which lets tests observe what an agent persisted
/// across stop/start cycles.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDedupStore {
    state: Arc<RwLock<HashMap<TenantId, Vec<ContentHash>>>>,
}

impl InMemoryDedupStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many hashes are persisted for a tenant.
    ///
    /// # Errors
    ///
    /// Returns [`DedupStoreError::Persistence`] when lock acquisition fails.
    pub fn stored_len(&self, tenant_id: &TenantId) -> DedupStoreResult<usize> {
        let state = self.state.read().map_err(|err| {
            DedupStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(tenant_id).map_or(0, Vec::len))
    }
}

#[async_trait]
impl DedupStore for InMemoryDedupStore {
    async fn load(&self, tenant_id: &TenantId) -> DedupStoreResult<Vec<ContentHash>> {
        let state = self.state.read().map_err(|err| {
            DedupStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(tenant_id).cloned().unwrap_or_default())
    }

    async fn save(&self, tenant_id: &TenantId, hashes: &[ContentHash]) -> DedupStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            DedupStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state.insert(tenant_id.clone(), hashes.to_vec());
        Ok(())
    }
}
