//! In-memory configuration store.

use crate::tenant::{
    domain::{TenantConfig, TenantId},
    ports::{ConfigStore, ConfigStoreError, ConfigStoreResult},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory tenant configuration store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigStore {
    state: Arc<RwLock<BTreeMap<TenantId, StoredTenant>>>,
}

#[derive(Debug, Clone)]
struct StoredTenant {
    config: TenantConfig,
    running: bool,
}

impl InMemoryConfigStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a tenant configuration, keeping its running flag.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigStoreError::Persistence`] when lock acquisition fails.
    pub fn upsert(&self, config: TenantConfig) -> ConfigStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            ConfigStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let running = state
            .get(config.id())
            .is_some_and(|stored| stored.running);
        state.insert(config.id().clone(), StoredTenant { config, running });
        Ok(())
    }

    /// Returns the stored running flag for a tenant.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigStoreError::Persistence`] when lock acquisition fails.
    pub fn is_flagged_running(&self, tenant_id: &TenantId) -> ConfigStoreResult<bool> {
        let state = self.state.read().map_err(|err| {
            ConfigStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(tenant_id).is_some_and(|stored| stored.running))
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn find_by_id(&self, tenant_id: &TenantId) -> ConfigStoreResult<Option<TenantConfig>> {
        let state = self.state.read().map_err(|err| {
            ConfigStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(tenant_id).map(|stored| stored.config.clone()))
    }

    async fn list_running_ids(&self) -> ConfigStoreResult<Vec<TenantId>> {
        let state = self.state.read().map_err(|err| {
            ConfigStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .iter()
            .filter(|(_, stored)| stored.running)
            .map(|(id, _)| id.clone())
            .collect())
    }

    async fn set_running(&self, tenant_id: &TenantId, running: bool) -> ConfigStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            ConfigStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let stored = state
            .get_mut(tenant_id)
            .ok_or_else(|| ConfigStoreError::NotFound(tenant_id.clone()))?;
        stored.running = running;
        Ok(())
    }
}
