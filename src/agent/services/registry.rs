//! Process-wide map of running agents.

use super::{
    agent::{Agent, AgentError},
    context::AgentContext,
};
use crate::agent::domain::AgentStats;
use crate::tenant::{
    domain::TenantId,
    ports::{ConfigStore, ConfigStoreError},
};
use std::collections::HashMap;
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, Ordering},
};
use thiserror::Error;
use tracing::{info, warn};

/// Errors returned by registry operations.
#[derive(Debug, Error)]
pub enum AgentRegistryError {
    /// An agent for the tenant is already registered.
    #[error("agent for tenant {0} is already running")]
    AlreadyRunning(TenantId),

    /// No configuration exists for the tenant.
    #[error("no configuration found for tenant {0}")]
    ConfigNotFound(TenantId),

    /// Agents cannot start while maintenance mode is active.
    #[error("maintenance mode is active")]
    MaintenanceActive,

    /// The configuration store failed.
    #[error(transparent)]
    ConfigStore(#[from] ConfigStoreError),

    /// The agent failed to connect.
    #[error(transparent)]
    Agent(#[from] AgentError),
}

/// Result type for registry operations.
pub type AgentRegistryResult<T> = Result<T, AgentRegistryError>;

/// Outcome of starting several agents.
#[derive(Debug, Default)]
pub struct BatchStartReport {
    /// Tenants whose agents started.
    pub started: Vec<TenantId>,
    /// Tenants whose agents did not start, with the reason.
    pub failed: Vec<(TenantId, AgentRegistryError)>,
}

/// Keeps at most one live agent per tenant.
///
/// The map lock is held only for lookups, inserts and removals; connecting
/// and stopping happen outside it, so a slow tenant never blocks the others.
pub struct AgentRegistry {
    config_store: Arc<dyn ConfigStore>,
    context: AgentContext,
    agents: Mutex<HashMap<TenantId, Agent>>,
    maintenance: AtomicBool,
}

impl AgentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(config_store: Arc<dyn ConfigStore>, context: AgentContext) -> Self {
        Self {
            config_store,
            context,
            agents: Mutex::new(HashMap::new()),
            maintenance: AtomicBool::new(false),
        }
    }

    fn agents(&self) -> MutexGuard<'_, HashMap<TenantId, Agent>> {
        self.agents.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts the agent for a tenant.
    ///
    /// The agent is registered before it connects, so concurrent starts for
    /// the same tenant yield exactly one agent. If connecting fails the entry
    /// is removed again. The maintenance gate is checked again under the map
    /// lock, so a start never lands after a suspend sweep. On success the tenant is flagged as running in the
    /// configuration store.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryError::MaintenanceActive`],
    /// [`AgentRegistryError::AlreadyRunning`],
    /// [`AgentRegistryError::ConfigNotFound`], store errors, or the agent's
    /// connection error.
    pub async fn start(&self, tenant_id: &TenantId) -> AgentRegistryResult<AgentStats> {
        if self.is_maintenance_active() {
            return Err(AgentRegistryError::MaintenanceActive);
        }
        if self.is_running(tenant_id) {
            return Err(AgentRegistryError::AlreadyRunning(tenant_id.clone()));
        }

        let config = self
            .config_store
            .find_by_id(tenant_id)
            .await?
            .ok_or_else(|| AgentRegistryError::ConfigNotFound(tenant_id.clone()))?;
        let agent = Agent::new(config, &self.context);

        {
            let mut agents = self.agents();
            // Maintenance may have begun while the config was loading; a
            // suspend sweep takes this lock after raising the gate.
            if self.is_maintenance_active() {
                return Err(AgentRegistryError::MaintenanceActive);
            }
            if agents.contains_key(tenant_id) {
                return Err(AgentRegistryError::AlreadyRunning(tenant_id.clone()));
            }
            agents.insert(tenant_id.clone(), agent.clone());
        }

        if let Err(error) = agent.connect().await {
            self.deregister(&agent);
            warn!(%tenant_id, %error, "agent failed to start");
            return Err(error.into());
        }

        if let Err(error) = self.config_store.set_running(tenant_id, true).await {
            warn!(%tenant_id, %error, "running flag not recorded");
        }
        info!(%tenant_id, "agent started");
        Ok(agent.stats())
    }

    /// Stops and deregisters the agent for a tenant.
    ///
    /// Returns `false` when no agent was registered. The tenant's running
    /// flag is cleared so it is not resumed at the next boot.
    pub async fn stop(&self, tenant_id: &TenantId) -> bool {
        if !self.stop_retaining_flag(tenant_id).await {
            return false;
        }
        if let Err(error) = self.config_store.set_running(tenant_id, false).await {
            warn!(%tenant_id, %error, "running flag not cleared");
        }
        true
    }

    /// Stops and deregisters an agent without touching its running flag.
    pub(crate) async fn stop_retaining_flag(&self, tenant_id: &TenantId) -> bool {
        let Some(agent) = self.agents().remove(tenant_id) else {
            return false;
        };
        agent.stop().await;
        info!(%tenant_id, "agent stopped");
        true
    }

    fn deregister(&self, agent: &Agent) {
        let mut agents = self.agents();
        if agents
            .get(agent.tenant_id())
            .is_some_and(|registered| registered.same_agent(agent))
        {
            agents.remove(agent.tenant_id());
        }
    }

    /// Returns whether an agent is registered for the tenant.
    #[must_use]
    pub fn is_running(&self, tenant_id: &TenantId) -> bool {
        self.agents().contains_key(tenant_id)
    }

    /// Returns the statistics of a registered agent.
    #[must_use]
    pub fn stats(&self, tenant_id: &TenantId) -> Option<AgentStats> {
        self.agent(tenant_id).map(|agent| agent.stats())
    }

    /// Returns the handle of a registered agent.
    #[must_use]
    pub fn agent(&self, tenant_id: &TenantId) -> Option<Agent> {
        self.agents().get(tenant_id).cloned()
    }

    /// Lists registered tenants in identifier order.
    #[must_use]
    pub fn list(&self) -> Vec<TenantId> {
        let mut ids: Vec<TenantId> = self.agents().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Returns statistics for every registered agent in identifier order.
    #[must_use]
    pub fn list_stats(&self) -> Vec<AgentStats> {
        let mut agents: Vec<Agent> = self.agents().values().cloned().collect();
        agents.sort_by(|left, right| left.tenant_id().cmp(right.tenant_id()));
        agents.iter().map(Agent::stats).collect()
    }

    /// Starts every tenant flagged as running in the configuration store.
    ///
    /// Failures are collected per tenant and do not stop the others.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryError::ConfigStore`] when the flagged tenants
    /// cannot be listed.
    pub async fn resume_running(&self) -> AgentRegistryResult<BatchStartReport> {
        let tenant_ids = self.config_store.list_running_ids().await?;
        Ok(self.start_all(tenant_ids).await)
    }

    pub(crate) async fn start_all(
        &self,
        tenant_ids: impl IntoIterator<Item = TenantId>,
    ) -> BatchStartReport {
        let mut report = BatchStartReport::default();
        for tenant_id in tenant_ids {
            match self.start(&tenant_id).await {
                Ok(_) => report.started.push(tenant_id),
                Err(error) => report.failed.push((tenant_id, error)),
            }
        }
        report
    }

    /// Stops every registered agent, one after another.
    ///
    /// Running flags are kept so the same agents resume at the next boot.
    /// Each session close is bounded by the configured close timeout.
    pub async fn shutdown_all(&self) -> Vec<TenantId> {
        let mut stopped = Vec::new();
        for tenant_id in self.list() {
            if self.stop_retaining_flag(&tenant_id).await {
                stopped.push(tenant_id);
            }
        }
        stopped
    }

    /// Returns whether maintenance mode is active.
    #[must_use]
    pub fn is_maintenance_active(&self) -> bool {
        self.maintenance.load(Ordering::Acquire)
    }

    /// Sets the maintenance gate, returning the previous value.
    pub(crate) fn set_maintenance(&self, active: bool) -> bool {
        self.maintenance.swap(active, Ordering::AcqRel)
    }
}
