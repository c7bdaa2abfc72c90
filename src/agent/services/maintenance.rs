//! Global suspend and resume of all agents.

use super::registry::{AgentRegistry, BatchStartReport};
use crate::tenant::domain::TenantId;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

/// Switches maintenance mode on and off.
///
/// Suspending stops every registered agent but keeps its persisted dedup
/// state and running flag, so resuming restarts the same agents without
/// re-notifying history.
pub struct MaintenanceController {
    registry: Arc<AgentRegistry>,
    suspended: Mutex<Vec<TenantId>>,
}

impl MaintenanceController {
    /// Creates a controller over a registry.
    #[must_use]
    pub const fn new(registry: Arc<AgentRegistry>) -> Self {
        Self {
            registry,
            suspended: Mutex::new(Vec::new()),
        }
    }

    /// Enters maintenance mode and stops every registered agent.
    ///
    /// Returns the tenants suspended by this call. Starts are refused until
    /// [`Self::resume`].
    pub async fn suspend(&self) -> Vec<TenantId> {
        self.registry.set_maintenance(true);
        let mut stopped = Vec::new();
        for tenant_id in self.registry.list() {
            if self.registry.stop_retaining_flag(&tenant_id).await {
                stopped.push(tenant_id);
            }
        }
        self.suspended
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(stopped.iter().cloned());
        info!(count = stopped.len(), "maintenance mode entered");
        stopped
    }

    /// Leaves maintenance mode and restarts the suspended agents.
    pub async fn resume(&self) -> BatchStartReport {
        let suspended = std::mem::take(
            &mut *self
                .suspended
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        self.registry.set_maintenance(false);
        let report = self.registry.start_all(suspended).await;
        info!(
            started = report.started.len(),
            failed = report.failed.len(),
            "maintenance mode left"
        );
        report
    }

    /// Returns whether maintenance mode is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.registry.is_maintenance_active()
    }
}
