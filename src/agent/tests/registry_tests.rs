//! Registry start/stop semantics and maintenance mode.

use super::support::{Harness, payload, tenant_config};
use crate::agent::domain::AgentState;
use crate::agent::services::{
    AgentError, AgentRegistry, AgentRegistryError, MaintenanceController,
};
use crate::tenant::adapters::memory::InMemoryConfigStore;
use crate::tenant::domain::{TenantConfig, TenantId};
use crate::tenant::ports::{ConfigStore, ConfigStoreResult};
use async_trait::async_trait;
use rstest::{fixture, rstest};
use std::sync::Arc;
use std::time::Duration;

/// Config store whose lookups take a while to answer.
struct SlowConfigStore {
    inner: InMemoryConfigStore,
    delay: Duration,
}

#[async_trait]
impl ConfigStore for SlowConfigStore {
    async fn find_by_id(&self, tenant_id: &TenantId) -> ConfigStoreResult<Option<TenantConfig>> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_by_id(tenant_id).await
    }

    async fn list_running_ids(&self) -> ConfigStoreResult<Vec<TenantId>> {
        self.inner.list_running_ids().await
    }

    async fn set_running(&self, tenant_id: &TenantId, running: bool) -> ConfigStoreResult<()> {
        self.inner.set_running(tenant_id, running).await
    }
}

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

fn id(value: &str) -> TenantId {
    TenantId::new(value).expect("valid tenant id")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_unknown_tenant_reports_missing_config(harness: Harness) {
    let registry = harness.registry();

    let result = registry.start(&id("ghost")).await;

    assert!(matches!(result, Err(AgentRegistryError::ConfigNotFound(_))));
    assert!(!registry.is_running(&id("ghost")));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_starts_yield_one_agent(harness: Harness) {
    let tenant_id = harness.register(tenant_config("tenant-01"));
    let registry = harness.registry();

    let (first, second) = tokio::join!(registry.start(&tenant_id), registry.start(&tenant_id));

    let results = [first, second];
    let started = results.iter().filter(|result| result.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|result| matches!(result, Err(AgentRegistryError::AlreadyRunning(_))))
        .count();
    assert_eq!((started, rejected), (1, 1));
    assert_eq!(harness.browser.sessions_opened(), 1);
    registry.shutdown_all().await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_and_stop_maintain_running_flag(harness: Harness) {
    let tenant_id = harness.register(tenant_config("tenant-01"));
    let registry = harness.registry();

    let stats = registry.start(&tenant_id).await.expect("agent starts");
    assert_eq!(stats.state, AgentState::Active);
    assert!(registry.is_running(&tenant_id));
    assert!(harness.store.is_flagged_running(&tenant_id).expect("store readable"));

    assert!(registry.stop(&tenant_id).await);
    assert!(!registry.is_running(&tenant_id));
    assert!(!harness.store.is_flagged_running(&tenant_id).expect("store readable"));
    assert!(!registry.stop(&tenant_id).await);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_start_leaves_no_agent_behind(harness: Harness) {
    let tenant_id = harness.register(tenant_config("tenant-01"));
    let registry = harness.registry();
    harness.browser.set_page_text("maintenance page");

    let result = registry.start(&tenant_id).await;

    assert!(matches!(
        result,
        Err(AgentRegistryError::Agent(AgentError::Scrape(_)))
    ));
    assert!(!registry.is_running(&tenant_id));
    assert!(!harness.store.is_flagged_running(&tenant_id).expect("store readable"));

    harness.browser.set_page_text(super::support::CAPTCHA_PAGE);
    registry.start(&tenant_id).await.expect("manual retry succeeds");
    registry.shutdown_all().await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listings_are_ordered_by_tenant(harness: Harness) {
    let second = harness.register(tenant_config("tenant-b"));
    let first = harness.register(tenant_config("tenant-a"));
    let registry = harness.registry();
    registry.start(&second).await.expect("agent starts");
    registry.start(&first).await.expect("agent starts");

    assert_eq!(registry.list(), vec![first.clone(), second.clone()]);
    let stats: Vec<TenantId> = registry
        .list_stats()
        .into_iter()
        .map(|entry| entry.tenant_id)
        .collect();
    assert_eq!(stats, vec![first.clone(), second]);
    assert!(registry.stats(&first).is_some());
    assert!(registry.stats(&id("ghost")).is_none());
    registry.shutdown_all().await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn boot_resumes_flagged_tenants_and_shutdown_keeps_flags(harness: Harness) {
    let running = harness.register(tenant_config("tenant-01"));
    let missing = id("tenant-gone");
    harness.register(tenant_config("tenant-02"));
    harness
        .store
        .set_running(&running, true)
        .await
        .expect("flag stored");

    let registry = harness.registry();
    let report = registry.resume_running().await.expect("flags listed");

    assert_eq!(report.started, vec![running.clone()]);
    assert!(report.failed.is_empty());
    assert!(!registry.is_running(&id("tenant-02")));
    assert!(!registry.is_running(&missing));

    assert_eq!(registry.shutdown_all().await, vec![running.clone()]);
    assert!(registry.list().is_empty());
    assert!(harness.store.is_flagged_running(&running).expect("store readable"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn maintenance_suspends_and_restores_agents(harness: Harness) {
    let tenant_id = harness.register(tenant_config("tenant-01"));
    let idle = harness.register(tenant_config("tenant-02"));
    harness.browser.set_payload(payload(&[(
        "2026-10-18 08:50:00",
        "8801711111111",
        "ACMEBANK",
        "Your code: 1111",
    )]));
    let registry = harness.registry();
    registry.start(&tenant_id).await.expect("agent starts");
    let controller = MaintenanceController::new(Arc::clone(&registry));

    assert_eq!(controller.suspend().await, vec![tenant_id.clone()]);
    assert!(controller.is_active());
    assert!(!registry.is_running(&tenant_id));
    assert!(matches!(
        registry.start(&idle).await,
        Err(AgentRegistryError::MaintenanceActive)
    ));

    let report = controller.resume().await;
    assert!(!controller.is_active());
    assert_eq!(report.started, vec![tenant_id.clone()]);
    assert!(!registry.is_running(&idle));

    let agent = registry.agent(&tenant_id).expect("agent registered");
    agent.poll_once().await;
    assert!(harness.relayed().is_empty());
    assert!(harness.store.is_flagged_running(&tenant_id).expect("store readable"));
    registry.shutdown_all().await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_racing_a_suspend_does_not_outlive_it(harness: Harness) {
    let tenant_id = harness.register(tenant_config("tenant-01"));
    let registry = Arc::new(AgentRegistry::new(
        Arc::new(SlowConfigStore {
            inner: harness.store.clone(),
            delay: Duration::from_millis(200),
        }),
        harness.context.clone(),
    ));
    let maintenance = MaintenanceController::new(Arc::clone(&registry));

    let starting = {
        let shared = Arc::clone(&registry);
        let tenant = tenant_id.clone();
        tokio::spawn(async move { shared.start(&tenant).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    let suspended = maintenance.suspend().await;
    let result = starting.await.expect("start task completes");

    assert!(suspended.is_empty());
    assert!(matches!(result, Err(AgentRegistryError::MaintenanceActive)));
    assert!(maintenance.is_active());
    assert!(!registry.is_running(&tenant_id));
    assert_eq!(harness.browser.sessions_opened(), 0);
}
