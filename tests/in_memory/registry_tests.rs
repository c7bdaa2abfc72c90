//! Registry guarantees under concurrency and across process lifecycles.

use super::helpers::{Relay, relay, tenant_config, tenant_id};
use otp_relay::agent::{
    domain::AgentState,
    services::{AgentRegistryError, MaintenanceController},
};
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn racing_starts_produce_one_active_agent(relay: Relay) {
    let registry = relay.in_memory_registry();
    let id = tenant_id("tenant-01");

    let attempts: Vec<_> = (0..8)
        .map(|_| {
            let shared = Arc::clone(&registry);
            let tenant = id.clone();
            tokio::spawn(async move { shared.start(&tenant).await })
        })
        .collect();
    let mut started = 0;
    let mut rejected = 0;
    for attempt in attempts {
        match attempt.await.expect("start task completes") {
            Ok(stats) => {
                assert_eq!(stats.state, AgentState::Active);
                started += 1;
            }
            Err(AgentRegistryError::AlreadyRunning(_)) => rejected += 1,
            Err(other) => panic!("unexpected start error: {other}"),
        }
    }

    assert_eq!((started, rejected), (1, 7));
    assert_eq!(relay.browser.sessions_opened(), 1);
    registry.shutdown_all().await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tenants_run_independently(relay: Relay) {
    relay.store.upsert(tenant_config("tenant-02")).expect("config stored");
    let registry = relay.in_memory_registry();
    registry.start(&tenant_id("tenant-01")).await.expect("agent starts");
    registry.start(&tenant_id("tenant-02")).await.expect("agent starts");

    assert!(registry.stop(&tenant_id("tenant-01")).await);

    assert_eq!(registry.list(), vec![tenant_id("tenant-02")]);
    let stats = registry.stats(&tenant_id("tenant-02")).expect("stats available");
    assert_eq!(stats.state, AgentState::Active);
    assert!(stats.session_active);
    registry.shutdown_all().await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn shutdown_then_boot_resumes_the_same_tenants(relay: Relay) {
    relay.store.upsert(tenant_config("tenant-02")).expect("config stored");
    let first_process = relay.in_memory_registry();
    first_process.start(&tenant_id("tenant-01")).await.expect("agent starts");
    first_process.start(&tenant_id("tenant-02")).await.expect("agent starts");
    first_process.stop(&tenant_id("tenant-02")).await;

    let stopped = first_process.shutdown_all().await;
    assert_eq!(stopped, vec![tenant_id("tenant-01")]);

    let second_process = relay.in_memory_registry();
    let report = second_process.resume_running().await.expect("flags listed");
    assert_eq!(report.started, vec![tenant_id("tenant-01")]);
    assert_eq!(second_process.list(), vec![tenant_id("tenant-01")]);
    second_process.shutdown_all().await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn maintenance_round_trip_keeps_agents_and_flags(relay: Relay) {
    let registry = relay.in_memory_registry();
    let id = tenant_id("tenant-01");
    registry.start(&id).await.expect("agent starts");
    let maintenance = MaintenanceController::new(Arc::clone(&registry));

    maintenance.suspend().await;
    assert!(registry.list().is_empty());
    assert!(relay.store.is_flagged_running(&id).expect("store readable"));

    let report = maintenance.resume().await;
    assert_eq!(report.started, vec![id.clone()]);
    assert!(registry.is_running(&id));
    registry.shutdown_all().await;
}
