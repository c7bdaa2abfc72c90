//! Session rebuild driven by the health watchdog.

use super::helpers::{Relay, eventually, relay, tenant_id};
use chrono::Duration as TimeDelta;
use otp_relay::agent::{domain::AgentState, services::HealthCheck};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_session_is_rebuilt_once(relay: Relay) {
    let registry = relay.in_memory_registry();
    let id = tenant_id("tenant-01");
    registry.start(&id).await.expect("agent starts");
    let agent = registry.agent(&id).expect("agent registered");

    relay.clock.advance(TimeDelta::seconds(301));
    assert_eq!(agent.check_health(), HealthCheck::RebuildStarted);
    assert!(eventually(|| agent.state() == AgentState::Active).await);

    relay.show(&[]);
    agent.poll_once().await;
    relay.clock.advance(TimeDelta::seconds(120));
    assert_eq!(agent.check_health(), HealthCheck::Healthy);
    assert_eq!(relay.browser.sessions_opened(), 2);
    registry.shutdown_all().await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn polls_during_rebuild_fail_quietly(relay: Relay) {
    let registry = relay.in_memory_registry();
    let id = tenant_id("tenant-01");
    registry.start(&id).await.expect("agent starts");
    let agent = registry.agent(&id).expect("agent registered");
    relay.browser.set_launch_failing(true);

    relay.clock.advance(TimeDelta::seconds(301));
    agent.check_health();
    assert!(eventually(|| !agent.stats().session_active).await);
    agent.poll_once().await;

    assert_eq!(agent.state(), AgentState::Reconnecting);
    assert!(registry.is_running(&id));
    relay.browser.set_launch_failing(false);
    registry.shutdown_all().await;
}
