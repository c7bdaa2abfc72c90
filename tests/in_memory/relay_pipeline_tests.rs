//! End-to-end relay behaviour through the registry.

use super::helpers::{ARRIVALS, HISTORY, Relay, relay, tenant_id};
use camino::Utf8PathBuf;
use otp_relay::agent::services::PollOutcome;
use otp_relay::dedup::adapters::filesystem::FsDedupStore;
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn history_is_never_relayed_on_first_enable(relay: Relay) {
    relay.show(&HISTORY);
    let registry = relay.in_memory_registry();

    registry.start(&tenant_id("tenant-01")).await.expect("agent starts");
    let agent = registry.agent(&tenant_id("tenant-01")).expect("agent registered");
    agent.poll_once().await;

    assert!(relay.relayed().is_empty());
    registry.shutdown_all().await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn identical_snapshot_notifies_only_once(relay: Relay) {
    relay.show(&HISTORY);
    let registry = relay.in_memory_registry();
    registry.start(&tenant_id("tenant-01")).await.expect("agent starts");
    let agent = registry.agent(&tenant_id("tenant-01")).expect("agent registered");

    let [old_one, old_two] = HISTORY;
    let [new_one, new_two] = ARRIVALS;
    relay.show(&[new_two, new_one, old_two, old_one]);
    let first = agent.poll_once().await;
    let second = agent.poll_once().await;

    assert_eq!(first, PollOutcome::Completed { fetched: 4, relayed: 2 });
    assert_eq!(second, PollOutcome::Completed { fetched: 4, relayed: 0 });
    let relayed = relay.relayed();
    assert_eq!(relayed.len(), 2);
    assert!(relayed.iter().any(|text| text.contains("<code>482193</code>")));
    assert!(relayed.iter().any(|text| text.contains("<code>381-902</code>")));
    registry.shutdown_all().await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restart_with_persisted_state_sends_nothing_new(relay: Relay) {
    let temp = tempfile::tempdir().expect("temporary directory");
    let state_dir = Utf8PathBuf::from_path_buf(temp.path().join("dedup")).expect("utf-8 path");
    let id = tenant_id("tenant-01");

    let first_process =
        relay.registry(Arc::new(FsDedupStore::open(&state_dir).expect("store opens")));
    first_process.start(&id).await.expect("agent starts");
    relay.show(&ARRIVALS);
    first_process
        .agent(&id)
        .expect("agent registered")
        .poll_once()
        .await;
    assert_eq!(relay.relayed().len(), 2);
    first_process.shutdown_all().await;

    // Hide the rows from the restarted agent's baseline so only the persisted
    // hashes can suppress them.
    relay.browser.clear_payload();
    let second_process =
        relay.registry(Arc::new(FsDedupStore::open(&state_dir).expect("store reopens")));
    let report = second_process.resume_running().await.expect("flags listed");
    assert_eq!(report.started, vec![id.clone()]);

    relay.show(&ARRIVALS);
    let outcome = second_process
        .agent(&id)
        .expect("agent registered")
        .poll_once()
        .await;

    assert_eq!(outcome, PollOutcome::Completed { fetched: 2, relayed: 0 });
    assert_eq!(relay.relayed().len(), 2);
    second_process.shutdown_all().await;
}
