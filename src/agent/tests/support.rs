//! Shared fixtures for agent service tests.

use crate::agent::adapters::{InMemoryLogSink, ManualClock};
use crate::agent::services::{Agent, AgentContext, AgentPorts, AgentRegistry, AgentToolkit};
use crate::dedup::adapters::memory::InMemoryDedupStore;
use crate::notification::adapters::InMemoryChannel;
use crate::scrape::adapters::ScriptedBrowser;
use crate::settings::RuntimeSettings;
use crate::tenant::adapters::memory::InMemoryConfigStore;
use crate::tenant::domain::{TenantConfig, TenantConfigDraft, TenantId};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

pub(super) const CAPTCHA_PAGE: &str = "Sign in\nWhat is 7 + 5 = ?";

pub(super) struct Harness {
    pub(super) store: InMemoryConfigStore,
    pub(super) dedup: InMemoryDedupStore,
    pub(super) browser: ScriptedBrowser,
    pub(super) channel: InMemoryChannel,
    pub(super) logs: InMemoryLogSink,
    pub(super) clock: ManualClock,
    pub(super) context: AgentContext,
}

pub(super) fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0)
        .single()
        .expect("valid start time")
}

fn test_settings() -> RuntimeSettings {
    RuntimeSettings {
        health_check_interval_ms: 3_600_000,
        capture_timeout_ms: 50,
        page_settle_delay_ms: 0,
        session_close_timeout_ms: 200,
        ..RuntimeSettings::default()
    }
}

impl Harness {
    pub(super) fn new() -> Self {
        let store = InMemoryConfigStore::new();
        let dedup = InMemoryDedupStore::new();
        let browser = ScriptedBrowser::new();
        browser.set_page_text(CAPTCHA_PAGE);
        let channel = InMemoryChannel::new();
        let logs = InMemoryLogSink::new();
        let clock = ManualClock::new(start_time());
        let ports = AgentPorts {
            dedup_store: Arc::new(dedup.clone()),
            launcher: Arc::new(browser.clone()),
            channel: Arc::new(channel.clone()),
            log_sink: Arc::new(logs.clone()),
            clock: Arc::new(clock.clone()),
        };
        let toolkit = AgentToolkit::standard().expect("standard toolkit builds");
        let context =
            AgentContext::new(ports, toolkit, &test_settings()).expect("test settings are valid");
        Self {
            store,
            dedup,
            browser,
            channel,
            logs,
            clock,
            context,
        }
    }

    pub(super) fn agent(&self, config: TenantConfig) -> Agent {
        Agent::new(config, &self.context)
    }

    pub(super) fn registry(&self) -> Arc<AgentRegistry> {
        Arc::new(AgentRegistry::new(
            Arc::new(self.store.clone()),
            self.context.clone(),
        ))
    }

    pub(super) fn register(&self, config: TenantConfig) -> TenantId {
        let tenant_id = config.id().clone();
        self.store.upsert(config).expect("config stored");
        tenant_id
    }

    /// Texts of relayed SMS notifications, excluding connection notices.
    pub(super) fn relayed(&self) -> Vec<String> {
        self.channel
            .sent()
            .expect("channel readable")
            .into_iter()
            .map(|sent| sent.text)
            .filter(|text| text.contains("New SMS received"))
            .collect()
    }

    pub(super) fn notices(&self) -> usize {
        self.channel
            .sent()
            .expect("channel readable")
            .iter()
            .filter(|sent| sent.text.contains("Agent connected"))
            .count()
    }
}

pub(super) fn tenant_config(id: &str) -> TenantConfig {
    tenant_config_with(id, vec!["-1001".to_owned()], None)
}

pub(super) fn tenant_config_with(
    id: &str,
    destinations: Vec<String>,
    plan_expires_at: Option<DateTime<Utc>>,
) -> TenantConfig {
    TenantConfig::new(TenantConfigDraft {
        id: id.to_owned(),
        username: "panel-user".to_owned(),
        password: "secret".to_owned(),
        login_url: "https://panel.example.test/login".to_owned(),
        reports_url: "https://panel.example.test/reports".to_owned(),
        destinations,
        poll_interval_secs: 3600,
        plan_expires_at,
    })
    .expect("valid tenant config")
}

/// Builds a console payload from `(date, destination, source, body)` rows.
pub(super) fn payload(rows: &[(&str, &str, &str, &str)]) -> Value {
    let table: Vec<Value> = rows
        .iter()
        .map(|(date, destination, source, body)| {
            json!([date, "", destination, source, "carrier", body])
        })
        .collect();
    json!({ "aaData": table })
}

pub(super) async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
