//! Shared test helpers for in-memory relay integration tests.

use chrono::{DateTime, TimeZone, Utc};
use otp_relay::{
    agent::{
        adapters::{InMemoryLogSink, ManualClock},
        services::{AgentContext, AgentPorts, AgentRegistry, AgentToolkit},
    },
    dedup::{adapters::memory::InMemoryDedupStore, ports::DedupStore},
    notification::adapters::InMemoryChannel,
    scrape::adapters::ScriptedBrowser,
    settings::RuntimeSettings,
    tenant::{
        adapters::memory::InMemoryConfigStore,
        domain::{TenantConfig, TenantConfigDraft, TenantId},
    },
};
use rstest::fixture;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

/// Login page text carrying a solvable challenge.
pub const CAPTCHA_PAGE: &str = "Welcome\nSecurity check: 12 + 30 = ?";

/// A console row as `(date, destination, source, body)`.
pub type Row = (&'static str, &'static str, &'static str, &'static str);

/// Rows already on the console before the agent first connects.
pub const HISTORY: [Row; 2] = [
    ("2026-10-18 08:40:11", "8801711111111", "ACMEBANK", "Your code: 1111"),
    ("2026-10-18 08:45:37", "8801722222222", "SHOPCO", "Order shipped"),
];

/// Rows that arrive after the agent connected.
pub const ARRIVALS: [Row; 2] = [
    ("2026-10-18 09:02:05", "8801733333333", "ACMEBANK", "OTP: 482193"),
    ("2026-10-18 09:03:44", "8801744444444", "MAILPOST", "Use 381-902 to sign in"),
];

/// In-memory wiring of every port, shared by registry instances.
#[derive(Clone)]
pub struct Relay {
    /// Tenant configuration store.
    pub store: InMemoryConfigStore,
    /// Scripted vendor console.
    pub browser: ScriptedBrowser,
    /// Recording messaging channel.
    pub channel: InMemoryChannel,
    /// Captured operator logs.
    pub logs: InMemoryLogSink,
    /// Manually advanced clock.
    pub clock: ManualClock,
}

/// Returns the fixed start instant used by the manual clock.
#[must_use]
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0)
        .single()
        .expect("valid start time")
}

/// Provides a fresh relay with one registered tenant, `tenant-01`.
#[fixture]
pub fn relay() -> Relay {
    let relay = Relay {
        store: InMemoryConfigStore::new(),
        browser: ScriptedBrowser::new(),
        channel: InMemoryChannel::new(),
        logs: InMemoryLogSink::new(),
        clock: ManualClock::new(start_time()),
    };
    relay.browser.set_page_text(CAPTCHA_PAGE);
    relay
        .store
        .upsert(tenant_config("tenant-01"))
        .expect("config stored");
    relay
}

impl Relay {
    /// Builds a registry over the given dedup store, as a fresh process would.
    #[must_use]
    pub fn registry(&self, dedup_store: Arc<dyn DedupStore>) -> Arc<AgentRegistry> {
        let ports = AgentPorts {
            dedup_store,
            launcher: Arc::new(self.browser.clone()),
            channel: Arc::new(self.channel.clone()),
            log_sink: Arc::new(self.logs.clone()),
            clock: Arc::new(self.clock.clone()),
        };
        let settings = RuntimeSettings {
            health_check_interval_ms: 3_600_000,
            capture_timeout_ms: 50,
            page_settle_delay_ms: 0,
            session_close_timeout_ms: 200,
            ..RuntimeSettings::default()
        };
        let context = AgentContext::new(
            ports,
            AgentToolkit::standard().expect("standard toolkit builds"),
            &settings,
        )
        .expect("test settings are valid");
        Arc::new(AgentRegistry::new(Arc::new(self.store.clone()), context))
    }

    /// Builds a registry with an in-memory dedup store.
    #[must_use]
    pub fn in_memory_registry(&self) -> Arc<AgentRegistry> {
        self.registry(Arc::new(InMemoryDedupStore::new()))
    }

    /// Shows `rows` on the console.
    pub fn show(&self, rows: &[Row]) {
        self.browser.set_payload(console_payload(rows));
    }

    /// Returns relayed SMS notification texts, excluding connection notices.
    #[must_use]
    pub fn relayed(&self) -> Vec<String> {
        self.channel
            .sent()
            .expect("channel readable")
            .into_iter()
            .map(|sent| sent.text)
            .filter(|text| text.contains("New SMS received"))
            .collect()
    }
}

/// Returns the identifier `value`.
#[must_use]
pub fn tenant_id(value: &str) -> TenantId {
    TenantId::new(value).expect("valid tenant id")
}

/// Returns a valid configuration with one destination.
#[must_use]
pub fn tenant_config(id: &str) -> TenantConfig {
    TenantConfig::new(TenantConfigDraft {
        id: id.to_owned(),
        username: "relay-bot".to_owned(),
        password: "s3cret".to_owned(),
        login_url: "https://console.example.test/signin".to_owned(),
        reports_url: "https://console.example.test/client/SMSCDRStats".to_owned(),
        destinations: vec!["-100200300".to_owned()],
        poll_interval_secs: 3600,
        plan_expires_at: None,
    })
    .expect("valid tenant config")
}

/// Builds the console's data response for `rows`.
#[must_use]
pub fn console_payload(rows: &[Row]) -> Value {
    let table: Vec<Value> = rows
        .iter()
        .map(|(date, destination, source, body)| {
            json!([date, "", destination, source, "GP", body])
        })
        .collect();
    json!({ "sEcho": 1, "iTotalRecords": table.len(), "aaData": table })
}

/// Polls `condition` until it holds or two seconds pass.
pub async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
