//! Tenant configuration snapshot consumed by relay agents.

use super::{ChannelDestination, TenantDomainError, TenantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Minimum accepted poll interval in seconds.
const MIN_POLL_INTERVAL_SECS: u64 = 1;

/// Vendor-console login credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelCredentials {
    username: String,
    password: String,
}

impl PanelCredentials {
    /// Creates credentials from a username and password.
    ///
    /// # Errors
    ///
    /// Returns [`TenantDomainError::EmptyUsername`] when the trimmed username
    /// is empty.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, TenantDomainError> {
        let username = username.into().trim().to_owned();
        if username.is_empty() {
            return Err(TenantDomainError::EmptyUsername);
        }
        Ok(Self {
            username,
            password: password.into(),
        })
    }

    /// Returns the panel username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the panel password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for PanelCredentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PanelCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Unvalidated tenant configuration as stored by the CRUD layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantConfigDraft {
    /// Tenant identifier.
    pub id: String,
    /// Vendor-console username.
    pub username: String,
    /// Vendor-console password.
    pub password: String,
    /// Console login page.
    pub login_url: String,
    /// Console SMS report page.
    pub reports_url: String,
    /// Messaging-channel destinations that receive relayed messages.
    pub destinations: Vec<String>,
    /// Seconds between poll cycles.
    pub poll_interval_secs: u64,
    /// Billing-plan expiry, if the tenant is on a time-limited plan.
    #[serde(default)]
    pub plan_expires_at: Option<DateTime<Utc>>,
}

/// Validated, immutable configuration snapshot for one tenant.
///
/// An agent captures the snapshot at start time; edits made afterwards take
/// effect only after a stop/start cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TenantConfigDraft", into = "TenantConfigDraft")]
pub struct TenantConfig {
    id: TenantId,
    credentials: PanelCredentials,
    login_url: String,
    reports_url: String,
    destinations: Vec<ChannelDestination>,
    poll_interval: Duration,
    plan_expires_at: Option<DateTime<Utc>>,
}

impl TenantConfig {
    /// Validates a draft into a configuration snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`TenantDomainError`] when any field fails validation.
    pub fn new(draft: TenantConfigDraft) -> Result<Self, TenantDomainError> {
        let TenantConfigDraft {
            id,
            username,
            password,
            login_url,
            reports_url,
            destinations,
            poll_interval_secs,
            plan_expires_at,
        } = draft;

        let tenant_id = TenantId::new(id)?;
        let credentials = PanelCredentials::new(username, password)?;
        let login_url = validate_url("login_url", login_url)?;
        let reports_url = validate_url("reports_url", reports_url)?;

        let destinations = destinations
            .into_iter()
            .map(ChannelDestination::new)
            .collect::<Result<Vec<_>, _>>()?;
        if destinations.is_empty() {
            return Err(TenantDomainError::NoDestinations(tenant_id.to_string()));
        }

        if poll_interval_secs < MIN_POLL_INTERVAL_SECS {
            return Err(TenantDomainError::PollIntervalTooShort(poll_interval_secs));
        }

        Ok(Self {
            id: tenant_id,
            credentials,
            login_url,
            reports_url,
            destinations,
            poll_interval: Duration::from_secs(poll_interval_secs),
            plan_expires_at,
        })
    }

    /// Returns the tenant identifier.
    #[must_use]
    pub const fn id(&self) -> &TenantId {
        &self.id
    }

    /// Returns the vendor-console credentials.
    #[must_use]
    pub const fn credentials(&self) -> &PanelCredentials {
        &self.credentials
    }

    /// Returns the console login page URL.
    #[must_use]
    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    /// Returns the console SMS report page URL.
    #[must_use]
    pub fn reports_url(&self) -> &str {
        &self.reports_url
    }

    /// Returns the messaging destinations.
    #[must_use]
    pub fn destinations(&self) -> &[ChannelDestination] {
        &self.destinations
    }

    /// Returns the interval between poll cycles.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns the plan expiry timestamp, if any.
    #[must_use]
    pub const fn plan_expires_at(&self) -> Option<DateTime<Utc>> {
        self.plan_expires_at
    }

    /// Returns whether the tenant's plan has lapsed at `now`.
    #[must_use]
    pub fn is_plan_expired(&self, now: DateTime<Utc>) -> bool {
        self.plan_expires_at.is_some_and(|expiry| expiry <= now)
    }
}

impl TryFrom<TenantConfigDraft> for TenantConfig {
    type Error = TenantDomainError;

    fn try_from(value: TenantConfigDraft) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TenantConfig> for TenantConfigDraft {
    fn from(value: TenantConfig) -> Self {
        Self {
            id: value.id.into(),
            username: value.credentials.username,
            password: value.credentials.password,
            login_url: value.login_url,
            reports_url: value.reports_url,
            destinations: value.destinations.into_iter().map(String::from).collect(),
            poll_interval_secs: value.poll_interval.as_secs(),
            plan_expires_at: value.plan_expires_at,
        }
    }
}

fn validate_url(field: &'static str, value: String) -> Result<String, TenantDomainError> {
    let trimmed = value.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Ok(trimmed.to_owned());
    }
    Err(TenantDomainError::InvalidUrl {
        field,
        value: trimmed.to_owned(),
    })
}
