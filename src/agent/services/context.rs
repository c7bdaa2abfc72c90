//! Shared collaborators handed to every agent.

use crate::agent::ports::LogSink;
use crate::dedup::{domain::DedupPolicy, ports::DedupStore};
use crate::notification::{domain::NotificationTemplates, ports::MessagingChannel};
use crate::scrape::{
    domain::{ArithmeticCaptchaSolver, CaptchaSolver, ScrapeDomainError, ScrapeOptions},
    ports::BrowserLauncher,
};
use crate::settings::{RuntimeSettings, SettingsError};
use crate::sms::domain::{OtpExtractor, SmsDomainError};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Outbound capabilities used by agents.
#[derive(Clone)]
pub struct AgentPorts {
    /// Durable dedup state.
    pub dedup_store: Arc<dyn DedupStore>,
    /// Browser session factory.
    pub launcher: Arc<dyn BrowserLauncher>,
    /// Messaging channel for notifications.
    pub channel: Arc<dyn MessagingChannel>,
    /// Operator log stream.
    pub log_sink: Arc<dyn LogSink>,
    /// Wall-clock source.
    pub clock: Arc<dyn Clock + Send + Sync>,
}

/// Errors building the standard toolkit.
#[derive(Debug, Error)]
pub enum AgentToolkitError {
    /// An extraction pattern failed to compile.
    #[error(transparent)]
    Extraction(#[from] SmsDomainError),
    /// The captcha pattern failed to compile.
    #[error(transparent)]
    Captcha(#[from] ScrapeDomainError),
}

/// Pure strategies used by agents.
#[derive(Debug, Clone)]
pub struct AgentToolkit {
    /// OTP extraction strategies.
    pub extractor: Arc<OtpExtractor>,
    /// Login captcha strategy.
    pub captcha: Arc<dyn CaptchaSolver>,
    /// Notification templates.
    pub templates: NotificationTemplates,
}

impl AgentToolkit {
    /// Returns the standard extractor, arithmetic captcha solver and
    /// templates.
    ///
    /// # Errors
    ///
    /// Returns [`AgentToolkitError`] if a built-in pattern fails to compile.
    pub fn standard() -> Result<Self, AgentToolkitError> {
        Ok(Self {
            extractor: Arc::new(OtpExtractor::standard()?),
            captcha: Arc::new(ArithmeticCaptchaSolver::new()?),
            templates: NotificationTemplates::default(),
        })
    }
}

/// Everything an agent needs besides its tenant configuration.
#[derive(Clone)]
pub struct AgentContext {
    pub(crate) ports: AgentPorts,
    pub(crate) toolkit: AgentToolkit,
    pub(crate) scrape_options: ScrapeOptions,
    pub(crate) dedup_policy: DedupPolicy,
    pub(crate) health_interval: Duration,
    pub(crate) stale_after: Duration,
}

impl AgentContext {
    /// Combines ports, toolkit and validated settings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the settings are invalid.
    pub fn new(
        ports: AgentPorts,
        toolkit: AgentToolkit,
        settings: &RuntimeSettings,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            ports,
            toolkit,
            scrape_options: settings.scrape_options(),
            dedup_policy: settings.dedup_policy()?,
            health_interval: settings.health_check_interval(),
            stale_after: settings.stale_after(),
        })
    }
}
