//! Fans a rendered notification out to every tenant destination.

use crate::notification::{
    domain::{NotificationError, NotificationTemplates},
    ports::{MessagingChannel, MessagingChannelError},
};
use crate::sms::domain::Message;
use crate::tenant::domain::{ChannelDestination, TenantConfig};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

/// A destination that could not be reached.
#[derive(Debug, Clone)]
pub struct DeliveryFailure {
    /// Destination that failed.
    pub destination: ChannelDestination,
    /// Channel error.
    pub error: MessagingChannelError,
}

/// Outcome of delivering one notification to all destinations.
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    delivered: usize,
    failures: Vec<DeliveryFailure>,
}

impl DispatchReport {
    /// Returns the number of successful sends.
    #[must_use]
    pub const fn delivered(&self) -> usize {
        self.delivered
    }

    /// Returns the destinations that failed.
    #[must_use]
    pub fn failures(&self) -> &[DeliveryFailure] {
        &self.failures
    }
}

/// Formats messages and sends them to every destination of a tenant.
///
/// A failure on one destination is logged and never prevents delivery to the
/// others.
#[derive(Clone)]
pub struct NotificationDispatcher {
    channel: Arc<dyn MessagingChannel>,
    templates: NotificationTemplates,
}

impl NotificationDispatcher {
    /// Creates a dispatcher over a channel.
    #[must_use]
    pub fn new(channel: Arc<dyn MessagingChannel>, templates: NotificationTemplates) -> Self {
        Self { channel, templates }
    }

    /// Sends a scraped message to all of the tenant's destinations.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] only when the text cannot be rendered;
    /// per-destination send failures are reported in the [`DispatchReport`].
    pub async fn notify(
        &self,
        config: &TenantConfig,
        message: &Message,
    ) -> Result<DispatchReport, NotificationError> {
        let text = self.templates.render_message(message)?;
        Ok(self.deliver(config, &text).await)
    }

    /// Sends the "agent connected" notice to all of the tenant's destinations.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] when the notice cannot be rendered.
    pub async fn announce_connected(
        &self,
        config: &TenantConfig,
        started_at: DateTime<Utc>,
    ) -> Result<DispatchReport, NotificationError> {
        let text = self.templates.render_connected(config.id(), started_at)?;
        Ok(self.deliver(config, &text).await)
    }

    async fn deliver(&self, config: &TenantConfig, text: &str) -> DispatchReport {
        let mut report = DispatchReport::default();
        for destination in config.destinations() {
            match self.channel.send(destination, text).await {
                Ok(()) => {
                    debug!(tenant_id = %config.id(), %destination, "notification delivered");
                    report.delivered += 1;
                }
                Err(error) => {
                    warn!(tenant_id = %config.id(), %destination, %error, "notification delivery failed");
                    report.failures.push(DeliveryFailure {
                        destination: destination.clone(),
                        error,
                    });
                }
            }
        }
        report
    }
}
