//! Notification text templates.

use super::NotificationError;
use crate::sms::domain::Message;
use crate::tenant::domain::TenantId;
use chrono::{DateTime, Utc};
use minijinja::{AutoEscape, Environment, context};

const MESSAGE_TEMPLATE_NAME: &str = "message";
const CONNECTED_TEMPLATE_NAME: &str = "connected";

const DEFAULT_MESSAGE_TEMPLATE: &str = "<b>New SMS received</b>
<b>From:</b> {{ source }}
<b>To:</b> {{ destination }}
{%- if otp %}
<b>OTP:</b> <code>{{ otp }}</code>
{%- endif %}
<b>Message:</b> {{ body }}
<b>Time:</b> {{ timestamp }}";

const DEFAULT_CONNECTED_TEMPLATE: &str = "<b>Agent connected</b>
<b>Tenant:</b> {{ tenant }}
Monitoring started at {{ started_at }}";

/// Templates for outbound notification text.
///
/// Values are HTML-escaped so the output is safe for channels that parse
/// HTML markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTemplates {
    message: String,
    connected: String,
}

impl Default for NotificationTemplates {
    fn default() -> Self {
        Self {
            message: DEFAULT_MESSAGE_TEMPLATE.to_owned(),
            connected: DEFAULT_CONNECTED_TEMPLATE.to_owned(),
        }
    }
}

impl NotificationTemplates {
    /// Creates templates from custom sources.
    ///
    /// The message template receives `source`, `destination` (masked), `otp`,
    /// `body` and `timestamp`; the connected template receives `tenant` and
    /// `started_at`.
    #[must_use]
    pub fn new(message: impl Into<String>, connected: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            connected: connected.into(),
        }
    }

    /// Renders the notification for a scraped message.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Template`] when rendering fails.
    pub fn render_message(&self, message: &Message) -> Result<String, NotificationError> {
        let ctx = context! {
            source => message.source(),
            destination => message.masked_destination(),
            otp => message.otp().map(|otp| otp.code()),
            body => message.body(),
            timestamp => message.timestamp(),
        };
        render(MESSAGE_TEMPLATE_NAME, &self.message, ctx)
    }

    /// Renders the notice sent when an agent becomes active.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Template`] when rendering fails.
    pub fn render_connected(
        &self,
        tenant_id: &TenantId,
        started_at: DateTime<Utc>,
    ) -> Result<String, NotificationError> {
        let ctx = context! {
            tenant => tenant_id.as_str(),
            started_at => started_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        };
        render(CONNECTED_TEMPLATE_NAME, &self.connected, ctx)
    }
}

fn render(
    template: &'static str,
    source: &str,
    ctx: minijinja::Value,
) -> Result<String, NotificationError> {
    let mut environment = Environment::new();
    environment.set_auto_escape_callback(|_| AutoEscape::Html);
    environment
        .render_str(source, ctx)
        .map_err(|err| NotificationError::Template {
            template,
            reason: err.to_string(),
        })
}
