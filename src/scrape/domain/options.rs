//! Scrape client options and console selectors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// DOM selectors and scripts for the vendor console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSelectors {
    /// Username input on the login form.
    pub username_input: String,
    /// Password input on the login form.
    pub password_input: String,
    /// Captcha answer input on the login form.
    pub captcha_input: String,
    /// Script that submits the login form.
    pub submit_script: String,
    /// Script returning the rendered page text.
    pub page_text_script: String,
    /// Script that asks the report table to reload its data.
    pub refresh_script: String,
    /// URL fragment identifying the report data response.
    pub records_endpoint: String,
}

impl Default for PanelSelectors {
    fn default() -> Self {
        Self {
            username_input: r#"input[name="username"]"#.to_owned(),
            password_input: r#"input[name="password"]"#.to_owned(),
            captcha_input: r#"input[name="capt"]"#.to_owned(),
            submit_script: r#"document.querySelector('button[type="submit"]').click()"#.to_owned(),
            page_text_script: "document.body.innerText".to_owned(),
            refresh_script: "document.querySelector('#refresh')?.click()".to_owned(),
            records_endpoint: "data_smscdr".to_owned(),
        }
    }
}

/// Timeouts and selectors used by a scrape client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Console selectors and scripts.
    pub selectors: PanelSelectors,
    /// Limit for page loads and post-submit navigation.
    pub navigation_timeout: Duration,
    /// Limit for waiting on form fields.
    pub selector_timeout: Duration,
    /// Limit for capturing the report data response.
    pub capture_timeout: Duration,
    /// Pause after loading the login page before reading it.
    pub page_settle_delay: Duration,
    /// Limit for closing a browser session.
    pub session_close_timeout: Duration,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            selectors: PanelSelectors::default(),
            navigation_timeout: Duration::from_secs(30),
            selector_timeout: Duration::from_secs(10),
            capture_timeout: Duration::from_secs(15),
            page_settle_delay: Duration::from_secs(2),
            session_close_timeout: Duration::from_secs(5),
        }
    }
}

/// Result of racing a response capture against its deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseCapture {
    /// The console answered with a data payload.
    Payload(Value),
    /// No matching response arrived before the deadline.
    TimedOut,
}
