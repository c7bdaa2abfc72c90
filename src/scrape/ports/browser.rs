//! Browser-session capability consumed by the scrape client.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for browser operations.
pub type BrowserResult<T> = Result<T, BrowserError>;

/// One stateful browser session (cookies, current page).
///
/// Methods take `&self`; adapters serialise access internally. A closed
/// session answers every call with [`BrowserError::Closed`].
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Loads `url` and waits for it to finish loading.
    async fn navigate(&self, url: &str, timeout: Duration) -> BrowserResult<()>;

    /// Types `text` into the element matching `selector`.
    async fn type_text(&self, selector: &str, text: &str) -> BrowserResult<()>;

    /// Waits until an element matching `selector` is present.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> BrowserResult<()>;

    /// Evaluates a script in the page and returns its JSON result.
    async fn evaluate(&self, script: &str) -> BrowserResult<Value>;

    /// Resolves with the body of the next response whose URL contains
    /// `url_fragment`, or `None` if none arrives within `timeout`.
    async fn capture_next_response(
        &self,
        url_fragment: &str,
        timeout: Duration,
    ) -> BrowserResult<Option<Value>>;

    /// Waits for the current page to navigate away.
    async fn wait_for_navigation(&self, timeout: Duration) -> BrowserResult<()>;

    /// Closes the session and releases its resources.
    async fn close(&self) -> BrowserResult<()>;
}

/// Opens fresh browser sessions.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// Opens a new, logged-out session.
    async fn open_session(&self) -> BrowserResult<Arc<dyn BrowserSession>>;
}

/// Errors returned by browser adapters.
#[derive(Debug, Clone, Error)]
pub enum BrowserError {
    /// An operation did not complete in time.
    #[error("browser {operation} timed out after {after:?}")]
    Timeout {
        /// Operation that timed out.
        operation: &'static str,
        /// Configured limit.
        after: Duration,
    },

    /// No element matched a selector.
    #[error("selector '{0}' did not match any element")]
    SelectorNotFound(String),

    /// A page script threw.
    #[error("page script failed: {0}")]
    Script(String),

    /// The session has been closed.
    #[error("browser session is closed")]
    Closed,

    /// Engine failure.
    #[error("browser engine error: {0}")]
    Engine(Arc<dyn std::error::Error + Send + Sync>),
}

impl BrowserError {
    /// Wraps an engine failure.
    pub fn engine(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Engine(Arc::new(err))
    }

    /// Returns whether the error is a timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
