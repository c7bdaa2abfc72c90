//! Scripted in-process browser for tests and dry runs.
//!
//! The scripted browser never touches the network. Tests configure the page
//! text shown on the login page and the payload the console "returns", then
//! observe what the scrape client typed and how many sessions it opened.

use crate::scrape::ports::{BrowserError, BrowserLauncher, BrowserResult, BrowserSession};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

#[derive(Debug, Default)]
struct ScriptState {
    page_text: String,
    payload: Option<Value>,
    navigation_failing: bool,
    launch_failing: bool,
    sessions_opened: usize,
    sessions_closed: usize,
    typed: Vec<(String, String)>,
    navigations: Vec<String>,
}

/// Browser launcher whose sessions replay configured responses.
///
/// Clones share the same script and counters.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBrowser {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedBrowser {
    /// Creates a browser with an empty page and no payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, apply: impl FnOnce(&mut ScriptState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        apply(&mut state)
    }

    /// Sets the text returned by page-text scripts.
    pub fn set_page_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.with_state(|state| state.page_text = text);
    }

    /// Sets the payload returned by the next and later response captures.
    pub fn set_payload(&self, payload: Value) {
        self.with_state(|state| state.payload = Some(payload));
    }

    /// Makes response captures wait out their deadline.
    pub fn clear_payload(&self) {
        self.with_state(|state| state.payload = None);
    }

    /// Makes navigations fail with a timeout while `failing` is set.
    pub fn set_navigation_failing(&self, failing: bool) {
        self.with_state(|state| state.navigation_failing = failing);
    }

    /// Makes session launches fail while `failing` is set.
    pub fn set_launch_failing(&self, failing: bool) {
        self.with_state(|state| state.launch_failing = failing);
    }

    /// Returns how many sessions have been opened.
    #[must_use]
    pub fn sessions_opened(&self) -> usize {
        self.with_state(|state| state.sessions_opened)
    }

    /// Returns how many sessions have been closed.
    #[must_use]
    pub fn sessions_closed(&self) -> usize {
        self.with_state(|state| state.sessions_closed)
    }

    /// Returns `(selector, text)` pairs typed across all sessions.
    #[must_use]
    pub fn typed_values(&self) -> Vec<(String, String)> {
        self.with_state(|state| state.typed.clone())
    }

    /// Returns every URL navigated to across all sessions.
    #[must_use]
    pub fn navigations(&self) -> Vec<String> {
        self.with_state(|state| state.navigations.clone())
    }
}

#[async_trait]
impl BrowserLauncher for ScriptedBrowser {
    async fn open_session(&self) -> BrowserResult<Arc<dyn BrowserSession>> {
        let failing = self.with_state(|state| {
            if !state.launch_failing {
                state.sessions_opened += 1;
            }
            state.launch_failing
        });
        if failing {
            return Err(BrowserError::engine(std::io::Error::other(
                "scripted launch failure",
            )));
        }
        Ok(Arc::new(ScriptedSession {
            browser: self.clone(),
            closed: AtomicBool::new(false),
        }))
    }
}

/// One session opened by a [`ScriptedBrowser`].
#[derive(Debug)]
pub struct ScriptedSession {
    browser: ScriptedBrowser,
    closed: AtomicBool,
}

impl ScriptedSession {
    fn ensure_open(&self) -> BrowserResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            Err(BrowserError::Closed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    async fn navigate(&self, url: &str, timeout: Duration) -> BrowserResult<()> {
        self.ensure_open()?;
        let failing = self.browser.with_state(|state| {
            state.navigations.push(url.to_owned());
            state.navigation_failing
        });
        if failing {
            return Err(BrowserError::Timeout {
                operation: "navigate",
                after: timeout,
            });
        }
        Ok(())
    }

    async fn type_text(&self, selector: &str, text: &str) -> BrowserResult<()> {
        self.ensure_open()?;
        self.browser
            .with_state(|state| state.typed.push((selector.to_owned(), text.to_owned())));
        Ok(())
    }

    async fn wait_for_selector(&self, _selector: &str, _timeout: Duration) -> BrowserResult<()> {
        self.ensure_open()
    }

    async fn evaluate(&self, _script: &str) -> BrowserResult<Value> {
        self.ensure_open()?;
        let text = self.browser.with_state(|state| state.page_text.clone());
        Ok(Value::String(text))
    }

    async fn capture_next_response(
        &self,
        _url_fragment: &str,
        timeout: Duration,
    ) -> BrowserResult<Option<Value>> {
        self.ensure_open()?;
        match self.browser.with_state(|state| state.payload.clone()) {
            Some(payload) => Ok(Some(payload)),
            None => {
                tokio::time::sleep(timeout).await;
                Ok(None)
            }
        }
    }

    async fn wait_for_navigation(&self, _timeout: Duration) -> BrowserResult<()> {
        self.ensure_open()
    }

    async fn close(&self) -> BrowserResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.browser.with_state(|state| state.sessions_closed += 1);
        Ok(())
    }
}
