//! Console login and SMS record retrieval.

use crate::scrape::{
    domain::{CaptchaSolver, LoginStep, ResponseCapture, ScrapeOptions, SessionId},
    ports::{BrowserError, BrowserLauncher, BrowserSession},
};
use crate::sms::domain::VendorRecord;
use crate::tenant::domain::TenantConfig;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Errors returned by scrape client operations.
#[derive(Debug, Clone, Error)]
pub enum ScrapeError {
    /// A login step failed.
    #[error("login failed during {step}: {source}")]
    LoginFailed {
        /// Step that failed.
        step: LoginStep,
        /// Browser failure.
        source: BrowserError,
    },

    /// The login page showed no recognisable captcha challenge.
    #[error("captcha challenge could not be solved")]
    CaptchaUnsolved,

    /// The report page did not load in time.
    #[error("report fetch timed out: {0}")]
    NetworkTimeout(BrowserError),

    /// There is no logged-in session to fetch with.
    #[error("no active browser session")]
    NoSession,

    /// Any other browser failure while fetching.
    #[error(transparent)]
    Browser(BrowserError),
}

struct ActiveSession {
    id: SessionId,
    handle: Arc<dyn BrowserSession>,
}

/// Drives one tenant's console session.
///
/// The client holds at most one logged-in session. [`Self::login`] replaces it
/// and [`Self::teardown`] discards it; a fetch already running against a
/// replaced session keeps its handle and simply fails.
pub struct ScrapeClient {
    config: TenantConfig,
    launcher: Arc<dyn BrowserLauncher>,
    solver: Arc<dyn CaptchaSolver>,
    options: ScrapeOptions,
    session: RwLock<Option<ActiveSession>>,
}

impl ScrapeClient {
    /// Creates a client without a session.
    #[must_use]
    pub fn new(
        config: TenantConfig,
        launcher: Arc<dyn BrowserLauncher>,
        solver: Arc<dyn CaptchaSolver>,
        options: ScrapeOptions,
    ) -> Self {
        Self {
            config,
            launcher,
            solver,
            options,
            session: RwLock::new(None),
        }
    }

    /// Opens a fresh session and logs into the console.
    ///
    /// On success the new session replaces any previous one, which is closed
    /// in the background.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::CaptchaUnsolved`] when no challenge is found and
    /// [`ScrapeError::LoginFailed`] when any browser step fails or times out.
    pub async fn login(&self) -> Result<SessionId, ScrapeError> {
        let session = self
            .launcher
            .open_session()
            .await
            .map_err(|source| ScrapeError::LoginFailed {
                step: LoginStep::OpenSession,
                source,
            })?;

        if let Err(err) = self.authenticate(session.as_ref()).await {
            self.close_detached(session);
            return Err(err);
        }

        let session_id = SessionId::new();
        let previous = self.replace_session(Some(ActiveSession {
            id: session_id,
            handle: session,
        }));
        if let Some(previous) = previous {
            self.close_detached(previous.handle);
        }
        debug!(tenant_id = %self.config.id(), %session_id, "console login succeeded");
        Ok(session_id)
    }

    async fn authenticate(&self, session: &dyn BrowserSession) -> Result<(), ScrapeError> {
        let selectors = &self.options.selectors;
        let credentials = self.config.credentials();
        let step = |step: LoginStep| move |source: BrowserError| ScrapeError::LoginFailed { step, source };

        session
            .navigate(self.config.login_url(), self.options.navigation_timeout)
            .await
            .map_err(step(LoginStep::Navigate))?;
        tokio::time::sleep(self.options.page_settle_delay).await;

        let rendered = session
            .evaluate(&selectors.page_text_script)
            .await
            .map_err(step(LoginStep::ReadChallenge))?;
        let page_text = rendered
            .as_str()
            .map_or_else(|| rendered.to_string(), str::to_owned);
        let answer = self
            .solver
            .solve(&page_text)
            .ok_or(ScrapeError::CaptchaUnsolved)?;

        session
            .wait_for_selector(&selectors.username_input, self.options.selector_timeout)
            .await
            .map_err(step(LoginStep::FillForm))?;
        for (selector, value) in [
            (&selectors.username_input, credentials.username()),
            (&selectors.password_input, credentials.password()),
            (&selectors.captcha_input, answer.as_str()),
        ] {
            session
                .type_text(selector, value)
                .await
                .map_err(step(LoginStep::FillForm))?;
        }

        let (navigated, submitted) = tokio::join!(
            session.wait_for_navigation(self.options.navigation_timeout),
            session.evaluate(&selectors.submit_script),
        );
        submitted.map_err(step(LoginStep::Submit))?;
        navigated.map_err(step(LoginStep::Submit))?;
        Ok(())
    }

    /// Loads the report page and returns the candidate rows it reports.
    ///
    /// A data response that does not arrive within the capture timeout yields
    /// an empty list rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::NoSession`] without a session,
    /// [`ScrapeError::NetworkTimeout`] when the page does not load in time,
    /// and [`ScrapeError::Browser`] for other browser failures.
    pub async fn fetch_records(&self) -> Result<Vec<VendorRecord>, ScrapeError> {
        let session = self.current_session().ok_or(ScrapeError::NoSession)?;

        session
            .navigate(self.config.reports_url(), self.options.navigation_timeout)
            .await
            .map_err(classify_fetch_error)?;

        match self.capture_refresh(session.as_ref()).await? {
            ResponseCapture::Payload(payload) => Ok(VendorRecord::rows_from_payload(&payload)),
            ResponseCapture::TimedOut => {
                debug!(tenant_id = %self.config.id(), "no report response before capture deadline");
                Ok(Vec::new())
            }
        }
    }

    async fn capture_refresh(
        &self,
        session: &dyn BrowserSession,
    ) -> Result<ResponseCapture, ScrapeError> {
        let selectors = &self.options.selectors;
        let deadline = self.options.capture_timeout;

        let (captured, triggered) = tokio::join!(
            tokio::time::timeout(
                deadline,
                session.capture_next_response(&selectors.records_endpoint, deadline),
            ),
            session.evaluate(&selectors.refresh_script),
        );
        triggered.map_err(classify_fetch_error)?;

        match captured {
            Ok(Ok(Some(payload))) => Ok(ResponseCapture::Payload(payload)),
            Ok(Ok(None)) | Err(_) => Ok(ResponseCapture::TimedOut),
            Ok(Err(err)) => Err(classify_fetch_error(err)),
        }
    }

    /// Discards the current session and closes it in the background.
    ///
    /// The returned handle completes once the close finishes or the session
    /// close timeout elapses; callers may ignore it.
    pub fn teardown(&self) -> Option<JoinHandle<()>> {
        self.replace_session(None)
            .map(|previous| self.close_detached(previous.handle))
    }

    /// Returns whether a logged-in session is held.
    #[must_use]
    pub fn has_session(&self) -> bool {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Returns the identifier of the held session.
    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|active| active.id)
    }

    fn current_session(&self) -> Option<Arc<dyn BrowserSession>> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|active| Arc::clone(&active.handle))
    }

    fn replace_session(&self, next: Option<ActiveSession>) -> Option<ActiveSession> {
        let mut slot = self.session.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, next)
    }

    fn close_detached(&self, session: Arc<dyn BrowserSession>) -> JoinHandle<()> {
        let limit = self.options.session_close_timeout;
        let tenant_id = self.config.id().clone();
        tokio::spawn(async move {
            match tokio::time::timeout(limit, session.close()).await {
                Ok(Ok(())) => debug!(%tenant_id, "browser session closed"),
                Ok(Err(error)) => debug!(%tenant_id, %error, "browser session close failed"),
                Err(_) => warn!(%tenant_id, ?limit, "browser session close timed out"),
            }
        })
    }
}

fn classify_fetch_error(err: BrowserError) -> ScrapeError {
    if err.is_timeout() {
        ScrapeError::NetworkTimeout(err)
    } else {
        ScrapeError::Browser(err)
    }
}
