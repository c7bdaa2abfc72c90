//! Per-tenant agent: session, dedup cache, polling and health watchdog.

use super::{
    context::AgentContext,
    health::{HealthMonitor, HealthVerdict},
};
use crate::agent::{
    domain::{AgentDomainError, AgentState, AgentStats, LogLevel},
    ports::LogSink,
};
use crate::dedup::{
    domain::{DedupCache, DedupPolicy},
    ports::DedupStore,
};
use crate::notification::services::NotificationDispatcher;
use crate::scrape::services::{ScrapeClient, ScrapeError};
use crate::sms::domain::{Message, OtpExtractor, VendorRecord};
use crate::tenant::domain::{TenantConfig, TenantId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::{
    Arc, Mutex, PoisonError, RwLock,
    atomic::{AtomicBool, AtomicU64, Ordering},
};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// Errors returned by agent lifecycle operations.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The lifecycle does not allow the operation.
    #[error(transparent)]
    Domain(#[from] AgentDomainError),

    /// The tenant's plan has expired.
    #[error("plan for tenant {tenant_id} expired at {expired_at}")]
    PlanExpired {
        /// Tenant whose plan expired.
        tenant_id: TenantId,
        /// Expiry instant.
        expired_at: DateTime<Utc>,
    },

    /// The console login failed.
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    /// The agent was stopped before it finished connecting.
    #[error("agent for tenant {0} was stopped while connecting")]
    StoppedDuringConnect(TenantId),
}

/// Result of one poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The agent is not in a polling state.
    Inactive,
    /// The previous cycle is still running.
    AlreadyPolling,
    /// The tenant's plan has expired; nothing was fetched.
    PlanExpired,
    /// The fetch failed; the next cycle retries.
    FetchFailed,
    /// The cycle completed.
    Completed {
        /// Candidate rows fetched.
        fetched: usize,
        /// Rows that were new and relayed.
        relayed: usize,
    },
}

/// Result of one health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthCheck {
    /// The agent is not in a monitored state, or its plan has expired.
    Inactive,
    /// The session is making progress.
    Healthy,
    /// A session rebuild is already running.
    RebuildInFlight,
    /// A session rebuild was started.
    RebuildStarted,
}

struct BackgroundTasks {
    shutdown: watch::Sender<bool>,
    poll: JoinHandle<()>,
    health: JoinHandle<()>,
}

struct AgentInner {
    config: TenantConfig,
    state: RwLock<AgentState>,
    client: ScrapeClient,
    cache: Mutex<DedupCache>,
    dedup_policy: DedupPolicy,
    dispatcher: NotificationDispatcher,
    extractor: Arc<OtpExtractor>,
    dedup_store: Arc<dyn DedupStore>,
    log_sink: Arc<dyn LogSink>,
    clock: Arc<dyn Clock + Send + Sync>,
    health: HealthMonitor,
    health_interval: Duration,
    poll_count: AtomicU64,
    notifications_sent: AtomicU64,
    last_successful_poll: RwLock<Option<DateTime<Utc>>>,
    last_login: RwLock<Option<DateTime<Utc>>>,
    polling: AtomicBool,
    rebuilding: AtomicBool,
    tasks: Mutex<Option<BackgroundTasks>>,
}

/// Handle to one tenant's agent.
///
/// Clones refer to the same agent. The agent only runs between a successful
/// [`Agent::connect`] and [`Agent::stop`].
#[derive(Clone)]
pub struct Agent {
    inner: Arc<AgentInner>,
}

/// Resets an in-flight flag when dropped.
struct FlagGuard<'a>(&'a AtomicBool);

impl<'a> FlagGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Agent {
    /// Creates an agent in the `Created` state from a configuration snapshot.
    #[must_use]
    pub fn new(config: TenantConfig, context: &AgentContext) -> Self {
        let ports = &context.ports;
        let client = ScrapeClient::new(
            config.clone(),
            Arc::clone(&ports.launcher),
            Arc::clone(&context.toolkit.captcha),
            context.scrape_options.clone(),
        );
        let dispatcher = NotificationDispatcher::new(
            Arc::clone(&ports.channel),
            context.toolkit.templates.clone(),
        );
        Self {
            inner: Arc::new(AgentInner {
                config,
                state: RwLock::new(AgentState::Created),
                client,
                cache: Mutex::new(DedupCache::new(context.dedup_policy)),
                dedup_policy: context.dedup_policy,
                dispatcher,
                extractor: Arc::clone(&context.toolkit.extractor),
                dedup_store: Arc::clone(&ports.dedup_store),
                log_sink: Arc::clone(&ports.log_sink),
                clock: Arc::clone(&ports.clock),
                health: HealthMonitor::new(context.stale_after),
                health_interval: context.health_interval,
                poll_count: AtomicU64::new(0),
                notifications_sent: AtomicU64::new(0),
                last_successful_poll: RwLock::new(None),
                last_login: RwLock::new(None),
                polling: AtomicBool::new(false),
                rebuilding: AtomicBool::new(false),
                tasks: Mutex::new(None),
            }),
        }
    }

    /// Returns the tenant identifier.
    #[must_use]
    pub fn tenant_id(&self) -> &TenantId {
        self.inner.config.id()
    }

    /// Returns the configuration snapshot the agent runs with.
    #[must_use]
    pub fn config(&self) -> &TenantConfig {
        &self.inner.config
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> AgentState {
        *self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns whether two handles refer to the same agent.
    #[must_use]
    pub fn same_agent(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Runs the connection sequence and starts the background tasks.
    ///
    /// Restores the persisted dedup cache, logs in, marks every record
    /// currently on the console as already seen, then starts polling and
    /// health checks and sends the connection notice.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::PlanExpired`] or [`AgentError::Scrape`] after
    /// moving the agent to `Failed`, [`AgentError::StoppedDuringConnect`]
    /// when [`Agent::stop`] won the race, and [`AgentError::Domain`] when the
    /// agent was already started.
    pub async fn connect(&self) -> Result<(), AgentError> {
        self.transition(AgentState::Connecting)?;
        let now = self.inner.clock.utc();

        if let Some(expired_at) = self.inner.config.plan_expires_at()
            && self.inner.config.is_plan_expired(now)
        {
            self.log(LogLevel::Error, &format!("plan expired at {expired_at}"));
            return Err(self.fail(AgentError::PlanExpired {
                tenant_id: self.tenant_id().clone(),
                expired_at,
            }));
        }

        self.restore_cache().await;

        if let Err(err) = self.inner.client.login().await {
            self.log(LogLevel::Error, &format!("login failed: {err}"));
            return Err(self.fail(err.into()));
        }
        self.record_login();

        self.seed_baseline().await;

        if self.transition(AgentState::Active).is_err() {
            self.close_session().await;
            return Err(AgentError::StoppedDuringConnect(self.tenant_id().clone()));
        }
        self.spawn_background_tasks();

        match self
            .inner
            .dispatcher
            .announce_connected(&self.inner.config, self.inner.clock.utc())
            .await
        {
            Ok(report) if !report.failures().is_empty() => self.log(
                LogLevel::Warn,
                &format!(
                    "connection notice failed for {} destination(s)",
                    report.failures().len()
                ),
            ),
            Ok(_) => {}
            Err(err) => self.log(LogLevel::Warn, &format!("connection notice not sent: {err}")),
        }
        self.log(LogLevel::Info, "agent connected");
        Ok(())
    }

    /// Runs one fetch, extract, filter, notify and commit cycle.
    ///
    /// Only one cycle runs at a time. Fetch failures are logged and reported
    /// as [`PollOutcome::FetchFailed`]; the next cycle retries.
    pub async fn poll_once(&self) -> PollOutcome {
        if !matches!(self.state(), AgentState::Active | AgentState::Reconnecting) {
            return PollOutcome::Inactive;
        }
        if self.inner.config.is_plan_expired(self.inner.clock.utc()) {
            self.log(LogLevel::Warn, "plan expired; skipping poll");
            return PollOutcome::PlanExpired;
        }
        let Some(_guard) = FlagGuard::acquire(&self.inner.polling) else {
            debug!(tenant_id = %self.tenant_id(), "previous poll still running");
            return PollOutcome::AlreadyPolling;
        };

        let records = match self.inner.client.fetch_records().await {
            Ok(records) => records,
            Err(err) => {
                self.log(LogLevel::Warn, &format!("poll failed: {err}"));
                return PollOutcome::FetchFailed;
            }
        };
        self.inner.poll_count.fetch_add(1, Ordering::Relaxed);
        *self
            .inner
            .last_successful_poll
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(self.inner.clock.utc());

        let fetched = records.len();
        let relayed = self.relay_new(&records).await;
        if relayed > 0 {
            self.flush_cache().await;
        }
        debug!(tenant_id = %self.tenant_id(), fetched, relayed, "poll cycle completed");
        PollOutcome::Completed { fetched, relayed }
    }

    async fn relay_new(&self, records: &[VendorRecord]) -> usize {
        let mut relayed = 0;
        for record in records {
            let message = Message::from_record(record, &self.inner.extractor);
            if self.cache().contains(&message.hash()) {
                continue;
            }
            match self.inner.dispatcher.notify(&self.inner.config, &message).await {
                Ok(report) => {
                    let delivered = u64::try_from(report.delivered()).unwrap_or(u64::MAX);
                    self.inner
                        .notifications_sent
                        .fetch_add(delivered, Ordering::Relaxed);
                    for failure in report.failures() {
                        self.log(
                            LogLevel::Warn,
                            &format!("send to {} failed: {}", failure.destination, failure.error),
                        );
                    }
                }
                Err(err) => self.log(LogLevel::Error, &format!("notification not rendered: {err}")),
            }
            self.cache().insert(message.hash());
            relayed += 1;
        }
        relayed
    }

    /// Checks session staleness and starts a rebuild when needed.
    ///
    /// A stale session is torn down and a fresh login runs in the background;
    /// the agent moves to `Reconnecting` until it succeeds. While reconnecting
    /// without a session, every check retries the login. An agent whose plan
    /// has expired no longer polls, so it is not monitored either.
    pub fn check_health(&self) -> HealthCheck {
        let state = self.state();
        if !matches!(state, AgentState::Active | AgentState::Reconnecting) {
            return HealthCheck::Inactive;
        }
        let now = self.inner.clock.utc();
        if self.inner.config.is_plan_expired(now) {
            return HealthCheck::Inactive;
        }
        if self.inner.rebuilding.load(Ordering::Acquire) {
            return HealthCheck::RebuildInFlight;
        }

        let verdict = self.inner.health.evaluate(
            self.last_progress(),
            now,
            self.inner.client.has_session(),
        );
        match verdict {
            HealthVerdict::Healthy => HealthCheck::Healthy,
            HealthVerdict::Stale { idle } => {
                self.log(
                    LogLevel::Warn,
                    &format!("session stale after {}s; rebuilding", idle.as_secs()),
                );
                self.begin_rebuild()
            }
            HealthVerdict::Disconnected => self.begin_rebuild(),
        }
    }

    fn begin_rebuild(&self) -> HealthCheck {
        if self.inner.rebuilding.swap(true, Ordering::AcqRel) {
            return HealthCheck::RebuildInFlight;
        }
        if self.state() == AgentState::Active && self.transition(AgentState::Reconnecting).is_err()
        {
            self.inner.rebuilding.store(false, Ordering::Release);
            return HealthCheck::Inactive;
        }
        self.inner.client.teardown();

        let agent = self.clone();
        tokio::spawn(async move {
            agent.rebuild_session().await;
            agent.inner.rebuilding.store(false, Ordering::Release);
        });
        HealthCheck::RebuildStarted
    }

    async fn rebuild_session(&self) {
        match self.inner.client.login().await {
            Ok(_) => {
                self.record_login();
                if self.transition(AgentState::Active).is_ok() {
                    self.log(LogLevel::Info, "session restored");
                } else if self.state().is_terminal() {
                    self.close_session().await;
                }
            }
            Err(err) => self.log(
                LogLevel::Warn,
                &format!("reconnect failed: {err}; retrying at next health check"),
            ),
        }
    }

    /// Stops the agent.
    ///
    /// Cancels the background tasks, flushes the dedup cache and closes the
    /// session within the configured close timeout. A poll already in flight
    /// is abandoned. Returns `false` when the agent had already reached a
    /// terminal state.
    pub async fn stop(&self) -> bool {
        let Ok(previous) = self.transition(AgentState::Stopped) else {
            return false;
        };

        let tasks = self
            .inner
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(tasks) = tasks {
            tasks.shutdown.send_replace(true);
            for (name, task) in [("poll", tasks.poll), ("health", tasks.health)] {
                if let Err(error) = task.await {
                    debug!(tenant_id = %self.tenant_id(), task = name, %error, "background task ended abnormally");
                }
            }
        }

        // A connect still in progress has not restored the cache yet.
        if matches!(previous, AgentState::Active | AgentState::Reconnecting) {
            self.flush_cache().await;
        }
        self.close_session().await;
        self.log(LogLevel::Info, "agent stopped");
        true
    }

    /// Returns a statistics snapshot.
    #[must_use]
    pub fn stats(&self) -> AgentStats {
        let now = self.inner.clock.utc();
        let last_successful_poll = *self
            .inner
            .last_successful_poll
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        AgentStats {
            tenant_id: self.tenant_id().clone(),
            state: self.state(),
            poll_count: self.inner.poll_count.load(Ordering::Relaxed),
            notifications_sent: self.inner.notifications_sent.load(Ordering::Relaxed),
            messages_tracked: self.cache().len(),
            session_active: self.inner.client.has_session(),
            last_successful_poll,
            time_since_last_poll: last_successful_poll
                .map(|at| (now - at).to_std().unwrap_or_default()),
        }
    }

    async fn close_session(&self) {
        if let Some(close) = self.inner.client.teardown()
            && let Err(error) = close.await
        {
            debug!(tenant_id = %self.tenant_id(), %error, "session close task ended abnormally");
        }
    }

    fn transition(&self, target: AgentState) -> Result<AgentState, AgentDomainError> {
        let mut state = self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if !state.can_transition_to(target) {
            return Err(AgentDomainError::InvalidStateTransition {
                from: *state,
                to: target,
            });
        }
        let previous = std::mem::replace(&mut *state, target);
        debug!(tenant_id = %self.tenant_id(), from = %previous, to = %target, "agent state change");
        Ok(previous)
    }

    fn fail(&self, error: AgentError) -> AgentError {
        if self.transition(AgentState::Failed).is_err() && self.state() == AgentState::Stopped {
            return AgentError::StoppedDuringConnect(self.tenant_id().clone());
        }
        error
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, DedupCache> {
        self.inner.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_login(&self) {
        *self
            .inner
            .last_login
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(self.inner.clock.utc());
    }

    fn last_progress(&self) -> Option<DateTime<Utc>> {
        let polled = *self
            .inner
            .last_successful_poll
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let logged_in = *self
            .inner
            .last_login
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        polled.max(logged_in)
    }

    async fn restore_cache(&self) {
        match self.inner.dedup_store.load(self.tenant_id()).await {
            Ok(hashes) => {
                *self.cache() = DedupCache::restore(self.inner.dedup_policy, hashes);
            }
            Err(err) => self.log(
                LogLevel::Warn,
                &format!("dedup state not restored, starting empty: {err}"),
            ),
        }
    }

    async fn seed_baseline(&self) {
        let records = match self.inner.client.fetch_records().await {
            Ok(records) => records,
            Err(err) => {
                self.log(LogLevel::Warn, &format!("baseline fetch failed: {err}"));
                return;
            }
        };
        let added = {
            let mut cache = self.cache();
            records
                .iter()
                .map(|record| Message::from_record(record, &self.inner.extractor).hash())
                .filter(|hash| cache.insert(*hash))
                .count()
        };
        if added > 0 {
            self.flush_cache().await;
        }
        self.log(
            LogLevel::Info,
            &format!("baseline marked {added} existing message(s) as seen"),
        );
    }

    async fn flush_cache(&self) {
        let snapshot = self.cache().snapshot();
        if let Err(err) = self.inner.dedup_store.save(self.tenant_id(), &snapshot).await {
            self.log(LogLevel::Warn, &format!("dedup state not saved: {err}"));
        }
    }

    fn log(&self, level: LogLevel, message: &str) {
        self.inner.log_sink.append(self.tenant_id(), level, message);
    }

    fn spawn_background_tasks(&self) {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let poll = tokio::spawn(run_poll_loop(
            self.clone(),
            self.inner.config.poll_interval(),
            shutdown_rx.clone(),
        ));
        let health = tokio::spawn(run_health_loop(
            self.clone(),
            self.inner.health_interval,
            shutdown_rx,
        ));
        *self.inner.tasks.lock().unwrap_or_else(PoisonError::into_inner) = Some(BackgroundTasks {
            shutdown,
            poll,
            health,
        });
    }
}

async fn run_poll_loop(agent: Agent, period: Duration, mut shutdown_rx: watch::Receiver<bool>) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let cycle = agent.clone();
                tokio::spawn(async move {
                    cycle.poll_once().await;
                });
            }
            _ = shutdown_rx.changed() => break,
        }
    }
}

async fn run_health_loop(agent: Agent, period: Duration, mut shutdown_rx: watch::Receiver<bool>) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                agent.check_health();
            }
            _ = shutdown_rx.changed() => break,
        }
    }
}
