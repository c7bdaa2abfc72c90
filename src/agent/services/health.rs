//! Session staleness detection.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Outcome of one staleness evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthVerdict {
    /// Polling is making progress.
    Healthy,
    /// No progress for longer than the threshold while a session is held.
    Stale {
        /// Time since the last sign of progress.
        idle: Duration,
    },
    /// No session is held.
    Disconnected,
}

/// Decides when an agent's session needs rebuilding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthMonitor {
    stale_after: Duration,
}

impl HealthMonitor {
    /// Creates a monitor with the given staleness threshold.
    #[must_use]
    pub const fn new(stale_after: Duration) -> Self {
        Self { stale_after }
    }

    /// Returns the staleness threshold.
    #[must_use]
    pub const fn stale_after(&self) -> Duration {
        self.stale_after
    }

    /// Evaluates staleness.
    ///
    /// `last_progress` is the later of the last successful poll and the last
    /// completed login. Only an idle time strictly greater than the threshold
    /// counts as stale.
    #[must_use]
    pub fn evaluate(
        &self,
        last_progress: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        session_active: bool,
    ) -> HealthVerdict {
        if !session_active {
            return HealthVerdict::Disconnected;
        }
        let Some(last_progress) = last_progress else {
            return HealthVerdict::Healthy;
        };
        let idle = (now - last_progress).to_std().unwrap_or_default();
        if idle > self.stale_after {
            HealthVerdict::Stale { idle }
        } else {
            HealthVerdict::Healthy
        }
    }
}
