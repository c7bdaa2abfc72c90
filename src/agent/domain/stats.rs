//! Agent statistics snapshot.

use super::AgentState;
use crate::tenant::domain::TenantId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Point-in-time view of a running agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentStats {
    /// Tenant the agent serves.
    pub tenant_id: TenantId,
    /// Lifecycle state.
    pub state: AgentState,
    /// Poll cycles that completed a fetch.
    pub poll_count: u64,
    /// Successful per-destination sends of relayed messages.
    pub notifications_sent: u64,
    /// Hashes currently held by the dedup cache.
    pub messages_tracked: usize,
    /// Whether a logged-in session is held.
    pub session_active: bool,
    /// When a poll last completed a fetch.
    pub last_successful_poll: Option<DateTime<Utc>>,
    /// Time elapsed since `last_successful_poll`.
    pub time_since_last_poll: Option<Duration>,
}
