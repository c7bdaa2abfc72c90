//! Agent lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an agent.
///
/// `Stopped` and `Failed` are terminal. `Failed` is reachable only before the
/// agent first becomes active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    /// Constructed, not yet started.
    Created,
    /// Logging in and seeding the dedup baseline.
    Connecting,
    /// Polling with a live session.
    Active,
    /// Rebuilding a stale session; polls may fail meanwhile.
    Reconnecting,
    /// Stopped on request.
    Stopped,
    /// The initial connection failed.
    Failed,
}

impl AgentState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Connecting => "connecting",
            Self::Active => "active",
            Self::Reconnecting => "reconnecting",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        }
    }

    /// Returns whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::Failed)
    }

    /// Returns whether the lifecycle allows moving to `target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Created, Self::Connecting | Self::Failed)
                | (Self::Connecting, Self::Active | Self::Failed)
                | (Self::Active, Self::Reconnecting)
                | (Self::Reconnecting, Self::Active)
                | (
                    Self::Created | Self::Connecting | Self::Active | Self::Reconnecting,
                    Self::Stopped
                )
        )
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
