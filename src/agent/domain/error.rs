//! Agent domain errors.

use super::AgentState;
use thiserror::Error;

/// Errors raised by agent domain rules.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AgentDomainError {
    /// The requested lifecycle transition is not allowed.
    #[error("invalid agent state transition from {from} to {to}")]
    InvalidStateTransition {
        /// Current state.
        from: AgentState,
        /// Requested state.
        to: AgentState,
    },
}
