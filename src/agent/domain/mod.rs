//! Domain model for agent lifecycles.

mod error;
mod log;
mod state;
mod stats;

pub use error::AgentDomainError;
pub use log::LogLevel;
pub use state::AgentState;
pub use stats::AgentStats;
