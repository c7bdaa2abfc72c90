//! Port contracts for agent-side collaborators.

mod log_sink;

pub use log_sink::LogSink;
