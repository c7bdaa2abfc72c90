//! Adapter implementations for agent ports and test support.

mod clock;
mod memory;
mod tracing_sink;

pub use clock::ManualClock;
pub use memory::{InMemoryLogSink, LogEntry};
pub use tracing_sink::TracingLogSink;
