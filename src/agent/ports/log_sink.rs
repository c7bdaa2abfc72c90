//! Operator-visible agent log stream.

use crate::agent::domain::LogLevel;
use crate::tenant::domain::TenantId;

/// Receives per-agent log lines for operators.
///
/// Appending must not block the caller. Sinks swallow their own failures; a
/// lost line is never a correctness problem.
pub trait LogSink: Send + Sync {
    /// Records one line for a tenant's agent.
    fn append(&self, tenant_id: &TenantId, level: LogLevel, message: &str);
}
