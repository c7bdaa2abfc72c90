//! Log sink forwarding to `tracing`.

use crate::agent::{domain::LogLevel, ports::LogSink};
use crate::tenant::domain::TenantId;
use tracing::{error, info, warn};

/// Emits agent log lines as `tracing` events tagged with the tenant.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn append(&self, tenant_id: &TenantId, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => info!(%tenant_id, "{message}"),
            LogLevel::Warn => warn!(%tenant_id, "{message}"),
            LogLevel::Error => error!(%tenant_id, "{message}"),
        }
    }
}
