//! In-memory log sink for tests.

use crate::agent::{domain::LogLevel, ports::LogSink};
use crate::tenant::domain::TenantId;
use std::sync::{Arc, Mutex, PoisonError};

/// One captured log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Tenant the line belongs to.
    pub tenant_id: TenantId,
    /// Severity.
    pub level: LogLevel,
    /// Text.
    pub message: String,
}

/// Log sink that keeps every line in memory.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLogSink {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl InMemoryLogSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured lines in arrival order.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns whether any line for `tenant_id` at `level` contains `needle`.
    #[must_use]
    pub fn contains(&self, tenant_id: &TenantId, level: LogLevel, needle: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|entry| {
                entry.tenant_id == *tenant_id
                    && entry.level == level
                    && entry.message.contains(needle)
            })
    }
}

impl LogSink for InMemoryLogSink {
    fn append(&self, tenant_id: &TenantId, level: LogLevel, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogEntry {
                tenant_id: tenant_id.clone(),
                level,
                message: message.to_owned(),
            });
    }
}
