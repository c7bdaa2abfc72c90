//! Per-tenant agent lifecycle management.
//!
//! An [`services::Agent`] owns one tenant's console session, dedup cache,
//! polling task and health watchdog. The [`services::AgentRegistry`] keeps at
//! most one live agent per tenant and exposes the start/stop/stats surface;
//! the [`services::MaintenanceController`] suspends and resumes all of them.
//!
//! - Lifecycle states and statistics in [`domain`]
//! - The operator log port in [`ports`]
//! - Log sinks and a manual clock in [`adapters`]
//! - Agent, health monitor, registry and maintenance in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
