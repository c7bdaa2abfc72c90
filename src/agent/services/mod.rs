//! Agent orchestration services.

mod agent;
mod context;
mod health;
mod maintenance;
mod registry;

pub use agent::{Agent, AgentError, HealthCheck, PollOutcome};
pub use context::{AgentContext, AgentPorts, AgentToolkit, AgentToolkitError};
pub use health::{HealthMonitor, HealthVerdict};
pub use maintenance::MaintenanceController;
pub use registry::{AgentRegistry, AgentRegistryError, AgentRegistryResult, BatchStartReport};
