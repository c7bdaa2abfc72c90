//! OTP relay: per-tenant agents that scrape one-time passcodes from an SMS
//! vendor console and relay them to a messaging channel.
//!
//! Each tenant gets one long-lived agent that holds a logged-in console
//! session, polls the latest SMS records, extracts passcodes, filters out
//! messages it has already relayed and sends the rest to every configured
//! destination. A watchdog rebuilds sessions that stop making progress.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (filesystem, in-memory)
//!
//! # Modules
//!
//! - [`tenant`]: Tenant configuration and its store
//! - [`sms`]: Vendor record shape, message identity, OTP extraction
//! - [`dedup`]: Bounded, persisted deduplication cache
//! - [`notification`]: Templated fan-out to messaging destinations
//! - [`scrape`]: Console login and record retrieval over a browser session
//! - [`agent`]: Agent lifecycle, health monitoring, registry, maintenance
//! - [`settings`]: Runtime cadences, timeouts and console selectors
//! - [`telemetry`]: Structured logging bootstrap

pub mod agent;
pub mod dedup;
pub mod notification;
pub mod scrape;
pub mod settings;
pub mod sms;
pub mod telemetry;
pub mod tenant;
