//! Tenant configuration for relay agents.
//!
//! A tenant is the identity whose vendor-console credentials and messaging
//! destinations define one agent's behaviour. Configuration records are owned
//! by an external CRUD layer; this module models the validated snapshot an
//! agent runs with and the repository contract used to fetch it.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;
