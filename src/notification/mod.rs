//! Formatting and fan-out delivery of relayed messages.
//!
//! - Rendering templates in [`domain`]
//! - The messaging-channel capability in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The per-tenant dispatcher in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
