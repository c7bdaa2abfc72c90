//! Bounded, persisted deduplication of notified messages.
//!
//! Each agent owns one [`domain::DedupCache`] of content hashes. The cache is
//! restored from a [`ports::DedupStore`] when the agent starts and written back
//! after every update, so a restart does not re-notify historical messages.

pub mod adapters;
pub mod domain;
pub mod ports;
