//! Port contracts for tenant configuration lookup.

mod config_store;

pub use config_store::{ConfigStore, ConfigStoreError, ConfigStoreResult};
