//! Port contracts for durable deduplication state.

mod store;

pub use store::{DedupStore, DedupStoreError, DedupStoreResult};
