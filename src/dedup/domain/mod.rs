//! Domain model for message deduplication.

mod cache;

pub use cache::{DedupCache, DedupPolicy, DedupPolicyError};
