//! Ordered set of recently notified content hashes.

use crate::sms::domain::ContentHash;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use thiserror::Error;

const DEFAULT_CAPACITY: usize = 1000;
const DEFAULT_RETAIN: usize = 500;

/// Size limits for a [`DedupCache`].
///
/// When the cache grows past `capacity` it is compacted in one step to the
/// `retain` most recent entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupPolicy {
    capacity: usize,
    retain: usize,
}

/// Error returned for inconsistent cache limits.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("dedup retain count {retain} must be between 1 and capacity {capacity}")]
pub struct DedupPolicyError {
    /// Requested capacity.
    pub capacity: usize,
    /// Requested retain count.
    pub retain: usize,
}

impl DedupPolicy {
    /// Creates a policy.
    ///
    /// # Errors
    ///
    /// Returns [`DedupPolicyError`] unless `1 <= retain <= capacity`.
    pub const fn new(capacity: usize, retain: usize) -> Result<Self, DedupPolicyError> {
        if retain == 0 || retain > capacity {
            return Err(DedupPolicyError { capacity, retain });
        }
        Ok(Self { capacity, retain })
    }

    /// Returns the size that triggers compaction once exceeded.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of entries kept after compaction.
    #[must_use]
    pub const fn retain(&self) -> usize {
        self.retain
    }
}

impl Default for DedupPolicy {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            retain: DEFAULT_RETAIN,
        }
    }
}

/// Insertion-ordered set of content hashes with batch eviction.
///
/// A hash present in the cache is never re-notified. A hash evicted by
/// compaction may be notified again if the console still shows the record.
#[derive(Debug, Clone, Default)]
pub struct DedupCache {
    policy: DedupPolicy,
    order: VecDeque<ContentHash>,
    members: HashSet<ContentHash>,
}

impl DedupCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(policy: DedupPolicy) -> Self {
        Self {
            policy,
            order: VecDeque::new(),
            members: HashSet::new(),
        }
    }

    /// Rebuilds a cache from persisted hashes, oldest first.
    ///
    /// Duplicates are ignored and the size policy is applied as if each hash
    /// had been inserted in turn.
    #[must_use]
    pub fn restore(policy: DedupPolicy, hashes: impl IntoIterator<Item = ContentHash>) -> Self {
        let mut cache = Self::new(policy);
        for hash in hashes {
            cache.insert(hash);
        }
        cache
    }

    /// Returns whether a hash has already been recorded.
    #[must_use]
    pub fn contains(&self, hash: &ContentHash) -> bool {
        self.members.contains(hash)
    }

    /// Records a hash, returning `false` when it was already present.
    pub fn insert(&mut self, hash: ContentHash) -> bool {
        if !self.members.insert(hash) {
            return false;
        }
        self.order.push_back(hash);
        if self.order.len() > self.policy.capacity() {
            self.compact();
        }
        true
    }

    /// Returns the number of tracked hashes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns at most `capacity` most recent hashes, oldest first, for
    /// persistence.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ContentHash> {
        let skip = self.order.len().saturating_sub(self.policy.capacity());
        self.order.iter().skip(skip).copied().collect()
    }

    fn compact(&mut self) {
        let excess = self.order.len().saturating_sub(self.policy.retain());
        for evicted in self.order.drain(..excess) {
            self.members.remove(&evicted);
        }
    }
}
