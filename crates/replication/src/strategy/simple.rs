//! Simple replication strategy.
//!
//! Places N replicas sequentially around the ring (clockwise from the owner).
//!
//! # Algorithm
//!
//! 1. Find the owner (first active node clockwise from the key's position)
//! 2. Take the next N-1 active nodes in ring order, wrapping around
//! 3. Stop early once every active node is listed
//!
//! # Limitations
//!
//! - Doesn't consider placement beyond ring order
//! - With position collisions, neighbours on the same slot are still
//!   distinct nodes and count as separate replicas

use crate::strategy::ReplicationStrategy;
use corelib::config::DEFAULT_REPLICATION_FACTOR;
use corelib::node::NodeDescriptor;
use corelib::ring::HashRing;
use tracing::trace;

/// N replicas placed sequentially around the ring.
///
/// # Example
///
/// ```rust
/// use corelib::{default_nodes, HashRing};
/// use replication::{ReplicationStrategy, SimpleStrategy};
///
/// let ring = HashRing::new();
/// let nodes = default_nodes();
/// let replicas = SimpleStrategy::new(3).replicas_for_key(&ring, "user:alice", &nodes);
/// assert_eq!(replicas.len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleStrategy {
    /// Number of replicas to create (including the owner).
    replication_factor: usize,
}

impl SimpleStrategy {
    /// Create a new simple strategy with the given replication factor.
    ///
    /// A factor of 0 yields no replicas at all.
    pub fn new(replication_factor: usize) -> Self {
        Self { replication_factor }
    }
}

impl Default for SimpleStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_REPLICATION_FACTOR)
    }
}

impl ReplicationStrategy for SimpleStrategy {
    fn replication_factor(&self) -> usize {
        self.replication_factor
    }

    fn replicas_for_key<'a>(
        &self,
        ring: &HashRing,
        key: &str,
        nodes: &'a [NodeDescriptor],
    ) -> Vec<&'a NodeDescriptor> {
        let replicas = ring.replicas_for(key, nodes, self.replication_factor);
        trace!(key, count = replicas.len(), "selected replicas");
        replicas
    }

    fn name(&self) -> &'static str {
        "SimpleStrategy"
    }
}
