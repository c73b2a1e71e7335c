//! Hash ring lookups: successor ownership and neighbour replicas.
//!
//! # Algorithm
//!
//! 1. Keep only active nodes.
//! 2. Place each at `partition("node:<id>")` and sort by (position, id).
//! 3. A key is owned by the first node whose position is `>=` the key's
//!    position, wrapping around to the lowest position when none is.
//! 4. Replicas walk forward from the owner, one distinct node per step.
//!
//! Positions are recomputed on every call. The node count is small, and
//! recomputation keeps every answer a pure function of (nodes, key).

use crate::node::NodeDescriptor;
use crate::partitioner::{Partitioner, RollingPartitioner};
use crate::ring::position::RingEntry;
use tracing::trace;

/// Stateless consistent hash ring.
///
/// Safe to share across threads; lookups allocate their own scratch list and
/// never mutate their inputs.
#[derive(Debug, Clone, Default)]
pub struct HashRing<P: Partitioner = RollingPartitioner> {
    partitioner: P,
}

impl HashRing<RollingPartitioner> {
    /// Create a ring over the 256-slot rolling-hash partitioner.
    pub fn new() -> Self {
        Self::with_partitioner(RollingPartitioner)
    }
}

impl<P: Partitioner> HashRing<P> {
    pub fn with_partitioner(partitioner: P) -> Self {
        Self { partitioner }
    }

    /// Ring position of an arbitrary key.
    pub fn position(&self, key: &str) -> P::TokenType {
        self.partitioner.partition(key)
    }

    /// Ring position of a node, derived from its id.
    pub fn node_position(&self, node: &NodeDescriptor) -> P::TokenType {
        self.partitioner.partition(&node.ring_label())
    }

    /// Active nodes placed on the ring in clockwise order.
    pub fn active_ring<'a>(&self, nodes: &'a [NodeDescriptor]) -> Vec<RingEntry<'a, P::TokenType>> {
        let mut entries: Vec<_> = nodes
            .iter()
            .filter(|n| n.active)
            .map(|n| RingEntry::new(self.node_position(n), n))
            .collect();
        entries.sort();
        entries
    }

    /// Node responsible for `key`, or `None` when no node is active.
    pub fn find_owner<'a>(&self, key: &str, nodes: &'a [NodeDescriptor]) -> Option<&'a NodeDescriptor> {
        let ring = self.active_ring(nodes);
        let idx = self.successor_index(&ring, key)?;
        let owner = ring[idx].node;
        trace!(key, position = ?ring[idx].token, owner = %owner.id, "resolved owner");
        Some(owner)
    }

    /// Up to `count` distinct nodes for `key`, owner first, in ring order.
    ///
    /// The list is capped at the number of active nodes, so it never repeats
    /// a node. Empty when no node is active or `count` is zero.
    pub fn replicas_for<'a>(
        &self,
        key: &str,
        nodes: &'a [NodeDescriptor],
        count: usize,
    ) -> Vec<&'a NodeDescriptor> {
        let ring = self.active_ring(nodes);
        let Some(start) = self.successor_index(&ring, key) else {
            return Vec::new();
        };

        let take = count.min(ring.len());
        (0..take)
            .map(|i| ring[(start + i) % ring.len()].node)
            .collect()
    }

    /// Index of the first entry at or after the key's position, wrapping to 0.
    fn successor_index(&self, ring: &[RingEntry<'_, P::TokenType>], key: &str) -> Option<usize> {
        if ring.is_empty() {
            return None;
        }
        let pos = self.position(key);
        let idx = ring.partition_point(|e| e.token < pos);
        Some(if idx == ring.len() { 0 } else { idx })
    }
}
