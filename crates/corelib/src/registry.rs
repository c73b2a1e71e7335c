//! The node registry: the only shared mutable state around the ring.
//!
//! One `RwLock` guards the whole node list. Lookups clone a snapshot under
//! the read lock; a toggle flips a flag under the write lock. A lookup can
//! therefore never observe a half-applied toggle.

use crate::error::{Error, Result};
use crate::node::{NodeDescriptor, NodeId};
use parking_lot::RwLock;
use std::collections::HashSet;

/// Result of flipping a node's `active` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// The node after the toggle.
    pub node: NodeDescriptor,
    /// The `active` value before the toggle.
    pub previous: bool,
}

/// Lock-guarded list of node descriptors, kept in ascending id order.
#[derive(Debug)]
pub struct NodeRegistry {
    nodes: RwLock<Vec<NodeDescriptor>>,
}

impl NodeRegistry {
    /// Build a registry, rejecting duplicate ids.
    pub fn new(mut nodes: Vec<NodeDescriptor>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !seen.insert(node.id) {
                return Err(Error::DuplicateNode(node.id));
            }
        }
        nodes.sort_by_key(|n| n.id);
        Ok(Self {
            nodes: RwLock::new(nodes),
        })
    }

    /// A consistent copy of every node, in id order.
    pub fn snapshot(&self) -> Vec<NodeDescriptor> {
        self.nodes.read().clone()
    }

    pub fn get(&self, id: NodeId) -> Option<NodeDescriptor> {
        self.nodes.read().iter().find(|n| n.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }

    /// Number of nodes currently active.
    pub fn active_count(&self) -> usize {
        self.nodes.read().iter().filter(|n| n.active).count()
    }

    /// Flip the `active` flag of node `id`.
    ///
    /// Crate-internal: outside callers toggle through the cluster, which
    /// persists and records the change.
    pub(crate) fn toggle(&self, id: NodeId) -> Result<ToggleOutcome> {
        let mut nodes = self.nodes.write();
        let node = nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(Error::NodeNotFound(id))?;

        let previous = node.active;
        node.active = !previous;
        Ok(ToggleOutcome {
            node: node.clone(),
            previous,
        })
    }
}
