//! Node abstractions for the consistent hash ring.
//!
//! Nodes are named buckets on the ring. They are identified by a compact
//! `NodeId` that is cheap to compare and hash, and carry a runtime `active`
//! flag that decides whether they take part in ownership.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for a node. Never reused within a process lifetime.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node in the registry.
///
/// Only these three fields are authoritative. Per-node tallies (owned users,
/// message counts) are derived on demand, see [`crate::topology`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub id: NodeId,
    /// Display label; immutable after creation.
    pub name: String,
    pub active: bool,
}

impl NodeDescriptor {
    /// Construct an active node.
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            active: true,
        }
    }

    /// Construct a node with an explicit activation state.
    pub fn with_state(id: NodeId, name: impl Into<String>, active: bool) -> Self {
        Self {
            id,
            name: name.into(),
            active,
        }
    }

    /// The string hashed to place this node on the ring.
    ///
    /// Derived from the id only, so renaming a node never moves it.
    pub fn ring_label(&self) -> String {
        ring_label(self.id)
    }
}

/// Ring label for a node id: `"node:<id>"`.
pub fn ring_label(id: NodeId) -> String {
    format!("node:{}", id)
}

/// The bootstrap set used when no registry has been persisted yet.
pub fn default_nodes() -> Vec<NodeDescriptor> {
    [
        (1, "Node-Alpha"),
        (2, "Node-Beta"),
        (3, "Node-Gamma"),
        (4, "Node-Delta"),
        (5, "Node-Epsilon"),
    ]
    .into_iter()
    .map(|(id, name)| NodeDescriptor::new(NodeId(id), name))
    .collect()
}
