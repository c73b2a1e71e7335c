//! Ownership accounting over a full key population.
//!
//! Rebuilt from scratch on every request: one owner lookup per user and per
//! message. Cost is O(active nodes x keys), which is the dominant cost of
//! the admin views but fine at dashboard cardinalities.

use std::collections::HashMap;

use serde::Serialize;

use crate::node::{NodeDescriptor, NodeId};
use crate::records::{MessageRecord, UserRecord};
use crate::ring::HashRing;

/// Derived per-node tallies. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeLoad {
    #[serde(flatten)]
    pub node: NodeDescriptor,
    pub position: u16,
    pub assigned_users: Vec<String>,
    /// Messages whose sender this node owns.
    pub message_count: usize,
}

impl NodeLoad {
    pub fn owned_key_count(&self) -> usize {
        self.assigned_users.len()
    }
}

/// Per-node view of who owns what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Topology {
    /// Every registry node in id order, inactive ones with empty tallies.
    pub nodes: Vec<NodeLoad>,
    /// Usernames with no owner (no active node).
    pub unassigned: Vec<String>,
}

impl Topology {
    pub fn compute(
        ring: &HashRing,
        nodes: &[NodeDescriptor],
        users: &[UserRecord],
        messages: &[MessageRecord],
    ) -> Self {
        let mut loads: Vec<NodeLoad> = nodes
            .iter()
            .map(|n| NodeLoad {
                node: n.clone(),
                position: ring.node_position(n).value(),
                assigned_users: Vec::new(),
                message_count: 0,
            })
            .collect();
        loads.sort_by_key(|l| l.node.id);

        let index: HashMap<NodeId, usize> = loads
            .iter()
            .enumerate()
            .map(|(i, l)| (l.node.id, i))
            .collect();

        let mut unassigned = Vec::new();
        for user in users {
            match ring.find_owner(&user.key(), nodes) {
                Some(owner) => loads[index[&owner.id]].assigned_users.push(user.username.clone()),
                None => unassigned.push(user.username.clone()),
            }
        }

        for message in messages {
            if let Some(owner) = ring.find_owner(&message.sender_key(), nodes) {
                loads[index[&owner.id]].message_count += 1;
            }
        }

        Self {
            nodes: loads,
            unassigned,
        }
    }

    pub fn load(&self, id: NodeId) -> Option<&NodeLoad> {
        self.nodes.iter().find(|l| l.node.id == id)
    }

    /// Total keys with an owner.
    pub fn assigned_count(&self) -> usize {
        self.nodes.iter().map(NodeLoad::owned_key_count).sum()
    }
}
