//! Placement reports: where a key lives and where every user lives.

use corelib::node::{NodeDescriptor, NodeId};
use corelib::records::UserRecord;
use corelib::ring::HashRing;
use serde::Serialize;

use crate::strategy::ReplicationStrategy;

/// Owner and replicas for a single key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplicaPlacement {
    pub key: String,
    pub position: u16,
    pub owner: Option<NodeDescriptor>,
    /// Owner first, then successors in ring order.
    pub replicas: Vec<NodeDescriptor>,
}

impl ReplicaPlacement {
    pub fn for_key(
        ring: &HashRing,
        strategy: &dyn ReplicationStrategy,
        key: &str,
        nodes: &[NodeDescriptor],
    ) -> Self {
        let replicas: Vec<NodeDescriptor> = strategy
            .replicas_for_key(ring, key, nodes)
            .into_iter()
            .cloned()
            .collect();
        Self {
            key: key.to_string(),
            position: ring.position(key).value(),
            owner: replicas.first().cloned(),
            replicas,
        }
    }

    /// True when no active node can take the key.
    pub fn is_unroutable(&self) -> bool {
        self.owner.is_none()
    }
}

/// One row of the per-user distribution view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPlacement {
    pub username: String,
    pub name: String,
    pub primary_node: Option<String>,
    pub primary_node_id: Option<NodeId>,
    pub replica_nodes: Vec<String>,
    pub chord_position: u16,
}

/// Placement of every user's key, in input order.
pub fn distribution(
    ring: &HashRing,
    strategy: &dyn ReplicationStrategy,
    nodes: &[NodeDescriptor],
    users: &[UserRecord],
) -> Vec<UserPlacement> {
    users
        .iter()
        .map(|user| {
            let placement = ReplicaPlacement::for_key(ring, strategy, &user.key(), nodes);
            UserPlacement {
                username: user.username.clone(),
                name: user.name.clone(),
                primary_node: placement.owner.as_ref().map(|n| n.name.clone()),
                primary_node_id: placement.owner.as_ref().map(|n| n.id),
                replica_nodes: placement.replicas.iter().map(|n| n.name.clone()).collect(),
                chord_position: placement.position,
            }
        })
        .collect()
}
