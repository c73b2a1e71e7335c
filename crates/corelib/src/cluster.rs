//! The cluster service: registry, ring, store and operation log together.
//!
//! [`Cluster`] owns the node registry and is the only writer to it. It loads
//! the registry from the store at startup (installing the default nodes when
//! nothing usable is stored), persists it after every toggle and records each
//! membership change in the operation log.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::audit::{AuditLog, Operation, OperationRecord};
use crate::config::ClusterConfig;
use crate::error::{Error, Result};
use crate::node::{default_nodes, NodeDescriptor, NodeId};
use crate::records::{now_millis, user_key, MessageRecord, UserRecord, MESSAGE_PREFIX, USER_PREFIX};
use crate::registry::{NodeRegistry, ToggleOutcome};
use crate::ring::HashRing;
use crate::store::KvStore;
use crate::topology::Topology;

/// A stored message together with the node its recipient routes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedMessage {
    pub message: MessageRecord,
    /// Owner of `user:<to>`; `None` when no node is active.
    pub route: Option<NodeDescriptor>,
}

pub struct Cluster {
    registry: NodeRegistry,
    ring: HashRing,
    store: Arc<dyn KvStore>,
    audit: AuditLog,
    config: ClusterConfig,
    /// Held by every read-modify-write: toggles, signups and log clears.
    writer: Mutex<()>,
}

impl Cluster {
    /// Load the registry from `store`, or bootstrap it with the default nodes.
    pub async fn open(store: Arc<dyn KvStore>, config: ClusterConfig) -> Result<Self> {
        let nodes = match load_registry(store.as_ref(), &config.registry_key).await? {
            Some(nodes) => {
                info!(count = nodes.len(), "loaded node registry");
                nodes
            }
            None => {
                let nodes = default_nodes();
                store
                    .set(&config.registry_key, serde_json::to_value(&nodes)?)
                    .await?;
                info!(count = nodes.len(), "initialized default node registry");
                nodes
            }
        };

        let audit = AuditLog::new(Arc::clone(&store), config.log_key.clone(), config.log_capacity);
        Ok(Self {
            registry: NodeRegistry::new(nodes)?,
            ring: HashRing::new(),
            store,
            audit,
            config,
            writer: Mutex::new(()),
        })
    }

    /// Read access to the registry. Toggles go through [`Cluster::toggle_node`].
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn ring(&self) -> &HashRing {
        &self.ring
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Current nodes in id order.
    pub fn nodes(&self) -> Vec<NodeDescriptor> {
        self.registry.snapshot()
    }

    pub fn find_owner(&self, key: &str) -> Option<NodeDescriptor> {
        let nodes = self.registry.snapshot();
        self.ring.find_owner(key, &nodes).cloned()
    }

    pub fn replicas_for(&self, key: &str, count: usize) -> Vec<NodeDescriptor> {
        let nodes = self.registry.snapshot();
        self.ring
            .replicas_for(key, &nodes, count)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Flip a node between active and inactive.
    ///
    /// The new registry is persisted before the call returns; if persisting
    /// fails the flip is undone. A deactivation that strands users also
    /// records a `NODE_FAILOVER` entry listing them. Once the registry is
    /// persisted the call succeeds; operation log failures are only logged.
    pub async fn toggle_node(&self, id: NodeId) -> Result<ToggleOutcome> {
        let _writer = self.writer.lock().await;

        let before = self.registry.snapshot();
        let current = before
            .iter()
            .find(|n| n.id == id)
            .ok_or(Error::NodeNotFound(id))?;
        // Resolved before anything changes so a failed scan leaves no trace.
        let affected = if current.active {
            self.users_owned_by(id, &before).await?
        } else {
            Vec::new()
        };

        let outcome = self.registry.toggle(id)?;
        if let Err(e) = self.persist_registry().await {
            self.registry.toggle(id)?;
            return Err(e);
        }

        let node = &outcome.node;
        info!(node_id = %node.id, name = %node.name, active = node.active, "toggled node");

        let operation = if node.active {
            Operation::NodeActivated
        } else {
            Operation::NodeDeactivated
        };
        let details = json!({
            "nodeId": node.id,
            "nodeName": node.name,
            "previousStatus": outcome.previous,
            "newStatus": node.active,
        });
        if let Err(e) = self.audit.record(operation, details).await {
            warn!(error = %e, "failed to record node toggle");
        }

        if !affected.is_empty() {
            let details = json!({
                "deactivatedNode": node.name,
                "affectedUsers": affected,
                "message": "Users will be redistributed to active nodes",
            });
            if let Err(e) = self.audit.record(Operation::NodeFailover, details).await {
                warn!(error = %e, "failed to record failover");
            }
        }

        Ok(outcome)
    }

    /// Create a user record. Usernames are unique.
    pub async fn register_user(&self, username: &str, name: &str) -> Result<UserRecord> {
        let user = UserRecord::new(username, name, now_millis())?;
        let key = user.key();

        let _writer = self.writer.lock().await;
        if self.store.get(&key).await?.is_some() {
            return Err(Error::UserExists(user.username));
        }
        self.store.set(&key, serde_json::to_value(&user)?).await?;
        debug!(username = %user.username, "registered user");
        Ok(user)
    }

    /// Store a message and report where its recipient routes.
    pub async fn send_message(&self, from: &str, to: &str, text: &str) -> Result<RoutedMessage> {
        let message = MessageRecord::new(from, to, text, now_millis())?;
        self.store
            .set(&message.key(), serde_json::to_value(&message)?)
            .await?;

        let route = self.find_owner(&user_key(to));
        match &route {
            Some(node) => debug!(to, node = %node.name, "routed message"),
            None => warn!(to, "no active node for recipient"),
        }
        Ok(RoutedMessage { message, route })
    }

    /// Every stored user. Unreadable records are skipped.
    pub async fn users(&self) -> Result<Vec<UserRecord>> {
        self.records(USER_PREFIX).await
    }

    /// Every stored message. Unreadable records are skipped.
    pub async fn messages(&self) -> Result<Vec<MessageRecord>> {
        self.records(MESSAGE_PREFIX).await
    }

    /// Per-node ownership tallies over all users and messages.
    pub async fn node_report(&self) -> Result<Topology> {
        let nodes = self.registry.snapshot();
        let users = self.users().await?;
        let messages = self.messages().await?;
        Ok(Topology::compute(&self.ring, &nodes, &users, &messages))
    }

    pub async fn operation_log(&self) -> Result<Vec<OperationRecord>> {
        self.audit.entries().await
    }

    pub async fn clear_operation_log(&self) -> Result<()> {
        let _writer = self.writer.lock().await;
        self.audit.clear().await
    }

    async fn persist_registry(&self) -> Result<()> {
        let nodes = self.registry.snapshot();
        self.store
            .set(&self.config.registry_key, serde_json::to_value(&nodes)?)
            .await
    }

    async fn users_owned_by(&self, id: NodeId, nodes: &[NodeDescriptor]) -> Result<Vec<String>> {
        let users = self.users().await?;
        Ok(users
            .into_iter()
            .filter(|u| self.ring.find_owner(&u.key(), nodes).map(|n| n.id) == Some(id))
            .map(|u| u.username)
            .collect())
    }

    async fn records<T: serde::de::DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>> {
        let values = self.store.get_by_prefix(prefix).await?;
        Ok(values
            .into_iter()
            .filter_map(|v| match serde_json::from_value(v) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(prefix, error = %e, "skipping unreadable record");
                    None
                }
            })
            .collect())
    }
}

/// Read the persisted registry. Absent, empty or unreadable reads as `None`.
async fn load_registry(store: &dyn KvStore, key: &str) -> Result<Option<Vec<NodeDescriptor>>> {
    let Some(value) = store.get(key).await? else {
        return Ok(None);
    };
    match serde_json::from_value::<Vec<NodeDescriptor>>(value) {
        Ok(nodes) if !nodes.is_empty() => Ok(Some(nodes)),
        Ok(_) => Ok(None),
        Err(e) => {
            warn!(key, error = %e, "stored node registry is unreadable, using defaults");
            Ok(None)
        }
    }
}
