//! Cluster configuration.

use serde::{Deserialize, Serialize};

/// Store key holding the persisted node registry.
pub const DEFAULT_REGISTRY_KEY: &str = "system:chord_nodes";
/// Store key holding the operation log.
pub const DEFAULT_LOG_KEY: &str = "system:operation_logs";
/// Operation log entries kept before the oldest are dropped.
pub const DEFAULT_LOG_CAPACITY: usize = 100;
/// Replicas per key, owner included.
pub const DEFAULT_REPLICATION_FACTOR: usize = 3;

/// Settings shared by [`crate::cluster::Cluster`] and its callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub registry_key: String,
    pub log_key: String,
    pub log_capacity: usize,
    pub replication_factor: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            registry_key: DEFAULT_REGISTRY_KEY.to_string(),
            log_key: DEFAULT_LOG_KEY.to_string(),
            log_capacity: DEFAULT_LOG_CAPACITY,
            replication_factor: DEFAULT_REPLICATION_FACTOR,
        }
    }
}

impl ClusterConfig {
    pub fn with_replication_factor(mut self, replication_factor: usize) -> Self {
        self.replication_factor = replication_factor;
        self
    }
}
