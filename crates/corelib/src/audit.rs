//! Bounded operation log kept in the key/value store.
//!
//! Entries are stored newest first as a single JSON list under one key.
//! Appends past the capacity drop the oldest entries.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::Result;
use crate::records::now_millis;
use crate::store::KvStore;

/// Kind of administrative operation recorded in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    NodeActivated,
    NodeDeactivated,
    /// A deactivated node owned users that now route elsewhere.
    NodeFailover,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::NodeActivated => "NODE_ACTIVATED",
            Operation::NodeDeactivated => "NODE_DEACTIVATED",
            Operation::NodeFailover => "NODE_FAILOVER",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub operation: Operation,
    pub details: Value,
}

pub struct AuditLog {
    store: Arc<dyn KvStore>,
    key: String,
    capacity: usize,
}

impl AuditLog {
    pub fn new(store: Arc<dyn KvStore>, key: impl Into<String>, capacity: usize) -> Self {
        Self {
            store,
            key: key.into(),
            capacity,
        }
    }

    /// Prepend an entry and trim to capacity.
    ///
    /// Not atomic against other writers; callers serialize appends.
    pub async fn record(&self, operation: Operation, details: Value) -> Result<OperationRecord> {
        info!(%operation, %details, "operation");
        let entry = OperationRecord {
            timestamp: now_millis(),
            operation,
            details,
        };

        let mut entries = self.entries().await?;
        entries.insert(0, entry.clone());
        entries.truncate(self.capacity);
        self.store.set(&self.key, serde_json::to_value(&entries)?).await?;
        Ok(entry)
    }

    /// All entries, newest first. An unreadable log reads as empty.
    pub async fn entries(&self) -> Result<Vec<OperationRecord>> {
        let Some(value) = self.store.get(&self.key).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_value(value) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(key = %self.key, error = %e, "discarding unreadable operation log");
                Ok(Vec::new())
            }
        }
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.set(&self.key, Value::Array(Vec::new())).await
    }
}
