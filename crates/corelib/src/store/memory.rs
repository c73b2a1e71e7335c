//! In-memory key/value store.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::store::traits::KvStore;

/// In-memory store backed by a `RwLock<BTreeMap>`.
///
/// Useful for tests and for running without a state file.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Values whose keys start with `prefix`, from an ordered map.
pub(crate) fn values_with_prefix(map: &BTreeMap<String, Value>, prefix: &str) -> Vec<Value> {
    map.range(prefix.to_string()..)
        .take_while(|(k, _)| k.starts_with(prefix))
        .map(|(_, v)| v.clone())
        .collect()
}

#[async_trait::async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        debug!(key, "storing value in memory");
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<Value>> {
        Ok(values_with_prefix(&self.entries.read(), prefix))
    }
}
