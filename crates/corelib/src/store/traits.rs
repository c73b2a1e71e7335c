//! Core trait for key/value stores.

use serde_json::Value;

use crate::error::Result;

/// A flat key/value store holding JSON values.
///
/// All implementations must be `Send + Sync` for use across async tasks.
#[async_trait::async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch a value. Returns `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Insert or replace a value.
    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Every value whose key starts with `prefix`, in key order.
    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<Value>>;
}
