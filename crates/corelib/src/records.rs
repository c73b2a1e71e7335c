//! Typed records for the key populations the ring buckets.
//!
//! Users live under `user:<username>` and messages under `message:<id>`.
//! Both are validated on construction; the ring only ever sees their keys.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Key prefix for user records.
pub const USER_PREFIX: &str = "user:";
/// Key prefix for message records.
pub const MESSAGE_PREFIX: &str = "message:";

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Ring key for a username.
pub fn user_key(username: &str) -> String {
    format!("{USER_PREFIX}{username}")
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidRecord(format!("{field} must not be empty")));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub username: String,
    pub name: String,
    pub status: String,
    pub joined_at: u64,
}

impl UserRecord {
    pub fn new(username: impl Into<String>, name: impl Into<String>, joined_at: u64) -> Result<Self> {
        let username = username.into();
        let name = name.into();
        require("username", &username)?;
        require("name", &name)?;
        Ok(Self {
            username,
            name,
            status: "online".to_string(),
            joined_at,
        })
    }

    /// Store key and ring key: `user:<username>`.
    pub fn key(&self) -> String {
        user_key(&self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: String,
    pub from: String,
    pub to: String,
    pub text: String,
    pub timestamp: u64,
    #[serde(default)]
    pub read: bool,
}

impl MessageRecord {
    /// New unread message with a generated `<timestamp>-<8 hex>` id.
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        text: impl Into<String>,
        timestamp: u64,
    ) -> Result<Self> {
        let suffix = Uuid::new_v4().simple().to_string();
        let id = format!("{}-{}", timestamp, &suffix[..8]);
        Self::with_id(id, from, to, text, timestamp)
    }

    pub fn with_id(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        text: impl Into<String>,
        timestamp: u64,
    ) -> Result<Self> {
        let record = Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            text: text.into(),
            timestamp,
            read: false,
        };
        require("id", &record.id)?;
        require("from", &record.from)?;
        require("to", &record.to)?;
        require("text", &record.text)?;
        Ok(record)
    }

    pub fn key(&self) -> String {
        format!("{MESSAGE_PREFIX}{}", self.id)
    }

    /// Ring key of the sending user; message accounting follows the sender.
    pub fn sender_key(&self) -> String {
        user_key(&self.from)
    }
}
