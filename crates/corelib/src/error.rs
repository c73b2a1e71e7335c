//! Error types for the core library.
//!
//! Ring lookups never fail; every edge case there resolves to a value. The
//! variants below come from the registry, the records and the store.

use crate::node::NodeId;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No node with this id exists in the registry.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// Two descriptors share an id.
    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),

    /// A user or message record failed validation.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// Signup for a username that is already taken.
    #[error("user already exists: {0}")]
    UserExists(String),

    /// The key/value store rejected an operation.
    #[error("store error: {0}")]
    Store(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error from a file-backed store.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
