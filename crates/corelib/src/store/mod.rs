//! Key/value persistence for the registry, the operation log and records.
//!
//! The ring never touches a store; [`crate::cluster::Cluster`] does.

mod file;
mod memory;
mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::KvStore;
