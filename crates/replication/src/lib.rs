//! Replication strategies for the consistent hash ring.
//!
//! This crate decides:
//! - How many replicas a key gets
//! - Which nodes hold them, owner first
//! - How placements are reported per key and per user

pub mod placement;
pub mod strategy;

pub use placement::{distribution, ReplicaPlacement, UserPlacement};
pub use strategy::{ReplicationStrategy, SimpleStrategy};
