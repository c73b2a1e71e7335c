//! Core library for the consistent hash ring.
//!
//! This crate provides:
//! - The 32-bit rolling hash and 256-slot ring tokens
//! - The partitioner mapping keys to ring positions
//! - Successor ownership and replica lookup over a node snapshot
//! - The lock-guarded node registry and its activation toggle
//! - Key/value persistence, the operation log and ownership reports

pub mod audit;
pub mod cluster;
pub mod config;
pub mod error;
pub mod node;
pub mod partitioner;
pub mod records;
pub mod registry;
pub mod ring;
pub mod store;
pub mod token;
pub mod topology;

pub use cluster::{Cluster, RoutedMessage};
pub use config::ClusterConfig;
pub use error::{Error, Result};
pub use node::{default_nodes, NodeDescriptor, NodeId};
pub use partitioner::Partitioner;
pub use registry::{NodeRegistry, ToggleOutcome};
pub use ring::HashRing;
pub use token::{rolling_hash, RollingToken, Token};
pub use topology::{NodeLoad, Topology};
