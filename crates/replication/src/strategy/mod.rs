//! Replication strategy abstractions.
//!
//! Replication strategies determine how many replicas to create and where
//! to place them on the ring.
//!
//! - **SimpleStrategy**: N replicas placed sequentially around the ring

pub mod simple;

pub use simple::SimpleStrategy;

use corelib::node::NodeDescriptor;
use corelib::ring::HashRing;

/// Trait for replication strategies.
///
/// Implementations must be thread-safe (Send + Sync) as they may be
/// shared across threads.
pub trait ReplicationStrategy: Send + Sync + 'static {
    /// Number of replicas this strategy aims for, owner included.
    fn replication_factor(&self) -> usize;

    /// Replica nodes for `key` among `nodes`, owner first.
    ///
    /// Only active nodes are eligible. Returns fewer than
    /// `replication_factor()` nodes when fewer are active.
    fn replicas_for_key<'a>(
        &self,
        ring: &HashRing,
        key: &str,
        nodes: &'a [NodeDescriptor],
    ) -> Vec<&'a NodeDescriptor>;

    /// Strategy name (for logging/debugging).
    fn name(&self) -> &'static str;
}
