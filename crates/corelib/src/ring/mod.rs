//! Consistent hash ring implementation.
//!
//! The ring holds no membership of its own: callers pass the current node
//! snapshot on every lookup and the sorted ring is rebuilt from it.

pub mod position;
#[allow(clippy::module_inception)]
pub mod ring;

pub use position::RingEntry;
pub use ring::HashRing;
