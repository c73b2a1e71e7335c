//! Partitioner abstraction for consistent hashing.
//!
//! Partitioners are responsible for converting keys into tokens
//! that can be placed on the hash ring.

pub mod rolling;
pub mod traits;

pub use rolling::RollingPartitioner;
pub use traits::Partitioner;
