//! Token abstraction module for the hash ring.
//!
//! Tokens represent positions on the hash ring and must be comparable,
//! hashable, and thread-safe.

pub mod rolling;
pub mod traits;

pub use rolling::{rolling_hash, RollingToken, RING_SIZE};
pub use traits::Token;
