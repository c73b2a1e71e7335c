//! Core token trait definitions.

use std::fmt::Debug;
use std::hash::Hash;

/// A position on the hash ring.
///
/// Tokens are immutable and totally ordered; the ring sorts nodes by token
/// and finds successors by comparing them.
pub trait Token: Copy + Ord + Hash + Send + Sync + Debug + 'static {}
