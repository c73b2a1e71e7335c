//! Ring position entries.

use crate::node::NodeDescriptor;
use crate::token::Token;
use std::cmp::Ordering;

/// A node placed on the ring.
///
/// Ephemeral: built per lookup from the caller's node snapshot and never
/// stored. Entries order by token first and node id second, so nodes that
/// collide on a position still have a fixed order.
#[derive(Clone, Copy, Debug)]
pub struct RingEntry<'a, T: Token> {
    pub token: T,
    pub node: &'a NodeDescriptor,
}

impl<'a, T: Token> RingEntry<'a, T> {
    pub fn new(token: T, node: &'a NodeDescriptor) -> Self {
        Self { token, node }
    }
}

impl<T: Token> PartialEq for RingEntry<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: Token> Eq for RingEntry<'_, T> {}

impl<T: Token> PartialOrd for RingEntry<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Token> Ord for RingEntry<'_, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.token
            .cmp(&other.token)
            .then_with(|| self.node.id.cmp(&other.node.id))
    }
}
