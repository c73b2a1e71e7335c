//! Core partitioner trait definitions.

use crate::token::Token;

/// A partitioner converts keys into tokens for placement on the hash ring.
///
/// Partitioners are stateless and thread-safe, allowing concurrent
/// token generation without synchronization overhead.
pub trait Partitioner: Send + Sync + 'static {
    /// The token type produced by this partitioner.
    type TokenType: Token;

    /// Converts a key into a token.
    ///
    /// Must be a pure function of `key`: ring placement is recomputed from
    /// scratch on every lookup and relies on identical inputs landing on
    /// identical tokens across restarts.
    fn partition(&self, key: &str) -> Self::TokenType;
}
