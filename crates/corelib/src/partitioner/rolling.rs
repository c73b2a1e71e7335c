//! Rolling-hash partitioner implementation.

use crate::partitioner::traits::Partitioner;
use crate::token::rolling::RollingToken;

/// Partitioner placing keys at `rolling_hash(key) mod 256`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RollingPartitioner;

impl Partitioner for RollingPartitioner {
    type TokenType = RollingToken;

    fn partition(&self, key: &str) -> Self::TokenType {
        RollingToken::from_key(key)
    }
}
