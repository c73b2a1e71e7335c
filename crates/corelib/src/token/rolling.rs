//! 32-bit rolling string hash and the 8-bit ring token built on it.
//!
//! The hash has to agree bit-for-bit with the one the browser client runs,
//! so it is spelled out here instead of going through `std::hash`.

use crate::token::traits::Token;
use std::fmt;

/// Number of distinct positions on the ring.
pub const RING_SIZE: u32 = 256;

/// Hash a string with the `h = h * 31 + c` rolling scheme in wrapping 32-bit
/// arithmetic, then return the absolute value of the result read as `i32`.
///
/// `h * 31` is computed as `(h << 5) - h`. The empty string hashes to 0.
/// Characters are folded in as Unicode scalar values.
pub fn rolling_hash(s: &str) -> u32 {
    let acc = s.chars().fold(0i32, |acc, c| {
        (acc << 5).wrapping_sub(acc).wrapping_add(c as i32)
    });
    // `i32::MIN` has no positive counterpart in i32; unsigned_abs keeps it.
    acc.unsigned_abs()
}

/// A position on the 256-slot ring.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RollingToken(pub u8);

impl Token for RollingToken {}

impl RollingToken {
    /// Creates a token from a string key: `rolling_hash(key) mod 256`.
    pub fn from_key(key: &str) -> Self {
        RollingToken((rolling_hash(key) % RING_SIZE) as u8)
    }

    /// The position as a plain integer in `[0, 256)`.
    pub fn value(&self) -> u16 {
        u16::from(self.0)
    }
}

impl fmt::Display for RollingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
