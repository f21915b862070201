//! Hash functions for the Bloom filter
//!
//! The server hashes each fully-qualified document name with MD5 and splits
//! the 128-bit digest into two little-endian 64-bit halves. Bit positions are
//! derived with double hashing: `h(i) = (h1 + i * h2) mod 2^64 mod m`.

use md5::{Digest, Md5};

/// MD5 the UTF-8 bytes of `value` and split the digest into `(h1, h2)`.
pub fn md5_hash_pair(value: &str) -> (u64, u64) {
    let digest = Md5::digest(value.as_bytes());

    let mut low = [0u8; 8];
    let mut high = [0u8; 8];
    low.copy_from_slice(&digest[..8]);
    high.copy_from_slice(&digest[8..16]);

    (u64::from_le_bytes(low), u64::from_le_bytes(high))
}

/// Bit index selected by the `hash_index`-th hash function.
///
/// The sum wraps at 64 bits before the modulo, matching the server.
pub fn bit_index(h1: u64, h2: u64, hash_index: u32, bit_count: u64) -> u64 {
    h1.wrapping_add(h2.wrapping_mul(u64::from(hash_index))) % bit_count
}

/// Lazily yield the `hash_count` bit positions for `value`.
///
/// Yields nothing when `bit_count` is zero. Positions are produced on demand,
/// so a lookup can stop at the first unset bit whatever `hash_count` says.
pub fn compute_bit_positions(value: &str, hash_count: u32, bit_count: u64) -> impl Iterator<Item = u64> {
    let (h1, h2) = md5_hash_pair(value);
    let hashes = if bit_count == 0 { 0 } else { hash_count };
    (0..hashes).map(move |i| bit_index(h1, h2, i, bit_count))
}
