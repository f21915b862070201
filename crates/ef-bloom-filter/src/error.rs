//! Error types for the Bloom filter

use thiserror::Error;

/// Errors raised while building a Bloom filter from its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BloomFilterError {
    #[error("Invalid padding: {padding}")]
    InvalidPadding { padding: i64 },

    #[error("Invalid hash count: {hash_count}")]
    InvalidHashCount { hash_count: i64 },

    #[error("Invalid padding when bitmap length is 0: {padding}")]
    PaddingWithEmptyBitmap { padding: u32 },

    #[error("Invalid bit count: {bit_count}")]
    InvalidBitCount { bit_count: u64 },

    #[error("Base64 decode error: {0}")]
    Base64Decode(String),
}
