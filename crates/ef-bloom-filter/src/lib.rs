//! # Existence-Filter Bloom Filter
//!
//! The probabilistic membership structure attached to existence filters, and
//! the decoding of its listen-stream payload.
//!
//! ## Layout
//!
//! - `BloomFilter`: bitmap + padding + hash count, MD5 double hashing
//! - `hash_functions`: digest splitting and bit index derivation
//! - `wire`: `UnchangedNames` payload decoding
//!
//! ## Invariants
//!
//! - No false negatives: if inserted, `might_contain()` MUST return true
//! - A zero-bit filter never reports membership
//!
//! ## Usage Example
//!
//! ```ignore
//! use ef_bloom_filter::BloomFilter;
//!
//! let filter = BloomFilter::from_values(
//!     256,
//!     5,
//!     ["projects/p/databases/(default)/documents/rooms/eros"],
//! )?;
//! assert!(filter.might_contain("projects/p/databases/(default)/documents/rooms/eros"));
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod bloom_filter;
pub mod error;
pub mod hash_functions;
pub mod wire;

// Re-exports for convenience
pub use bloom_filter::BloomFilter;
pub use error::BloomFilterError;
pub use wire::{parse_bloom_filter, BitSequence, UnchangedNames};
