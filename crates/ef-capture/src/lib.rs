//! # Existence-Filter Mismatch Capture
//!
//! Answers "which existence-filter mismatches happened while this code ran?"
//! without the code under observation knowing it is observed.
//!
//! ## Usage
//!
//! ```ignore
//! use ef_capture::capture_existence_filter_mismatches;
//! use ef_types::DocumentReference;
//!
//! let (mismatches, snapshot) = capture_existence_filter_mismatches(|| async {
//!     query.get().await
//! })
//! .await?;
//!
//! for mismatch in &mismatches {
//!     if let Some(bloom) = &mismatch.bloom_filter {
//!         let doc = DocumentReference::new("rooms/eros")?;
//!         println!("eros possibly present: {}", bloom.might_contain(&doc));
//!     }
//! }
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod capture;
pub mod mismatch;

pub use capture::{capture_existence_filter_mismatches, capture_existence_filter_mismatches_in};
pub use mismatch::{DocumentBloomFilter, ExistenceFilterMismatch};
