//! # Existence-Filter Hooks
//!
//! In-band diagnostics channel between the synchronization engine and
//! whoever is listening (chiefly tests).
//!
//! ```text
//! ┌──────────────────┐                      ┌──────────────────┐
//! │ Sync engine      │                      │ Capture / test   │
//! │                  │  notify_on_...()     │                  │
//! │                  │ ──────┐              │                  │
//! └──────────────────┘       │              └──────────────────┘
//!                            ▼                      ↑
//!                   ┌──────────────────┐            │
//!                   │  HookRegistry    │ ───────────┘
//!                   │  (process-wide)  │  on_existence_filter_mismatch()
//!                   └──────────────────┘
//! ```
//!
//! - Callbacks run synchronously, in registration order.
//! - A panicking callback is logged and skipped.
//! - `HookSubscription` unregisters on `unsubscribe()` or drop, once.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod registry;
pub mod subscription;

// Re-export main types
pub use events::{BloomFilterInfo, ExistenceFilterMismatchInfo, MembershipPredicate};
pub use registry::{ExistenceFilterMismatchSink, HookRegistry, MismatchCallback, SubscriberId};
pub use subscription::HookSubscription;

/// Register `callback` with the process-wide registry.
pub fn on_existence_filter_mismatch<F>(callback: F) -> HookSubscription
where
    F: Fn(&ExistenceFilterMismatchInfo) + Send + Sync + 'static,
{
    HookRegistry::global().on_existence_filter_mismatch(callback)
}

/// Publish `info` through the process-wide registry.
///
/// Returns the number of callbacks that handled it.
pub fn notify_on_existence_filter_mismatch(info: &ExistenceFilterMismatchInfo) -> usize {
    HookRegistry::global().notify_on_existence_filter_mismatch(info)
}
