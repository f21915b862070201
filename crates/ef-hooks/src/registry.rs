//! # Hook Registry
//!
//! Ordered list of mismatch callbacks. Publishing snapshots the list under the
//! lock and invokes the callbacks after releasing it, so a callback may
//! register or unregister (itself included) while being invoked.

use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::Mutex;
use tracing::{debug, error};

use crate::events::ExistenceFilterMismatchInfo;
use crate::subscription::HookSubscription;

/// Callback invoked for every published mismatch.
pub type MismatchCallback = Arc<dyn Fn(&ExistenceFilterMismatchInfo) + Send + Sync>;

/// Identifies one registration. Registering the same closure twice yields two ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inbound port for the synchronization engine.
///
/// The engine only needs to publish; it never learns who is listening.
pub trait ExistenceFilterMismatchSink: Send + Sync {
    /// Deliver `info` to every listener.
    ///
    /// # Returns
    ///
    /// The number of listeners that handled the record without panicking.
    fn notify_on_existence_filter_mismatch(&self, info: &ExistenceFilterMismatchInfo) -> usize;
}

pub(crate) struct Subscribers {
    entries: Mutex<Vec<(SubscriberId, MismatchCallback)>>,
    next_id: AtomicU64,
}

impl Subscribers {
    fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn push(&self, callback: MismatchCallback) -> SubscriberId {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.lock().push((id, callback));
        id
    }

    /// Returns whether the entry was still present.
    pub(crate) fn remove(&self, id: SubscriberId) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    fn snapshot(&self) -> Vec<(SubscriberId, MismatchCallback)> {
        self.entries.lock().clone()
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

lazy_static! {
    static ref GLOBAL_REGISTRY: HookRegistry = HookRegistry::new();
}

/// Registry of existence-filter mismatch callbacks.
///
/// Cloning yields another handle to the same subscriber list.
#[derive(Clone)]
pub struct HookRegistry {
    subscribers: Arc<Subscribers>,
}

impl HookRegistry {
    /// Create an isolated registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Subscribers::new()),
        }
    }

    /// The process-wide registry, created on first use.
    pub fn global() -> &'static HookRegistry {
        &GLOBAL_REGISTRY
    }

    /// Register a callback for every future mismatch.
    ///
    /// Callbacks run synchronously on the publishing thread, in registration
    /// order. They must not block.
    pub fn on_existence_filter_mismatch<F>(&self, callback: F) -> HookSubscription
    where
        F: Fn(&ExistenceFilterMismatchInfo) + Send + Sync + 'static,
    {
        let id = self.subscribers.push(Arc::new(callback));
        debug!(subscriber = %id, "Mismatch hook registered");
        HookSubscription::new(id, Arc::downgrade(&self.subscribers))
    }

    /// Invoke every registered callback with `info`.
    ///
    /// A panicking callback is logged and skipped; the remaining callbacks
    /// still run and the panic never reaches the publisher.
    ///
    /// # Returns
    ///
    /// The number of callbacks that completed without panicking.
    pub fn notify_on_existence_filter_mismatch(&self, info: &ExistenceFilterMismatchInfo) -> usize {
        let snapshot = self.subscribers.snapshot();
        let mut delivered = 0;

        for (id, callback) in &snapshot {
            match catch_unwind(AssertUnwindSafe(|| callback(info))) {
                Ok(()) => delivered += 1,
                Err(payload) => {
                    error!(
                        subscriber = %id,
                        panic = %panic_message(payload.as_ref()),
                        "Existence filter mismatch hook panicked"
                    );
                }
            }
        }

        debug!(
            local_cache_count = info.local_cache_count,
            existence_filter_count = info.existence_filter_count,
            subscribers = snapshot.len(),
            delivered,
            "Existence filter mismatch published"
        );
        delivered
    }

    /// Number of registered callbacks.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl ExistenceFilterMismatchSink for HookRegistry {
    fn notify_on_existence_filter_mismatch(&self, info: &ExistenceFilterMismatchInfo) -> usize {
        HookRegistry::notify_on_existence_filter_mismatch(self, info)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
