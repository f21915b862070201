//! # Hook Subscription
//!
//! The unregister capability returned by the registry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Weak;

use tracing::debug;

use crate::registry::{SubscriberId, Subscribers};

/// Handle for one registered callback.
///
/// `unsubscribe()` is idempotent. Dropping the handle unsubscribes as well, so
/// the subscription lives exactly as long as the handle.
#[must_use = "dropping a HookSubscription unregisters its callback"]
#[derive(Debug)]
pub struct HookSubscription {
    id: SubscriberId,
    subscribers: Weak<Subscribers>,
    released: AtomicBool,
}

impl HookSubscription {
    pub(crate) fn new(id: SubscriberId, subscribers: Weak<Subscribers>) -> Self {
        Self {
            id,
            subscribers,
            released: AtomicBool::new(false),
        }
    }

    /// The id of the registered callback.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Whether `unsubscribe()` has not been called yet.
    pub fn is_active(&self) -> bool {
        !self.released.load(Ordering::Acquire)
    }

    /// Remove the callback from the registry.
    ///
    /// Calling this more than once, or after the registry is gone, does nothing.
    pub fn unsubscribe(&self) {
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }

        let Some(subscribers) = self.subscribers.upgrade() else {
            return;
        };
        if subscribers.remove(self.id) {
            debug!(subscriber = %self.id, "Mismatch hook unregistered");
        }
    }
}

impl Drop for HookSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
