//! # Scoped Capture
//!
//! Collect every mismatch published while one unit of async work runs.
//!
//! The capture window is the dynamic extent of the work future: from the
//! moment `work` is invoked until its future resolves, across every nested
//! `.await`. Publications made afterwards by tasks the work detached are not
//! captured.

use std::future::Future;
use std::sync::Arc;

use ef_hooks::HookRegistry;
use parking_lot::Mutex;
use tracing::{debug, debug_span, Instrument};

use crate::mismatch::ExistenceFilterMismatch;

/// Run `work` and return the mismatches published to the process-wide
/// registry while it ran, together with its result.
///
/// # Errors
///
/// Returns `work`'s own error unchanged. Mismatches captured before the
/// failure are discarded with it.
pub async fn capture_existence_filter_mismatches<F, Fut, T, E>(
    work: F,
) -> Result<(Vec<ExistenceFilterMismatch>, T), E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    capture_existence_filter_mismatches_in(HookRegistry::global(), work).await
}

/// Same as [`capture_existence_filter_mismatches`], against `registry`.
///
/// The temporary subscription is released on every exit path: success,
/// error, panic, and the returned future being dropped before completion.
pub async fn capture_existence_filter_mismatches_in<F, Fut, T, E>(
    registry: &HookRegistry,
    work: F,
) -> Result<(Vec<ExistenceFilterMismatch>, T), E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let captured: Arc<Mutex<Vec<ExistenceFilterMismatch>>> = Arc::default();

    let subscription = {
        let captured = Arc::clone(&captured);
        registry.on_existence_filter_mismatch(move |info| {
            captured.lock().push(ExistenceFilterMismatch::from_info(info));
        })
    };

    let span = debug_span!("capture_mismatches", subscriber = %subscription.id());
    let result = work().instrument(span).await;

    // Dropping the guard would do the same; unsubscribing first means nothing
    // published from here on can land in the vector being handed out.
    subscription.unsubscribe();
    let records = std::mem::take(&mut *captured.lock());

    match result {
        Ok(value) => {
            debug!(captured = records.len(), "Mismatch capture finished");
            Ok((records, value))
        }
        Err(e) => {
            debug!(discarded = records.len(), "Mismatch capture aborted by failed work");
            Err(e)
        }
    }
}
