//! # Capture Flows
//!
//! Scoped captures against the process-wide registry. Every test here is
//! `#[serial]` because the registry is shared by the whole test binary.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use anyhow::{anyhow, Result};
    use ef_capture::capture_existence_filter_mismatches;
    use ef_hooks::{
        notify_on_existence_filter_mismatch, on_existence_filter_mismatch, BloomFilterInfo,
        ExistenceFilterMismatchInfo, HookRegistry,
    };
    use ef_types::{DatabaseId, DocumentReference};
    use serial_test::serial;

    use crate::integration::watch_target::{
        documents, ExistenceFilter, FilterOutcome, WatchTargetSimulator,
    };

    fn mismatch(local: u64, server: u64) -> ExistenceFilterMismatchInfo {
        ExistenceFilterMismatchInfo::new(local, server, "proj1", "(default)")
    }

    fn doc(path: &str) -> DocumentReference {
        DocumentReference::new(path).unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn test_global_capture_with_bloom_filter() -> Result<()> {
        ef_telemetry::init_test_logging();
        let baseline = HookRegistry::global().subscriber_count();

        let (records, value) = capture_existence_filter_mismatches(|| async {
            let bloom = BloomFilterInfo::new(true, 3, 64, 2).with_might_contain(|name| {
                name == "projects/proj1/databases/(default)/documents/coll/doc1"
            });
            notify_on_existence_filter_mismatch(&mismatch(5, 6).with_bloom_filter(bloom));
            Ok::<_, anyhow::Error>(42)
        })
        .await?;

        assert_eq!(value, 42);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].local_cache_count, 5);
        assert_eq!(records[0].existence_filter_count, 6);

        let bloom = records[0].bloom_filter.as_ref().unwrap();
        assert!(bloom.applied);
        assert_eq!(bloom.hash_count, 3);
        assert_eq!(bloom.bitmap_length, 64);
        assert_eq!(bloom.padding, 2);
        assert!(bloom.might_contain(&doc("coll/doc1")));
        assert!(!bloom.might_contain(&doc("coll/doc2")));

        assert_eq!(HookRegistry::global().subscriber_count(), baseline);
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn test_global_capture_of_engine_mismatch() -> Result<()> {
        ef_telemetry::init_test_logging();
        let database = DatabaseId::default_for("proj")?;
        let mut target = WatchTargetSimulator::new(database.clone(), HookRegistry::global().clone())
            .with_cached(documents(["rooms/eros", "rooms/psyche", "rooms/ceres"])?);
        let filter = ExistenceFilter::for_documents(
            &database,
            &documents(["rooms/eros", "rooms/ceres"])?,
            10_000,
            10,
        )?;

        let (records, outcome) = capture_existence_filter_mismatches(move || async move {
            Ok::<_, anyhow::Error>(target.handle_existence_filter(&filter))
        })
        .await?;

        assert!(matches!(outcome, FilterOutcome::BloomFilterApplied { .. }));
        assert_eq!(records.len(), 1);
        let bloom = records[0].bloom_filter.as_ref().unwrap();
        assert!(bloom.might_contain(&doc("rooms/ceres")));
        assert!(!bloom.might_contain(&doc("rooms/psyche")));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn test_failed_work_leaves_no_listener_behind() -> Result<()> {
        let baseline = HookRegistry::global().subscriber_count();

        let result = capture_existence_filter_mismatches(|| async {
            notify_on_existence_filter_mismatch(&mismatch(1, 2));
            Err::<(), _>(anyhow!("listen stream reset"))
        })
        .await;

        assert_eq!(result.unwrap_err().to_string(), "listen stream reset");
        assert_eq!(HookRegistry::global().subscriber_count(), baseline);

        notify_on_existence_filter_mismatch(&mismatch(3, 4));
        let (records, ()) = capture_existence_filter_mismatches(|| async { Ok::<_, anyhow::Error>(()) }).await?;
        assert!(records.is_empty());
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn test_nested_captures() -> Result<()> {
        let (outer, inner) = capture_existence_filter_mismatches(|| async {
            notify_on_existence_filter_mismatch(&mismatch(1, 0));
            let (inner, ()) = capture_existence_filter_mismatches(|| async {
                notify_on_existence_filter_mismatch(&mismatch(2, 0));
                Ok::<_, anyhow::Error>(())
            })
            .await?;
            notify_on_existence_filter_mismatch(&mismatch(3, 0));
            Ok::<_, anyhow::Error>(inner)
        })
        .await?;

        let counts = |records: &[ef_capture::ExistenceFilterMismatch]| -> Vec<u64> {
            records.iter().map(|r| r.local_cache_count).collect()
        };
        assert_eq!(counts(&outer), vec![1, 2, 3]);
        assert_eq!(counts(&inner), vec![2]);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    #[serial]
    async fn test_awaited_task_publication_is_captured() -> Result<()> {
        let (records, ()) = capture_existence_filter_mismatches(|| async {
            tokio::spawn(async {
                notify_on_existence_filter_mismatch(&mismatch(8, 1));
            })
            .await?;
            Ok::<_, anyhow::Error>(())
        })
        .await?;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].local_cache_count, 8);
        Ok(())
    }

    #[test]
    #[serial]
    fn test_free_function_subscription() {
        let hits = Arc::new(AtomicUsize::new(0));
        let subscription = {
            let hits = Arc::clone(&hits);
            on_existence_filter_mismatch(move |info| {
                assert_eq!(info.project_id, "proj1");
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };

        assert!(notify_on_existence_filter_mismatch(&mismatch(1, 2)) >= 1);
        subscription.unsubscribe();
        subscription.unsubscribe();
        notify_on_existence_filter_mismatch(&mismatch(1, 2));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
