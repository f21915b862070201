//! # Simulated Watch Target
//!
//! A stand-in for the synchronization engine's handling of one listen target.
//! It keeps the documents the local cache believes match the target and
//! reacts to existence filters from the server the way the engine does:
//!
//! ```text
//! existence filter ──► counts agree? ──yes──► nothing to report
//!                           │ no
//!                           ▼
//!                 decode Bloom filter ──none──► reset target
//!                           │
//!                           ▼
//!                 drop cached docs the filter rules out
//!                           │
//!                           ▼
//!                 counts agree now? ──no──► reset target
//!                           │
//!                           ▼
//!                 publish ExistenceFilterMismatchInfo to the sink
//! ```

use std::sync::Arc;

use anyhow::Context;
use ef_bloom_filter::{parse_bloom_filter, BloomFilter, UnchangedNames};
use ef_hooks::{BloomFilterInfo, ExistenceFilterMismatchInfo, ExistenceFilterMismatchSink};
use ef_types::{DatabaseId, DocumentReference};
use tracing::debug;

/// What the server sent for the target.
#[derive(Debug, Clone, Default)]
pub struct ExistenceFilter {
    /// Documents the server says match the target.
    pub count: u64,
    pub unchanged_names: Option<UnchangedNames>,
}

impl ExistenceFilter {
    /// A filter carrying only a count.
    pub fn count_only(count: u64) -> Self {
        Self {
            count,
            unchanged_names: None,
        }
    }

    /// Build the filter the server would send for `documents`.
    pub fn for_documents(
        database: &DatabaseId,
        documents: &[DocumentReference],
        bit_count: u64,
        hash_count: u32,
    ) -> anyhow::Result<Self> {
        let names = documents
            .iter()
            .map(|doc| database.document_name(doc.path()));
        let filter = BloomFilter::from_values(bit_count, hash_count, names)
            .context("building server-side bloom filter")?;

        Ok(Self {
            count: documents.len() as u64,
            unchanged_names: Some(UnchangedNames::from_filter(&filter)),
        })
    }
}

/// How the target handled an existence filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Local and server counts agreed.
    Consistent,
    /// The Bloom filter explained the difference.
    BloomFilterApplied { removed: Vec<DocumentReference> },
    /// The target was cleared for a full re-query.
    Reset,
}

/// One listen target with its locally cached documents.
pub struct WatchTargetSimulator<S> {
    database: DatabaseId,
    cached: Vec<DocumentReference>,
    sink: S,
}

impl<S: ExistenceFilterMismatchSink> WatchTargetSimulator<S> {
    pub fn new(database: DatabaseId, sink: S) -> Self {
        Self {
            database,
            cached: Vec::new(),
            sink,
        }
    }

    /// Seed the local cache.
    pub fn with_cached<I>(mut self, documents: I) -> Self
    where
        I: IntoIterator<Item = DocumentReference>,
    {
        self.cached.extend(documents);
        self
    }

    pub fn cached(&self) -> &[DocumentReference] {
        &self.cached
    }

    /// React to an existence filter, publishing a mismatch when counts differ.
    pub fn handle_existence_filter(&mut self, filter: &ExistenceFilter) -> FilterOutcome {
        let local_count = self.cached.len() as u64;
        if local_count == filter.count {
            return FilterOutcome::Consistent;
        }

        let bloom = parse_bloom_filter(filter.unchanged_names.as_ref()).map(Arc::new);
        let outcome = match &bloom {
            Some(bloom) => self.apply_bloom_filter(bloom, filter.count),
            None => FilterOutcome::Reset,
        };
        if outcome == FilterOutcome::Reset {
            debug!(local_count, expected = filter.count, "Resetting watch target");
            self.cached.clear();
        }

        let mut info = ExistenceFilterMismatchInfo::new(
            local_count,
            filter.count,
            self.database.project_id.clone(),
            self.database.database.clone(),
        );
        if let Some(unchanged_names) = &filter.unchanged_names {
            let applied = matches!(outcome, FilterOutcome::BloomFilterApplied { .. });
            info = info.with_bloom_filter(BloomFilterInfo::from_payload(
                applied,
                unchanged_names,
                bloom,
            ));
        }
        self.sink.notify_on_existence_filter_mismatch(&info);

        outcome
    }

    fn apply_bloom_filter(&mut self, bloom: &BloomFilter, expected: u64) -> FilterOutcome {
        let database = &self.database;
        let (kept, removed): (Vec<_>, Vec<_>) = self
            .cached
            .drain(..)
            .partition(|doc| bloom.might_contain(&database.document_name(doc.path())));
        self.cached = kept;

        if self.cached.len() as u64 == expected {
            FilterOutcome::BloomFilterApplied { removed }
        } else {
            FilterOutcome::Reset
        }
    }
}

/// Parse each path into a document reference.
pub fn documents<'a, I>(paths: I) -> anyhow::Result<Vec<DocumentReference>>
where
    I: IntoIterator<Item = &'a str>,
{
    paths
        .into_iter()
        .map(|path| DocumentReference::new(path).with_context(|| format!("bad document path {path}")))
        .collect()
}
