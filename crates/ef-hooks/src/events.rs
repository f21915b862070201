//! # Mismatch Events
//!
//! The record the synchronization engine publishes when the server's
//! existence filter count disagrees with the local cache.

use std::fmt;
use std::sync::Arc;

use ef_bloom_filter::{BloomFilter, UnchangedNames};

/// Membership test over fully-qualified document names.
pub type MembershipPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// The Bloom filter the engine consulted while handling a mismatch.
#[derive(Clone)]
pub struct BloomFilterInfo {
    /// Whether the filter was actually evaluated against the local cache.
    pub applied: bool,
    pub hash_count: u32,
    /// Bitmap length in bits, padding included.
    pub bitmap_length: u64,
    /// Unused bits at the end of the bitmap's last byte.
    pub padding: u32,
    /// Membership test over `projects/{p}/databases/{d}/documents/{path}`.
    pub might_contain: Option<MembershipPredicate>,
}

impl BloomFilterInfo {
    /// Descriptor without a membership test.
    pub fn new(applied: bool, hash_count: u32, bitmap_length: u64, padding: u32) -> Self {
        Self {
            applied,
            hash_count,
            bitmap_length,
            padding,
            might_contain: None,
        }
    }

    /// Attach a membership test.
    #[must_use]
    pub fn with_might_contain<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.might_contain = Some(Arc::new(predicate));
        self
    }

    /// Describe a decoded filter, delegating membership to it.
    pub fn from_filter(applied: bool, filter: Arc<BloomFilter>) -> Self {
        let info = Self::new(
            applied,
            filter.hash_count(),
            filter.bitmap_length_bits(),
            filter.padding(),
        );
        info.with_might_contain(move |name| filter.might_contain(name))
    }

    /// Describe the filter section of an existence filter.
    ///
    /// `filter` is the decoded filter, or `None` when the payload could not be
    /// decoded; the descriptor then reports the payload's own parameters and
    /// carries no membership test.
    pub fn from_payload(
        applied: bool,
        unchanged_names: &UnchangedNames,
        filter: Option<Arc<BloomFilter>>,
    ) -> Self {
        let padding = unchanged_names
            .bits
            .as_ref()
            .map_or(0, |bits| u32::try_from(bits.padding).unwrap_or(0));
        let hash_count = u32::try_from(unchanged_names.hash_count).unwrap_or(0);

        match filter {
            Some(filter) => Self::from_filter(applied, filter),
            None => Self::new(applied, hash_count, 0, padding),
        }
    }
}

impl fmt::Debug for BloomFilterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilterInfo")
            .field("applied", &self.applied)
            .field("hash_count", &self.hash_count)
            .field("bitmap_length", &self.bitmap_length)
            .field("padding", &self.padding)
            .field("might_contain", &self.might_contain.is_some())
            .finish()
    }
}

/// A detected disagreement between local and server document counts.
#[derive(Debug, Clone)]
pub struct ExistenceFilterMismatchInfo {
    /// Documents the local cache believes match the target.
    pub local_cache_count: u64,
    /// Documents the server's existence filter says match.
    pub existence_filter_count: u64,
    pub project_id: String,
    pub database_id: String,
    pub bloom_filter: Option<BloomFilterInfo>,
}

impl ExistenceFilterMismatchInfo {
    pub fn new(
        local_cache_count: u64,
        existence_filter_count: u64,
        project_id: impl Into<String>,
        database_id: impl Into<String>,
    ) -> Self {
        Self {
            local_cache_count,
            existence_filter_count,
            project_id: project_id.into(),
            database_id: database_id.into(),
            bloom_filter: None,
        }
    }

    #[must_use]
    pub fn with_bloom_filter(mut self, bloom_filter: BloomFilterInfo) -> Self {
        self.bloom_filter = Some(bloom_filter);
        self
    }
}
