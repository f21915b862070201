//! # Public Mismatch Records
//!
//! What a capture hands back. Project and database ids are folded into the
//! Bloom filter's membership test, which takes document references instead
//! of fully-qualified names.

use std::fmt;
use std::sync::Arc;

use ef_hooks::{BloomFilterInfo, ExistenceFilterMismatchInfo};
use ef_types::{qualified_document_name, DocumentPath};

type RelativeMembership = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// The Bloom filter of a captured mismatch, keyed by document reference.
#[derive(Clone)]
pub struct DocumentBloomFilter {
    /// Whether the engine evaluated the filter against its cache.
    pub applied: bool,
    pub hash_count: u32,
    /// Bitmap length in bits, padding included.
    pub bitmap_length: u64,
    pub padding: u32,
    membership: RelativeMembership,
}

impl DocumentBloomFilter {
    /// Rebind `info`'s membership test to database-relative paths.
    ///
    /// A descriptor without a test yields a filter that contains nothing.
    pub fn from_info(info: &BloomFilterInfo, project_id: &str, database_id: &str) -> Self {
        let membership: RelativeMembership = match &info.might_contain {
            Some(predicate) => {
                let predicate = Arc::clone(predicate);
                let project_id = project_id.to_string();
                let database_id = database_id.to_string();
                Arc::new(move |path: &str| {
                    predicate(qualified_document_name(&project_id, &database_id, path).as_str())
                })
            }
            None => Arc::new(|_: &str| false),
        };

        Self {
            applied: info.applied,
            hash_count: info.hash_count,
            bitmap_length: info.bitmap_length,
            padding: info.padding,
            membership,
        }
    }

    /// `false` means the document is definitely not in the filter.
    pub fn might_contain<D: DocumentPath + ?Sized>(&self, document: &D) -> bool {
        (self.membership)(document.document_path())
    }
}

impl fmt::Debug for DocumentBloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentBloomFilter")
            .field("applied", &self.applied)
            .field("hash_count", &self.hash_count)
            .field("bitmap_length", &self.bitmap_length)
            .field("padding", &self.padding)
            .finish_non_exhaustive()
    }
}

/// A mismatch observed during a capture.
#[derive(Debug, Clone)]
pub struct ExistenceFilterMismatch {
    pub local_cache_count: u64,
    pub existence_filter_count: u64,
    pub bloom_filter: Option<DocumentBloomFilter>,
}

impl ExistenceFilterMismatch {
    pub fn from_info(info: &ExistenceFilterMismatchInfo) -> Self {
        Self {
            local_cache_count: info.local_cache_count,
            existence_filter_count: info.existence_filter_count,
            bloom_filter: info
                .bloom_filter
                .as_ref()
                .map(|bloom| DocumentBloomFilter::from_info(bloom, &info.project_id, &info.database_id)),
        }
    }
}

impl From<&ExistenceFilterMismatchInfo> for ExistenceFilterMismatch {
    fn from(info: &ExistenceFilterMismatchInfo) -> Self {
        Self::from_info(info)
    }
}
