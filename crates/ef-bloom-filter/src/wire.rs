//! Existence-filter payload decoding
//!
//! The listen stream delivers the Bloom filter as `unchangedNames`:
//!
//! ```text
//! { "bits": { "bitmap": "<base64>", "padding": 3 }, "hashCount": 5 }
//! ```
//!
//! A payload that cannot be decoded is not an error for the caller: the
//! filter is skipped with a warning and the engine falls back to a full
//! re-query.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::bloom_filter::BloomFilter;
use crate::error::BloomFilterError;

/// Bitmap plus the number of unused bits in its final byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitSequence {
    /// Base64-encoded bitmap.
    #[serde(default)]
    pub bitmap: String,
    #[serde(default)]
    pub padding: i32,
}

/// The Bloom filter section of an existence filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnchangedNames {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bits: Option<BitSequence>,
    #[serde(default)]
    pub hash_count: i32,
}

impl UnchangedNames {
    /// Encode a filter the way the server sends it.
    pub fn from_filter(filter: &BloomFilter) -> Self {
        Self {
            bits: Some(BitSequence {
                bitmap: STANDARD.encode(filter.bitmap()),
                padding: filter.padding() as i32,
            }),
            hash_count: filter.hash_count() as i32,
        }
    }

    /// Decode into a filter, reporting why decoding failed.
    pub fn to_bloom_filter(&self) -> Result<Option<BloomFilter>, BloomFilterError> {
        let Some(bits) = &self.bits else {
            return Ok(None);
        };

        let bitmap = STANDARD
            .decode(bits.bitmap.as_bytes())
            .map_err(|e| BloomFilterError::Base64Decode(e.to_string()))?;
        let padding = u32::try_from(bits.padding).map_err(|_| BloomFilterError::InvalidPadding {
            padding: i64::from(bits.padding),
        })?;
        let hash_count =
            u32::try_from(self.hash_count).map_err(|_| BloomFilterError::InvalidHashCount {
                hash_count: i64::from(self.hash_count),
            })?;

        BloomFilter::new(bitmap, padding, hash_count).map(Some)
    }
}

/// Decode the existence filter's Bloom filter, if it carries a usable one.
///
/// Returns `None` when the payload is absent, malformed, or has zero bits.
pub fn parse_bloom_filter(unchanged_names: Option<&UnchangedNames>) -> Option<BloomFilter> {
    let unchanged_names = unchanged_names?;

    match unchanged_names.to_bloom_filter() {
        Ok(Some(filter)) if filter.bit_count() > 0 => Some(filter),
        Ok(_) => None,
        Err(BloomFilterError::Base64Decode(reason)) => {
            warn!(
                error = %reason,
                "Decoding the base64 bloom filter in existence filter failed; \
                 ignoring the bloom filter and falling back to full re-query"
            );
            None
        }
        Err(e) => {
            warn!(error = %e, "Bloom filter error; ignoring the bloom filter");
            None
        }
    }
}
