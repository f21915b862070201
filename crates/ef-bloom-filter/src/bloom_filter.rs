//! Core Bloom filter implementation
//!
//! This is the filter the server attaches to an existence filter: a bitmap
//! whose last byte carries `padding` unused high bits, tested at `hash_count`
//! MD5-derived positions. Bit `i` lives in byte `i / 8` at offset `i % 8`.
//!
//! INVARIANTS:
//! - No false negatives: after `insert(v)`, `might_contain(v)` returns true.
//! - A filter with zero bits contains nothing.

use std::fmt;

use crate::error::BloomFilterError;
use crate::hash_functions::compute_bit_positions;

/// Bloom filter over fully-qualified document names.
#[derive(Clone, PartialEq, Eq)]
pub struct BloomFilter {
    bitmap: Vec<u8>,
    padding: u32,
    hash_count: u32,
    bit_count: u64,
}

impl BloomFilter {
    /// Build a filter from server-supplied parameters.
    ///
    /// # Errors
    ///
    /// - padding outside `0..8`
    /// - zero `hash_count` with a non-empty bitmap
    /// - non-zero padding with an empty bitmap
    pub fn new(bitmap: Vec<u8>, padding: u32, hash_count: u32) -> Result<Self, BloomFilterError> {
        if padding >= 8 {
            return Err(BloomFilterError::InvalidPadding {
                padding: i64::from(padding),
            });
        }
        if !bitmap.is_empty() && hash_count == 0 {
            return Err(BloomFilterError::InvalidHashCount { hash_count: 0 });
        }
        if bitmap.is_empty() && padding != 0 {
            return Err(BloomFilterError::PaddingWithEmptyBitmap { padding });
        }

        let bit_count = bitmap.len() as u64 * 8 - u64::from(padding);
        Ok(Self {
            bitmap,
            padding,
            hash_count,
            bit_count,
        })
    }

    /// An all-zero filter able to hold `bit_count` bits.
    pub fn with_bit_count(bit_count: u64, hash_count: u32) -> Result<Self, BloomFilterError> {
        let byte_len = usize::try_from(bit_count.div_ceil(8))
            .map_err(|_| BloomFilterError::InvalidBitCount { bit_count })?;
        let padding = if bit_count % 8 == 0 {
            0
        } else {
            8 - (bit_count % 8) as u32
        };
        Self::new(vec![0u8; byte_len], padding, hash_count)
    }

    /// Build a filter and insert every value.
    pub fn from_values<I, S>(bit_count: u64, hash_count: u32, values: I) -> Result<Self, BloomFilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::with_bit_count(bit_count, hash_count)?;
        for value in values {
            filter.insert(value.as_ref());
        }
        Ok(filter)
    }

    /// Insert a value. A zero-bit filter ignores inserts.
    pub fn insert(&mut self, value: &str) {
        for index in compute_bit_positions(value, self.hash_count, self.bit_count) {
            self.set_bit(index);
        }
    }

    /// Test if a value might be in the filter
    ///
    /// Returns:
    /// - `true` if the value might be in the set (could be false positive)
    /// - `false` if the value is definitely NOT in the set
    pub fn might_contain(&self, value: &str) -> bool {
        if self.bit_count == 0 {
            return false;
        }
        compute_bit_positions(value, self.hash_count, self.bit_count)
            .all(|index| self.is_bit_set(index))
    }

    fn is_bit_set(&self, index: u64) -> bool {
        let byte = self.bitmap[(index / 8) as usize];
        let offset = index % 8;
        byte & (1u8 << offset) != 0
    }

    fn set_bit(&mut self, index: u64) {
        let offset = index % 8;
        self.bitmap[(index / 8) as usize] |= 1u8 << offset;
    }

    /// Usable bits: `bitmap.len() * 8 - padding`.
    pub fn bit_count(&self) -> u64 {
        self.bit_count
    }

    pub fn hash_count(&self) -> u32 {
        self.hash_count
    }

    pub fn padding(&self) -> u32 {
        self.padding
    }

    pub fn bitmap(&self) -> &[u8] {
        &self.bitmap
    }

    /// Bitmap length in bits, padding included.
    pub fn bitmap_length_bits(&self) -> u64 {
        self.bitmap.len() as u64 * 8
    }

    /// Number of bits currently set.
    pub fn bits_set(&self) -> u32 {
        self.bitmap.iter().map(|b| b.count_ones()).sum()
    }
}

impl fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilter")
            .field("bit_count", &self.bit_count)
            .field("hash_count", &self.hash_count)
            .field("padding", &self.padding)
            .field("bits_set", &self.bits_set())
            .finish()
    }
}
