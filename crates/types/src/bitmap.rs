//! Growable bitmap of validator positions.
//!
//! # Bit layout
//!
//! Index `i` lives in byte `i / 8` at bit `i % 8`, least significant bit
//! first. Storage grows to exactly `i / 8 + 1` bytes when bit `i` is set and
//! never shrinks, so the same set of indices always produces the same bytes
//! regardless of insertion order. The bytes are part of the header wire
//! format.
//!
//! Indices are positions in a fixed, ordered validator list. A bitmap means
//! nothing without that list.

use sbor::prelude::*;

/// Set of validator positions, used for removed validators and for signers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, BasicSbor)]
pub struct Bitmap {
    bits: Vec<u8>,
}

impl Bitmap {
    /// Create an empty bitmap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap raw bytes in the documented bit layout.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bits: bytes }
    }

    /// Build a bitmap with the given indices set.
    pub fn from_indices(indices: impl IntoIterator<Item = u64>) -> Self {
        let mut bitmap = Self::new();
        for index in indices {
            bitmap.set(index);
        }
        bitmap
    }

    /// Turn bit `index` on, growing storage as needed. Idempotent.
    pub fn set(&mut self, index: u64) {
        let byte_idx = (index / 8) as usize;
        if byte_idx >= self.bits.len() {
            self.bits.resize(byte_idx + 1, 0);
        }
        self.bits[byte_idx] |= 1 << (index % 8);
    }

    /// Check bit `index`. Indices beyond the storage are unset.
    pub fn is_set(&self, index: u64) -> bool {
        let byte_idx = index / 8;
        if byte_idx >= self.bits.len() as u64 {
            return false;
        }
        (self.bits[byte_idx as usize] >> (index % 8)) & 1 == 1
    }

    /// Highest set index plus one, or zero when nothing is set.
    pub fn len(&self) -> u64 {
        match self.bits.iter().rposition(|&b| b != 0) {
            Some(byte_idx) => {
                let high_bit = 7 - self.bits[byte_idx].leading_zeros() as u64;
                byte_idx as u64 * 8 + high_bit + 1
            }
            None => 0,
        }
    }

    /// True when no bit is set.
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&b| b == 0)
    }

    pub fn count_ones(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Iterate set indices in ascending order.
    pub fn set_indices(&self) -> impl Iterator<Item = u64> + '_ {
        self.bits.iter().enumerate().flat_map(|(byte_idx, &byte)| {
            (0..8u64)
                .filter(move |bit| (byte >> bit) & 1 == 1)
                .map(move |bit| byte_idx as u64 * 8 + bit)
        })
    }

    /// Raw backing bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Whether the bytes are what [`Bitmap::set`] alone would have produced,
    /// i.e. there is no trailing zero byte.
    pub fn is_canonical(&self) -> bool {
        self.bits.last().map_or(true, |&b| b != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_basic() {
        let mut bitmap = Bitmap::new();
        assert!(bitmap.is_empty());
        assert_eq!(bitmap.len(), 0);

        bitmap.set(0);
        bitmap.set(5);
        bitmap.set(9);

        assert!(bitmap.is_set(0));
        assert!(bitmap.is_set(5));
        assert!(bitmap.is_set(9));
        assert!(!bitmap.is_set(1));
        assert!(!bitmap.is_set(10));
        assert!(!bitmap.is_set(1_000_000));

        assert_eq!(bitmap.len(), 10);
        assert_eq!(bitmap.count_ones(), 3);
        assert_eq!(bitmap.as_bytes(), &[0b0010_0001, 0b0000_0010]);
    }

    #[test]
    fn test_set_is_idempotent() {
        let mut once = Bitmap::new();
        once.set(12);

        let mut twice = Bitmap::new();
        twice.set(12);
        twice.set(12);

        assert_eq!(once.as_bytes(), twice.as_bytes());
    }

    #[test]
    fn test_bytes_independent_of_insertion_order() {
        let forward = Bitmap::from_indices([1, 7, 8, 20]);
        let backward = Bitmap::from_indices([20, 8, 7, 1]);
        assert_eq!(forward.as_bytes(), backward.as_bytes());
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_set_indices() {
        let bitmap = Bitmap::from_indices([4, 1, 15, 7]);
        let indices: Vec<_> = bitmap.set_indices().collect();
        assert_eq!(indices, vec![1, 4, 7, 15]);
    }

    #[test]
    fn test_len_is_highest_index_plus_one() {
        assert_eq!(Bitmap::from_indices([0]).len(), 1);
        assert_eq!(Bitmap::from_indices([7]).len(), 8);
        assert_eq!(Bitmap::from_indices([8]).len(), 9);
        assert_eq!(Bitmap::from_indices([2, 63]).len(), 64);
    }

    #[test]
    fn test_canonical_form() {
        assert!(Bitmap::new().is_canonical());
        assert!(Bitmap::from_indices([3, 9]).is_canonical());

        let padded = Bitmap::from_bytes(vec![0b1000, 0]);
        assert!(!padded.is_canonical());
        assert!(padded.is_set(3));
        assert_eq!(padded.len(), 4);
    }
}
