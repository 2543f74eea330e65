//! Per-node validity bit-set.

use std::fmt;

const WORD_BITS: usize = 64;

/// Fixed-width bit-set recording which neighbour relations are violated.
///
/// Bit `i` refers to the neighbour at position `i` of the node's neighbour
/// list, not to the neighbour's id. The width is fixed when the mask is
/// created and equals the node's neighbour count.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ValidityMask {
    words: Vec<u64>,
    len: usize,
}

impl ValidityMask {
    /// A mask of `len` bits, all clear.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    /// A mask of `len` bits, all set.
    pub fn all_invalid(len: usize) -> Self {
        let mut mask = Self::new(len);
        for i in 0..len {
            mask.set(i, true);
        }
        mask
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the relation at neighbour position `index` is violated.
    ///
    /// Positions outside the mask read as valid.
    pub fn is_invalid(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.words[index / WORD_BITS] & (1 << (index % WORD_BITS)) != 0
    }

    /// # Panics
    ///
    /// Panics if `index` is outside the mask.
    pub fn set(&mut self, index: usize, invalid: bool) {
        assert!(
            index < self.len,
            "validity index {index} out of range for mask of width {}",
            self.len
        );
        let bit = 1u64 << (index % WORD_BITS);
        if invalid {
            self.words[index / WORD_BITS] |= bit;
        } else {
            self.words[index / WORD_BITS] &= !bit;
        }
    }

    /// Copy of this mask with one bit replaced.
    pub fn with(&self, index: usize, invalid: bool) -> Self {
        let mut mask = self.clone();
        mask.set(index, invalid);
        mask
    }

    /// True when no relation is violated.
    pub fn is_clear(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn count_invalid(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

impl fmt::Debug for ValidityMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits: String = (0..self.len)
            .map(|i| if self.is_invalid(i) { '1' } else { '0' })
            .collect();
        write!(f, "ValidityMask({bits})")
    }
}
