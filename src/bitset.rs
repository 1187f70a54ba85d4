//! Dynamic packed-word vertex sets.
//!
//! The search engines manipulate sets of vertex ids in `[0, capacity)` backed
//! by `u64` words: O(1) membership, word-parallel union/intersection/difference,
//! and popcount-based cardinality. The capacity is fixed at construction.

use std::fmt;

const WORD_BITS: usize = 64;

#[inline(always)]
const fn word_index(bit: usize) -> usize {
    bit >> 6
}

#[inline(always)]
const fn word_mask(bit: usize) -> u64 {
    1u64 << (bit & 63)
}

// ============================================================================
// BitSet
// ============================================================================

/// A fixed-capacity set of vertex ids backed by packed `u64` words.
///
/// All operations stay within the capacity chosen at construction; binary
/// operations on sets of different capacities only touch the shorter word
/// range and never read out of bounds.
#[derive(Clone, PartialEq, Eq)]
pub struct BitSet {
    words: Vec<u64>,
    capacity: usize,
}

impl BitSet {
    /// Creates an empty set able to hold ids in `[0, capacity)`.
    pub fn with_capacity(capacity: usize) -> Self {
        let len = capacity.div_ceil(WORD_BITS);
        Self {
            words: vec![0u64; len],
            capacity,
        }
    }

    /// Maximum id (exclusive) this set can hold.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Adds `bit` to the set.
    #[inline(always)]
    pub fn insert(&mut self, bit: usize) {
        debug_assert!(bit < self.capacity);
        self.words[word_index(bit)] |= word_mask(bit);
    }

    /// Removes `bit` from the set.
    #[inline(always)]
    pub fn erase(&mut self, bit: usize) {
        debug_assert!(bit < self.capacity);
        self.words[word_index(bit)] &= !word_mask(bit);
    }

    /// Returns whether `bit` is in the set.
    #[inline(always)]
    pub fn contains(&self, bit: usize) -> bool {
        debug_assert!(bit < self.capacity);
        (self.words[word_index(bit)] & word_mask(bit)) != 0
    }

    /// Number of elements (popcount across all words).
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns whether the set holds no elements.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Removes all elements.
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Inserts every id in `[0, capacity)`.
    ///
    /// Bits beyond the capacity in the final word stay zero, so iteration and
    /// `first_unset` never see phantom ids.
    pub fn fill(&mut self) {
        self.words.fill(u64::MAX);
        self.mask_tail();
    }

    #[inline]
    fn mask_tail(&mut self) {
        let tail = self.capacity % WORD_BITS;
        if tail != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << tail) - 1;
            }
        }
    }

    /// Returns a new set holding the intersection with `other`.
    pub fn intersection_with(&self, other: &BitSet) -> BitSet {
        debug_assert_eq!(self.capacity, other.capacity);
        let len = self.words.len().min(other.words.len());
        let mut words = Vec::with_capacity(self.words.len());
        for i in 0..len {
            words.push(self.words[i] & other.words[i]);
        }
        words.resize(self.words.len(), 0);
        BitSet {
            words,
            capacity: self.capacity,
        }
    }

    /// Union: inserts every element of `other` into `self`.
    pub fn insert_all(&mut self, other: &BitSet) {
        let len = self.words.len().min(other.words.len());
        for i in 0..len {
            self.words[i] |= other.words[i];
        }
        self.mask_tail();
    }

    /// Difference: removes every element of `other` from `self`.
    pub fn erase_all(&mut self, other: &BitSet) {
        let len = self.words.len().min(other.words.len());
        for i in 0..len {
            self.words[i] &= !other.words[i];
        }
    }

    /// ORs a raw word into the backing storage at `offset` words.
    ///
    /// Used to splice an adjacency row into a set without per-bit calls.
    #[inline]
    pub fn insert_word(&mut self, offset: usize, bits: u64) {
        self.words[offset] |= bits;
        if offset + 1 == self.words.len() {
            self.mask_tail();
        }
    }

    /// Read-only view of the backing words.
    #[inline(always)]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Index of the first set bit, or `None` if the set is empty.
    pub fn first_set(&self) -> Option<usize> {
        for (i, &w) in self.words.iter().enumerate() {
            if w != 0 {
                return Some(i * WORD_BITS + w.trailing_zeros() as usize);
            }
        }
        None
    }

    /// Index of the last set bit, or `None` if the set is empty.
    pub fn last_set(&self) -> Option<usize> {
        for (i, &w) in self.words.iter().enumerate().rev() {
            if w != 0 {
                return Some(i * WORD_BITS + (WORD_BITS - 1 - w.leading_zeros() as usize));
            }
        }
        None
    }

    /// Index of the first unset bit below the capacity, or `None` if all
    /// ids in `[0, capacity)` are present.
    pub fn first_unset(&self) -> Option<usize> {
        for (i, &w) in self.words.iter().enumerate() {
            if w != u64::MAX {
                let bit = i * WORD_BITS + (!w).trailing_zeros() as usize;
                if bit < self.capacity {
                    return Some(bit);
                }
                return None;
            }
        }
        None
    }

    /// Iterates the elements in ascending id order.
    ///
    /// The iterator borrows the set; callers that mutate during traversal
    /// must iterate a clone instead (copy-then-mutate).
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            words: &self.words,
            current: self.words.first().copied().unwrap_or(0),
            offset: 0,
        }
    }
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a BitSet {
    type Item = usize;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl FromIterator<usize> for BitSet {
    /// Collects ids into a set sized to the largest id + 1.
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let ids: Vec<usize> = iter.into_iter().collect();
        let capacity = ids.iter().max().map_or(0, |&m| m + 1);
        let mut set = BitSet::with_capacity(capacity);
        for id in ids {
            set.insert(id);
        }
        set
    }
}

// ============================================================================
// Iterator
// ============================================================================

/// Ascending-order iterator over a [`BitSet`].
///
/// Walks word by word, stripping the lowest set bit each step.
pub struct Iter<'a> {
    words: &'a [u64],
    current: u64,
    offset: usize,
}

impl Iterator for Iter<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        while self.current == 0 {
            self.offset += 1;
            if self.offset >= self.words.len() {
                return None;
            }
            self.current = self.words[self.offset];
        }
        let bit = self.current.trailing_zeros() as usize;
        self.current &= self.current - 1;
        Some(self.offset * WORD_BITS + bit)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;
    use std::collections::BTreeSet;

    #[test]
    fn insert_erase_contains() {
        let mut set = BitSet::with_capacity(130);
        assert!(!set.contains(0));
        set.insert(0);
        set.insert(63);
        set.insert(64);
        set.insert(129);
        assert!(set.contains(0));
        assert!(set.contains(63));
        assert!(set.contains(64));
        assert!(set.contains(129));
        assert_eq!(set.len(), 4);

        set.erase(64);
        assert!(!set.contains(64));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn empty_set_yields_nothing() {
        let set = BitSet::with_capacity(100);
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.iter().count(), 0);
        assert_eq!(set.first_set(), None);
    }

    #[test]
    fn zero_capacity_set() {
        let set = BitSet::with_capacity(0);
        assert!(set.is_empty());
        assert_eq!(set.first_set(), None);
        assert_eq!(set.first_unset(), None);
        assert_eq!(set.iter().count(), 0);
    }

    #[test]
    fn fill_respects_capacity() {
        let mut set = BitSet::with_capacity(70);
        set.fill();
        assert_eq!(set.len(), 70);
        assert_eq!(set.first_unset(), None);
        assert_eq!(set.iter().max(), Some(69));
    }

    #[test]
    fn iteration_is_ascending() {
        let mut set = BitSet::with_capacity(200);
        let ids = [199, 3, 77, 64, 5, 128];
        for &id in &ids {
            set.insert(id);
        }
        let collected: Vec<usize> = set.iter().collect();
        let mut sorted = ids.to_vec();
        sorted.sort_unstable();
        assert_eq!(collected, sorted);
    }

    #[test]
    fn first_set_and_unset() {
        let mut set = BitSet::with_capacity(150);
        assert_eq!(set.first_set(), None);
        assert_eq!(set.first_unset(), Some(0));

        set.insert(0);
        set.insert(1);
        assert_eq!(set.first_set(), Some(0));
        assert_eq!(set.first_unset(), Some(2));

        set.clear();
        set.insert(100);
        assert_eq!(set.first_set(), Some(100));
    }

    #[test]
    fn first_unset_skips_full_words() {
        let mut set = BitSet::with_capacity(100);
        for i in 0..64 {
            set.insert(i);
        }
        assert_eq!(set.first_unset(), Some(64));
        for i in 64..100 {
            set.insert(i);
        }
        assert_eq!(set.first_unset(), None);
    }

    #[test]
    fn last_set_finds_highest_bit() {
        let mut set = BitSet::with_capacity(200);
        assert_eq!(set.last_set(), None);
        set.insert(0);
        assert_eq!(set.last_set(), Some(0));
        set.insert(63);
        assert_eq!(set.last_set(), Some(63));
        set.insert(130);
        assert_eq!(set.last_set(), Some(130));
        set.erase(130);
        assert_eq!(set.last_set(), Some(63));
    }

    #[test]
    fn union_difference_intersection_match_btreeset() {
        let mut rng = XorShiftRng::seed_from_u64(0x9157);
        for _ in 0..50 {
            let mut a = BitSet::with_capacity(180);
            let mut b = BitSet::with_capacity(180);
            let mut ra = BTreeSet::new();
            let mut rb = BTreeSet::new();
            for _ in 0..60 {
                let x = rng.random_range(0..180);
                a.insert(x);
                ra.insert(x);
                let y = rng.random_range(0..180);
                b.insert(y);
                rb.insert(y);
            }

            let inter = a.intersection_with(&b);
            let expected: Vec<usize> = ra.intersection(&rb).copied().collect();
            assert_eq!(inter.iter().collect::<Vec<_>>(), expected);

            let mut union = a.clone();
            union.insert_all(&b);
            let expected: Vec<usize> = ra.union(&rb).copied().collect();
            assert_eq!(union.iter().collect::<Vec<_>>(), expected);

            let mut diff = a.clone();
            diff.erase_all(&b);
            let expected: Vec<usize> = ra.difference(&rb).copied().collect();
            assert_eq!(diff.iter().collect::<Vec<_>>(), expected);
        }
    }

    #[test]
    fn mismatched_capacity_ops_touch_shorter_range_only() {
        let mut long = BitSet::with_capacity(200);
        long.insert(10);
        long.insert(150);

        let mut short = BitSet::with_capacity(64);
        short.insert(10);
        short.insert(20);

        // Difference must not read past the shorter storage.
        long.erase_all(&short);
        assert!(!long.contains(10));
        assert!(long.contains(150));

        let mut short2 = BitSet::with_capacity(64);
        short2.insert_all(&long);
        assert!(!short2.contains(10));
    }

    #[test]
    fn insert_word_matches_bitwise_inserts() {
        let mut a = BitSet::with_capacity(128);
        a.insert_word(1, 0b1011);
        let mut b = BitSet::with_capacity(128);
        b.insert(64);
        b.insert(65);
        b.insert(67);
        assert_eq!(a, b);
    }

    #[test]
    fn from_iterator_round_trips() {
        let set: BitSet = [4usize, 9, 17].into_iter().collect();
        assert_eq!(set.capacity(), 18);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![4, 9, 17]);
    }
}
