#![forbid(unsafe_code)]

/// Presence bits for a nullable column, one per physical slot.
///
/// Bits are packed little-endian into `u64` words (bit 0 is the LSB of word 0). A set bit means
/// the slot holds a concrete value. Bits past `len` in the last word stay clear.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ValidityMask {
    words: Box<[u64]>,
    len: usize,
}

fn word_len(bits: usize) -> usize {
    (bits + 63) / 64
}

fn low_bits(count: usize) -> u64 {
    (1u64 << count) - 1
}

impl ValidityMask {
    /// A mask of `bits` absent slots.
    pub(crate) fn with_len_all_false(bits: usize) -> Self {
        Self {
            words: vec![0u64; word_len(bits)].into_boxed_slice(),
            len: bits,
        }
    }

    pub(crate) fn get(&self, index: usize) -> bool {
        debug_assert!(index < self.len, "validity index out of bounds");
        (self.words[index / 64] >> (index % 64)) & 1 == 1
    }

    pub(crate) fn set(&mut self, index: usize, present: bool) {
        debug_assert!(index < self.len, "validity index out of bounds");
        let mask = 1u64 << (index % 64);
        let word = &mut self.words[index / 64];
        if present {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    /// Number of present slots in `[0, end)`.
    pub(crate) fn count_ones_before(&self, end: usize) -> usize {
        let end = end.min(self.len);
        let full = end / 64;
        let mut ones: usize = self.words[..full].iter().map(|w| w.count_ones() as usize).sum();
        if end % 64 > 0 {
            ones += (self.words[full] & low_bits(end % 64)).count_ones() as usize;
        }
        ones
    }

    /// Reallocate to exactly `bits` slots, keeping the common prefix. New slots are absent.
    pub(crate) fn resize(&mut self, bits: usize) {
        let mut words = vec![0u64; word_len(bits)].into_boxed_slice();
        let keep = bits.min(self.len);
        let full = keep / 64;
        words[..full].copy_from_slice(&self.words[..full]);
        if keep % 64 > 0 {
            words[full] = self.words[full] & low_bits(keep % 64);
        }
        self.words = words;
        self.len = bits;
    }

    /// Shift `[index, end)` up by one slot and record `present` at `index`.
    pub(crate) fn insert(&mut self, index: usize, end: usize, present: bool) {
        debug_assert!(index <= end && end < self.len, "validity insert out of bounds");
        for i in (index..end).rev() {
            let bit = self.get(i);
            self.set(i + 1, bit);
        }
        self.set(index, present);
    }

    /// Close the gap `[from, to)` by shifting `[to, end)` down; the vacated tail becomes absent.
    pub(crate) fn remove(&mut self, from: usize, to: usize, end: usize) {
        debug_assert!(from <= to && to <= end && end <= self.len);
        let count = to - from;
        for i in to..end {
            let bit = self.get(i);
            self.set(i - count, bit);
        }
        for i in end - count..end {
            self.set(i, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mask_of(bits: &[bool]) -> ValidityMask {
        let mut mask = ValidityMask::with_len_all_false(bits.len());
        for (idx, &bit) in bits.iter().enumerate() {
            mask.set(idx, bit);
        }
        mask
    }

    fn bits(mask: &ValidityMask, end: usize) -> Vec<bool> {
        (0..end).map(|idx| mask.get(idx)).collect()
    }

    #[test]
    fn growth_keeps_presence_and_clears_new_slots() {
        // A column of three entries, the middle one absent, doubling its capacity.
        let mut mask = mask_of(&[true, false, true]);
        mask.resize(6);
        assert_eq!(bits(&mask, 6), vec![true, false, true, false, false, false]);
        assert_eq!(mask.count_ones_before(6), 2);
    }

    #[test]
    fn growth_across_word_boundary() {
        let mut mask = ValidityMask::with_len_all_false(64);
        mask.set(63, true);
        mask.resize(128);
        assert!(mask.get(63));
        assert!(!mask.get(64));
        mask.set(127, true);
        assert_eq!(mask.count_ones_before(128), 2);
    }

    #[test]
    fn shrinking_drops_bits_past_the_new_length() {
        let mut mask = ValidityMask::with_len_all_false(70);
        mask.set(65, true);
        mask.set(66, true);
        mask.resize(66);
        assert_eq!(mask.count_ones_before(66), 1);
        // Growing again must not resurrect the dropped bit.
        mask.resize(70);
        assert!(!mask.get(66));
    }

    #[test]
    fn insert_shifts_the_live_range_up() {
        // Four slots, three live entries [present, absent, present], inserting a present entry
        // at the front as a row insert does.
        let mut mask = mask_of(&[true, false, true, false]);
        mask.insert(0, 3, true);
        assert_eq!(bits(&mask, 4), vec![true, true, false, true]);
        mask.insert(2, 3, false);
        assert_eq!(bits(&mask, 4), vec![true, true, false, false]);
    }

    #[test]
    fn remove_shifts_down_and_clears_the_tail() {
        let mut mask = mask_of(&[true, false, true, true, false, true]);
        mask.remove(1, 3, 6);
        assert_eq!(bits(&mask, 6), vec![true, true, false, true, false, false]);
        assert_eq!(mask.count_ones_before(4), 3);
    }

    #[test]
    fn count_ones_before_spans_words() {
        let mut mask = ValidityMask::with_len_all_false(128);
        mask.set(3, true);
        mask.set(64, true);
        mask.set(100, true);
        assert_eq!(mask.count_ones_before(64), 1);
        assert_eq!(mask.count_ones_before(65), 2);
        assert_eq!(mask.count_ones_before(500), 3);
    }
}
