//! Sampled compressed suffix array (component C4).
//!
//! Storing the full suffix array costs one `usize` per indexed position;
//! `SampledSuffixArray` keeps only a fraction of the entries and recovers
//! the rest by LF-mapping until a sampled (or sentinel) position is hit, the
//! same trade genedex's `sampled_suffix_array.rs` makes. Two sampling
//! policies decide *which* fraction is kept:
//!
//! - [`SamplingPolicy::SuffixArrayIndex`] ("SA-sampled"): keep the entry at
//!   every `rate`-th *position* in the suffix array. Lookup is a direct
//!   index, but LF-walks from an arbitrary starting position can take up to
//!   `rate` steps.
//! - [`SamplingPolicy::TextPosition`] ("text-sampled"): keep the entry
//!   whenever the *suffix array value itself* (the original text position)
//!   is a multiple of `rate`. This bounds the recovered value's distance
//!   from a sampled value rather than the walk length, which suits access
//!   patterns that jump to specific text coordinates. Since sampled
//!   positions are then scattered through the suffix array rather than
//!   evenly spaced, an indicator [`BitVector`] plus its rank is needed to
//!   find the right compacted entry.
//!
//! Grounded on genedex's `sampled_suffix_array.rs` (SA-sampled with a u32
//! byte-packing trick this module's `value`/`has_value` split makes
//! unnecessary, since callers work with one value at a time rather than a
//! packed range) and spec.md §4.4.

use std::collections::HashMap;

use crate::bitvector::{BitVector, RankBitVector};

/// Which positions of the suffix array are retained.
#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingPolicy {
    /// Every `rate`-th suffix array index is retained.
    SuffixArrayIndex,
    /// Every suffix array entry whose *value* is a multiple of `rate` is
    /// retained.
    TextPosition,
}

#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
#[derive(Debug)]
pub struct SampledSuffixArray {
    policy: SamplingPolicy,
    rate: usize,
    sampled_values: Vec<u64>,
    // Some only for `TextPosition`: marks which suffix-array indices were sampled.
    is_sampled: Option<BitVector>,
    /// Maps a BWT/F-array index at a sentinel position to the originating
    /// sequence's starting offset in the concatenated text, so an LF-walk
    /// that lands on a sentinel can terminate immediately instead of
    /// stepping past the end of the text.
    text_border_lookup: HashMap<usize, u64>,
}

impl SampledSuffixArray {
    /// Builds a sampled suffix array from the full suffix array (values are
    /// positions into the concatenated, sentinel-joined text).
    pub fn construct(
        suffix_array: &[u64],
        rate: usize,
        policy: SamplingPolicy,
        text_border_lookup: HashMap<usize, u64>,
    ) -> Self {
        assert!(rate >= 1);

        match policy {
            SamplingPolicy::SuffixArrayIndex => {
                let sampled_values = suffix_array
                    .iter()
                    .step_by(rate)
                    .copied()
                    .collect();
                Self {
                    policy,
                    rate,
                    sampled_values,
                    is_sampled: None,
                    text_border_lookup,
                }
            }
            SamplingPolicy::TextPosition => {
                let rate_u64 = rate as u64;
                let is_sampled =
                    BitVector::from_fn(suffix_array.len(), |i| suffix_array[i] % rate_u64 == 0);
                let sampled_values = suffix_array
                    .iter()
                    .filter(|&&value| value % rate_u64 == 0)
                    .copied()
                    .collect();
                Self {
                    policy,
                    rate,
                    sampled_values,
                    is_sampled: Some(is_sampled),
                    text_border_lookup,
                }
            }
        }
    }

    pub fn sampling_rate(&self) -> usize {
        self.rate
    }

    pub fn policy(&self) -> SamplingPolicy {
        self.policy
    }

    /// Whether the suffix array entry at `sa_index` was retained verbatim.
    pub fn has_value(&self, sa_index: usize) -> bool {
        match self.policy {
            SamplingPolicy::SuffixArrayIndex => sa_index % self.rate == 0,
            SamplingPolicy::TextPosition => self.is_sampled.as_ref().unwrap().get(sa_index),
        }
    }

    /// The retained value at `sa_index`. Precondition: `has_value(sa_index)`.
    pub fn value(&self, sa_index: usize) -> u64 {
        match self.policy {
            SamplingPolicy::SuffixArrayIndex => self.sampled_values[sa_index / self.rate],
            SamplingPolicy::TextPosition => {
                let compacted_index = self.is_sampled.as_ref().unwrap().rank1(sa_index);
                self.sampled_values[compacted_index]
            }
        }
    }

    /// The concatenated-text offset a sentinel at BWT index `idx` belongs
    /// to, if `idx` is a sentinel position.
    pub fn text_border_offset(&self, idx: usize) -> Option<u64> {
        self.text_border_lookup.get(&idx).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn border_lookup() -> HashMap<usize, u64> {
        HashMap::new()
    }

    #[test]
    fn sa_sampled_recovers_every_rate_th_entry() {
        let suffix_array: Vec<u64> = vec![7, 3, 5, 0, 6, 2, 4, 1];
        let rate = 3;
        let sampled =
            SampledSuffixArray::construct(&suffix_array, rate, SamplingPolicy::SuffixArrayIndex, border_lookup());

        for (i, &expected) in suffix_array.iter().enumerate() {
            if i % rate == 0 {
                assert!(sampled.has_value(i));
                assert_eq!(sampled.value(i), expected);
            } else {
                assert!(!sampled.has_value(i));
            }
        }
    }

    #[test]
    fn text_sampled_recovers_entries_whose_value_is_a_multiple_of_rate() {
        let suffix_array: Vec<u64> = vec![7, 3, 5, 0, 6, 2, 4, 1];
        let rate = 3;
        let sampled =
            SampledSuffixArray::construct(&suffix_array, rate, SamplingPolicy::TextPosition, border_lookup());

        for (i, &value) in suffix_array.iter().enumerate() {
            if value % rate as u64 == 0 {
                assert!(sampled.has_value(i), "index {i} (value {value}) should be sampled");
                assert_eq!(sampled.value(i), value);
            } else {
                assert!(!sampled.has_value(i));
            }
        }
    }

    #[test]
    fn text_border_lookup_roundtrips() {
        let mut borders = HashMap::new();
        borders.insert(4usize, 10u64);
        let suffix_array: Vec<u64> = vec![0, 1, 2, 3];
        let sampled =
            SampledSuffixArray::construct(&suffix_array, 2, SamplingPolicy::SuffixArrayIndex, borders);

        assert_eq!(sampled.text_border_offset(4), Some(10));
        assert_eq!(sampled.text_border_offset(0), None);
    }
}
