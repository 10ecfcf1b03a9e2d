//! Bit vectors with O(1) rank support (component C2).
//!
//! [`BitVector`] is the dense flavor: a super-block + block layout with one
//! popcount per query, modeled on the cumulative-counter layout genedex uses
//! for its rank dictionaries (`examples/feldroop-genedex/src/
//! text_with_rank_support.rs`) but specialized to a single bitplane.
//! [`RunLengthBitVector`] is the sparse flavor for heavily imbalanced
//! streams (spec.md §4.2): it stores run boundaries instead of raw bits and
//! answers rank by binary search over them.
//!
//! Both implement [`RankBitVector`], so higher layers (rank dictionaries,
//! the CSA's sampling indicator) are generic over the flavor.

use crate::bitops::popcount_words;

/// Number of bits per super-block. Chosen so block offsets (the count of
/// set bits since the start of the current super-block) fit into a `u16`:
/// the largest possible offset is `SUPERBLOCK_BITS - 1`.
const SUPERBLOCK_BITS: usize = 1 << 16;
const BLOCK_BITS: usize = 64;

/// The common capability of a bit vector with rank support.
pub trait RankBitVector {
    /// Number of bits stored.
    fn size(&self) -> usize;

    /// The bit at position `i`. Precondition: `i < size()`.
    fn get(&self, i: usize) -> bool;

    /// Number of set bits in `[0, i)`. Precondition: `i <= size()`.
    fn rank1(&self, i: usize) -> usize;

    /// Number of unset bits in `[0, i)`.
    fn rank0(&self, i: usize) -> usize {
        i - self.rank1(i)
    }
}

/// Dense bit vector: raw bits plus super-block and block cumulative counts.
#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
#[derive(Debug, Clone)]
pub struct BitVector {
    len: usize,
    words: Vec<u64>,
    // cumulative ones strictly before the start of each block, within its superblock
    block_offsets: Vec<u16>,
    // cumulative ones strictly before the start of each superblock, globally
    superblock_offsets: Vec<usize>,
}

impl BitVector {
    /// Builds a bit vector of `len` bits, calling `bit_at(i)` exactly once
    /// for every `i` in `0..len`, in order.
    pub fn from_fn(len: usize, mut bit_at: impl FnMut(usize) -> bool) -> Self {
        let num_words = len.div_ceil(64);
        let mut words = vec![0u64; num_words];

        for i in 0..len {
            if bit_at(i) {
                words[i / 64] |= 1 << (i % 64);
            }
        }

        Self::from_words(words, len)
    }

    /// Builds a bit vector directly from raw words (little-endian within
    /// each `u64`), truncated/zero-padded to `len` bits.
    pub fn from_words(words: Vec<u64>, len: usize) -> Self {
        assert!(words.len() >= len.div_ceil(64) || len == 0);

        let num_blocks = len.div_ceil(BLOCK_BITS);
        let num_superblocks = len.div_ceil(SUPERBLOCK_BITS);

        let mut block_offsets = Vec::with_capacity(num_blocks);
        let mut superblock_offsets = Vec::with_capacity(num_superblocks.max(1));

        let blocks_per_superblock = SUPERBLOCK_BITS / BLOCK_BITS;

        let mut running_total = 0usize;
        for block_index in 0..num_blocks {
            if block_index % blocks_per_superblock == 0 {
                superblock_offsets.push(running_total);
                running_total = 0;
            }

            assert!(
                running_total <= u16::MAX as usize,
                "super-block of {SUPERBLOCK_BITS} bits overflows the u16 block offset counter"
            );
            block_offsets.push(running_total as u16);

            let word_start = block_index * BLOCK_BITS / 64;
            running_total += popcount_words(&words[word_start..word_start + 1]);
        }

        Self {
            len,
            words,
            block_offsets,
            superblock_offsets,
        }
    }

    /// Issues a non-binding prefetch hint for the memory touched by a query
    /// at index `i`.
    pub fn prefetch(&self, i: usize) {
        #[cfg(target_arch = "x86_64")]
        {
            use std::arch::x86_64::{_MM_HINT_T0, _mm_prefetch};
            let word_index = i / 64;
            if word_index < self.words.len() {
                unsafe {
                    _mm_prefetch(
                        self.words.as_ptr().add(word_index) as *const i8,
                        _MM_HINT_T0,
                    );
                }
            }
        }
        #[cfg(not(target_arch = "x86_64"))]
        {
            let _ = i;
        }
    }
}

impl RankBitVector for BitVector {
    fn size(&self) -> usize {
        self.len
    }

    fn get(&self, i: usize) -> bool {
        debug_assert!(i < self.len);
        (self.words[i / 64] >> (i % 64)) & 1 == 1
    }

    fn rank1(&self, i: usize) -> usize {
        debug_assert!(i <= self.len);
        if i == 0 {
            return 0;
        }

        let block_index = (i - 1) / BLOCK_BITS;
        let blocks_per_superblock = SUPERBLOCK_BITS / BLOCK_BITS;
        let superblock_index = block_index / blocks_per_superblock;

        let superblock_offset = self.superblock_offsets[superblock_index];
        let block_offset = self.block_offsets[block_index] as usize;

        let word_index = block_index;
        let bits_in_block = i - block_index * BLOCK_BITS;
        let mask = if bits_in_block == 64 {
            u64::MAX
        } else {
            (1u64 << bits_in_block) - 1
        };

        let partial = popcount_words(&[self.words[word_index] & mask]);

        superblock_offset + block_offset + partial
    }
}

/// Sparse, run-length-compacted bit vector.
///
/// Stores only the positions where the bit value changes ("run starts") and
/// the cumulative one-count at the start of each run. `rank1` is answered by
/// binary search over run starts, trading the dense flavor's single
/// memory-lookup for much lower memory on heavily imbalanced streams.
#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
#[derive(Debug, Clone)]
pub struct RunLengthBitVector {
    len: usize,
    first_bit: bool,
    // start position of each run after the first, alternating in value
    run_starts: Vec<usize>,
    // ones strictly before the start of each run in run_starts, plus a trailing
    // total-ones-in-vector sentinel
    ones_before_run: Vec<usize>,
}

impl RunLengthBitVector {
    pub fn from_fn(len: usize, mut bit_at: impl FnMut(usize) -> bool) -> Self {
        let mut run_starts = Vec::new();
        let mut ones_before_run = vec![0usize];
        let mut first_bit = false;
        let mut current = None;
        let mut ones_so_far = 0usize;

        for i in 0..len {
            let bit = bit_at(i);
            match current {
                None => {
                    first_bit = bit;
                    current = Some(bit);
                }
                Some(curr) if curr == bit => {}
                Some(_) => {
                    run_starts.push(i);
                    ones_before_run.push(ones_so_far);
                    current = Some(bit);
                }
            }
            if bit {
                ones_so_far += 1;
            }
        }

        Self {
            len,
            first_bit,
            run_starts,
            ones_before_run,
        }
    }
}

impl RankBitVector for RunLengthBitVector {
    fn size(&self) -> usize {
        self.len
    }

    fn get(&self, i: usize) -> bool {
        debug_assert!(i < self.len);
        let run_index = self.run_starts.partition_point(|&start| start <= i);
        let value_is_first = run_index % 2 == 0;
        if value_is_first { self.first_bit } else { !self.first_bit }
    }

    fn rank1(&self, i: usize) -> usize {
        debug_assert!(i <= self.len);
        let run_index = self.run_starts.partition_point(|&start| start < i);

        let run_start = if run_index == 0 { 0 } else { self.run_starts[run_index - 1] };
        let ones_before_this_run = self.ones_before_run[run_index];

        let run_is_ones = (run_index % 2 == 0) == self.first_bit;
        if run_is_ones {
            ones_before_this_run + (i - run_start)
        } else {
            ones_before_this_run
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_rank(bits: &[bool], i: usize) -> usize {
        bits[..i].iter().filter(|&&b| b).count()
    }

    #[test]
    fn dense_matches_naive_rank() {
        let pattern = [true, false, true, true, false, false, true, false, true, true, true];
        let bv = BitVector::from_fn(pattern.len(), |i| pattern[i]);

        for i in 0..=pattern.len() {
            assert_eq!(bv.rank1(i), naive_rank(&pattern, i), "at i={i}");
        }
        for (i, &bit) in pattern.iter().enumerate() {
            assert_eq!(bv.get(i), bit);
        }
    }

    #[test]
    fn dense_handles_many_blocks() {
        let len = 5000;
        let bits: Vec<bool> = (0..len).map(|i| i % 7 == 0 || i % 13 == 0).collect();
        let bv = BitVector::from_fn(len, |i| bits[i]);

        for i in (0..=len).step_by(37) {
            assert_eq!(bv.rank1(i), naive_rank(&bits, i));
        }
    }

    #[test]
    fn run_length_matches_naive_rank() {
        let pattern = [
            false, false, false, true, true, true, true, false, true, true, false, false,
        ];
        let bv = RunLengthBitVector::from_fn(pattern.len(), |i| pattern[i]);

        for i in 0..=pattern.len() {
            assert_eq!(bv.rank1(i), naive_rank(&pattern, i), "at i={i}");
        }
        for (i, &bit) in pattern.iter().enumerate() {
            assert_eq!(bv.get(i), bit, "at i={i}");
        }
    }

    #[test]
    fn run_length_all_zero_or_all_one() {
        let zeros = RunLengthBitVector::from_fn(10, |_| false);
        assert_eq!(zeros.rank1(10), 0);

        let ones = RunLengthBitVector::from_fn(10, |_| true);
        assert_eq!(ones.rank1(10), 10);
        assert_eq!(ones.rank1(4), 4);
    }
}
