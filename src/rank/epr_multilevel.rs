//! Multi-level EPR: [`super::epr`] with an extra counter tier.
//!
//! A plain EPR block stores one offset per word-block directly relative to
//! a (comparatively rare) super-block; for large texts that offset has to be
//! wide enough to span the whole super-block. This variant instead nests a
//! narrow `u8` word-in-mid-block offset inside a `u16` mid-block-in-top-block
//! offset inside a `usize` top-block global offset, shrinking the two inner
//! tiers at the cost of one extra memory indirection per query. Grounded on
//! `examples/original_source/.../rankvector/DoubleNEPRV8.h`.
//!
//! The tier sizes below (4 word-blocks per mid-block, 256 mid-blocks per
//! top-block) are chosen so each narrow counter's maximum possible value
//! fits its type; construction asserts this rather than silently wrapping,
//! resolving the open question about a hard-coded narrow counter width.

use super::RankDictionary;
use crate::bitops::{mark_exact, mark_exact_all, mark_exact_or_less, popcount_words};

const WORD_BLOCK_BITS: usize = 64;
const WORD_BLOCKS_PER_MID_BLOCK: usize = 4;
const MID_BLOCK_BITS: usize = WORD_BLOCK_BITS * WORD_BLOCKS_PER_MID_BLOCK;
const MID_BLOCKS_PER_TOP_BLOCK: usize = 256;
const TOP_BLOCK_BITS: usize = MID_BLOCK_BITS * MID_BLOCKS_PER_TOP_BLOCK;

fn ilog2_ceil(value: usize) -> u32 {
    if value.is_power_of_two() {
        value.ilog2()
    } else {
        value.ilog2() + 1
    }
}

#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
#[derive(Debug)]
pub struct EprMultilevelRankDictionary {
    size: usize,
    alphabet_size: usize,
    alphabet_bits: u32,
    interleaved_word_blocks: Vec<u64>,
    word_offsets: Vec<u8>,
    mid_offsets: Vec<u16>,
    top_offsets: Vec<usize>,
}

impl EprMultilevelRankDictionary {
    pub fn construct(text: &[u8], alphabet_size: usize) -> Self {
        assert!(alphabet_size >= 1);
        assert!(
            MID_BLOCK_BITS - WORD_BLOCK_BITS <= u8::MAX as usize,
            "word-in-mid-block offset does not fit u8 for this tier layout"
        );
        assert!(
            TOP_BLOCK_BITS - MID_BLOCK_BITS <= u16::MAX as usize,
            "mid-in-top-block offset does not fit u16 for this tier layout"
        );

        let alphabet_bits = ilog2_ceil(alphabet_size.max(1));

        let num_word_blocks = text.len().div_ceil(WORD_BLOCK_BITS);
        let num_mid_blocks = text.len().div_ceil(MID_BLOCK_BITS).max(1);
        let num_top_blocks = text.len().div_ceil(TOP_BLOCK_BITS).max(1);

        let mut interleaved_word_blocks = vec![0u64; num_word_blocks * alphabet_bits as usize];
        let mut word_offsets = vec![0u8; num_word_blocks * alphabet_size];
        let mut mid_offsets = vec![0u16; num_mid_blocks * alphabet_size];
        let mut top_offsets = vec![0usize; num_top_blocks * alphabet_size];

        let mut running_word = vec![0u8; alphabet_size];
        let mut running_mid = vec![0u16; alphabet_size];
        let mut running_top = vec![0usize; alphabet_size];

        for (position, &symbol) in text.iter().enumerate() {
            let word_index = position / WORD_BLOCK_BITS;
            let mid_index = position / MID_BLOCK_BITS;
            let top_index = position / TOP_BLOCK_BITS;
            let bit_index = position % WORD_BLOCK_BITS;

            if position % WORD_BLOCK_BITS == 0 {
                let start = word_index * alphabet_size;
                word_offsets[start..start + alphabet_size].copy_from_slice(&running_word);
            }
            if position % MID_BLOCK_BITS == 0 {
                let start = mid_index * alphabet_size;
                mid_offsets[start..start + alphabet_size].copy_from_slice(&running_mid);
                running_word.fill(0);
            }
            if position % TOP_BLOCK_BITS == 0 {
                let start = top_index * alphabet_size;
                top_offsets[start..start + alphabet_size].copy_from_slice(&running_top);
                running_mid.fill(0);
            }

            let plane_start = word_index * alphabet_bits as usize;
            for plane in 0..alphabet_bits {
                if (symbol >> plane) & 1 == 1 {
                    interleaved_word_blocks[plane_start + plane as usize] |= 1 << bit_index;
                }
            }

            running_word[symbol as usize] += 1;
            running_mid[symbol as usize] += 1;
            running_top[symbol as usize] += 1;
        }

        Self {
            size: text.len(),
            alphabet_size,
            alphabet_bits,
            interleaved_word_blocks,
            word_offsets,
            mid_offsets,
            top_offsets,
        }
    }

    fn word_block_planes(&self, word_index: usize) -> Vec<&[u64]> {
        let start = word_index * self.alphabet_bits as usize;
        (0..self.alphabet_bits as usize)
            .rev()
            .map(|plane| std::slice::from_ref(&self.interleaved_word_blocks[start + plane]))
            .collect()
    }

    fn masked_word_count(&self, word_index: usize, idx: usize, mask_words: &[u64]) -> usize {
        let bits_in_block = idx - word_index * WORD_BLOCK_BITS;
        let mask = if bits_in_block >= 64 {
            u64::MAX
        } else {
            (1u64 << bits_in_block) - 1
        };
        popcount_words(&[mask_words[0] & mask])
    }
}

impl super::ConstructibleRankDictionary for EprMultilevelRankDictionary {
    fn construct(text: &[u8], alphabet_size: usize) -> Self {
        EprMultilevelRankDictionary::construct(text, alphabet_size)
    }
}

impl RankDictionary for EprMultilevelRankDictionary {
    fn size(&self) -> usize {
        self.size
    }

    fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    fn symbol(&self, idx: usize) -> u8 {
        let word_index = idx / WORD_BLOCK_BITS;
        let bit_index = idx % WORD_BLOCK_BITS;
        let start = word_index * self.alphabet_bits as usize;

        let mut symbol = 0u8;
        for plane in 0..self.alphabet_bits as usize {
            let bit = (self.interleaved_word_blocks[start + plane] >> bit_index) & 1;
            symbol |= (bit as u8) << plane;
        }
        symbol
    }

    fn rank(&self, symbol: u8, idx: usize) -> usize {
        if idx == 0 {
            return 0;
        }

        let word_index = (idx - 1) / WORD_BLOCK_BITS;
        let mid_index = (idx - 1) / MID_BLOCK_BITS;
        let top_index = (idx - 1) / TOP_BLOCK_BITS;

        let top_offset = self.top_offsets[top_index * self.alphabet_size + symbol as usize];
        let mid_offset = self.mid_offsets[mid_index * self.alphabet_size + symbol as usize] as usize;
        let word_offset = self.word_offsets[word_index * self.alphabet_size + symbol as usize] as usize;

        let planes = self.word_block_planes(word_index);
        let mask = mark_exact(symbol as u64, &planes);

        let bits_in_block = idx - word_index * WORD_BLOCK_BITS;
        let bit_mask = if bits_in_block >= 64 {
            u64::MAX
        } else {
            (1u64 << bits_in_block) - 1
        };
        let word_count = popcount_words(&[mask[0] & bit_mask]);

        top_offset + mid_offset + word_offset + word_count
    }

    fn prefix_rank(&self, symbol: u8, idx: usize) -> usize {
        if symbol == 0 || idx == 0 {
            return 0;
        }

        let word_index = (idx - 1) / WORD_BLOCK_BITS;
        let mid_index = (idx - 1) / MID_BLOCK_BITS;
        let top_index = (idx - 1) / TOP_BLOCK_BITS;

        let top_offset: usize = (0..symbol as usize)
            .map(|s| self.top_offsets[top_index * self.alphabet_size + s])
            .sum();
        let mid_offset: usize = (0..symbol as usize)
            .map(|s| self.mid_offsets[mid_index * self.alphabet_size + s] as usize)
            .sum();
        let word_offset: usize = (0..symbol as usize)
            .map(|s| self.word_offsets[word_index * self.alphabet_size + s] as usize)
            .sum();

        let planes = self.word_block_planes(word_index);
        let mask = mark_exact_or_less(symbol as u64 - 1, &planes);
        let word_count = self.masked_word_count(word_index, idx, &mask);

        top_offset + mid_offset + word_offset + word_count
    }

    fn all_ranks(&self, idx: usize) -> Vec<usize> {
        if idx == 0 {
            return vec![0; self.alphabet_size];
        }

        let word_index = (idx - 1) / WORD_BLOCK_BITS;
        let mid_index = (idx - 1) / MID_BLOCK_BITS;
        let top_index = (idx - 1) / TOP_BLOCK_BITS;

        let planes = self.word_block_planes(word_index);
        let masks = mark_exact_all(&planes);

        (0..self.alphabet_size)
            .map(|symbol| {
                let top_offset = self.top_offsets[top_index * self.alphabet_size + symbol];
                let mid_offset = self.mid_offsets[mid_index * self.alphabet_size + symbol] as usize;
                let word_offset = self.word_offsets[word_index * self.alphabet_size + symbol] as usize;
                let word_count = self.masked_word_count(word_index, idx, &masks[symbol]);
                top_offset + mid_offset + word_offset + word_count
            })
            .collect()
    }

    fn all_ranks_and_prefix_ranks(&self, idx: usize) -> (Vec<usize>, Vec<usize>) {
        let ranks = self.all_ranks(idx);
        let mut prefix = Vec::with_capacity(ranks.len());
        let mut running = 0usize;
        for &r in &ranks {
            prefix.push(running);
            running += r;
        }
        (ranks, prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::test_support::assert_matches_naive;

    #[test]
    fn matches_naive_oracle_within_one_mid_block() {
        let text = [0u8, 1, 2, 3, 1, 1, 0, 2, 3, 3, 0, 1, 2];
        let dict = EprMultilevelRankDictionary::construct(&text, 4);
        assert_matches_naive(&dict, &text, 4);
    }

    #[test]
    fn matches_naive_oracle_crossing_mid_and_top_blocks() {
        let len = TOP_BLOCK_BITS + MID_BLOCK_BITS + 100;
        let alphabet_size = 5;
        let text: Vec<u8> = (0..len).map(|i| (i % alphabet_size) as u8).collect();
        let dict = EprMultilevelRankDictionary::construct(&text, alphabet_size);

        for idx in [
            0,
            1,
            WORD_BLOCK_BITS,
            MID_BLOCK_BITS - 1,
            MID_BLOCK_BITS,
            TOP_BLOCK_BITS - 1,
            TOP_BLOCK_BITS,
            TOP_BLOCK_BITS + 1,
            len,
        ] {
            for symbol in 0..alphabet_size as u8 {
                let expected = text[..idx].iter().filter(|&&s| s == symbol).count();
                assert_eq!(dict.rank(symbol, idx), expected, "idx={idx} symbol={symbol}");
            }
        }
    }
}
