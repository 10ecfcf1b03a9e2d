//! Binary wavelet-tree rank dictionary.
//!
//! A complete binary tree of depth `ceil(log2(alphabet_size))`; each internal
//! node holds one [`BitVector`] recording, for the subsequence of symbols
//! that route through it, whether each element's next bit (MSB first) is `0`
//! (left child) or `1` (right child). `rank`/`symbol` descend the tree,
//! narrowing the query position by the child bit vector's rank at each
//! level. Grounded on
//! `examples/original_source/.../rankvector/Wavelet.h` and `Wavelet2.h`.

use crate::bitvector::{BitVector, RankBitVector};

use super::RankDictionary;

fn ilog2_ceil(value: usize) -> u32 {
    if value.is_power_of_two() {
        value.ilog2()
    } else {
        value.ilog2() + 1
    }
}

#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
#[derive(Debug)]
pub struct WaveletRankDictionary {
    size: usize,
    alphabet_size: usize,
    alphabet_bits: u32,
    // nodes[level][node_index]; level l has exactly 2^l nodes
    nodes: Vec<Vec<BitVector>>,
}

impl WaveletRankDictionary {
    pub fn construct(text: &[u8], alphabet_size: usize) -> Self {
        assert!(alphabet_size >= 1);
        let alphabet_bits = ilog2_ceil(alphabet_size.max(1));

        let mut nodes = Vec::with_capacity(alphabet_bits as usize);
        let mut current_sequences: Vec<Vec<u8>> = vec![text.to_vec()];

        for level in 0..alphabet_bits {
            let bit_shift = alphabet_bits - 1 - level;
            let mut level_nodes = Vec::with_capacity(current_sequences.len());
            let mut next_sequences = Vec::with_capacity(current_sequences.len() * 2);

            for seq in &current_sequences {
                let bv = BitVector::from_fn(seq.len(), |i| (seq[i] >> bit_shift) & 1 == 1);

                let mut left = Vec::new();
                let mut right = Vec::new();
                for &s in seq {
                    if (s >> bit_shift) & 1 == 1 {
                        right.push(s);
                    } else {
                        left.push(s);
                    }
                }

                level_nodes.push(bv);
                next_sequences.push(left);
                next_sequences.push(right);
            }

            nodes.push(level_nodes);
            current_sequences = next_sequences;
        }

        Self {
            size: text.len(),
            alphabet_size,
            alphabet_bits,
            nodes,
        }
    }
}

impl super::ConstructibleRankDictionary for WaveletRankDictionary {
    fn construct(text: &[u8], alphabet_size: usize) -> Self {
        WaveletRankDictionary::construct(text, alphabet_size)
    }
}

impl RankDictionary for WaveletRankDictionary {
    fn size(&self) -> usize {
        self.size
    }

    fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    fn symbol(&self, idx: usize) -> u8 {
        let mut position = idx;
        let mut node_index = 0usize;
        let mut symbol = 0u8;

        for level in 0..self.alphabet_bits as usize {
            let bv = &self.nodes[level][node_index];
            let bit = bv.get(position) as u8;
            symbol |= bit << (self.alphabet_bits as usize - 1 - level);

            let ones_before = bv.rank1(position);
            position = if bit == 1 { ones_before } else { position - ones_before };
            node_index = node_index * 2 + bit as usize;
        }

        symbol
    }

    fn rank(&self, symbol: u8, idx: usize) -> usize {
        let mut position = idx;
        let mut node_index = 0usize;

        for level in 0..self.alphabet_bits as usize {
            let bit_shift = self.alphabet_bits as usize - 1 - level;
            let bit = (symbol >> bit_shift) & 1;

            let bv = &self.nodes[level][node_index];
            let ones_before = bv.rank1(position);

            position = if bit == 1 { ones_before } else { position - ones_before };
            node_index = node_index * 2 + bit as usize;
        }

        position
    }

    /// Descends every node of the tree level by level instead of walking one
    /// root-to-leaf path per symbol, so a node shared by several symbols has
    /// its `rank1` computed once rather than once per descendant leaf.
    fn all_ranks(&self, idx: usize) -> Vec<usize> {
        let mut positions = vec![idx];

        for level in 0..self.alphabet_bits as usize {
            let mut next_positions = Vec::with_capacity(positions.len() * 2);
            for (node_index, &position) in positions.iter().enumerate() {
                let bv = &self.nodes[level][node_index];
                let ones_before = bv.rank1(position);
                next_positions.push(position - ones_before);
                next_positions.push(ones_before);
            }
            positions = next_positions;
        }

        positions.truncate(self.alphabet_size);
        positions
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
