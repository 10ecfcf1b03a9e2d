//! Run-length-encoded (RLE) rank dictionary.
//!
//! Collapses the indexed text into runs of a repeated symbol and stores, per
//! run, the cumulative per-symbol occurrence count of every run before it.
//! The run symbols themselves (the "residual" sequence, one entry per run
//! rather than per text position) are stored in a nested dictionary `R`
//! rather than a raw `Vec<u8>`, so this module's generic parameter can be
//! instantiated with another [`RleRankDictionary`] to get the rRLE variant
//! (run-length-encoding applied again to a residual that is itself
//! runny) spec.md §4.3.7 calls for, with no separate module needed.
//!
//! Grounded on `examples/original_source/.../rankvector/RLE.h`.

use super::{ConstructibleRankDictionary, RankDictionary};
use crate::rank::naive::NaiveRankDictionary;

#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
#[derive(Debug)]
pub struct RleRankDictionary<R: RankDictionary = NaiveRankDictionary> {
    size: usize,
    alphabet_size: usize,
    run_starts: Vec<usize>,
    // cumulative_length[run][symbol] = occurrences of `symbol` in runs strictly before `run`
    cumulative_length: Vec<Vec<usize>>,
    residual: R,
}

impl<R: ConstructibleRankDictionary> RleRankDictionary<R> {
    pub fn construct(text: &[u8], alphabet_size: usize) -> Self {
        assert!(alphabet_size >= 1);

        let mut run_starts = Vec::new();
        let mut run_symbols = Vec::new();
        let mut cumulative_length = Vec::new();
        let mut running = vec![0usize; alphabet_size];

        let mut current_symbol: Option<u8> = None;

        for (position, &symbol) in text.iter().enumerate() {
            if current_symbol != Some(symbol) {
                run_starts.push(position);
                run_symbols.push(symbol);
                cumulative_length.push(running.clone());
                current_symbol = Some(symbol);
            }
            running[symbol as usize] += 1;
        }

        if run_starts.is_empty() {
            run_starts.push(0);
            run_symbols.push(0);
            cumulative_length.push(running.clone());
        }

        let residual = R::construct(&run_symbols, alphabet_size);

        Self {
            size: text.len(),
            alphabet_size,
            run_starts,
            cumulative_length,
            residual,
        }
    }

    fn run_index_containing(&self, idx: usize) -> usize {
        self.run_starts.partition_point(|&start| start <= idx) - 1
    }
}

impl<R: ConstructibleRankDictionary> super::ConstructibleRankDictionary for RleRankDictionary<R> {
    fn construct(text: &[u8], alphabet_size: usize) -> Self {
        RleRankDictionary::construct(text, alphabet_size)
    }
}

impl<R: RankDictionary> RankDictionary for RleRankDictionary<R> {
    fn size(&self) -> usize {
        self.size
    }

    fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    fn symbol(&self, idx: usize) -> u8 {
        let r = self.run_index_containing(idx);
        self.residual.symbol(r)
    }

    fn rank(&self, symbol: u8, idx: usize) -> usize {
        if idx == 0 {
            return 0;
        }

        let r = self.run_index_containing(idx);
        let base = self.cumulative_length[r][symbol as usize];
        let run_symbol = self.residual.symbol(r);
        let partial = if run_symbol == symbol {
            idx - self.run_starts[r]
        } else {
            0
        };
        base + partial
    }

    fn all_ranks(&self, idx: usize) -> Vec<usize> {
        if idx == 0 {
            return vec![0; self.alphabet_size];
        }

        let r = self.run_index_containing(idx);
        let run_symbol = self.residual.symbol(r) as usize;
        let run_start = self.run_starts[r];
        let base = &self.cumulative_length[r];

        (0..self.alphabet_size)
            .map(|s| base[s] + if s == run_symbol { idx - run_start } else { 0 })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::test_support::assert_matches_naive;

    #[test]
    fn matches_naive_oracle_on_runny_text() {
        let text = [0u8, 0, 0, 1, 1, 2, 2, 2, 2, 0, 3, 3];
        let dict = RleRankDictionary::<NaiveRankDictionary>::construct(&text, 4);
        assert_matches_naive(&dict, &text, 4);
    }

    #[test]
    fn matches_naive_oracle_single_run() {
        let text = [2u8; 20];
        let dict = RleRankDictionary::<NaiveRankDictionary>::construct(&text, 4);
        assert_matches_naive(&dict, &text, 4);
    }

    #[test]
    fn nested_rle_over_rle_residual_matches_naive_oracle() {
        // rRLE: run-length-encode a residual that is itself runny.
        let text = [0u8, 0, 0, 1, 1, 2, 2, 2, 2, 0, 3, 3, 3, 3, 3, 1, 1];
        let dict = RleRankDictionary::<RleRankDictionary<NaiveRankDictionary>>::construct(&text, 4);
        assert_matches_naive(&dict, &text, 4);
    }

    #[test]
    fn matches_naive_oracle_single_position() {
        let text = [1u8];
        let dict = RleRankDictionary::<NaiveRankDictionary>::construct(&text, 2);
        assert_matches_naive(&dict, &text, 2);
    }
}
