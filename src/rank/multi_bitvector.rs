//! Multi-bitvector rank dictionary: one [`BitVector`] per symbol, each
//! marking the positions where that symbol occurs. Straightforward and easy
//! to reason about; `rank` is one bit-vector rank lookup, but `symbol` and
//! `all_ranks` cost O(sigma). Grounded on
//! `examples/original_source/.../rankvector/MultiBitvector.h`.

use crate::bitvector::{BitVector, RankBitVector};

use super::RankDictionary;

#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
#[derive(Debug)]
pub struct MultiBitvectorRankDictionary {
    size: usize,
    alphabet_size: usize,
    per_symbol: Vec<BitVector>,
}

impl MultiBitvectorRankDictionary {
    pub fn construct(text: &[u8], alphabet_size: usize) -> Self {
        assert!(alphabet_size >= 1);

        let per_symbol = (0..alphabet_size as u8)
            .map(|symbol| BitVector::from_fn(text.len(), |i| text[i] == symbol))
            .collect();

        Self {
            size: text.len(),
            alphabet_size,
            per_symbol,
        }
    }
}

impl super::ConstructibleRankDictionary for MultiBitvectorRankDictionary {
    fn construct(text: &[u8], alphabet_size: usize) -> Self {
        MultiBitvectorRankDictionary::construct(text, alphabet_size)
    }
}

impl RankDictionary for MultiBitvectorRankDictionary {
    fn size(&self) -> usize {
        self.size
    }

    fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    fn symbol(&self, idx: usize) -> u8 {
        for (symbol, bv) in self.per_symbol.iter().enumerate() {
            if bv.get(idx) {
                return symbol as u8;
            }
        }
        unreachable!("every indexed position must belong to exactly one symbol")
    }

    fn rank(&self, symbol: u8, idx: usize) -> usize {
        self.per_symbol[symbol as usize].rank1(idx)
    }

    fn all_ranks(&self, idx: usize) -> Vec<usize> {
        self.per_symbol.iter().map(|bv| bv.rank1(idx)).collect()
    }

    fn prefetch(&self, idx: usize) {
        for bv in &self.per_symbol {
            bv.prefetch(idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::test_support::assert_matches_naive;

    #[test]
    fn matches_naive_oracle() {
        let text = [0u8, 1, 2, 3, 1, 1, 0, 2, 3, 3, 0, 1, 2];
        let dict = MultiBitvectorRankDictionary::construct(&text, 4);
        assert_matches_naive(&dict, &text, 4);
    }

    #[test]
    fn single_symbol_alphabet() {
        let text = [0u8; 10];
        let dict = MultiBitvectorRankDictionary::construct(&text, 1);
        assert_matches_naive(&dict, &text, 1);
    }
}
