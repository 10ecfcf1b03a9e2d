//! Reference rank dictionary: one cumulative-count column per symbol, no
//! block structure at all. O(1) query time but O(sigma * n) space, so this
//! is a correctness oracle for tests and a fallback for tiny indices, never
//! the default. Generalized from genedex's `naive_occurrence_table.rs` /
//! `occurrence_table.rs`, which hard-code the column-per-symbol layout but
//! not behind a shared trait.

use super::RankDictionary;

#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
#[derive(Debug)]
pub struct NaiveRankDictionary {
    // columns[symbol][idx] = occurrences of `symbol` in text[0..idx]
    columns: Vec<Vec<usize>>,
    alphabet_size: usize,
}

impl NaiveRankDictionary {
    pub fn construct(text: &[u8], alphabet_size: usize) -> Self {
        assert!(alphabet_size >= 1);

        let mut columns = vec![Vec::with_capacity(text.len() + 1); alphabet_size];
        for column in &mut columns {
            column.push(0);
        }

        let mut counts = vec![0usize; alphabet_size];
        for &symbol in text {
            counts[symbol as usize] += 1;
            for (symbol_index, column) in columns.iter_mut().enumerate() {
                column.push(counts[symbol_index]);
            }
        }

        Self {
            columns,
            alphabet_size,
        }
    }
}

impl super::ConstructibleRankDictionary for NaiveRankDictionary {
    fn construct(text: &[u8], alphabet_size: usize) -> Self {
        NaiveRankDictionary::construct(text, alphabet_size)
    }
}

impl RankDictionary for NaiveRankDictionary {
    fn size(&self) -> usize {
        self.columns[0].len() - 1
    }

    fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    fn symbol(&self, idx: usize) -> u8 {
        for (symbol, column) in self.columns.iter().enumerate() {
            if column[idx] < column[idx + 1] {
                return symbol as u8;
            }
        }
        unreachable!("every indexed position must belong to exactly one symbol")
    }

    fn rank(&self, symbol: u8, idx: usize) -> usize {
        self.columns[symbol as usize][idx]
    }

    fn all_ranks(&self, idx: usize) -> Vec<usize> {
        self.columns.iter().map(|column| column[idx]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_hand_counted_ranks() {
        // dense codes: 0=sentinel-like 'a', 1='b', 2='c'
        let text = [1u8, 2, 1, 0, 2, 2, 1];
        let dict = NaiveRankDictionary::construct(&text, 3);

        assert_eq!(dict.rank(1, 0), 0);
        assert_eq!(dict.rank(1, 7), 3);
        assert_eq!(dict.rank(2, 7), 3);
        assert_eq!(dict.rank(0, 7), 1);
        assert_eq!(dict.prefix_rank(2, 7), dict.rank(0, 7) + dict.rank(1, 7));
    }

    #[test]
    fn symbol_recovers_original_text() {
        let text = [0u8, 1, 2, 2, 1, 0, 0];
        let dict = NaiveRankDictionary::construct(&text, 3);
        for (idx, &s) in text.iter().enumerate() {
            assert_eq!(dict.symbol(idx), s);
        }
    }
}
