//! Rank dictionaries: data structures that answer, for a text over a small
//! dense alphabet, "how many occurrences of symbol `s` are in `text[0..i)`"
//! in O(1) (or close to it), plus the symbol-recovery and prefix-rank queries
//! an FM-index's LF-mapping needs. This is component C3, the engineered core
//! of the crate: several variants below trade construction time, memory, and
//! query latency against each other while sharing one contract.
//!
//! All variants are built once from a finished BWT and are immutable and
//! `Send + Sync` afterwards; there is no interior mutability anywhere in this
//! module.

pub mod epr;
pub mod epr_multilevel;
pub mod interleaved;
pub mod multi_bitvector;
pub mod naive;
pub mod rle;
pub mod wavelet;

/// Common contract for every rank-dictionary variant.
///
/// `size()` dense symbols are indexed, numbered `0..size()`; `symbol` queries
/// are legal for `idx < size()`, rank queries for `idx <= size()`.
pub trait RankDictionary: Send + Sync {
    /// Number of indexed symbols.
    fn size(&self) -> usize;

    /// Alphabet size (number of distinct dense symbols, including any
    /// sentinel), i.e. the exclusive upper bound on `symbol`/`rank`'s `symbol`
    /// argument.
    fn alphabet_size(&self) -> usize;

    /// The symbol stored at `idx`.
    fn symbol(&self, idx: usize) -> u8;

    /// Number of occurrences of `symbol` in the indexed text's `[0, idx)`.
    fn rank(&self, symbol: u8, idx: usize) -> usize;

    /// Number of occurrences of symbols strictly less than `symbol` in
    /// `[0, idx)`. Used directly as the FM-index's C-array contribution for a
    /// partial match.
    fn prefix_rank(&self, symbol: u8, idx: usize) -> usize {
        (0..symbol).map(|s| self.rank(s, idx)).sum()
    }

    /// `rank(s, idx)` for every symbol `s` in one call. Implementations that
    /// can answer all symbols from one cache line override this; the default
    /// falls back to one `rank` call per symbol.
    fn all_ranks(&self, idx: usize) -> Vec<usize> {
        (0..self.alphabet_size() as u8).map(|s| self.rank(s, idx)).collect()
    }

    /// `(all_ranks(idx), [prefix_rank(s, idx) for s])` in one call, since a
    /// bidirectional cursor extension needs both the per-symbol rank and the
    /// cumulative prefix rank for every symbol, and most variants can derive
    /// the prefix ranks from the same data already touched for `all_ranks`.
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

    /// Non-binding prefetch hint for the memory a query at `idx` will touch.
    fn prefetch(&self, _idx: usize) {}
}

/// A [`RankDictionary`] that can be built directly from a dense-symbol text.
///
/// Split out from [`RankDictionary`] itself so [`rle::RleRankDictionary`] can
/// be generic over which dictionary stores its run-symbol residual,
/// including (recursively) another `RleRankDictionary`, which is how nesting
/// produces the "run-length-encoded residual" (rRLE) variant spec.md calls
/// for without a separate module.
pub trait ConstructibleRankDictionary: RankDictionary + Sized {
    fn construct(text: &[u8], alphabet_size: usize) -> Self;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::RankDictionary;

    /// Checks `dict` against a freshly built [`super::naive::NaiveRankDictionary`]
    /// over `text` for every index and every symbol.
    pub(crate) fn assert_matches_naive(dict: &dyn RankDictionary, text: &[u8], alphabet_size: usize) {
        let naive = super::naive::NaiveRankDictionary::construct(text, alphabet_size);

        assert_eq!(dict.size(), naive.size());

        for idx in 0..=text.len() {
            for symbol in 0..alphabet_size as u8 {
                assert_eq!(
                    dict.rank(symbol, idx),
                    naive.rank(symbol, idx),
                    "rank mismatch at symbol={symbol} idx={idx}"
                );
                assert_eq!(
                    dict.prefix_rank(symbol, idx),
                    naive.prefix_rank(symbol, idx),
                    "prefix_rank mismatch at symbol={symbol} idx={idx}"
                );
            }

            let (ranks, prefix) = dict.all_ranks_and_prefix_ranks(idx);
            for symbol in 0..alphabet_size {
                assert_eq!(ranks[symbol], naive.rank(symbol as u8, idx));
                assert_eq!(prefix[symbol], naive.prefix_rank(symbol as u8, idx));
            }
        }

        for (idx, &expected_symbol) in text.iter().enumerate() {
            assert_eq!(dict.symbol(idx), expected_symbol);
        }
    }
}
