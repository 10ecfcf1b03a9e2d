//! Cursors: the BWT-interval handle search drivers walk.
//!
//! A cursor tracks a half-open row interval plus how many symbols have been
//! searched so far. The three-state machine is derived rather than stored
//! explicitly: `query_len == 0` is `Empty`, otherwise the interval being
//! non-empty or empty distinguishes `NonemptyMatch` from `NonemptyNomatch`.
//! Extending an already-exhausted cursor is a no-op on the interval (an
//! empty `[s, s)` stays `[s, s)` through another LF step), which gives the
//! "extending an exhausted cursor stays exhausted" rule for free.
//!
//! Grounded on genedex's `Cursor`/`batch_computed_cursors.rs` (the
//! `all_ranks_and_prefix_ranks`-fused multi-child extension is exactly its
//! "one read for all σ children" idea) and
//! `examples/original_source/.../fmindex/checkBiFMIndex.cpp` for the
//! bidirectional extension formula genedex itself never needed.

use std::ops::Range;

use crate::fmindex::{BiFmIndex, FmIndex, Hit};
use crate::rank::RankDictionary;

/// The three states a cursor's search can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// No symbols have been searched yet; the interval spans the whole text.
    Empty,
    /// At least one symbol searched, and at least one occurrence remains.
    NonemptyMatch,
    /// At least one symbol searched, but the interval is empty.
    NonemptyNomatch,
}

/// A cursor into a unidirectional [`FmIndex`].
///
/// Repeatedly calling [`extend_left`](Cursor::extend_left) corresponds to a
/// standard backward search.
#[derive(Clone, Copy)]
pub struct Cursor<'a, D> {
    pub(crate) index: &'a FmIndex<D>,
    pub(crate) interval: Range<usize>,
    pub(crate) query_len: usize,
}

impl<'a, D: RankDictionary> Cursor<'a, D> {
    pub(crate) fn new_empty(index: &'a FmIndex<D>) -> Self {
        Cursor {
            index,
            interval: 0..index.total_text_len(),
            query_len: 0,
        }
    }

    pub fn state(&self) -> CursorState {
        if self.query_len == 0 {
            CursorState::Empty
        } else if self.interval.start < self.interval.end {
            CursorState::NonemptyMatch
        } else {
            CursorState::NonemptyNomatch
        }
    }

    /// Number of occurrences of the currently searched query. `O(1)`.
    pub fn count(&self) -> usize {
        self.interval.end - self.interval.start
    }

    pub fn interval(&self) -> Range<usize> {
        self.interval.clone()
    }

    /// Prepends `symbol` (an IO byte, e.g. `b'A'`) to the searched query.
    ///
    /// `O(1)`: one rank query at each end of the interval.
    pub fn extend_left(&self, symbol: u8) -> Self {
        let dense = self.index.alphabet().io_to_dense_representation(symbol);
        self.extend_left_dense(dense)
    }

    pub(crate) fn extend_left_dense(&self, dense_symbol: u8) -> Self {
        let interval = self.index.extend_interval(&self.interval, dense_symbol);
        Cursor {
            index: self.index,
            interval,
            query_len: self.query_len + 1,
        }
    }

    /// One child cursor per dense symbol of the alphabet (sentinel
    /// included), computed from a single `all_ranks_and_prefix_ranks` call
    /// at each end of the interval so all σ children share one pair of
    /// cache-line reads. Indexed by dense symbol code, for use by search
    /// drivers that already operate in dense space.
    pub fn extend_left_all(&self) -> Vec<Self> {
        self.index
            .extend_interval_all(&self.interval)
            .into_iter()
            .map(|interval| Cursor {
                index: self.index,
                interval,
                query_len: self.query_len + 1,
            })
            .collect()
    }

    /// Occurrences of the currently searched query, as `(sequence_id,
    /// offset)` pairs. Each yielded hit costs on average `rate / 2` LF
    /// steps, where `rate` is the index's suffix-array sampling rate.
    pub fn locate(&self) -> impl Iterator<Item = Hit> + '_ {
        self.index.locate_interval(self.interval.clone())
    }
}

/// A cursor into a [`BiFmIndex`], extendable from either end of the
/// searched query.
///
/// Holds a forward interval (over the forward BWT) and a reverse interval
/// (over the reverse BWT) that are kept in lockstep: extending either side
/// updates both, per spec.md §4.5.
#[derive(Clone, Copy)]
pub struct BiCursor<'a, D> {
    pub(crate) index: &'a BiFmIndex<D>,
    pub(crate) forward: Range<usize>,
    pub(crate) reverse: Range<usize>,
    pub(crate) query_len: usize,
}

impl<'a, D: RankDictionary> BiCursor<'a, D> {
    pub(crate) fn new_empty(index: &'a BiFmIndex<D>) -> Self {
        let n = index.total_text_len();
        BiCursor {
            index,
            forward: 0..n,
            reverse: 0..n,
            query_len: 0,
        }
    }

    pub fn state(&self) -> CursorState {
        if self.query_len == 0 {
            CursorState::Empty
        } else if self.forward.start < self.forward.end {
            CursorState::NonemptyMatch
        } else {
            CursorState::NonemptyNomatch
        }
    }

    pub fn count(&self) -> usize {
        self.forward.end - self.forward.start
    }

    pub fn forward_interval(&self) -> Range<usize> {
        self.forward.clone()
    }

    pub fn reverse_interval(&self) -> Range<usize> {
        self.reverse.clone()
    }

    /// Prepends `symbol` (an IO byte) to the query (extends the match
    /// towards the text's start), updating both the forward and the
    /// reverse interval.
    pub fn extend_left(&self, symbol: u8) -> Self {
        let dense = self.index.alphabet().io_to_dense_representation(symbol);
        self.extend_left_dense(dense)
    }

    pub(crate) fn extend_left_dense(&self, dense_symbol: u8) -> Self {
        let (forward, reverse) = self.index.extend_bidirectional(
            &self.forward,
            &self.reverse,
            dense_symbol,
            Side::Left,
        );
        BiCursor {
            index: self.index,
            forward,
            reverse,
            query_len: self.query_len + 1,
        }
    }

    /// Appends `symbol` (an IO byte) to the query (extends the match
    /// towards the text's end), updating both the forward and the reverse
    /// interval.
    pub fn extend_right(&self, symbol: u8) -> Self {
        let dense = self.index.alphabet().io_to_dense_representation(symbol);
        self.extend_right_dense(dense)
    }

    pub(crate) fn extend_right_dense(&self, dense_symbol: u8) -> Self {
        let (forward, reverse) = self.index.extend_bidirectional(
            &self.forward,
            &self.reverse,
            dense_symbol,
            Side::Right,
        );
        BiCursor {
            index: self.index,
            forward,
            reverse,
            query_len: self.query_len + 1,
        }
    }

    pub fn extend_left_all(&self) -> Vec<Self> {
        self.index
            .extend_bidirectional_all(&self.forward, &self.reverse, Side::Left)
            .into_iter()
            .map(|(forward, reverse)| BiCursor {
                index: self.index,
                forward,
                reverse,
                query_len: self.query_len + 1,
            })
            .collect()
    }

    pub fn extend_right_all(&self) -> Vec<Self> {
        self.index
            .extend_bidirectional_all(&self.forward, &self.reverse, Side::Right)
            .into_iter()
            .map(|(forward, reverse)| BiCursor {
                index: self.index,
                forward,
                reverse,
                query_len: self.query_len + 1,
            })
            .collect()
    }

    pub fn locate(&self) -> impl Iterator<Item = Hit> + '_ {
        self.index.locate_forward_interval(self.forward.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet;
    use crate::config::FmIndexConfig;
    use crate::rank::naive::NaiveRankDictionary;

    #[test]
    fn empty_cursor_state_and_interval() {
        let alph = alphabet::ascii_dna();
        let index = FmIndexConfig::<NaiveRankDictionary>::new()
            .construct_index([b"ACGT".as_slice()], alph);
        let cursor = index.cursor_empty();
        assert_eq!(cursor.state(), CursorState::Empty);
        assert_eq!(cursor.count(), 5); // 4 symbols + sentinel
    }

    #[test]
    fn extending_to_no_match_yields_nonempty_nomatch_and_stays_exhausted() {
        let alph = alphabet::ascii_dna();
        let index = FmIndexConfig::<NaiveRankDictionary>::new()
            .construct_index([b"ACGT".as_slice()], alph);

        let cursor = index.cursor_empty();

        // "CA" does not occur in "ACGT"
        let cursor = cursor.extend_left(b'A');
        let cursor = cursor.extend_left(b'C');
        assert_eq!(cursor.state(), CursorState::NonemptyNomatch);
        assert_eq!(cursor.count(), 0);

        let still_exhausted = cursor.extend_left(b'C');
        assert_eq!(still_exhausted.state(), CursorState::NonemptyNomatch);
        assert_eq!(still_exhausted.count(), 0);
    }
}
