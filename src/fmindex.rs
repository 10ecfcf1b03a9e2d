//! The FM-index family: [`FmIndex`] (forward), [`RevFmIndex`] (built over
//! each sequence reversed), and [`BiFmIndex`] (forward + reverse rank
//! dictionaries sharing one compressed suffix array).
//!
//! Grounded on genedex's `FmIndex`/`lib.rs` for the forward construction and
//! LF/locate machinery, and on
//! `examples/original_source/.../fmindex/checkBiFMIndex.cpp` /
//! `checkMerge.cpp` for the bidirectional extension formula and the merge
//! contract genedex does not have.

use std::ops::{Deref, Range};

use crate::alphabet::Alphabet;
use crate::config::{FmIndexConfig, SuffixArrayStorage};
use crate::construction::{self, BuiltText};
use crate::cursor::{BiCursor, Cursor, Side};
use crate::csa::SampledSuffixArray;
use crate::error::BuildError;
use crate::rank::{ConstructibleRankDictionary, RankDictionary};
use crate::text_id_search_tree::TextIdSearchTree;

/// An occurrence of a searched query in the set of indexed sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hit {
    pub sequence_id: usize,
    pub position: usize,
}

fn build_dispatch<T: AsRef<[u8]>>(
    texts: impl IntoIterator<Item = T>,
    alphabet: &Alphabet,
    storage: SuffixArrayStorage,
) -> Result<BuiltText, BuildError> {
    match storage {
        SuffixArrayStorage::I32 => construction::build::<i32, _>(texts, alphabet),
        SuffixArrayStorage::U32 => construction::build::<u32, _>(texts, alphabet),
        SuffixArrayStorage::I64 => construction::build::<i64, _>(texts, alphabet),
    }
}

/// A forward FM-index over a set of sequences.
#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
pub struct FmIndex<D> {
    pub(crate) alphabet: Alphabet,
    pub(crate) count: Vec<usize>,
    pub(crate) dict: D,
    pub(crate) suffix_array: SampledSuffixArray,
    pub(crate) text_ids: TextIdSearchTree,
}

impl<D: ConstructibleRankDictionary> FmIndex<D> {
    pub(crate) fn new<T: AsRef<[u8]>>(
        texts: impl IntoIterator<Item = T>,
        alphabet: Alphabet,
        config: &FmIndexConfig<D>,
    ) -> Result<Self, BuildError> {
        let built = build_dispatch(texts, &alphabet, config.suffix_array_storage)?;

        let dict = D::construct(&built.bwt, alphabet.num_dense_symbols());
        let suffix_array = SampledSuffixArray::construct(
            &built.suffix_array,
            config.suffix_array_sampling_rate,
            config.sampling_policy,
            built.text_border_lookup,
        );
        let text_ids = TextIdSearchTree::new_from_sentinel_indices(built.sentinel_indices);

        Ok(FmIndex {
            alphabet,
            count: built.count,
            dict,
            suffix_array,
            text_ids,
        })
    }

    /// Merges `self` and `other` (which must share the same alphabet) into
    /// a new index whose occurrences are exactly the union of both inputs'.
    ///
    /// Implemented by recovering each input's original sequences (via the
    /// same LF-walk-from-every-row technique `locate` relies on) and
    /// re-running construction over their concatenation, rather than the
    /// classical linear-time BWT-interleaving merge algorithm — see
    /// DESIGN.md for why this simplification still satisfies the union
    /// postcondition.
    pub fn merge(&self, other: &Self) -> Result<Self, BuildError> {
        let mut sequences = self.recover_sequences();
        sequences.extend(other.recover_sequences());

        let config = FmIndexConfig::new()
            .suffix_array_sampling_rate(self.suffix_array.sampling_rate());
        FmIndex::new(sequences, self.alphabet.clone(), &config)
    }

    fn recover_sequences(&self) -> Vec<Vec<u8>> {
        let sentinel_indices = &self.text_ids.sentinel_indices;
        let mut sequences: Vec<Vec<u8>> = sentinel_indices
            .iter()
            .enumerate()
            .map(|(i, &sentinel)| {
                let start = if i == 0 { 0 } else { sentinel_indices[i - 1] + 1 };
                vec![0u8; sentinel - start]
            })
            .collect();

        for row in 0..self.size() {
            let symbol = self.dict.symbol(row);
            if symbol == 0 {
                continue;
            }
            let (sequence_id, offset) = self.locate_single(row);
            if offset > 0 {
                sequences[sequence_id][offset - 1] = self.alphabet.dense_to_io_byte(symbol);
            }
        }

        sequences
    }

    /// Total length of all indexed text, including one sentinel per
    /// sequence.
    pub fn size(&self) -> usize {
        self.dict.size()
    }

    pub fn total_text_len(&self) -> usize {
        self.dict.size()
    }

    /// Number of indexed sequences.
    pub fn num_sequences(&self) -> usize {
        self.text_ids.sentinel_indices.len()
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Number of occurrences of `query` in the set of indexed sequences.
    pub fn count(&self, query: &[u8]) -> usize {
        self.cursor_for_query(query).count()
    }

    /// Occurrences of `query`, as `(sequence_id, offset)` pairs.
    pub fn locate(&self, query: &[u8]) -> impl Iterator<Item = Hit> + '_ {
        let cursor = self.cursor_for_query(query);
        self.locate_interval(cursor.interval())
    }

    pub fn cursor_empty(&self) -> Cursor<'_, D> {
        Cursor::new_empty(self)
    }

    pub fn cursor_for_query(&self, query: &[u8]) -> Cursor<'_, D> {
        let mut cursor = self.cursor_empty();
        for &byte in query.iter().rev() {
            if cursor.count() == 0 && cursor.state() != crate::cursor::CursorState::Empty {
                break;
            }
            cursor = cursor.extend_left(byte);
        }
        cursor
    }

    pub(crate) fn locate_interval(&self, interval: Range<usize>) -> impl Iterator<Item = Hit> + '_ {
        interval.map(move |row| {
            let (sequence_id, position) = self.locate_single(row);
            Hit {
                sequence_id,
                position,
            }
        })
    }

    fn locate_single(&self, row: usize) -> (usize, usize) {
        let sa_value = self.recover_suffix_array_value(row);
        self.text_ids
            .backtransform_concatenated_text_index(sa_value as usize)
    }

    fn recover_suffix_array_value(&self, row: usize) -> u64 {
        let mut idx = row;
        let mut steps = 0u64;
        loop {
            if self.suffix_array.has_value(idx) {
                return self.suffix_array.value(idx) + steps;
            }
            if let Some(border) = self.suffix_array.text_border_offset(idx) {
                return border + steps;
            }
            idx = self.single_locate_step(idx);
            steps += 1;
        }
    }

    /// Exposes one LF step, for callers that want to drive the LF-walk
    /// themselves rather than through [`Self::locate`].
    pub fn single_locate_step(&self, idx: usize) -> usize {
        let symbol = self.dict.symbol(idx);
        self.count[symbol as usize] + self.dict.rank(symbol, idx)
    }

    pub(crate) fn extend_interval(&self, interval: &Range<usize>, symbol: u8) -> Range<usize> {
        if interval.start == interval.end {
            return interval.clone();
        }

        let start = self.count[symbol as usize] + self.dict.rank(symbol, interval.start);
        let end = self.count[symbol as usize] + self.dict.rank(symbol, interval.end);
        start..end
    }

    pub(crate) fn extend_interval_all(&self, interval: &Range<usize>) -> Vec<Range<usize>> {
        if interval.start == interval.end {
            return (0..self.alphabet.num_dense_symbols())
                .map(|_| interval.clone())
                .collect();
        }

        let start_ranks = self.dict.all_ranks(interval.start);
        let end_ranks = self.dict.all_ranks(interval.end);

        start_ranks
            .into_iter()
            .zip(end_ranks)
            .enumerate()
            .map(|(symbol, (start_rank, end_rank))| {
                let base = self.count[symbol];
                (base + start_rank)..(base + end_rank)
            })
            .collect()
    }
}

/// An FM-index built over each sequence individually reversed.
///
/// `locate` returns positions expressed in the *reversed* sequence, as
/// spec.md's reverse-equivalence seed scenario requires.
#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
pub struct RevFmIndex<D>(FmIndex<D>);

impl<D: ConstructibleRankDictionary> RevFmIndex<D> {
    pub(crate) fn new<T: AsRef<[u8]>>(
        texts: impl IntoIterator<Item = T>,
        alphabet: Alphabet,
        config: &FmIndexConfig<D>,
    ) -> Result<Self, BuildError> {
        let reversed: Vec<Vec<u8>> = texts
            .into_iter()
            .map(|t| t.as_ref().iter().rev().copied().collect())
            .collect();
        FmIndex::new(reversed, alphabet, config).map(RevFmIndex)
    }
}

impl<D> Deref for RevFmIndex<D> {
    type Target = FmIndex<D>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A bidirectional FM-index: a forward and a reverse rank dictionary
/// sharing one compressed suffix array, extendable from either end of the
/// searched query.
#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
pub struct BiFmIndex<D> {
    pub(crate) alphabet: Alphabet,
    pub(crate) count: Vec<usize>,
    pub(crate) forward_dict: D,
    pub(crate) reverse_dict: D,
    pub(crate) suffix_array: SampledSuffixArray,
    pub(crate) text_ids: TextIdSearchTree,
}

impl<D: ConstructibleRankDictionary> BiFmIndex<D> {
    pub(crate) fn new<T: AsRef<[u8]>>(
        texts: impl IntoIterator<Item = T>,
        alphabet: Alphabet,
        config: &FmIndexConfig<D>,
    ) -> Result<Self, BuildError> {
        let owned_texts: Vec<Vec<u8>> = texts.into_iter().map(|t| t.as_ref().to_vec()).collect();
        let reversed: Vec<Vec<u8>> = owned_texts
            .iter()
            .map(|t| t.iter().rev().copied().collect())
            .collect();

        let forward_built =
            build_dispatch(owned_texts.iter().map(Vec::as_slice), &alphabet, config.suffix_array_storage)?;
        let reverse_built =
            build_dispatch(reversed.iter().map(Vec::as_slice), &alphabet, config.suffix_array_storage)?;

        let forward_dict = D::construct(&forward_built.bwt, alphabet.num_dense_symbols());
        let reverse_dict = D::construct(&reverse_built.bwt, alphabet.num_dense_symbols());

        let suffix_array = SampledSuffixArray::construct(
            &forward_built.suffix_array,
            config.suffix_array_sampling_rate,
            config.sampling_policy,
            forward_built.text_border_lookup,
        );
        let text_ids = TextIdSearchTree::new_from_sentinel_indices(forward_built.sentinel_indices);

        Ok(BiFmIndex {
            alphabet,
            count: forward_built.count,
            forward_dict,
            reverse_dict,
            suffix_array,
            text_ids,
        })
    }

    pub fn size(&self) -> usize {
        self.forward_dict.size()
    }

    pub fn total_text_len(&self) -> usize {
        self.forward_dict.size()
    }

    pub fn num_sequences(&self) -> usize {
        self.text_ids.sentinel_indices.len()
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn count(&self, query: &[u8]) -> usize {
        self.cursor_for_query(query).count()
    }

    pub fn locate(&self, query: &[u8]) -> impl Iterator<Item = Hit> + '_ {
        let cursor = self.cursor_for_query(query);
        self.locate_forward_interval(cursor.forward_interval())
    }

    pub fn cursor_empty(&self) -> BiCursor<'_, D> {
        BiCursor::new_empty(self)
    }

    /// Equivalent to `cursor_empty().extend_left(...)` repeated
    /// right-to-left: the natural unidirectional backward-search order.
    pub fn cursor_for_query(&self, query: &[u8]) -> BiCursor<'_, D> {
        let mut cursor = self.cursor_empty();
        for &byte in query.iter().rev() {
            cursor = cursor.extend_left(byte);
            if cursor.count() == 0 {
                break;
            }
        }
        cursor
    }

    pub(crate) fn locate_forward_interval(
        &self,
        interval: Range<usize>,
    ) -> impl Iterator<Item = Hit> + '_ {
        interval.map(move |row| {
            let (sequence_id, position) = self.locate_single(row);
            Hit {
                sequence_id,
                position,
            }
        })
    }

    fn locate_single(&self, row: usize) -> (usize, usize) {
        let mut idx = row;
        let mut steps = 0u64;
        let sa_value = loop {
            if self.suffix_array.has_value(idx) {
                break self.suffix_array.value(idx) + steps;
            }
            if let Some(border) = self.suffix_array.text_border_offset(idx) {
                break border + steps;
            }
            let symbol = self.forward_dict.symbol(idx);
            idx = self.count[symbol as usize] + self.forward_dict.rank(symbol, idx);
            steps += 1;
        };
        self.text_ids
            .backtransform_concatenated_text_index(sa_value as usize)
    }

    /// Updates both the forward and reverse interval for prepending
    /// (`Side::Left`) or appending (`Side::Right`) `symbol` to the query.
    ///
    /// Backward-search step on one side's dictionary plus a "how many
    /// smaller symbols occurred in this interval" offset (computed from the
    /// *other* side's prefix ranks) to shrink the paired interval in
    /// lockstep — the standard bidirectional FM-index extension.
    pub(crate) fn extend_bidirectional(
        &self,
        forward: &Range<usize>,
        reverse: &Range<usize>,
        symbol: u8,
        side: Side,
    ) -> (Range<usize>, Range<usize>) {
        if forward.start == forward.end {
            return (forward.clone(), reverse.clone());
        }

        match side {
            Side::Left => {
                let (smaller_start, smaller_end) = (
                    self.forward_dict.prefix_rank(symbol, forward.start),
                    self.forward_dict.prefix_rank(symbol, forward.end),
                );
                let new_start = self.count[symbol as usize] + self.forward_dict.rank(symbol, forward.start);
                let new_end = self.count[symbol as usize] + self.forward_dict.rank(symbol, forward.end);

                let new_reverse_start = reverse.start + (smaller_end - smaller_start);
                let new_reverse_end = new_reverse_start + (new_end - new_start);

                (new_start..new_end, new_reverse_start..new_reverse_end)
            }
            Side::Right => {
                let (smaller_start, smaller_end) = (
                    self.reverse_dict.prefix_rank(symbol, reverse.start),
                    self.reverse_dict.prefix_rank(symbol, reverse.end),
                );
                let new_reverse_start =
                    self.count[symbol as usize] + self.reverse_dict.rank(symbol, reverse.start);
                let new_reverse_end =
                    self.count[symbol as usize] + self.reverse_dict.rank(symbol, reverse.end);

                let new_start = forward.start + (smaller_end - smaller_start);
                let new_end = new_start + (new_reverse_end - new_reverse_start);

                (new_start..new_end, new_reverse_start..new_reverse_end)
            }
        }
    }

    pub(crate) fn extend_bidirectional_all(
        &self,
        forward: &Range<usize>,
        reverse: &Range<usize>,
        side: Side,
    ) -> Vec<(Range<usize>, Range<usize>)> {
        if forward.start == forward.end {
            return (0..self.alphabet.num_dense_symbols())
                .map(|_| (forward.clone(), reverse.clone()))
                .collect();
        }

        match side {
            Side::Left => {
                let (start_ranks, start_prefix) =
                    self.forward_dict.all_ranks_and_prefix_ranks(forward.start);
                let (end_ranks, end_prefix) =
                    self.forward_dict.all_ranks_and_prefix_ranks(forward.end);

                (0..self.alphabet.num_dense_symbols())
                    .map(|symbol| {
                        let base = self.count[symbol];
                        let new_start = base + start_ranks[symbol];
                        let new_end = base + end_ranks[symbol];
                        let smaller = end_prefix[symbol] - start_prefix[symbol];
                        let new_reverse_start = reverse.start + smaller;
                        let new_reverse_end = new_reverse_start + (new_end - new_start);
                        (new_start..new_end, new_reverse_start..new_reverse_end)
                    })
                    .collect()
            }
            Side::Right => {
                let (start_ranks, start_prefix) =
                    self.reverse_dict.all_ranks_and_prefix_ranks(reverse.start);
                let (end_ranks, end_prefix) =
                    self.reverse_dict.all_ranks_and_prefix_ranks(reverse.end);

                (0..self.alphabet.num_dense_symbols())
                    .map(|symbol| {
                        let base = self.count[symbol];
                        let new_reverse_start = base + start_ranks[symbol];
                        let new_reverse_end = base + end_ranks[symbol];
                        let smaller = end_prefix[symbol] - start_prefix[symbol];
                        let new_start = forward.start + smaller;
                        let new_end = new_start + (new_reverse_end - new_reverse_start);
                        (new_start..new_end, new_reverse_start..new_reverse_end)
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet;
    use crate::rank::naive::NaiveRankDictionary;

    fn dna_index(text: &'static [u8]) -> FmIndex<NaiveRankDictionary> {
        FmIndexConfig::<NaiveRankDictionary>::new().construct_index([text], alphabet::ascii_dna())
    }

    #[test]
    fn empty_query_covers_whole_text_including_sentinel() {
        let index = FmIndexConfig::<NaiveRankDictionary>::new()
            .construct_index([b"Hallo Welt".as_slice()], alphabet::bytes());
        let cursor = index.cursor_empty();
        assert_eq!(cursor.interval(), 0..11);
    }

    #[test]
    fn single_character_query_count_and_positions() {
        let index = FmIndexConfig::<NaiveRankDictionary>::new()
            .construct_index([b"Hallo Welt".as_slice()], alphabet::bytes());
        let cursor = index.cursor_empty().extend_left(b'l');
        assert_eq!(cursor.count(), 3);

        let mut positions: Vec<_> = cursor.locate().map(|hit| hit.position).collect();
        positions.sort_unstable();
        assert_eq!(positions, vec![2, 3, 8]);
    }

    #[test]
    fn count_and_locate_agree_for_repeated_pattern() {
        let index = dna_index(b"ACGTACGTACGT");
        assert_eq!(index.count(b"ACGT"), 3);

        let mut positions: Vec<_> = index.locate(b"ACGT").map(|h| h.position).collect();
        positions.sort_unstable();
        assert_eq!(positions, vec![0, 4, 8]);
    }

    #[test]
    fn merge_of_disjoint_indices_returns_union_of_occurrences() {
        let a = dna_index(b"AAACAAAABAAA");
        let b = FmIndexConfig::<NaiveRankDictionary>::new()
            .construct_index([b"AAABAAAACAAA".as_slice()], alphabet::ascii_dna());

        let merged = a.merge(&b).unwrap();
        assert_eq!(merged.num_sequences(), 2);
        assert_eq!(merged.count(b"AAAA"), a.count(b"AAAA") + b.count(b"AAAA"));
    }

    #[test]
    fn reverse_index_locates_in_reversed_coordinates() {
        let index = RevFmIndex::<NaiveRankDictionary>::new(
            [b"Hallo Welt".as_slice()],
            alphabet::bytes(),
            &FmIndexConfig::new(),
        )
        .unwrap();

        let mut positions: Vec<_> = index.cursor_empty().locate().map(|h| h.position).collect();
        positions.sort_unstable();
        assert_eq!(positions, (0..11).collect::<Vec<_>>());
    }

    #[test]
    fn bidirectional_forward_count_matches_unidirectional() {
        let bi = BiFmIndex::<NaiveRankDictionary>::new(
            [b"ACGTACGTACGT".as_slice()],
            alphabet::ascii_dna(),
            &FmIndexConfig::new(),
        )
        .unwrap();

        assert_eq!(bi.count(b"ACGT"), 3);
    }

    #[test]
    fn bidirectional_forward_count_equals_reverse_count_of_reversed_word() {
        let bi = BiFmIndex::<NaiveRankDictionary>::new(
            [b"ACGTACGTACGT".as_slice()],
            alphabet::ascii_dna(),
            &FmIndexConfig::new(),
        )
        .unwrap();

        let mut cursor = bi.cursor_empty();
        for &byte in b"ACGT" {
            cursor = cursor.extend_left(byte);
        }
        let forward_count = cursor.count();

        let mut cursor = bi.cursor_empty();
        for &byte in b"TGCA" {
            cursor = cursor.extend_right(byte);
        }
        let reverse_count = cursor.count();

        assert_eq!(forward_count, reverse_count);
    }
}
