//! Builder-style construction entry point (component C4/C5 glue).
//!
//! Adapted from genedex's `FmIndexConfig`: the suffix-array storage width
//! (`i32`/`u32`/`i64`) used to stay a type parameter threaded through the
//! public `FmIndex<I, B>`; here it is only a construction-time detail (the
//! final index always stores its compressed suffix array as `u64`), so it
//! becomes a runtime [`SuffixArrayStorage`] choice instead of a generic
//! parameter. `D` is now the rank dictionary, the only thing the public
//! index types stay generic over.

use crate::alphabet::Alphabet;
use crate::csa::SamplingPolicy;
use crate::error::BuildError;
use crate::fmindex::{BiFmIndex, FmIndex, RevFmIndex};
use crate::rank::ConstructibleRankDictionary;

/// Which integer type backs the suffix array during construction.
///
/// Only affects peak memory usage while building; it has no effect on the
/// finished index, which always stores its sampled suffix array as `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixArrayStorage {
    I32,
    U32,
    I64,
}

/// A builder-like API to configure and construct an FM-index.
#[derive(Clone, Copy)]
pub struct FmIndexConfig<D> {
    pub(crate) suffix_array_sampling_rate: usize,
    pub(crate) sampling_policy: SamplingPolicy,
    pub(crate) suffix_array_storage: SuffixArrayStorage,
    _dict_marker: std::marker::PhantomData<D>,
}

impl<D: ConstructibleRankDictionary> FmIndexConfig<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every entry of the suffix array at a position divisible by `rate` is
    /// retained (for [`SamplingPolicy::SuffixArrayIndex`], the default) or
    /// every entry whose *value* is divisible by `rate` (for
    /// [`SamplingPolicy::TextPosition`]).
    ///
    /// A larger rate reduces memory usage at the cost of higher `locate`
    /// running time. Default is `4`.
    pub fn suffix_array_sampling_rate(self, suffix_array_sampling_rate: usize) -> Self {
        assert!(suffix_array_sampling_rate > 0);

        Self {
            suffix_array_sampling_rate,
            ..self
        }
    }

    pub fn sampling_policy(self, sampling_policy: SamplingPolicy) -> Self {
        Self {
            sampling_policy,
            ..self
        }
    }

    /// The integer width used to store the suffix array during
    /// construction. Default is `I32`; pick `I64` for inputs whose total
    /// length exceeds `i32::MAX`.
    pub fn suffix_array_storage(self, suffix_array_storage: SuffixArrayStorage) -> Self {
        Self {
            suffix_array_storage,
            ..self
        }
    }

    /// Builds a forward [`FmIndex`]. The number of worker threads is
    /// controlled by [`rayon`]'s global pool.
    pub fn construct_index<T: AsRef<[u8]>>(
        &self,
        texts: impl IntoIterator<Item = T>,
        alphabet: Alphabet,
    ) -> FmIndex<D> {
        self.try_construct_index(texts, alphabet)
            .expect("index construction failed")
    }

    pub fn try_construct_index<T: AsRef<[u8]>>(
        &self,
        texts: impl IntoIterator<Item = T>,
        alphabet: Alphabet,
    ) -> Result<FmIndex<D>, BuildError> {
        FmIndex::new(texts, alphabet, self)
    }

    /// Builds a [`RevFmIndex`] over each input sequence reversed.
    pub fn construct_reverse_index<T: AsRef<[u8]>>(
        &self,
        texts: impl IntoIterator<Item = T>,
        alphabet: Alphabet,
    ) -> RevFmIndex<D> {
        RevFmIndex::new(texts, alphabet, self).expect("index construction failed")
    }

    /// Builds a [`BiFmIndex`], extendable from either end of the query.
    pub fn construct_bidirectional_index<T: AsRef<[u8]>>(
        &self,
        texts: impl IntoIterator<Item = T>,
        alphabet: Alphabet,
    ) -> BiFmIndex<D> {
        BiFmIndex::new(texts, alphabet, self).expect("index construction failed")
    }
}

impl<D: ConstructibleRankDictionary> Default for FmIndexConfig<D> {
    fn default() -> Self {
        Self {
            suffix_array_sampling_rate: 4,
            sampling_policy: SamplingPolicy::SuffixArrayIndex,
            suffix_array_storage: SuffixArrayStorage::I32,
            _dict_marker: std::marker::PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_config() {
        let texts = [b"ACGT".as_slice()];
        let alphabet = crate::alphabet::ascii_dna();

        let _index = FmIndexConfig::<crate::rank::naive::NaiveRankDictionary>::new()
            .suffix_array_sampling_rate(8)
            .construct_index(texts, alphabet);
    }

    #[test]
    fn rejects_sentinel_byte_via_try_construct() {
        let alphabet = crate::alphabet::bytes();
        let texts = [vec![0u8, 1, 2]];
        // byte 0 is a legal member of the `bytes()` alphabet (dense code 1),
        // so construction must succeed rather than mistake it for a sentinel.
        let result = FmIndexConfig::<crate::rank::naive::NaiveRankDictionary>::new()
            .try_construct_index(texts, alphabet);
        assert!(result.is_ok());
    }
}
