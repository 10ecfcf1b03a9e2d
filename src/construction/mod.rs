//! SA/BWT construction black box (non-goal: the suffix array construction
//! algorithm itself — `libsais` is the backend).
//!
//! [`create_concatenated_densely_encoded_text`] joins sequences with
//! sentinels and derives the dense-alphabet frequency table;
//! [`IndexStorage::construct_libsais_suffix_array`] drives `libsais`;
//! [`bwt::bwt_from_suffix_array`] derives the BWT and the text-border
//! lookup used to terminate LF-walks at sentinels. Directly adapted from
//! genedex's `construction.rs`/`construction/bwt.rs`, trimmed of the
//! `PerformancePriority`/slice-compression branch: this crate's rank
//! dictionaries (`src/rank/`) already each choose their own block layout
//! from a dense `u8` BWT, so packing two symbols per byte ahead of time has
//! no remaining consumer (see DESIGN.md).

mod bwt;

use bytemuck::Pod;
use libsais::{OutputElement, ThreadCount};
use num_traits::{NumCast, PrimInt};
use rayon::prelude::*;
use std::collections::HashMap;

use crate::alphabet::Alphabet;
use crate::error::BuildError;

/// The products of construction, handed to [`crate::fmindex`] to assemble
/// an index: every rank dictionary variant is built from the same `bwt`.
pub(crate) struct BuiltText {
    pub(crate) bwt: Vec<u8>,
    pub(crate) count: Vec<usize>,
    pub(crate) suffix_array: Vec<u64>,
    pub(crate) text_border_lookup: HashMap<usize, u64>,
    pub(crate) sentinel_indices: Vec<usize>,
}

pub(crate) fn build<I: IndexStorage, T: AsRef<[u8]>>(
    texts: impl IntoIterator<Item = T>,
    alphabet: &Alphabet,
) -> Result<BuiltText, BuildError> {
    let (text, mut frequency_table, sentinel_indices) =
        create_concatenated_densely_encoded_text::<I::LibsaisOutput, _>(texts, alphabet)?;

    if alphabet.num_dense_symbols() > 256 {
        return Err(BuildError::AlphabetExceeded {
            size: alphabet.num_dense_symbols(),
            max: 256,
        });
    }

    let max_indexable = <usize as NumCast>::from(I::max_value()).unwrap();
    if text.len() > max_indexable {
        return Err(BuildError::TooLarge {
            text_len: text.len(),
            max: <u64 as NumCast>::from(I::max_value()).unwrap(),
        });
    }

    let count = frequency_table_to_count(&frequency_table, alphabet.num_dense_symbols());

    let suffix_array_bytes = I::construct_libsais_suffix_array(&text, &mut frequency_table);
    let suffix_array_buffer: &[I::LibsaisOutput] = bytemuck::cast_slice(&suffix_array_bytes);

    let mut bwt = vec![0u8; text.len()];
    let text_border_lookup: HashMap<usize, u64> =
        bwt::bwt_from_suffix_array(suffix_array_buffer, &text, &mut bwt, text.len());

    let suffix_array: Vec<u64> = suffix_array_buffer
        .iter()
        .map(|&value| <u64 as NumCast>::from(value).unwrap())
        .collect();

    Ok(BuiltText {
        bwt,
        count,
        suffix_array,
        text_border_lookup,
        sentinel_indices,
    })
}

/// Types that can be used to store suffix array entries during
/// construction. The maximum value of the type upper-bounds the sum of
/// lengths of indexed texts; larger types allow indexing larger texts at
/// the cost of higher peak memory during construction.
pub trait IndexStorage: PrimInt + Pod + sealed::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    type LibsaisOutput: OutputElement + IndexStorage;

    #[doc(hidden)]
    fn construct_libsais_suffix_array(
        text: &[u8],
        frequency_table: &mut [Self::LibsaisOutput],
    ) -> Vec<u8> {
        let mut suffix_array_bytes = vec![0u8; text.len() * size_of::<Self::LibsaisOutput>()];
        let suffix_array_buffer: &mut [Self::LibsaisOutput] =
            bytemuck::cast_slice_mut(&mut suffix_array_bytes);

        let mut construction = libsais::SuffixArrayConstruction::for_text(text)
            .in_borrowed_buffer(suffix_array_buffer)
            .multi_threaded(ThreadCount::fixed(
                rayon::current_num_threads()
                    .try_into()
                    .expect("number of threads should fit into u16"),
            ));

        unsafe {
            construction = construction.with_frequency_table(frequency_table);
        }

        construction
            .run()
            .expect("libsais suffix array construction");

        suffix_array_bytes
    }
}

impl sealed::Sealed for i32 {}
impl IndexStorage for i32 {
    type LibsaisOutput = i32;
}

impl sealed::Sealed for u32 {}
impl IndexStorage for u32 {
    type LibsaisOutput = i64;
}

impl sealed::Sealed for i64 {}
impl IndexStorage for i64 {
    type LibsaisOutput = i64;
}

pub(crate) mod sealed {
    pub trait Sealed {}
}

pub(crate) fn create_concatenated_densely_encoded_text<I: OutputElement, T: AsRef<[u8]>>(
    texts: impl IntoIterator<Item = T>,
    alphabet: &Alphabet,
) -> Result<(Vec<u8>, Vec<I>, Vec<usize>), BuildError> {
    let generic_texts: Vec<_> = texts.into_iter().collect();
    let texts: Vec<&[u8]> = generic_texts.iter().map(|t| t.as_ref()).collect();
    let num_texts = texts.len();

    if num_texts == 0 {
        return Err(BuildError::EmptyInput);
    }

    for (sequence_index, text) in texts.iter().enumerate() {
        // non-member bytes are a precondition violation elsewhere in the
        // crate; here only a byte that maps onto the reserved sentinel code
        // is checked explicitly, since a caller-supplied alphabet doing that
        // would silently corrupt the sentinel/offset bookkeeping rather than
        // panic.
        if text.iter().any(|&byte| alphabet.raw_dense_code(byte) == 0) {
            return Err(BuildError::SentinelInInput { sequence_index });
        }
    }

    let needed_capacity = texts.iter().map(|t| t.len()).sum::<usize>() + num_texts;

    let sentinel_indices: Vec<_> = texts
        .iter()
        .scan(0, |state, t| {
            let temp = *state + t.len();
            *state += t.len() + 1;
            Some(temp)
        })
        .collect();

    let mut concatenated_text = vec![0u8; needed_capacity];

    let mut concatenated_text_splits = Vec::with_capacity(num_texts);
    let mut remaining_slice = concatenated_text.as_mut_slice();

    for t in texts.iter() {
        let (this, remaining) = remaining_slice.split_at_mut(t.len() + 1);
        concatenated_text_splits.push(this);
        remaining_slice = remaining;
    }

    let mut frequency_table = texts
        .into_par_iter()
        .zip(concatenated_text_splits)
        .map(|(text, concatenated_text_split)| {
            let mut frequency_table = vec![I::zero(); 256];

            for (source, target) in text.iter().zip(concatenated_text_split.iter_mut()) {
                *target = alphabet.io_to_dense_representation(*source);
                frequency_table[*target as usize] = frequency_table[*target as usize] + I::one();
            }

            frequency_table
        })
        .reduce_with(merge_frequency_tables)
        .expect("there is at least one text, checked above");

    frequency_table[0] = <I as NumCast>::from(num_texts).unwrap();

    Ok((concatenated_text, frequency_table, sentinel_indices))
}

fn merge_frequency_tables<I: OutputElement>(mut f1: Vec<I>, f2: Vec<I>) -> Vec<I> {
    for (x1, x2) in f1.iter_mut().zip(f2) {
        *x1 = *x1 + x2;
    }

    f1
}

fn frequency_table_to_count<I: OutputElement>(
    frequency_table: &[I],
    alphabet_size: usize,
) -> Vec<usize> {
    let mut count: Vec<_> = frequency_table[..alphabet_size]
        .iter()
        .map(|&value| <usize as NumCast>::from(value).unwrap())
        .collect();

    let mut sum = 0;

    for entry in count.iter_mut() {
        let temp = *entry;
        *entry = sum;
        sum += temp;
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet;

    #[test]
    fn concat_text() {
        let texts = [b"cccaaagggttt".as_slice(), b"acgtacgtacgt"];
        let alph = alphabet::ascii_dna();
        let (text, frequency_table, sentinel_indices) =
            create_concatenated_densely_encoded_text::<i32, _>(texts, &alph).unwrap();

        assert_eq!(
            text,
            [
                2, 2, 2, 1, 1, 1, 3, 3, 3, 4, 4, 4, 0, 1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4, 0
            ]
        );

        assert_eq!(&sentinel_indices, &[12, 25]);

        let mut expected_frequency_table = vec![0; 256];
        expected_frequency_table[0] = 2;
        expected_frequency_table[1] = 6;
        expected_frequency_table[2] = 6;
        expected_frequency_table[3] = 6;
        expected_frequency_table[4] = 6;

        assert_eq!(expected_frequency_table, frequency_table);
    }

    #[test]
    fn empty_input_is_rejected() {
        let alph = alphabet::ascii_dna();
        let texts: Vec<&[u8]> = Vec::new();
        let result = create_concatenated_densely_encoded_text::<i32, _>(texts, &alph);
        assert!(matches!(result, Err(BuildError::EmptyInput)));
    }

    #[test]
    fn sentinel_byte_in_input_is_rejected() {
        // a custom table that (mistakenly) maps `X` onto the reserved
        // sentinel dense code 0, rather than leaving it unmapped.
        let mut table = [255u8; 256];
        table[b'A' as usize] = 1;
        table[b'X' as usize] = 0;
        let alph = alphabet::Alphabet::new(table, 2, 0);

        let texts = [b"AAXA".to_vec()];
        let result = create_concatenated_densely_encoded_text::<i32, _>(texts, &alph);
        assert!(matches!(
            result,
            Err(BuildError::SentinelInInput { sequence_index: 0 })
        ));
    }

    #[test]
    fn build_end_to_end_produces_consistent_bwt_and_count() {
        let alph = alphabet::ascii_dna();
        let texts = [b"ACGT".as_slice(), b"TGCA"];
        let built = build::<i32, _>(texts, &alph).unwrap();

        assert_eq!(built.bwt.len(), 10); // 4 + 1 + 4 + 1
        assert_eq!(built.count.len(), alph.num_dense_symbols());
        assert_eq!(built.sentinel_indices, vec![4, 9]);
    }
}
