//! Derives the BWT from a suffix array and records, for every suffix-array
//! index that points at a sentinel, which sequence's border it belongs to
//! (so an LF-walk that lands there can stop instead of reading past the end
//! of the concatenated text).
//!
//! Adapted from genedex's `construction/bwt.rs`, with the slice-compression
//! branch removed: this crate's rank dictionaries each pick their own block
//! layout from the dense `u8` BWT, so there is no remaining benefit to
//! packing two symbols per byte before handing the text off (see
//! DESIGN.md's trimming notes).

use num_traits::NumCast;
use rayon::prelude::*;
use std::collections::HashMap;

use crate::construction::IndexStorage;

/// `I1` is the suffix array's element type, `I2` the type used to record
/// sentinel border positions (always `u64` in this crate, but kept generic
/// to mirror the storage-agnostic shape of the rest of construction).
pub(crate) fn bwt_from_suffix_array<I1: IndexStorage, I2: IndexStorage>(
    suffix_array: &[I1],
    text: &[u8],
    bwt: &mut [u8],
    uncompressed_text_len: usize,
) -> HashMap<usize, I2> {
    // Collecting the text border lookup while constructing the BWT made the
    // function run much slower; this two-level chunk scheme recovers the
    // single-pass performance.
    let outer_chunk_size =
        std::cmp::max(text.len().div_ceil(rayon::current_num_threads() * 4), 1);
    let inner_chunk_size = 128;

    suffix_array
        .par_chunks(outer_chunk_size)
        .zip(bwt.par_chunks_mut(outer_chunk_size))
        .enumerate()
        .map(
            |(outer_chunk_idx, (outer_suffix_array_chunk, outer_bwt_chunk))| {
                let mut text_border_lookup = HashMap::new();

                for (inner_chunk_idx, (inner_suffix_array_chunk, inner_bwt_chunk)) in
                    outer_suffix_array_chunk
                        .chunks(inner_chunk_size)
                        .zip(outer_bwt_chunk.chunks_mut(inner_chunk_size))
                        .enumerate()
                {
                    for (i, &text_idx) in inner_suffix_array_chunk.iter().enumerate() {
                        let text_index_usize = <usize as NumCast>::from(text_idx).unwrap();

                        let text_index_usize = if text_index_usize > 0 {
                            text_index_usize
                        } else {
                            uncompressed_text_len
                        };

                        inner_bwt_chunk[i] = text[text_index_usize - 1];
                    }

                    for (i, &bwt_symbol) in inner_bwt_chunk.iter().enumerate() {
                        if bwt_symbol == 0 {
                            let suffix_array_index = outer_chunk_size * outer_chunk_idx
                                + inner_chunk_size * inner_chunk_idx
                                + i;

                            let text_index =
                                <I2 as NumCast>::from(inner_suffix_array_chunk[i]).unwrap();
                            text_border_lookup.insert(suffix_array_index, text_index);
                        }
                    }
                }

                text_border_lookup
            },
        )
        .reduce_with(|mut m0, m1| {
            m0.extend(m1);
            m0
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bwt_matches_lf_predecessor_relationship() {
        // "cccaaagggttt$acgtacgtacgt$" in dense codes, two sentinels.
        let text = [
            2u8, 2, 2, 1, 1, 1, 3, 3, 3, 4, 4, 4, 0, 1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4, 0,
        ];
        let suffix_array: Vec<i32> = libsais::SuffixArrayConstruction::for_text(&text)
            .in_owned_buffer32()
            .single_threaded()
            .run()
            .unwrap()
            .into_vec();

        let mut bwt = vec![0u8; text.len()];
        let text_border_lookup =
            bwt_from_suffix_array::<i32, u64>(&suffix_array, &text, &mut bwt, text.len());

        let num_sentinels_in_sa = suffix_array
            .iter()
            .filter(|&&idx| text[<usize as NumCast>::from(idx).unwrap()] == 0)
            .count();
        assert_eq!(text_border_lookup.len(), num_sentinels_in_sa);

        for (sa_index, &text_idx) in suffix_array.iter().enumerate() {
            let text_idx = <usize as NumCast>::from(text_idx).unwrap();
            let predecessor = if text_idx == 0 {
                text.len() - 1
            } else {
                text_idx - 1
            };
            assert_eq!(bwt[sa_index], text[predecessor]);
        }
    }
}
