/*! Succinct full-text indices over small alphabets: rank dictionaries, FM-
 * indices, and bidirectional search schemes for DNA, protein, and arbitrary
 * byte collections, aimed at read-mapper- and bioinformatics-pipeline-style
 * workloads.
 *
 * The engineered core is the [rank dictionary](rank) (`RankDictionary`):
 * several variants trade construction time, memory, and query latency
 * against each other behind one trait, all built from the same BWT. An
 * [`FmIndex`] (or its [reverse](RevFmIndex)/[bidirectional](BiFmIndex)
 * siblings) wraps a rank dictionary, a compressed suffix array ([`csa`]),
 * and a sentinel-position lookup ([`text_id_search_tree`]) into a queryable
 * index.
 *
 * ## Usage
 *
 * ```
 * use fmindex::{FmIndexConfig, alphabet, rank::naive::NaiveRankDictionary};
 *
 * let dna_alphabet = alphabet::ascii_dna();
 * let texts = [b"ACGTACGT".as_slice(), b"TTGGCCAA".as_slice()];
 *
 * let index = FmIndexConfig::<NaiveRankDictionary>::new().construct_index(texts, dna_alphabet);
 *
 * let query = b"GT";
 * assert_eq!(index.count(query), 2);
 *
 * for hit in index.locate(query) {
 *     println!(
 *         "Found query in sequence {} at position {}.",
 *         hit.sequence_id, hit.position
 *     );
 * }
 * ```
 *
 * For approximate search (Hamming or edit distance) via search schemes, see
 * [`search`]; for prepending/appending symbols one at a time, see
 * [`cursor`].
 *
 * [original paper]: https://doi.org/10.1109/SFCS.2000.892127
 */

pub mod alphabet;
mod bitops;
mod bitvector;
pub mod config;
mod construction;
pub mod csa;
pub mod cursor;
pub mod error;
pub mod fmindex;
pub mod rank;
pub mod search;
#[cfg(any(feature = "savefile", feature = "serde"))]
pub mod serialize;
mod text_id_search_tree;

#[doc(inline)]
pub use alphabet::Alphabet;
#[doc(inline)]
pub use config::{FmIndexConfig, SuffixArrayStorage};
#[doc(inline)]
pub use cursor::{BiCursor, Cursor, CursorState};
#[doc(inline)]
pub use error::BuildError;
#[doc(inline)]
pub use fmindex::{BiFmIndex, FmIndex, Hit, RevFmIndex};
