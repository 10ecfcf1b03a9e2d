use fmindex::rank::naive::NaiveRankDictionary;
use fmindex::{FmIndexConfig, alphabet};

fn main() {
    // This example shows how to use the FM-index in a basic way.

    let dna_n_alphabet = alphabet::ascii_dna_with_n();
    let texts = [b"aACGT".as_slice(), b"acGtn".as_slice()];

    let index = FmIndexConfig::<NaiveRankDictionary>::new()
        .suffix_array_sampling_rate(2)
        .construct_index(texts, dna_n_alphabet);

    let query = b"GT";
    assert_eq!(index.count(query), 2);

    for hit in index.locate(query) {
        println!(
            "Found query in sequence {} at position {}.",
            hit.sequence_id, hit.position
        );
    }

    // Queries can also be walked one symbol at a time via a cursor; see
    // cursor.rs for the full API.
    let mut cursor = index.cursor_empty();
    for &byte in query.iter().rev() {
        cursor = cursor.extend_left(byte);
    }
    assert_eq!(cursor.count(), index.count(query));
}
