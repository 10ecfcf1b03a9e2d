use fmindex::rank::naive::NaiveRankDictionary;
use fmindex::{FmIndexConfig, alphabet};

fn main() {
    // This example showcases the flexible cursor API for the FM-index.

    let dna_n_alphabet = alphabet::ascii_dna_with_n();
    let texts = [b"AaACGT".as_slice(), b"AacGtn", b"GTGTGT"];

    let index = FmIndexConfig::<NaiveRankDictionary>::new().construct_index(texts, dna_n_alphabet);

    // We obtain a cursor that points to the index. The cursor maintains a
    // currently searched query. Symbols can iteratively be prepended.
    let mut cursor = index.cursor_for_query(b"T");

    // There are too many occurrences for our taste.
    assert_eq!(cursor.count(), 5);

    // So we extend the currently searched query by a symbol.
    cursor = cursor.extend_left(b'G');

    // That's better!
    assert_eq!(cursor.count(), 2);

    for hit in cursor.locate() {
        println!(
            "Found query in sequence {} at position {}.",
            hit.sequence_id, hit.position
        );
    }

    // A bidirectional index can extend on either side of the query.
    let bi_index = FmIndexConfig::<NaiveRankDictionary>::new()
        .construct_bidirectional_index(texts, alphabet::ascii_dna_with_n());
    let bi_cursor = bi_index
        .cursor_empty()
        .extend_left(b'G')
        .extend_right(b'T');
    assert_eq!(bi_cursor.count(), 2);
}
