use fmindex::rank::naive::NaiveRankDictionary;
use fmindex::search::{generators, NgEngine, NgVariant, SearchDriver};
use fmindex::{FmIndexConfig, alphabet};

fn main() {
    // This example shows how to run an approximate (Hamming-distance)
    // search guided by a named search scheme, rather than an exact
    // backward search.

    let texts = [b"ACGTACGTACGT".as_slice(), b"TTTTGGGGCCCC".as_slice()];
    let index = FmIndexConfig::<NaiveRankDictionary>::new()
        .construct_bidirectional_index(texts, alphabet::ascii_dna());

    // One mismatch allowed, split the query into up to 2 parts.
    let scheme = generators::pigeon_opt(0, 1);
    let driver = NgEngine::new(NgVariant::Ng12);

    // "ACGA" differs from "ACGT" by a single substitution.
    let hits = driver.search(&index, b"ACGA", &scheme);
    assert!(hits.iter().any(|hit| hit.sequence_id == 0 && hit.position == 0));
}
