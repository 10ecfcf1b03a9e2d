use fmindex::rank::naive::NaiveRankDictionary;
use fmindex::{FmIndexConfig, Hit, alphabet};
use std::collections::HashSet;

fn create_index() -> fmindex::FmIndex<NaiveRankDictionary> {
    let text = b"cccaaagggttt".as_slice();
    FmIndexConfig::<NaiveRankDictionary>::new()
        .suffix_array_sampling_rate(3)
        .construct_index([text], alphabet::ascii_dna())
}

static BASIC_QUERY: &[u8] = b"gg";
static FRONT_QUERY: &[u8] = b"c";
static WRAPPING_QUERY: &[u8] = b"ta";
static MULTI_QUERY: &[u8] = b"gt";

#[test]
fn basic_search() {
    let index = create_index();

    let results: HashSet<_> = index.locate(BASIC_QUERY).collect();
    let expected_results = HashSet::from_iter([
        Hit {
            sequence_id: 0,
            position: 6,
        },
        Hit {
            sequence_id: 0,
            position: 7,
        },
    ]);

    assert_eq!(results, expected_results);
}

#[test]
fn text_front_search() {
    let index = create_index();

    let results: HashSet<_> = index.locate(FRONT_QUERY).collect();
    let expected_results = HashSet::from_iter([
        Hit {
            sequence_id: 0,
            position: 0,
        },
        Hit {
            sequence_id: 0,
            position: 1,
        },
        Hit {
            sequence_id: 0,
            position: 2,
        },
    ]);

    assert_eq!(results, expected_results);
}

#[test]
fn search_no_wrapping() {
    let index = create_index();
    let results: HashSet<_> = index.locate(WRAPPING_QUERY).collect();
    assert!(results.is_empty());
}

#[test]
fn search_multitext() {
    let texts = [b"cccaaagggttt".as_slice(), b"acgtacgtacgt"];

    let index = FmIndexConfig::<NaiveRankDictionary>::new()
        .suffix_array_sampling_rate(3)
        .construct_index(texts, alphabet::ascii_dna());

    let expected_results_basic_query = HashSet::from_iter([
        Hit {
            sequence_id: 0,
            position: 6,
        },
        Hit {
            sequence_id: 0,
            position: 7,
        },
    ]);

    let results_basic_query: HashSet<_> = index.locate(BASIC_QUERY).collect();
    assert_eq!(results_basic_query, expected_results_basic_query);

    let expected_results_multi_query = HashSet::from_iter([
        Hit {
            sequence_id: 0,
            position: 8,
        },
        Hit {
            sequence_id: 1,
            position: 2,
        },
        Hit {
            sequence_id: 1,
            position: 6,
        },
        Hit {
            sequence_id: 1,
            position: 10,
        },
    ]);

    let results_multi_query: HashSet<_> = index.locate(MULTI_QUERY).collect();
    assert_eq!(results_multi_query, expected_results_multi_query);
}
