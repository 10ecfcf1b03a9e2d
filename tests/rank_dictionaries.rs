use fmindex::rank::epr::EprRankDictionary;
use fmindex::rank::epr_multilevel::EprMultilevelRankDictionary;
use fmindex::rank::interleaved::InterleavedRankDictionary;
use fmindex::rank::multi_bitvector::MultiBitvectorRankDictionary;
use fmindex::rank::naive::NaiveRankDictionary;
use fmindex::rank::rle::RleRankDictionary;
use fmindex::rank::wavelet::WaveletRankDictionary;
use fmindex::rank::{ConstructibleRankDictionary, RankDictionary};
use proptest::prelude::*;

struct NaiveOracle {
    columns: Vec<Vec<usize>>,
}

impl NaiveOracle {
    fn construct(text: &[u8], alphabet_size: usize) -> Self {
        let mut columns = vec![Vec::with_capacity(text.len() + 1); alphabet_size];
        let mut counts = vec![0usize; alphabet_size];
        for column in &mut columns {
            column.push(0);
        }
        for &symbol in text {
            counts[symbol as usize] += 1;
            for (symbol_idx, column) in columns.iter_mut().enumerate() {
                column.push(counts[symbol_idx]);
            }
        }
        NaiveOracle { columns }
    }

    fn rank(&self, symbol: u8, idx: usize) -> usize {
        self.columns[symbol as usize][idx]
    }
}

fn check_against_naive<D: ConstructibleRankDictionary>(text: &[u8], alphabet_size: usize) {
    let dict = D::construct(text, alphabet_size);
    let oracle = NaiveOracle::construct(text, alphabet_size);

    assert_eq!(dict.size(), text.len());
    assert_eq!(dict.alphabet_size(), alphabet_size);

    for (idx, &symbol) in text.iter().enumerate() {
        assert_eq!(dict.symbol(idx), symbol, "symbol mismatch at {idx}");
    }

    for symbol in 0..alphabet_size as u8 {
        for idx in 0..=text.len() {
            assert_eq!(
                dict.rank(symbol, idx),
                oracle.rank(symbol, idx),
                "rank mismatch for symbol {symbol} at {idx}"
            );
        }
    }
}

fn check_all_variants(text: &[u8], alphabet_size: usize) {
    check_against_naive::<NaiveRankDictionary>(text, alphabet_size);
    check_against_naive::<EprRankDictionary>(text, alphabet_size);
    check_against_naive::<EprMultilevelRankDictionary>(text, alphabet_size);
    check_against_naive::<InterleavedRankDictionary>(text, alphabet_size);
    check_against_naive::<MultiBitvectorRankDictionary>(text, alphabet_size);
    check_against_naive::<WaveletRankDictionary>(text, alphabet_size);
    check_against_naive::<RleRankDictionary>(text, alphabet_size);
}

#[test]
fn empty_text() {
    check_all_variants(&[], 2);
}

#[test]
fn single_run_favors_rle() {
    let text: Vec<u8> = std::iter::repeat(1).take(10_000).collect();
    check_all_variants(&text, 3);
}

#[test]
fn superblock_boundary_text() {
    let superblock_size = u16::MAX as usize + 1;
    let alphabet_size = 3;
    let text: Vec<_> = [0u8, 1, 2, 2, 1, 0, 0, 0, 1, 2]
        .iter()
        .cycle()
        .copied()
        .take(superblock_size)
        .collect();

    check_all_variants(&text, alphabet_size);
}

prop_compose! {
    fn text_over_alphabet()(max_symbol in 1u8..=31)
        (text in prop::collection::vec(0..=max_symbol, 0..800), max_symbol in Just(max_symbol)) -> (Vec<u8>, usize) {
        (text, max_symbol as usize + 1)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_failure_persistence(prop::test_runner::FileFailurePersistence::WithSource("proptest-regressions")))]

    #[test]
    fn correctness_random_texts((text, alphabet_size) in text_over_alphabet()) {
        check_all_variants(&text, alphabet_size);
    }
}
