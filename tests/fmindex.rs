use fmindex::rank::epr::EprRankDictionary;
use fmindex::rank::naive::NaiveRankDictionary;
use fmindex::rank::wavelet::WaveletRankDictionary;
use fmindex::{FmIndexConfig, Hit, alphabet};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

struct QuerySampler<'t, 'r> {
    texts: &'t [Vec<u8>],
    rng: &'r mut ChaCha8Rng,
    max_extent: usize,
}

impl<'t, 'r> Iterator for QuerySampler<'t, 'r> {
    type Item = (Hit, &'t [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.texts.is_empty() {
            return None;
        }
        let sequence_id = self.rng.random_range(0..self.texts.len());
        let text = &self.texts[sequence_id];

        if text.is_empty() {
            return None;
        }

        let position = self.rng.random_range(0..text.len());
        let extent_range = 1..std::cmp::min(self.max_extent, text.len() - position + 1);
        let extent = self.rng.random_range(extent_range);

        Some((
            Hit {
                sequence_id,
                position,
            },
            &text[position..position + extent],
        ))
    }
}

struct RandomQueryGenerator<'r> {
    max_len: usize,
    rng: &'r mut ChaCha8Rng,
}

impl<'r> Iterator for RandomQueryGenerator<'r> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.rng.random_range(1..self.max_len);
        let mut query = vec![0; len];
        for q in query.iter_mut() {
            *q = b"ACGTN"[self.rng.random_range(0..5)];
        }

        Some(query)
    }
}

fn naive_search(texts: &[Vec<u8>], query: &[u8]) -> HashSet<Hit> {
    let mut hits = HashSet::new();

    if query.is_empty() {
        return hits;
    }

    for (sequence_id, text) in texts.iter().enumerate() {
        if text.len() < query.len() {
            continue;
        }
        for (position, window) in text.windows(query.len()).enumerate() {
            if window == query {
                hits.insert(Hit {
                    sequence_id,
                    position,
                });
            }
        }
    }

    hits
}

proptest! {
    #![proptest_config(ProptestConfig::with_failure_persistence(prop::test_runner::FileFailurePersistence::WithSource("proptest-regressions")))]

    #[test]
    fn correctness_random_texts(
        texts in prop::collection::vec(
            prop::collection::vec((0usize..5).prop_map(|i| b"ACGTN"[i]), 0..1500),
            1..5
        ),
        suffix_array_sampling_rate in 1usize..=64,
        seed in any::<u64>()
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let existing_queries: Vec<_> = QuerySampler{texts: &texts, max_extent: 200, rng: &mut rng }.take(20).collect();
        let random_queries: Vec<_> = RandomQueryGenerator{max_len: 20, rng: &mut rng}.take(100).collect();

        let random_queries_naive_hits: Vec<_> = random_queries.iter().map(|q| naive_search(&texts, q)).collect();

        let index_naive = FmIndexConfig::<NaiveRankDictionary>::new()
            .suffix_array_sampling_rate(suffix_array_sampling_rate)
            .construct_index(&texts, alphabet::ascii_dna_with_n());
        let index_epr = FmIndexConfig::<EprRankDictionary>::new()
            .suffix_array_sampling_rate(suffix_array_sampling_rate)
            .construct_index(&texts, alphabet::ascii_dna_with_n());
        let index_wavelet = FmIndexConfig::<WaveletRankDictionary>::new()
            .suffix_array_sampling_rate(suffix_array_sampling_rate)
            .construct_index(&texts, alphabet::ascii_dna_with_n());

        for (hit, query) in existing_queries {
            let results_naive: HashSet<_> = index_naive.locate(query).collect();
            let results_epr: HashSet<_> = index_epr.locate(query).collect();
            let results_wavelet: HashSet<_> = index_wavelet.locate(query).collect();

            assert!(results_naive.contains(&hit));
            assert!(results_epr.contains(&hit));
            assert!(results_wavelet.contains(&hit));
        }

        for (query, naive_results) in random_queries.iter().zip(random_queries_naive_hits) {
            let results_naive: HashSet<_> = index_naive.locate(query).collect();
            let results_epr: HashSet<_> = index_epr.locate(query).collect();
            let results_wavelet: HashSet<_> = index_wavelet.locate(query).collect();

            assert_eq!(results_naive, naive_results);
            assert_eq!(results_epr, naive_results);
            assert_eq!(results_wavelet, naive_results);
        }
    }
}
