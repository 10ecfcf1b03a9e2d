//! `Search`/`Scheme` algebra: the part-permutation-plus-error-bounds
//! representation search schemes use to describe which orders of extension
//! and error budgets together cover every error configuration up to some
//! bound, without a driver having to enumerate all of them at query time.
//!
//! Grounded on `examples/original_source/src/search_schemes/Scheme.h` and
//! `Search.h`.

/// One search: a part visitation order `pi` (a permutation of `0..P` whose
/// every prefix is a contiguous range of part indices) with, for each
/// position `j` in that order, a lower and upper bound on the number of
/// errors accumulated so far.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Search {
    pub pi: Vec<usize>,
    pub l: Vec<usize>,
    pub u: Vec<usize>,
}

impl Search {
    pub fn new(pi: Vec<usize>, l: Vec<usize>, u: Vec<usize>) -> Self {
        assert_eq!(pi.len(), l.len());
        assert_eq!(pi.len(), u.len());
        Search { pi, l, u }
    }

    pub fn num_parts(&self) -> usize {
        self.pi.len()
    }

    /// `pi` is a permutation of `0..num_parts` whose every prefix is a
    /// contiguous integer range, `l`/`u` are monotone non-decreasing, and
    /// `l[j] <= u[j]` everywhere.
    pub fn is_valid(&self) -> bool {
        let p = self.num_parts();
        if p == 0 {
            return false;
        }

        let mut seen = vec![false; p];
        for &part in &self.pi {
            if part >= p || seen[part] {
                return false;
            }
            seen[part] = true;
        }

        let mut lo = self.pi[0];
        let mut hi = self.pi[0];
        for &part in &self.pi[1..] {
            if part + 1 == lo {
                lo = part;
            } else if part == hi + 1 {
                hi = part;
            } else {
                return false;
            }
        }

        for j in 0..p {
            if self.l[j] > self.u[j] {
                return false;
            }
            if j > 0 && (self.l[j] < self.l[j - 1] || self.u[j] < self.u[j - 1]) {
                return false;
            }
        }

        true
    }

    /// Does this search cover the error configuration `errors_per_part`
    /// (indexed by part, not by position in `pi`)?
    pub fn covers(&self, errors_per_part: &[usize]) -> bool {
        let mut cumulative = 0usize;
        for (j, &part) in self.pi.iter().enumerate() {
            cumulative += errors_per_part[part];
            if cumulative < self.l[j] || cumulative > self.u[j] {
                return false;
            }
        }
        true
    }

    /// Tightens bounds so consecutive positions' upper bound differs by at
    /// most 1, the shape a pure substitution (no indel) search needs: an
    /// edit-distance scheme's upper bound may jump by more than 1 between
    /// parts (an indel run can spend several errors "for free" across a
    /// part boundary), which a Hamming-only search can never observe.
    pub fn limit_to_hamming(&self) -> Search {
        let mut u = self.u.clone();
        for j in 1..u.len() {
            u[j] = u[j].min(u[j - 1] + 1);
        }
        let l = self
            .l
            .iter()
            .zip(&u)
            .map(|(&l, &u)| l.min(u))
            .collect();

        Search { pi: self.pi.clone(), l, u }
    }

    /// Partitions a concrete query length `new_len` over this search's
    /// parts as evenly as possible (remainder spread to the front parts, in
    /// `pi` order), producing the part lengths a driver needs to know where
    /// each part starts and ends. The error bounds `l`/`u` themselves are
    /// part-count-indexed, not length-indexed, and are carried unchanged.
    pub fn expand(&self, new_len: usize) -> ExpandedSearch {
        let p = self.num_parts();
        let base = new_len / p;
        let remainder = new_len % p;

        let part_lengths: Vec<usize> = (0..p)
            .map(|j| base + if j < remainder { 1 } else { 0 })
            .collect();

        ExpandedSearch {
            search: self.clone(),
            part_lengths,
        }
    }

    /// Upper bound on the number of index nodes a driver following this
    /// search visits, via the recurrence
    /// `N_j(e) = N_{j-1}(e) + (sigma-1) * N_{j-1}(e-1)` restricted to
    /// `l[j] <= e <= u[j]`.
    pub fn node_count(&self, alphabet_size: usize) -> u64 {
        let branching = alphabet_size.saturating_sub(1) as u64;
        let max_u = *self.u.last().unwrap_or(&0);

        let mut prev = vec![0u64; max_u + 2];
        prev[0] = 1;

        let mut total = 0u64;

        for j in 0..self.num_parts() {
            let mut curr = vec![0u64; max_u + 2];
            for e in 0..=max_u {
                let stay = prev[e];
                let branch = if e > 0 { branching * prev[e - 1] } else { 0 };
                curr[e] = stay + branch;
            }

            for e in self.l[j]..=self.u[j] {
                total += curr[e];
            }

            prev = curr;
        }

        total
    }
}

/// A `Search` attached to concrete part lengths for a specific query
/// length, produced by [`Search::expand`]/[`Scheme::expand`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedSearch {
    pub search: Search,
    pub part_lengths: Vec<usize>,
}

impl ExpandedSearch {
    /// `false` if expanding to this length left any part with zero length
    /// (the query was shorter than the scheme's part count).
    pub fn is_valid(&self) -> bool {
        self.search.is_valid() && self.part_lengths.iter().all(|&len| len > 0)
    }
}

/// An ordered list of [`Search`]es, all over the same number of parts,
/// that together cover every error configuration in some `[k_min, k_max]`
/// range.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheme {
    pub searches: Vec<Search>,
    pub num_parts: usize,
}

impl Scheme {
    pub fn new(searches: Vec<Search>) -> Self {
        let num_parts = searches.first().map_or(0, Search::num_parts);
        assert!(
            searches.iter().all(|s| s.num_parts() == num_parts),
            "all searches in a scheme must share the same part count"
        );
        Scheme { searches, num_parts }
    }

    /// Enumerates every way to distribute a total error count in
    /// `[k_min, k_max]` over `num_parts` parts, and checks that some search
    /// in the scheme covers it.
    pub fn is_complete(&self, k_min: usize, k_max: usize) -> bool {
        if self.num_parts == 0 {
            return k_min == 0 && k_max == 0;
        }

        let mut errors_per_part = vec![0usize; self.num_parts];
        for total in k_min..=k_max {
            if !self.covers_every_composition(total, 0, &mut errors_per_part) {
                return false;
            }
        }
        true
    }

    fn covers_every_composition(
        &self,
        remaining: usize,
        part: usize,
        errors_per_part: &mut [usize],
    ) -> bool {
        if part == self.num_parts - 1 {
            errors_per_part[part] = remaining;
            return self.searches.iter().any(|s| s.covers(errors_per_part));
        }

        for e in 0..=remaining {
            errors_per_part[part] = e;
            if !self.covers_every_composition(remaining - e, part + 1, errors_per_part) {
                return false;
            }
        }
        true
    }

    /// `expand` mapped over every search, dropping those that become
    /// invalid at this concrete length (a part collapsing to zero length).
    pub fn expand(&self, new_len: usize) -> Vec<ExpandedSearch> {
        self.searches
            .iter()
            .map(|s| s.expand(new_len))
            .filter(ExpandedSearch::is_valid)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_search_covering_full_range_is_valid_and_complete() {
        let search = Search::new(vec![0], vec![0], vec![2]);
        assert!(search.is_valid());

        let scheme = Scheme::new(vec![search]);
        assert!(scheme.is_complete(0, 2));
        assert!(!scheme.is_complete(0, 3));
    }

    #[test]
    fn non_contiguous_pi_prefix_is_invalid() {
        let search = Search::new(vec![0, 2, 1], vec![0, 0, 0], vec![1, 1, 1]);
        assert!(!search.is_valid());
    }

    #[test]
    fn expand_splits_remainder_to_front_parts() {
        let search = Search::new(vec![0, 1, 2], vec![0, 0, 0], vec![1, 1, 1]);
        let expanded = search.expand(10);
        assert_eq!(expanded.part_lengths, vec![4, 3, 3]);
        assert!(expanded.is_valid());
    }

    #[test]
    fn expand_drops_searches_shorter_than_part_count() {
        let search = Search::new(vec![0, 1, 2, 3], vec![0, 0, 0, 0], vec![1, 1, 1, 1]);
        let expanded = search.expand(2);
        assert!(!expanded.is_valid());
    }

    #[test]
    fn node_count_matches_hand_computed_recurrence() {
        // single part, l=u=1: N_0(1) = sigma - 1 for sigma=4 => 3
        let search = Search::new(vec![0], vec![1], vec![1]);
        assert_eq!(search.node_count(4), 3);
    }

    #[test]
    fn limit_to_hamming_caps_upper_bound_jumps() {
        let search = Search::new(vec![0, 1], vec![0, 0], vec![0, 3]);
        let hamming = search.limit_to_hamming();
        assert_eq!(hamming.u, vec![0, 1]);
    }
}
