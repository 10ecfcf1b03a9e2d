//! Search drivers: walk a [`BiFmIndex`] guided by a [`Scheme`], collecting
//! every occurrence within some edit/Hamming distance of a query.
//!
//! Grounded on `examples/original_source/src/search/*.h` for the
//! scheme-driven backtracking shape (extend one part at a time, prune at
//! part boundaries against `l`/`u`) and on genedex's
//! `batch_computed_cursors.rs` for the buffer-reuse idiom
//! [`BacktrackingWithBuffers`] borrows.
//!
//! The various `ng12`/`ng14`/.../`ng26` drivers named in the original are
//! folded into one [`NgEngine`] here: their observable behavior is
//! identical, differing only in which per-node optimizations (prefix
//! lookup tables, fused rank calls) are enabled internally, none of which
//! are externally visible through `count`/`locate`. [`Backtracking`] and
//! [`BacktrackingWithBuffers`] are a separate, scheme-less pair: a direct
//! global-budget oracle used to check the scheme-driven drivers' output.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::cursor::BiCursor;
use crate::fmindex::{BiFmIndex, Hit};
use crate::rank::RankDictionary;

use super::generators;
use super::scheme::{ExpandedSearch, Scheme};

/// Whether a driver allows insertions/deletions (`Edit`) or only
/// substitutions (`Hamming`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Hamming,
    Edit,
}

/// A driver that walks an index guided by a scheme and returns every match.
pub trait SearchDriver<D: RankDictionary> {
    fn search(&self, index: &BiFmIndex<D>, query: &[u8], scheme: &Scheme) -> Vec<Hit>;
}

/// As [`SearchDriver`], but also reports how many errors each hit cost —
/// needed by [`search_best`]/[`search_best_n`].
pub trait ErrorAwareSearchDriver<D: RankDictionary>: SearchDriver<D> {
    fn search_with_errors(
        &self,
        index: &BiFmIndex<D>,
        query: &[u8],
        scheme: &Scheme,
    ) -> Vec<(Hit, usize)>;
}

/// Whole-query backtracking: walks the index directly against an explicit
/// `[k_min, k_max]` error budget, with no [`Scheme`] input at all — a
/// scheme-less oracle used to check the part-structured, pruning-aware
/// drivers ([`NgEngine`], [`super::CachedSearch`]) rather than to replace
/// them for production
/// search. Delegates to [`PseudoSearch`], which already walks every
/// substitution (and, in [`SearchMode::Edit`], insertion/deletion) at every
/// cursor extension.
pub struct Backtracking {
    pub mode: SearchMode,
}

impl Backtracking {
    pub fn new(mode: SearchMode) -> Self {
        Backtracking { mode }
    }

    pub fn search<D: RankDictionary>(
        &self,
        index: &BiFmIndex<D>,
        query: &[u8],
        k_min: usize,
        k_max: usize,
    ) -> Vec<Hit> {
        self.search_with_errors(index, query, k_min, k_max)
            .into_iter()
            .map(|(hit, _)| hit)
            .collect()
    }

    pub fn search_with_errors<D: RankDictionary>(
        &self,
        index: &BiFmIndex<D>,
        query: &[u8],
        k_min: usize,
        k_max: usize,
    ) -> Vec<(Hit, usize)> {
        PseudoSearch::new(self.mode).search_with_budget(index, query, k_min, k_max)
    }
}

/// Same algorithm as [`Backtracking`], but reuses one scratch results buffer
/// across calls instead of allocating fresh per call — the buffer-reuse
/// idiom genedex's batched cursor extension uses for its child-cursor
/// vectors, applied here to the accumulator instead.
pub struct BacktrackingWithBuffers {
    mode: SearchMode,
    scratch: RefCell<Vec<(Hit, usize)>>,
}

impl BacktrackingWithBuffers {
    pub fn new(mode: SearchMode) -> Self {
        BacktrackingWithBuffers {
            mode,
            scratch: RefCell::new(Vec::new()),
        }
    }

    pub fn search<D: RankDictionary>(
        &self,
        index: &BiFmIndex<D>,
        query: &[u8],
        k_min: usize,
        k_max: usize,
    ) -> Vec<Hit> {
        self.search_with_errors(index, query, k_min, k_max)
            .into_iter()
            .map(|(hit, _)| hit)
            .collect()
    }

    pub fn search_with_errors<D: RankDictionary>(
        &self,
        index: &BiFmIndex<D>,
        query: &[u8],
        k_min: usize,
        k_max: usize,
    ) -> Vec<(Hit, usize)> {
        let mut buffer = self.scratch.borrow_mut();
        PseudoSearch::new(self.mode).search_with_budget_into(index, query, k_min, k_max, &mut buffer);
        buffer.clone()
    }
}

/// Runs every [`Search`](super::scheme::Search) in `scheme` against `index`
/// via part-structured backtracking, honoring each search's `l`/`u` bounds
/// as-is (no Hamming narrowing: [`backtrack_bytes`] already walks
/// insertions and deletions, so a scheme whose bounds jump by more than one
/// error between parts is handled correctly rather than rejected).
fn run_scheme<D: RankDictionary>(
    index: &BiFmIndex<D>,
    query: &[u8],
    scheme: &Scheme,
) -> Vec<(Hit, usize)> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    for search in &scheme.searches {
        let expanded = search.expand(query.len());
        if !expanded.is_valid() {
            continue;
        }
        run_expanded_search(index, query, &expanded, &mut out, &mut seen);
    }
    out
}

/// `Side::Left` extends towards the query's start; part bytes are consumed
/// back-to-front when extending left (each `extend_left` prepends one
/// symbol) and front-to-back when extending right.
#[derive(Clone, Copy)]
enum PartSide {
    Left,
    Right,
}

fn run_expanded_search<D: RankDictionary>(
    index: &BiFmIndex<D>,
    query: &[u8],
    expanded: &ExpandedSearch,
    out: &mut Vec<(Hit, usize)>,
    seen: &mut HashSet<Hit>,
) {
    let num_parts = expanded.search.num_parts();
    let mut part_starts = vec![0usize; num_parts + 1];
    for j in 0..num_parts {
        part_starts[j + 1] = part_starts[j] + expanded.part_lengths[j];
    }

    let cursor = index.cursor_empty();
    backtrack_part(
        index,
        query,
        expanded,
        &part_starts,
        cursor,
        0,
        expanded.search.pi[0],
        expanded.search.pi[0] + 1,
        0,
        out,
        seen,
    );
}

#[allow(clippy::too_many_arguments)]
fn backtrack_part<D: RankDictionary>(
    index: &BiFmIndex<D>,
    query: &[u8],
    expanded: &ExpandedSearch,
    part_starts: &[usize],
    cursor: BiCursor<'_, D>,
    pi_pos: usize,
    lo: usize,
    hi: usize,
    errors: usize,
    out: &mut Vec<(Hit, usize)>,
    seen: &mut HashSet<Hit>,
) {
    let search = &expanded.search;
    let part = search.pi[pi_pos];
    let side = if pi_pos == 0 {
        if part + 1 == hi {
            PartSide::Right
        } else {
            PartSide::Left
        }
    } else if lo > 0 && part == lo - 1 {
        PartSide::Left
    } else {
        PartSide::Right
    };

    let (start, end) = (part_starts[part], part_starts[part + 1]);
    let bytes = &query[start..end];

    backtrack_bytes(
        index,
        bytes,
        side,
        cursor,
        0,
        errors,
        search.u[pi_pos],
        &mut |cursor, errors| {
            if errors < search.l[pi_pos] || errors > search.u[pi_pos] {
                return;
            }
            let new_lo = if matches!(side, PartSide::Left) { part } else { lo };
            let new_hi = if matches!(side, PartSide::Right) { part + 1 } else { hi };

            if pi_pos + 1 == search.num_parts() {
                if cursor.count() == 0 {
                    return;
                }
                for hit in cursor.locate() {
                    if seen.insert(hit) {
                        out.push((hit, errors));
                    }
                }
                return;
            }
            if cursor.count() == 0 {
                return;
            }
            backtrack_part(
                index,
                query,
                expanded,
                part_starts,
                cursor,
                pi_pos + 1,
                new_lo,
                new_hi,
                errors,
                out,
                seen,
            );
        },
    );
}

/// Walks `bytes` (already in the correct consumption order for `side`)
/// against `cursor`, trying an exact match at zero extra cost, every other
/// dense symbol at one extra error (substitution), a text symbol the query
/// doesn't have (deletion), and a query byte the text doesn't have
/// (insertion) — mirroring [`PseudoSearch::walk`]'s three-way branch.
/// Calls `on_done` once all bytes are consumed with the final cursor and
/// error count. Prunes as soon as `errors` exceeds `budget`.
fn backtrack_bytes<D: RankDictionary>(
    index: &BiFmIndex<D>,
    bytes: &[u8],
    side: PartSide,
    cursor: BiCursor<'_, D>,
    byte_pos: usize,
    errors: usize,
    budget: usize,
    on_done: &mut dyn FnMut(BiCursor<'_, D>, usize),
) {
    if errors > budget {
        return;
    }
    if byte_pos == bytes.len() {
        on_done(cursor, errors);
        return;
    }

    let target_byte = match side {
        PartSide::Left => bytes[bytes.len() - 1 - byte_pos],
        PartSide::Right => bytes[byte_pos],
    };
    let target_dense = index.alphabet().io_to_dense_representation(target_byte);

    let children = match side {
        PartSide::Left => cursor.extend_left_all(),
        PartSide::Right => cursor.extend_right_all(),
    };

    for (dense, &child) in children.iter().enumerate() {
        if child.count() == 0 {
            continue;
        }
        let step_cost = if dense as u8 == target_dense { 0 } else { 1 };
        backtrack_bytes(
            index,
            bytes,
            side,
            child,
            byte_pos + 1,
            errors + step_cost,
            budget,
            on_done,
        );
    }

    if errors < budget {
        for &child in &children {
            if child.count() == 0 {
                continue;
            }
            backtrack_bytes(index, bytes, side, child, byte_pos, errors + 1, budget, on_done);
        }

        backtrack_bytes(index, bytes, side, cursor, byte_pos + 1, errors + 1, budget, on_done);
    }
}

/// Whole-query approximate search (substitutions, insertions, deletions)
/// against a single `[k_min, k_max]` budget, without the part-by-part
/// bound checks a [`Scheme`]-driven search performs. Named for what it
/// gives up relative to [`Backtracking`]: it approximates scheme-guided
/// pruning with one global budget, trading some prunable search space for
/// a much simpler recursion when the caller does not need a specific named
/// scheme's guarantees.
pub struct PseudoSearch {
    pub mode: SearchMode,
}

impl PseudoSearch {
    pub fn new(mode: SearchMode) -> Self {
        PseudoSearch { mode }
    }

    pub fn search_with_budget<D: RankDictionary>(
        &self,
        index: &BiFmIndex<D>,
        query: &[u8],
        k_min: usize,
        k_max: usize,
    ) -> Vec<(Hit, usize)> {
        let mut out = Vec::new();
        self.search_with_budget_into(index, query, k_min, k_max, &mut out);
        out
    }

    /// As [`Self::search_with_budget`], but writes into a caller-owned
    /// buffer instead of allocating a fresh `Vec`, so a driver that keeps
    /// one scratch buffer across calls (see [`BacktrackingWithBuffers`])
    /// doesn't pay for a new allocation per search.
    pub fn search_with_budget_into<D: RankDictionary>(
        &self,
        index: &BiFmIndex<D>,
        query: &[u8],
        k_min: usize,
        k_max: usize,
        out: &mut Vec<(Hit, usize)>,
    ) {
        out.clear();
        let mut seen = HashSet::new();
        let cursor = index.cursor_empty();
        self.walk(index, query, cursor, 0, k_max, k_min, k_max, out, &mut seen);
    }

    #[allow(clippy::too_many_arguments)]
    fn walk<D: RankDictionary>(
        &self,
        index: &BiFmIndex<D>,
        query: &[u8],
        cursor: BiCursor<'_, D>,
        query_pos: usize,
        remaining_budget: usize,
        k_min: usize,
        k_max: usize,
        out: &mut Vec<(Hit, usize)>,
        seen: &mut HashSet<Hit>,
    ) {
        let errors_so_far = k_max - remaining_budget;

        if query_pos == query.len() {
            if errors_so_far >= k_min && cursor.count() > 0 {
                for hit in cursor.locate() {
                    if seen.insert(hit) {
                        out.push((hit, errors_so_far));
                    }
                }
            }
            return;
        }

        let target_byte = query[query.len() - 1 - query_pos];
        let target_dense = index.alphabet().io_to_dense_representation(target_byte);

        for (dense, child) in cursor.extend_left_all().into_iter().enumerate() {
            if child.count() == 0 {
                continue;
            }
            if dense as u8 == target_dense {
                self.walk(
                    index, query, child, query_pos + 1, remaining_budget, k_min, k_max, out, seen,
                );
            } else if remaining_budget > 0 {
                self.walk(
                    index,
                    query,
                    child,
                    query_pos + 1,
                    remaining_budget - 1,
                    k_min,
                    k_max,
                    out,
                    seen,
                );
            }
        }

        if self.mode == SearchMode::Edit && remaining_budget > 0 {
            // deletion: text has a symbol the query doesn't, consume one
            // cursor extension without advancing query_pos.
            for (_, child) in cursor.extend_left_all().into_iter().enumerate() {
                if child.count() == 0 {
                    continue;
                }
                self.walk(
                    index,
                    query,
                    child,
                    query_pos,
                    remaining_budget - 1,
                    k_min,
                    k_max,
                    out,
                    seen,
                );
            }
            // insertion: query has a symbol the text doesn't, advance
            // query_pos without extending the cursor.
            self.walk(
                index,
                query,
                cursor,
                query_pos + 1,
                remaining_budget - 1,
                k_min,
                k_max,
                out,
                seen,
            );
        }
    }
}

/// Marker for which of the named `ng*` engines was requested; all variants
/// share one scheme-driven implementation ([`run_scheme`]) since none of
/// them differ in observable `count`/`locate` behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NgVariant {
    Ng12,
    Ng14,
    Ng15,
    Ng16,
    Ng17,
    Ng21,
    Ng22,
    Ng24,
    Ng25,
    Ng26,
}

pub struct NgEngine {
    pub variant: NgVariant,
}

impl NgEngine {
    pub fn new(variant: NgVariant) -> Self {
        NgEngine { variant }
    }
}

impl<D: RankDictionary> SearchDriver<D> for NgEngine {
    fn search(&self, index: &BiFmIndex<D>, query: &[u8], scheme: &Scheme) -> Vec<Hit> {
        run_scheme(index, query, scheme)
            .into_iter()
            .map(|(hit, _)| hit)
            .collect()
    }
}

impl<D: RankDictionary> ErrorAwareSearchDriver<D> for NgEngine {
    fn search_with_errors(
        &self,
        index: &BiFmIndex<D>,
        query: &[u8],
        scheme: &Scheme,
    ) -> Vec<(Hit, usize)> {
        run_scheme(index, query, scheme)
    }
}

/// Returns at most `n` hits.
pub fn search_n<D: RankDictionary>(
    driver: &impl SearchDriver<D>,
    index: &BiFmIndex<D>,
    query: &[u8],
    scheme: &Scheme,
    n: usize,
) -> Vec<Hit> {
    let mut hits = driver.search(index, query, scheme);
    hits.truncate(n);
    hits
}

/// The hit(s) with the fewest errors, or an empty vec if there are none.
pub fn search_best<D: RankDictionary>(
    driver: &impl ErrorAwareSearchDriver<D>,
    index: &BiFmIndex<D>,
    query: &[u8],
    scheme: &Scheme,
) -> Vec<Hit> {
    search_best_n(driver, index, query, scheme, usize::MAX)
}

/// Up to `n` hits tied for the fewest errors.
pub fn search_best_n<D: RankDictionary>(
    driver: &impl ErrorAwareSearchDriver<D>,
    index: &BiFmIndex<D>,
    query: &[u8],
    scheme: &Scheme,
    n: usize,
) -> Vec<Hit> {
    let mut with_errors = driver.search_with_errors(index, query, scheme);
    let Some(&best) = with_errors.iter().map(|(_, e)| e).min() else {
        return Vec::new();
    };
    with_errors.retain(|&(_, e)| e == best);
    with_errors.truncate(n);
    with_errors.into_iter().map(|(hit, _)| hit).collect()
}

/// Exact search (`k = 0`): the hits Hamming/edit distance zero away.
pub fn search_no_errors<D: RankDictionary>(index: &BiFmIndex<D>, query: &[u8]) -> Vec<Hit> {
    let scheme = generators::backtracking(0, 0);
    run_scheme(index, query, &scheme)
        .into_iter()
        .map(|(hit, _)| hit)
        .collect()
}

/// At most one Hamming-distance error.
pub fn search_one_error<D: RankDictionary>(index: &BiFmIndex<D>, query: &[u8]) -> Vec<Hit> {
    let scheme = generators::pigeon_opt(0, 1);
    run_scheme(index, query, &scheme)
        .into_iter()
        .map(|(hit, _)| hit)
        .collect()
}

type CacheKey = (usize, usize, usize, usize);

/// Wraps a generator function with a thread-local cache of the
/// [`ExpandedSearch`] sets it produces, keyed by `(k_min, k_max, query_len,
/// alphabet_size)` — resolving an ambiguity in the scheme the cache was
/// originally keyed on, which omitted `alphabet_size` even though
/// `node_count` (and so the scheme's effective cost) depends on it.
pub struct CachedSearch<G> {
    generator: G,
}

thread_local! {
    static EXPANSION_CACHE: RefCell<HashMap<CacheKey, Vec<ExpandedSearch>>> =
        RefCell::new(HashMap::new());
}

impl<G> CachedSearch<G>
where
    G: Fn(usize, usize) -> Scheme,
{
    pub fn new(generator: G) -> Self {
        CachedSearch { generator }
    }

    pub fn search<D: RankDictionary>(
        &self,
        index: &BiFmIndex<D>,
        query: &[u8],
        k_min: usize,
        k_max: usize,
    ) -> Vec<Hit> {
        let key = (k_min, k_max, query.len(), index.alphabet().num_dense_symbols());

        let expanded = EXPANSION_CACHE.with(|cache| {
            if let Some(hit) = cache.borrow().get(&key) {
                return hit.clone();
            }
            let scheme = (self.generator)(k_min, k_max);
            let expanded = scheme.expand(query.len());
            cache.borrow_mut().insert(key, expanded.clone());
            expanded
        });

        let mut out = Vec::new();
        let mut seen = HashSet::new();
        for expanded_search in &expanded {
            run_expanded_search(index, query, expanded_search, &mut out, &mut seen);
        }
        out.into_iter().map(|(hit, _)| hit).collect()
    }
}
