//! Approximate search: the scheme algebra (C6), the named scheme generators
//! (C7), and the search drivers that walk an index guided by a scheme (C8).
//!
//! Entirely new relative to genedex (which only implements exact backward
//! search); grounded on
//! `examples/original_source/src/search_schemes/` and
//! `src/fmindex-collection/{oss,search}/` for the algebra and the ten named
//! generators, and on the same directories' `search/*.h` drivers for the
//! driver contract.

pub mod drivers;
pub mod generators;
pub mod scheme;

pub use drivers::{
    search_best, search_best_n, search_n, search_no_errors, search_one_error, Backtracking,
    BacktrackingWithBuffers, CachedSearch, ErrorAwareSearchDriver, NgEngine, NgVariant,
    PseudoSearch, SearchDriver, SearchMode,
};
pub use scheme::{ExpandedSearch, Scheme, Search};
