//! Persistence. `savefile` (binary, versioned, derive-based) is the default
//! path for whole indices, kept exactly as genedex uses it
//! (`examples/feldroop-genedex/src/lib.rs`'s `save_to_writer`/
//! `load_from_reader` pair, here extended to the three index shapes and
//! the rank-dictionary family this crate adds).
//!
//! With the `serde` feature, the small metadata types (`Alphabet`,
//! `search::Search`, `search::Scheme`) additionally support JSON
//! interchange, grounded on `ajalab-fm-index`'s pervasive `serde` derives
//! and `rust-bio`'s use of `serde_json` for sidecar metadata — these are
//! not performance-sensitive and benefit from a human-readable format a
//! pipeline's other tooling can read without linking this crate.

#[cfg(feature = "savefile")]
mod binary {
    use std::io::{Read, Write};
    use std::path::Path;

    use savefile::SavefileError;

    use crate::fmindex::{BiFmIndex, FmIndex, RevFmIndex};
    use crate::rank::ConstructibleRankDictionary;

    const VERSION: u32 = 0;

    /// Binary save/load via `savefile`, available for any rank dictionary
    /// that itself derives `Savefile` (every variant in [`crate::rank`]
    /// does).
    pub trait Persist: Sized {
        fn save_to_writer(&self, writer: &mut impl Write) -> Result<(), SavefileError>;
        fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SavefileError>;
        fn load_from_reader(reader: &mut impl Read) -> Result<Self, SavefileError>;
        fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SavefileError>;
    }

    macro_rules! impl_persist {
        ($ty:ident) => {
            impl<D> Persist for $ty<D>
            where
                D: ConstructibleRankDictionary + savefile::Savefile,
            {
                fn save_to_writer(&self, writer: &mut impl Write) -> Result<(), SavefileError> {
                    savefile::save(writer, VERSION, self)
                }

                fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SavefileError> {
                    savefile::save_file(path, VERSION, self)
                }

                fn load_from_reader(reader: &mut impl Read) -> Result<Self, SavefileError> {
                    savefile::load(reader, VERSION)
                }

                fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SavefileError> {
                    savefile::load_file(path, VERSION)
                }
            }
        };
    }

    impl_persist!(FmIndex);
    impl_persist!(RevFmIndex);
    impl_persist!(BiFmIndex);
}

#[cfg(feature = "savefile")]
pub use binary::Persist;

/// JSON interchange for the small metadata types, via `serde_json`.
#[cfg(feature = "serde")]
pub mod json {
    use crate::alphabet::Alphabet;
    use crate::search::{Scheme, Search};
    use serde::{Serialize, de::DeserializeOwned};
    use serde_json::Error as JsonError;

    pub fn to_string<T: Serialize>(value: &T) -> Result<String, JsonError> {
        serde_json::to_string_pretty(value)
    }

    pub fn from_str<T: DeserializeOwned>(s: &str) -> Result<T, JsonError> {
        serde_json::from_str(s)
    }

    /// Convenience re-export so callers don't need to name the type
    /// parameter explicitly for the common cases.
    pub fn alphabet_to_string(alphabet: &Alphabet) -> Result<String, JsonError> {
        to_string(alphabet)
    }

    pub fn alphabet_from_str(s: &str) -> Result<Alphabet, JsonError> {
        from_str(s)
    }

    pub fn scheme_to_string(scheme: &Scheme) -> Result<String, JsonError> {
        to_string(scheme)
    }

    pub fn scheme_from_str(s: &str) -> Result<Scheme, JsonError> {
        from_str(s)
    }

    pub fn search_to_string(search: &Search) -> Result<String, JsonError> {
        to_string(search)
    }

    pub fn search_from_str(s: &str) -> Result<Search, JsonError> {
        from_str(s)
    }
}

#[cfg(test)]
mod tests {
    #[cfg(feature = "savefile")]
    use super::Persist;
    #[cfg(feature = "serde")]
    use super::json;
    use crate::alphabet;
    use crate::config::FmIndexConfig;
    use crate::rank::naive::NaiveRankDictionary;

    #[cfg(feature = "savefile")]
    #[test]
    fn fmindex_roundtrips_through_a_byte_buffer() {
        use crate::fmindex::FmIndex;
        let index = FmIndexConfig::<NaiveRankDictionary>::new()
            .construct_index([b"ACGTACGT".as_slice()], alphabet::ascii_dna());

        let mut buf = Vec::new();
        index.save_to_writer(&mut buf).unwrap();

        let loaded = FmIndex::<NaiveRankDictionary>::load_from_reader(&mut buf.as_slice()).unwrap();
        assert_eq!(loaded.count(b"ACGT"), index.count(b"ACGT"));
        assert_eq!(loaded.size(), index.size());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn alphabet_roundtrips_through_json() {
        let alphabet = alphabet::ascii_dna();
        let json = json::alphabet_to_string(&alphabet).unwrap();
        let restored = json::alphabet_from_str(&json).unwrap();
        assert_eq!(
            restored.io_to_dense_representation(b'A'),
            alphabet.io_to_dense_representation(b'A')
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn scheme_roundtrips_through_json() {
        use crate::search::generators;

        let scheme = generators::pigeon_opt(0, 2);
        let json = json::scheme_to_string(&scheme).unwrap();
        let restored = json::scheme_from_str(&json).unwrap();
        assert_eq!(restored.searches.len(), scheme.searches.len());
    }
}
