use thiserror::Error;

/// Failures that can occur while constructing an index.
///
/// No partial index is ever retained: construction either returns a fully
/// consistent index or one of these errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("input sequence at position {sequence_index} contains the sentinel symbol")]
    SentinelInInput { sequence_index: usize },

    #[error(
        "concatenated text length {text_len} does not fit into the chosen index storage type (max {max})"
    )]
    TooLarge { text_len: usize, max: u64 },

    #[error("alphabet size {size} exceeds the supported maximum of {max}")]
    AlphabetExceeded { size: usize, max: usize },

    #[error("at least one sequence must be indexed")]
    EmptyInput,
}
