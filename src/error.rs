//! Error taxonomy for the compressor core and its I/O-facing collaborators
//! (parser, persisted state).

use thiserror::Error;

/// Errors surfaced by the stream driver, the compressor facade, and state
/// persistence. The batch iterator and pattern dictionary never return
/// errors; they consume only validated inputs, so anything that would
/// indicate a bug in those layers is a `debug_assert!` instead.
#[derive(Error, Debug)]
pub enum Error {
    /// An input file could not be opened or read.
    #[error("I/O error")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// A `.graph` line could not be parsed, or named a vertex that was
    /// never declared while implicit vertices are disallowed.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A non-positive `batch_size`/`dict_size`, or another invalid
    /// construction parameter.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Persisted compressor state could not be (de)serialized.
    #[error("failed to (de)serialize compressor state")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
