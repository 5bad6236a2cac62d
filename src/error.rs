//! Errors of the fallible edges around the engine (input and output files)

use std::io;

/// Error raised while reading markers or writing clusters
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("no points found in input")]
    EmptyInput,

    #[error("invalid viewport: {0}")]
    InvalidViewport(String),
}

/// Result type used by the input and output helpers
pub type Result<T> = std::result::Result<T, Error>;
