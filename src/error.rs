//! Error types shared across the crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can fail in a single invocation.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad weight or date syntax on the way in
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unrecognized graph range token
    #[error("invalid range `{0}` (expected 1m, 6m, 1y, all, or from:YYYY-MM-DD)")]
    InvalidRange(String),

    /// Database open/read/write failure, including malformed rows
    #[error("storage error: {0}")]
    Storage(String),

    /// Graph image could not be produced or written
    #[error("render error: {0}")]
    Render(String),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Storage(err.to_string())
    }
}
