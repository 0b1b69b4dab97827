//! Error types shared across the pantry layers.
//!
//! [`LoadError`] never escapes the cache: a failed reload is logged and turned
//! into "no data". [`QueryError`] is what the HTTP layer maps to a status code.

use std::path::PathBuf;

/// Failure to read or parse the source table.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Malformed delimited content (including invalid UTF-8), or an I/O
    /// failure part-way through the read.
    #[error("failed to parse {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("{} has no header row", path.display())]
    MissingHeader { path: PathBuf },
    /// A data row carries more fields than the header declares.
    #[error("line {line}: expected {expected} fields, found {found}")]
    RowTooWide {
        line: u64,
        expected: usize,
        found: usize,
    },
    /// The source panicked or was otherwise unable to report a proper error.
    #[error("source aborted: {0}")]
    Aborted(String),
}

/// Failure to answer a query against the cache.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// No snapshot has ever been loaded successfully.
    #[error("Unable to load food data")]
    Unavailable,
    #[error("invalid value for `{name}`: {value:?} (expected a positive integer)")]
    InvalidParameter { name: &'static str, value: String },
}
