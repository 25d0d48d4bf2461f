use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by tablemap operations.
///
/// One uniform storage/usage kind covers every engine-level failure; the
/// message carries the engine's diagnostic text when one is available.
/// Iterator misuse is a distinct out-of-range condition.
#[derive(Error, Debug)]
pub enum TableMapError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Failed open, prepare, bind, step or exec, with engine diagnostics.
    #[error("storage error: {0}")]
    Storage(String),

    /// A mutating operation was attempted on a read-only map.
    #[error("refusing to {0} read-only tablemap")]
    ReadOnly(&'static str),

    /// Strict lookup of a missing key.
    #[error("key {0} not found in database")]
    NotFound(String),

    /// The backing file's directory does not exist.
    #[error("directory does not exist: {0}")]
    DirectoryMissing(PathBuf),

    /// A file required to pre-exist (read-only mode, table enumeration) is missing.
    #[error("file does not exist: {0}")]
    FileMissing(PathBuf),

    /// Iterator misuse: advancing past the end or indexing past a completed result.
    #[error("out of range: {0}")]
    OutOfRange(String),
}

impl From<rusqlite::Error> for TableMapError {
    fn from(err: rusqlite::Error) -> Self {
        TableMapError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TableMapError>;
