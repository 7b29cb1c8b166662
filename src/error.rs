use std::result;

use thiserror::Error;

/// Errors surfaced at the core API boundary.
///
/// End-of-matrix and empty/short queries are deliberately absent here: both
/// are end-of-sequence / empty-result conditions, not failures.
#[derive(Error, Debug)]
pub enum Error {
    #[error("matrix file size {byte_len} bytes is inconsistent with declared {rows}x{cols}")]
    MalformedMatrixFile { rows: u64, cols: u64, byte_len: u64 },

    #[error("writer received more than {max_rows} rows")]
    MatrixOverflow { max_rows: u64 },

    #[error("writer sink is not empty ({byte_len} bytes)")]
    OutputNotEmpty { byte_len: u64 },

    #[error("dimension mismatch: left is {left:?}, right is {right:?}")]
    DimensionMismatch {
        left: (u64, u64),
        right: (u64, u64),
    },

    #[error("sample {name:?} already exists")]
    DuplicateSample { name: String },

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("io error")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T> = result::Result<T, Error>;
