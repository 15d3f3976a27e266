//! Error types for the SQL value bridge.

use std::io;
use thiserror::Error;

use crate::engine::NativeError;
use crate::types::{Representation, SqlTypeCode};

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for value access, streaming and parameter binding.
#[derive(Error, Debug)]
pub enum Error {
    /// Requested representation is outside the column's allowed set.
    #[error("Type mismatch: column declared as {declared} cannot be read as {requested}")]
    TypeMismatch {
        declared: SqlTypeCode,
        requested: Representation,
    },

    /// Strict accessor called on a NULL cell.
    #[error("Unexpected NULL value in column {column}")]
    NullValue { column: String },

    /// Fixed-width conversion or integer narrowing out of range.
    #[error("Overflow: {message}")]
    Overflow { message: String },

    /// Type category or stream operation with no defined mapping.
    #[error("Unsupported: {message}")]
    Unsupported { message: String },

    /// Error reported by the execution engine.
    #[error("Engine error {code}: {message}")]
    Native { code: i32, message: String },

    /// Column not found.
    #[error("Column not found: {name}")]
    ColumnNotFound { name: String },

    /// Column index out of bounds.
    #[error("Column index {index} out of bounds (columns: {count})")]
    ColumnIndexOutOfBounds { index: usize, count: usize },

    /// Value access attempted without a current row.
    #[error("No current row")]
    NoCurrentRow,

    /// Reader used after close.
    #[error("Reader is closed")]
    ReaderClosed,

    /// Invalid argument passed by the caller.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// I/O error while copying into a caller-supplied sink.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create an overflow error.
    pub fn overflow(message: impl Into<String>) -> Self {
        Self::Overflow {
            message: message.into(),
        }
    }

    /// Create an unsupported-operation error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(declared: SqlTypeCode, requested: Representation) -> Self {
        Self::TypeMismatch {
            declared,
            requested,
        }
    }
}

impl From<NativeError> for Error {
    fn from(err: NativeError) -> Self {
        Self::Native {
            code: err.code,
            message: err.message,
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => e,
            Error::Unsupported { .. } => io::Error::new(io::ErrorKind::Unsupported, err),
            Error::InvalidArgument { .. } => io::Error::new(io::ErrorKind::InvalidInput, err),
            other => io::Error::other(other),
        }
    }
}
