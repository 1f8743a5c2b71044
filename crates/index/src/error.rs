//! Index error types.

use tabula_core::Error;
use thiserror::Error;

/// Errors raised by B-trees and the index manager.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IndexError {
    /// Attempted to insert a key that is already present.
    #[error("duplicate key in index on {column}: {key}")]
    DuplicateKey { column: String, key: String },

    /// Null values are never stored as keys.
    #[error("null key in index on {column}")]
    NullKey { column: String },

    /// Two keys of different kinds were compared.
    #[error("cannot compare {left} with {right}")]
    IncomparableTypes {
        left: &'static str,
        right: &'static str,
    },

    /// No index exists for the table and column.
    #[error("index not found: {table}.{column}")]
    NotFound { table: String, column: String },

    /// An index already exists for the table and column.
    #[error("index already exists: {table}.{column}")]
    AlreadyExists { table: String, column: String },
}

impl From<IndexError> for Error {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::DuplicateKey { column, key } => Error::DuplicateKey { column, key },
            IndexError::NullKey { column } => Error::NullNotAllowed { column },
            IndexError::IncomparableTypes { left, right } => {
                Error::IncomparableTypes { left, right }
            }
            IndexError::NotFound { table, column } => Error::NotFound {
                kind: "index",
                name: format!("{}.{}", table, column),
            },
            IndexError::AlreadyExists { table, column } => Error::AlreadyExists {
                kind: "index",
                name: format!("{}.{}", table, column),
            },
        }
    }
}
