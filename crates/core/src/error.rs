//! Error types for the Tabula engine.
//!
//! Every fallible operation in the workspace returns [`Result`]. Errors end the
//! current statement only; nothing in the engine aborts the process on bad
//! input.

use thiserror::Error;

/// Result type alias for Tabula operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Tabula operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A table, column or index does not exist.
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// A table, column or index already exists.
    #[error("{kind} already exists: {name}")]
    AlreadyExists { kind: &'static str, name: String },

    /// A row or value tuple has the wrong number of values.
    #[error("arity mismatch: expected {expected} values, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    /// A value does not match the declared column type.
    #[error("type mismatch on column {column}: {message}")]
    TypeMismatch { column: String, message: String },

    /// A null value was supplied for a NOT NULL column.
    #[error("column {column} cannot be NULL")]
    NullNotAllowed { column: String },

    /// A primary-key or unique value is already present.
    #[error("duplicate key in column {column}: {key}")]
    DuplicateKey { column: String, key: String },

    /// Two values of different dynamic types were compared.
    #[error("cannot compare {left} with {right}")]
    IncomparableTypes {
        left: &'static str,
        right: &'static str,
    },

    /// The expression is not allowed in this position.
    #[error("unsupported expression: {0}")]
    UnsupportedExpression(String),

    /// A SELECT named more than one join clause.
    #[error("multiple joins are not supported (got {0})")]
    MultipleJoins(usize),

    /// A table or column definition is malformed.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// A column definition named an unknown data type.
    #[error("unsupported data type: {0}")]
    UnsupportedType(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Snapshot encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a table not found error.
    pub fn table_not_found(name: impl Into<String>) -> Self {
        Error::NotFound {
            kind: "table",
            name: name.into(),
        }
    }

    /// Creates a column not found error.
    pub fn column_not_found(name: impl Into<String>) -> Self {
        Error::NotFound {
            kind: "column",
            name: name.into(),
        }
    }

    /// Creates a table already exists error.
    pub fn table_exists(name: impl Into<String>) -> Self {
        Error::AlreadyExists {
            kind: "table",
            name: name.into(),
        }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(column: impl Into<String>, message: impl Into<String>) -> Self {
        Error::TypeMismatch {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Creates a null constraint error.
    pub fn null_not_allowed(column: impl Into<String>) -> Self {
        Error::NullNotAllowed {
            column: column.into(),
        }
    }

    /// Creates a duplicate key error.
    pub fn duplicate_key(column: impl Into<String>, key: impl ToString) -> Self {
        Error::DuplicateKey {
            column: column.into(),
            key: key.to_string(),
        }
    }

    /// Creates an unsupported expression error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Error::UnsupportedExpression(message.into())
    }

    /// Returns true for constraint violations that leave stored data untouched.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Error::ArityMismatch { .. }
                | Error::TypeMismatch { .. }
                | Error::NullNotAllowed { .. }
                | Error::DuplicateKey { .. }
        )
    }
}
