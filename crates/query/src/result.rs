//! Statement results.

use tabula_core::Value;

/// The outcome of one statement.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryResult {
    /// Tabular output of a SELECT.
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
    /// Outcome of a statement that changes state.
    Status { message: String, rows_affected: usize },
}

impl QueryResult {
    /// Creates a status result.
    pub fn status(message: impl Into<String>, rows_affected: usize) -> Self {
        QueryResult::Status {
            message: message.into(),
            rows_affected,
        }
    }

    /// Returns true for tabular results.
    pub fn is_rows(&self) -> bool {
        matches!(self, QueryResult::Rows { .. })
    }

    /// Column headers; empty for status results.
    pub fn columns(&self) -> &[String] {
        match self {
            QueryResult::Rows { columns, .. } => columns,
            QueryResult::Status { .. } => &[],
        }
    }

    /// Result rows; empty for status results.
    pub fn rows(&self) -> &[Vec<Value>] {
        match self {
            QueryResult::Rows { rows, .. } => rows,
            QueryResult::Status { .. } => &[],
        }
    }

    /// Status message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            QueryResult::Status { message, .. } => Some(message),
            QueryResult::Rows { .. } => None,
        }
    }

    /// Rows affected by a status statement, or returned by a SELECT.
    pub fn rows_affected(&self) -> usize {
        match self {
            QueryResult::Rows { rows, .. } => rows.len(),
            QueryResult::Status { rows_affected, .. } => *rows_affected,
        }
    }
}
