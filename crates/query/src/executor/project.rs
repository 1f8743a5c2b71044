//! Project executor.

use super::context::split_qualified;
use tabula_core::schema::Schema;
use tabula_core::{Error, Result, Row, Value};

fn is_wildcard(columns: &[String]) -> bool {
    matches!(columns, [only] if only == "*")
}

/// Project executor - projects specific columns from rows.
///
/// Column names are resolved once, up front, so an unknown column fails the
/// statement even when no rows match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectExecutor {
    /// Column indices to project.
    column_indices: Vec<usize>,
    /// Result column headers.
    headers: Vec<String>,
}

impl ProjectExecutor {
    /// Creates a new project executor.
    pub fn new(column_indices: Vec<usize>, headers: Vec<String>) -> Self {
        Self {
            column_indices,
            headers,
        }
    }

    /// Resolves a column list against one table. `*` selects every column in
    /// schema order.
    pub fn for_table(schema: &Schema, columns: &[String]) -> Result<Self> {
        if is_wildcard(columns) {
            return Ok(Self::new(
                (0..schema.column_count()).collect(),
                schema.columns().iter().map(|c| c.name().to_string()).collect(),
            ));
        }

        let mut indices = Vec::with_capacity(columns.len());
        for name in columns {
            let (table, column) = split_qualified(name);
            if let Some(table) = table {
                if table != schema.table_name() {
                    return Err(Error::table_not_found(table));
                }
            }
            indices.push(schema.get_column_index(column)?);
        }
        Ok(Self::new(indices, columns.to_vec()))
    }

    /// Resolves a column list against a joined row of `left` then `right`.
    ///
    /// `*` selects every column with `table.column` headers. Unqualified
    /// names are looked up in the left table first.
    pub fn for_join(left: &Schema, right: &Schema, columns: &[String]) -> Result<Self> {
        let offset = left.column_count();
        if is_wildcard(columns) {
            let headers = [left, right]
                .iter()
                .flat_map(|schema| {
                    schema
                        .columns()
                        .iter()
                        .map(move |c| format!("{}.{}", schema.table_name(), c.name()))
                })
                .collect();
            return Ok(Self::new(
                (0..offset + right.column_count()).collect(),
                headers,
            ));
        }

        let mut indices = Vec::with_capacity(columns.len());
        for name in columns {
            let idx = match split_qualified(name) {
                (Some(table), column) if table == left.table_name() => {
                    left.get_column_index(column)?
                }
                (Some(table), column) if table == right.table_name() => {
                    offset + right.get_column_index(column)?
                }
                (Some(table), _) => return Err(Error::table_not_found(table)),
                (None, column) => match left.get_column_index(column) {
                    Ok(idx) => idx,
                    Err(_) => offset + right.get_column_index(column)?,
                },
            };
            indices.push(idx);
        }
        Ok(Self::new(indices, columns.to_vec()))
    }

    /// Returns the result column headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Consumes the executor, returning the headers.
    pub fn into_headers(self) -> Vec<String> {
        self.headers
    }

    /// Executes the projection.
    pub fn execute(&self, rows: Vec<Row>) -> Vec<Vec<Value>> {
        rows.into_iter()
            .map(|row| {
                self.column_indices
                    .iter()
                    .map(|&idx| row.get(idx).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect()
    }
}
