//! Name resolution for predicate evaluation.

use tabula_core::schema::Schema;
use tabula_core::{Error, Result, Row, Value};

/// Resolves identifiers to the values of the row under evaluation.
pub trait RowContext {
    /// Resolves `column` or `table.column`.
    fn resolve(&self, name: &str) -> Result<&Value>;
}

/// Splits `table.column` into its parts.
#[inline]
pub(crate) fn split_qualified(name: &str) -> (Option<&str>, &str) {
    match name.split_once('.') {
        Some((table, column)) => (Some(table), column),
        None => (None, name),
    }
}

/// One row of one table.
#[derive(Clone, Copy, Debug)]
pub struct TableRow<'a> {
    schema: &'a Schema,
    row: &'a Row,
}

impl<'a> TableRow<'a> {
    pub fn new(schema: &'a Schema, row: &'a Row) -> Self {
        Self { schema, row }
    }

    #[inline]
    fn table_name(&self) -> &str {
        self.schema.table_name()
    }

    fn column(&self, column: &str) -> Option<&'a Value> {
        self.schema
            .get_column_index(column)
            .ok()
            .and_then(|idx| self.row.get(idx))
    }
}

impl RowContext for TableRow<'_> {
    fn resolve(&self, name: &str) -> Result<&Value> {
        let (table, column) = split_qualified(name);
        if let Some(table) = table {
            if table != self.table_name() {
                return Err(Error::table_not_found(table));
            }
        }
        self.column(column)
            .ok_or_else(|| Error::column_not_found(name))
    }
}

/// A left and right row under a join condition.
///
/// Unqualified names are looked up in the left table first.
#[derive(Clone, Copy, Debug)]
pub struct JoinedRow<'a> {
    left: TableRow<'a>,
    right: TableRow<'a>,
}

impl<'a> JoinedRow<'a> {
    pub fn new(left: TableRow<'a>, right: TableRow<'a>) -> Self {
        Self { left, right }
    }
}

impl RowContext for JoinedRow<'_> {
    fn resolve(&self, name: &str) -> Result<&Value> {
        let found = match split_qualified(name) {
            (Some(table), column) if table == self.left.table_name() => self.left.column(column),
            (Some(table), column) if table == self.right.table_name() => {
                self.right.column(column)
            }
            (Some(table), _) => return Err(Error::table_not_found(table)),
            (None, column) => self
                .left
                .column(column)
                .or_else(|| self.right.column(column)),
        };
        found.ok_or_else(|| Error::column_not_found(name))
    }
}
