//! Statement runner.
//!
//! The [`Executor`] interprets one [`Statement`] at a time against a shared
//! [`Storage`]. Each statement either runs to completion or returns the
//! first error it meets; structural changes and persistence are delegated to
//! the storage engine.

use super::context::{JoinedRow, RowContext, TableRow};
use super::evaluator::evaluate_predicate;
use super::join::NestedLoopJoin;
use super::project::ProjectExecutor;
use crate::ast::{ColumnDef, Expr, JoinClause, JoinKind, Select, Statement};
use crate::result::QueryResult;
use hashbrown::HashSet;
use std::sync::Arc;
use tabula_core::schema::{Column, Schema};
use tabula_core::{DataType, Error, Result, Row, Value};
use tabula_storage::Storage;
use tracing::debug;

/// Executes statements against a storage engine.
///
/// `Executor` is cheap to clone and safe to share between threads; all
/// synchronisation happens inside the storage engine.
#[derive(Clone, Debug)]
pub struct Executor {
    storage: Arc<Storage>,
}

impl Executor {
    /// Creates an executor over the given storage.
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    /// Returns the underlying storage.
    pub fn storage(&self) -> &Arc<Storage> {
        &self.storage
    }

    /// Executes one statement.
    pub fn execute(&self, statement: &Statement) -> Result<QueryResult> {
        debug!(
            kind = statement.kind(),
            table = statement.table(),
            "executing statement"
        );
        let result = match statement {
            Statement::CreateTable { table, columns } => self.create_table(table, columns),
            Statement::DropTable { table } => self.drop_table(table),
            Statement::Insert {
                table,
                columns,
                values,
            } => self.insert(table, columns.as_deref(), values),
            Statement::Select(select) => self.select(select),
            Statement::Update { table, set, filter } => self.update(table, set, filter.as_ref()),
            Statement::Delete { table, filter } => self.delete(table, filter.as_ref()),
        };
        if let Err(err) = &result {
            debug!(
                kind = statement.kind(),
                constraint = err.is_constraint_violation(),
                "statement failed: {}",
                err
            );
        }
        result
    }

    fn create_table(&self, name: &str, columns: &[ColumnDef]) -> Result<QueryResult> {
        let mut builder = Schema::builder(name)?;
        for def in columns {
            let data_type = DataType::from_name(&def.type_name, def.size)?;
            builder = builder.add_column(
                Column::new(def.name.clone(), data_type)
                    .primary_key(def.primary_key)
                    .unique(def.unique)
                    .not_null(def.not_null),
            )?;
        }
        self.storage.create_table(builder.build()?)?;
        Ok(QueryResult::status(
            format!("Table '{}' created successfully", name),
            0,
        ))
    }

    fn drop_table(&self, name: &str) -> Result<QueryResult> {
        self.storage.drop_table(name)?;
        Ok(QueryResult::status(
            format!("Table '{}' dropped successfully", name),
            0,
        ))
    }

    fn insert(
        &self,
        name: &str,
        columns: Option<&[String]>,
        values: &[Vec<Expr>],
    ) -> Result<QueryResult> {
        let table = self.storage.table(name)?;
        let schema = table.schema();

        let targets: Vec<usize> = match columns {
            Some(names) => {
                let mut seen = HashSet::with_capacity(names.len());
                names
                    .iter()
                    .map(|column| {
                        if !seen.insert(column.as_str()) {
                            return Err(Error::AlreadyExists {
                                kind: "column",
                                name: column.clone(),
                            });
                        }
                        schema.get_column_index(column)
                    })
                    .collect::<Result<_>>()?
            }
            None => (0..schema.column_count()).collect(),
        };

        let rows = values
            .iter()
            .map(|tuple| {
                if tuple.len() != targets.len() {
                    return Err(Error::ArityMismatch {
                        expected: targets.len(),
                        got: tuple.len(),
                    });
                }
                let mut row = Row::nulls(schema.column_count());
                for (&idx, expr) in targets.iter().zip(tuple) {
                    row.set(idx, constant_value(expr)?);
                }
                Ok(row)
            })
            .collect::<Result<Vec<Row>>>()?;

        let inserted = table.insert_rows(rows)?;
        Ok(QueryResult::status(
            format!("{} row(s) inserted", inserted),
            inserted,
        ))
    }

    fn select(&self, select: &Select) -> Result<QueryResult> {
        match select.joins.as_slice() {
            [] => self.select_single(select),
            [join] => self.select_join(select, join),
            joins => Err(Error::MultipleJoins(joins.len())),
        }
    }

    fn select_single(&self, select: &Select) -> Result<QueryResult> {
        let table = self.storage.table(&select.table)?;
        let schema = table.schema();
        let project = ProjectExecutor::for_table(schema, &select.columns)?;

        let mut matched = Vec::new();
        for row in table.select_rows() {
            if filter_matches(select.filter.as_ref(), &TableRow::new(schema, &row))? {
                matched.push(row);
            }
        }

        let rows = project.execute(matched);
        debug!(table = %select.table, rows = rows.len(), "selected rows");
        Ok(QueryResult::Rows {
            columns: project.into_headers(),
            rows,
        })
    }

    fn select_join(&self, select: &Select, join: &JoinClause) -> Result<QueryResult> {
        if join.kind != JoinKind::Inner {
            return Err(Error::UnsupportedExpression(join.kind.to_string()));
        }

        let left = self.storage.table(&select.table)?;
        let right = self.storage.table(&join.table)?;
        let (left_schema, right_schema) = (left.schema(), right.schema());
        let project = ProjectExecutor::for_join(left_schema, right_schema, &select.columns)?;

        // Each side is snapshotted independently.
        let left_rows = left.select_rows();
        let right_rows = right.select_rows();
        let joined =
            NestedLoopJoin::new().execute_with_predicate(&left_rows, &right_rows, |l, r| {
                let ctx = JoinedRow::new(
                    TableRow::new(left_schema, l),
                    TableRow::new(right_schema, r),
                );
                Ok(filter_matches(join.on.as_ref(), &ctx)?
                    && filter_matches(select.filter.as_ref(), &ctx)?)
            })?;

        let rows = project.execute(joined);
        debug!(
            left = %select.table,
            right = %join.table,
            rows = rows.len(),
            "joined rows"
        );
        Ok(QueryResult::Rows {
            columns: project.into_headers(),
            rows,
        })
    }

    fn update(
        &self,
        name: &str,
        set: &[(String, Expr)],
        filter: Option<&Expr>,
    ) -> Result<QueryResult> {
        let table = self.storage.table(name)?;
        let updates = set
            .iter()
            .map(|(column, expr)| Ok((column.clone(), constant_value(expr)?)))
            .collect::<Result<Vec<(String, Value)>>>()?;

        let schema = table.schema();
        let updated = table.update_rows(
            |row| filter_matches(filter, &TableRow::new(schema, row)),
            &updates,
        )?;
        Ok(QueryResult::status(
            format!("{} row(s) updated", updated),
            updated,
        ))
    }

    fn delete(&self, name: &str, filter: Option<&Expr>) -> Result<QueryResult> {
        let table = self.storage.table(name)?;
        let schema = table.schema();
        let deleted =
            table.delete_rows(|row| filter_matches(filter, &TableRow::new(schema, row)))?;
        Ok(QueryResult::status(
            format!("{} row(s) deleted", deleted),
            deleted,
        ))
    }
}

/// An absent filter matches every row.
fn filter_matches(filter: Option<&Expr>, ctx: &dyn RowContext) -> Result<bool> {
    filter.map_or(Ok(true), |expr| evaluate_predicate(expr, ctx))
}

/// Values in VALUES lists and SET clauses must be constants.
fn constant_value(expr: &Expr) -> Result<Value> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Null => Ok(Value::Null),
        other => Err(Error::UnsupportedExpression(format!(
            "{} is not a literal",
            other
        ))),
    }
}
