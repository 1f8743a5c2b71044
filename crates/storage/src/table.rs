//! Table storage.
//!
//! A [`Table`] owns its schema and row sequence. Every mutation validates
//! first, then applies row changes and index deltas under the table's write
//! lock, then persists a snapshot before releasing the lock. Index locks are
//! only ever taken while the table lock is held, never the other way round.

use crate::snapshot::SnapshotStore;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tabula_core::schema::Schema;
use tabula_core::{Error, Result, Row, RowPosition, Value};
use tabula_index::IndexManager;
use tracing::{debug, warn};

/// A table: schema plus an ordered sequence of rows.
///
/// A row's position in the sequence is its only identity. Deleting rows
/// compacts the sequence and shifts later positions down.
pub struct Table {
    schema: Schema,
    rows: RwLock<Vec<Row>>,
    indexes: Arc<IndexManager>,
    snapshots: Arc<SnapshotStore>,
    /// `(column position, column name)` of every indexed column.
    indexed: Vec<(usize, String)>,
    /// Set once the table is dropped; later writes fail with `NotFound`.
    dropped: AtomicBool,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.schema.table_name())
            .field("rows", &self.rows.read().len())
            .finish()
    }
}

impl Table {
    pub(crate) fn new(
        schema: Schema,
        rows: Vec<Row>,
        indexes: Arc<IndexManager>,
        snapshots: Arc<SnapshotStore>,
    ) -> Self {
        let indexed = schema
            .indexed_columns()
            .map(|(pos, col)| (pos, col.name().to_string()))
            .collect();
        Self {
            schema,
            rows: RwLock::new(rows),
            indexes,
            snapshots,
            indexed,
            dropped: AtomicBool::new(false),
        }
    }

    /// Returns the table schema.
    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the table name.
    #[inline]
    pub fn name(&self) -> &str {
        self.schema.table_name()
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts a single row.
    pub fn insert_row(&self, row: Row) -> Result<()> {
        self.insert_rows(vec![row]).map(|_| ())
    }

    /// Inserts rows atomically: either every row is appended or none is.
    ///
    /// Arity, type and null checks run for every row before the table is
    /// touched. Uniqueness is checked through the indexes as each row is
    /// appended; a violation rolls back the rows (and keys) this call added.
    pub fn insert_rows(&self, rows: Vec<Row>) -> Result<usize> {
        for row in &rows {
            self.schema.validate_row(row)?;
        }

        let mut guard = self.rows.write();
        self.ensure_live()?;

        let start = guard.len();
        let count = rows.len();
        for row in rows {
            let position = guard.len();
            if let Err(err) = self.index_row(&row, position) {
                warn!(
                    table = self.name(),
                    rolled_back = guard.len() - start,
                    "insert failed, rolling back: {}",
                    err
                );
                self.truncate(&mut guard, start);
                return Err(err);
            }
            guard.push(row);
        }

        self.persist(&guard)?;
        debug!(table = self.name(), count, "inserted rows");
        Ok(count)
    }

    /// Returns a copy of every row, in position order.
    pub fn select_rows(&self) -> Vec<Row> {
        self.rows.read().clone()
    }

    /// Sets columns of every row matching `predicate`.
    ///
    /// Nothing is modified unless every target column exists, every value
    /// fits its column, the predicate succeeds on every row, and no changed
    /// primary-key or unique value would collide. Returns the number of
    /// matched rows.
    pub fn update_rows<P>(&self, mut predicate: P, updates: &[(String, Value)]) -> Result<usize>
    where
        P: FnMut(&Row) -> Result<bool>,
    {
        let mut targets = Vec::with_capacity(updates.len());
        for (name, value) in updates {
            let idx = self.schema.get_column_index(name)?;
            self.schema.columns()[idx].validate(value)?;
            targets.push((idx, value));
        }

        let mut guard = self.rows.write();
        self.ensure_live()?;

        let mut matched = Vec::new();
        for (position, row) in guard.iter().enumerate() {
            if predicate(row)? {
                matched.push(position);
            }
        }

        for &(idx, value) in &targets {
            let Some(column) = self.indexed_name(idx) else {
                continue;
            };
            if value.is_null() || matched.is_empty() {
                continue;
            }
            // Every matched row receives the same value.
            if matched.len() > 1 {
                return Err(Error::duplicate_key(column, value));
            }
            if let Some(owner) = self.indexes.search(self.name(), column, value)? {
                if owner != matched[0] {
                    return Err(Error::duplicate_key(column, value));
                }
            }
        }

        for &position in &matched {
            for &(idx, value) in &targets {
                let old = guard[position].values()[idx].clone();
                if let Some(column) = self.indexed_name(idx) {
                    if &old != value {
                        self.indexes.delete(self.name(), column, &old)?;
                        self.indexes.insert(self.name(), column, value, position)?;
                    }
                }
                guard[position].set(idx, value.clone());
            }
        }

        self.persist(&guard)?;
        debug!(table = self.name(), matched = matched.len(), "updated rows");
        Ok(matched.len())
    }

    /// Removes every row matching `predicate` and compacts the sequence.
    ///
    /// Returns the number of removed rows.
    pub fn delete_rows<P>(&self, mut predicate: P) -> Result<usize>
    where
        P: FnMut(&Row) -> Result<bool>,
    {
        let mut guard = self.rows.write();
        self.ensure_live()?;

        let doomed = guard
            .iter()
            .map(&mut predicate)
            .collect::<Result<Vec<bool>>>()?;

        let old_rows = std::mem::take(&mut *guard);
        let mut kept = Vec::with_capacity(old_rows.len());
        let mut removed = 0;
        for (old_position, (row, delete)) in old_rows.into_iter().zip(doomed).enumerate() {
            if delete {
                self.unindex_row(&row);
                removed += 1;
                continue;
            }
            let new_position = kept.len();
            if new_position != old_position {
                self.reposition_row(&row, new_position);
            }
            kept.push(row);
        }
        *guard = kept;

        self.persist(&guard)?;
        debug!(table = self.name(), removed, "deleted rows");
        Ok(removed)
    }

    /// Writes a snapshot of the current rows.
    pub fn save(&self) -> Result<()> {
        let guard = self.rows.read();
        self.snapshots.save(&self.schema, &guard)
    }

    /// Indexes every stored row. Used when loading a snapshot.
    pub(crate) fn rebuild_indexes(&self) -> Result<()> {
        let guard = self.rows.read();
        for (position, row) in guard.iter().enumerate() {
            self.index_row(row, position)?;
        }
        Ok(())
    }

    /// Marks the table dropped. Holds the write lock so no mutation is in
    /// flight when the caller removes the snapshot.
    pub(crate) fn mark_dropped(&self) {
        let _guard = self.rows.write();
        self.dropped.store(true, Ordering::Release);
    }

    fn ensure_live(&self) -> Result<()> {
        if self.dropped.load(Ordering::Acquire) {
            return Err(Error::table_not_found(self.name()));
        }
        Ok(())
    }

    fn indexed_name(&self, column: usize) -> Option<&str> {
        self.indexed
            .iter()
            .find(|(idx, _)| *idx == column)
            .map(|(_, name)| name.as_str())
    }

    /// Indexes one row's keys. On failure the keys this call added are
    /// removed again.
    fn index_row(&self, row: &Row, position: RowPosition) -> Result<()> {
        for (n, (idx, column)) in self.indexed.iter().enumerate() {
            if let Err(err) = self
                .indexes
                .insert(self.name(), column, &row.values()[*idx], position)
            {
                for (idx, column) in &self.indexed[..n] {
                    self.unindex_key(column, &row.values()[*idx]);
                }
                return Err(err.into());
            }
        }
        Ok(())
    }

    fn unindex_row(&self, row: &Row) {
        for (idx, column) in &self.indexed {
            self.unindex_key(column, &row.values()[*idx]);
        }
    }

    fn unindex_key(&self, column: &str, key: &Value) {
        if let Err(err) = self.indexes.delete(self.name(), column, key) {
            warn!(table = self.name(), column, "unindex failed: {}", err);
        }
    }

    fn reposition_row(&self, row: &Row, position: RowPosition) {
        for (idx, column) in &self.indexed {
            let key = &row.values()[*idx];
            if let Err(err) = self.indexes.set_position(self.name(), column, key, position) {
                warn!(table = self.name(), column = column.as_str(), "reposition failed: {}", err);
            }
        }
    }

    /// Drops rows from `len` onwards together with their keys.
    fn truncate(&self, rows: &mut Vec<Row>, len: usize) {
        for row in &rows[len..] {
            self.unindex_row(row);
        }
        rows.truncate(len);
    }

    fn persist(&self, rows: &[Row]) -> Result<()> {
        self.snapshots.save(&self.schema, rows).map_err(|err| {
            warn!(table = self.name(), "snapshot failed: {}", err);
            err
        })
    }
}
