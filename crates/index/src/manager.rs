//! Index manager.
//!
//! Owns one [`BTree`] per indexed `(table, column)` pair. The map lock is held
//! only long enough to fetch an `Arc` to the tree; each tree serialises its own
//! writers.

use crate::btree::BTree;
use crate::error::IndexError;
use hashbrown::HashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tabula_core::{RowPosition, Value};
use tracing::debug;

type ColumnIndexes = HashMap<String, Arc<BTree>>;

/// Registry of every B-tree index, keyed by table then column.
///
/// Key operations on a column without an index are no-ops, so callers can
/// forward every column value without checking first. Null keys are never
/// stored.
#[derive(Debug, Default)]
pub struct IndexManager {
    indexes: RwLock<HashMap<String, ColumnIndexes>>,
}

impl IndexManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty index for a column.
    pub fn create_index(&self, table: &str, column: &str) -> Result<(), IndexError> {
        let mut indexes = self.indexes.write();
        let columns = indexes.entry(table.to_string()).or_default();
        if columns.contains_key(column) {
            return Err(IndexError::AlreadyExists {
                table: table.to_string(),
                column: column.to_string(),
            });
        }
        columns.insert(column.to_string(), Arc::new(BTree::new(column)));
        debug!(table, column, "created index");
        Ok(())
    }

    /// Removes the index for a column.
    pub fn drop_index(&self, table: &str, column: &str) -> Result<(), IndexError> {
        let mut indexes = self.indexes.write();
        let removed = indexes
            .get_mut(table)
            .and_then(|columns| columns.remove(column));
        if removed.is_none() {
            return Err(IndexError::NotFound {
                table: table.to_string(),
                column: column.to_string(),
            });
        }
        if indexes.get(table).is_some_and(|columns| columns.is_empty()) {
            indexes.remove(table);
        }
        debug!(table, column, "dropped index");
        Ok(())
    }

    /// Removes every index of a table. Returns how many were dropped.
    pub fn drop_table_indexes(&self, table: &str) -> usize {
        let dropped = self
            .indexes
            .write()
            .remove(table)
            .map_or(0, |columns| columns.len());
        if dropped > 0 {
            debug!(table, dropped, "dropped table indexes");
        }
        dropped
    }

    /// Returns the tree for a column, if one exists.
    pub fn get(&self, table: &str, column: &str) -> Option<Arc<BTree>> {
        self.indexes
            .read()
            .get(table)
            .and_then(|columns| columns.get(column))
            .cloned()
    }

    /// Returns true if the column is indexed.
    pub fn has_index(&self, table: &str, column: &str) -> bool {
        self.get(table, column).is_some()
    }

    /// Returns the indexed column names of a table, sorted.
    pub fn indexed_columns(&self, table: &str) -> Vec<String> {
        let mut columns: Vec<String> = self
            .indexes
            .read()
            .get(table)
            .map(|columns| columns.keys().cloned().collect())
            .unwrap_or_default();
        columns.sort();
        columns
    }

    /// Indexes a key for a row position.
    pub fn insert(
        &self,
        table: &str,
        column: &str,
        key: &Value,
        position: RowPosition,
    ) -> Result<(), IndexError> {
        match self.get(table, column) {
            Some(tree) if !key.is_null() => tree.insert(key.clone(), position),
            _ => Ok(()),
        }
    }

    /// Looks up the row position of a key.
    pub fn search(
        &self,
        table: &str,
        column: &str,
        key: &Value,
    ) -> Result<Option<RowPosition>, IndexError> {
        match self.get(table, column) {
            Some(tree) => tree.search(key),
            None => Ok(None),
        }
    }

    /// Removes a key. Returns true if it was present.
    pub fn delete(&self, table: &str, column: &str, key: &Value) -> Result<bool, IndexError> {
        match self.get(table, column) {
            Some(tree) => tree.delete(key),
            None => Ok(false),
        }
    }

    /// Points an existing key at a new row position.
    pub fn set_position(
        &self,
        table: &str,
        column: &str,
        key: &Value,
        position: RowPosition,
    ) -> Result<bool, IndexError> {
        match self.get(table, column) {
            Some(tree) => tree.set_position(key, position),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_drop_index() {
        let manager = IndexManager::new();
        manager.create_index("users", "id").unwrap();
        assert!(manager.has_index("users", "id"));
        assert!(matches!(
            manager.create_index("users", "id"),
            Err(IndexError::AlreadyExists { .. })
        ));

        manager.drop_index("users", "id").unwrap();
        assert!(!manager.has_index("users", "id"));
        assert!(matches!(
            manager.drop_index("users", "id"),
            Err(IndexError::NotFound { .. })
        ));
    }

    #[test]
    fn test_indexed_columns_sorted() {
        let manager = IndexManager::new();
        manager.create_index("t", "email").unwrap();
        manager.create_index("t", "id").unwrap();
        manager.create_index("t", "code").unwrap();
        manager.create_index("other", "x").unwrap();
        assert_eq!(manager.indexed_columns("t"), vec!["code", "email", "id"]);
        assert!(manager.indexed_columns("missing").is_empty());
    }

    #[test]
    fn test_drop_table_indexes() {
        let manager = IndexManager::new();
        manager.create_index("t", "a").unwrap();
        manager.create_index("t", "b").unwrap();
        manager.insert("t", "a", &Value::Integer(1), 0).unwrap();

        assert_eq!(manager.drop_table_indexes("t"), 2);
        assert_eq!(manager.drop_table_indexes("t"), 0);

        // A recreated index starts empty.
        manager.create_index("t", "a").unwrap();
        assert_eq!(manager.search("t", "a", &Value::Integer(1)).unwrap(), None);
    }

    #[test]
    fn test_pass_through_operations() {
        let manager = IndexManager::new();
        manager.create_index("t", "id").unwrap();
        let key = Value::Integer(7);

        manager.insert("t", "id", &key, 3).unwrap();
        assert_eq!(manager.search("t", "id", &key).unwrap(), Some(3));
        assert!(manager.set_position("t", "id", &key, 1).unwrap());
        assert_eq!(manager.search("t", "id", &key).unwrap(), Some(1));

        let err = manager.insert("t", "id", &key, 4).unwrap_err();
        assert!(matches!(err, IndexError::DuplicateKey { .. }));

        assert!(manager.delete("t", "id", &key).unwrap());
        assert!(!manager.delete("t", "id", &key).unwrap());
    }

    #[test]
    fn test_unindexed_column_is_noop() {
        let manager = IndexManager::new();
        let key = Value::Integer(1);
        manager.insert("t", "name", &key, 0).unwrap();
        manager.insert("t", "name", &key, 1).unwrap();
        assert_eq!(manager.search("t", "name", &key).unwrap(), None);
        assert!(!manager.delete("t", "name", &key).unwrap());
        assert!(!manager.set_position("t", "name", &key, 0).unwrap());
    }

    #[test]
    fn test_null_keys_skipped() {
        let manager = IndexManager::new();
        manager.create_index("t", "email").unwrap();
        manager.insert("t", "email", &Value::Null, 0).unwrap();
        manager.insert("t", "email", &Value::Null, 1).unwrap();
        assert_eq!(manager.get("t", "email").unwrap().len(), 0);
    }

    #[test]
    fn test_concurrent_inserts() {
        let manager = Arc::new(IndexManager::new());
        manager.create_index("t", "id").unwrap();

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let manager = Arc::clone(&manager);
                std::thread::spawn(move || {
                    for i in 0..250i64 {
                        let key = Value::Integer(t * 1000 + i);
                        manager.insert("t", "id", &key, i as usize).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let tree = manager.get("t", "id").unwrap();
        assert_eq!(tree.len(), 1000);
        tree.check_structure().unwrap();
    }
}
