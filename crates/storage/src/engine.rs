//! Storage engine: the catalogue of tables.

use crate::config::StorageConfig;
use crate::snapshot::SnapshotStore;
use crate::table::Table;
use hashbrown::HashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tabula_core::schema::{check_naming_rules, Schema};
use tabula_core::{Error, Result, Row};
use tabula_index::IndexManager;
use tracing::{info, warn};

/// Owns every table, the index manager and the snapshot store.
///
/// The catalogue lock is held only to look up or register a table; row
/// operations go through the returned [`Table`] handle.
pub struct Storage {
    config: StorageConfig,
    tables: RwLock<HashMap<String, Arc<Table>>>,
    indexes: Arc<IndexManager>,
    snapshots: Arc<SnapshotStore>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("data_dir", &self.config.data_dir)
            .field("tables", &self.list_tables())
            .finish()
    }
}

impl Storage {
    /// Opens storage, loading every table snapshot in the data directory and
    /// rebuilding its indexes.
    pub fn open(config: StorageConfig) -> Result<Self> {
        let snapshots = Arc::new(SnapshotStore::open(&config)?);
        let storage = Self {
            config,
            tables: RwLock::new(HashMap::new()),
            indexes: Arc::new(IndexManager::new()),
            snapshots,
        };
        storage.load_tables()?;
        Ok(storage)
    }

    /// Returns the configuration this storage was opened with.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Returns the index manager shared by all tables.
    pub fn indexes(&self) -> &Arc<IndexManager> {
        &self.indexes
    }

    /// Creates an empty table with one index per primary-key or unique
    /// column. On failure nothing is registered.
    pub fn create_table(&self, schema: Schema) -> Result<Arc<Table>> {
        check_naming_rules(schema.table_name())?;
        let name = schema.table_name().to_string();
        let mut tables = self.tables.write();
        if tables.contains_key(&name) {
            return Err(Error::table_exists(name));
        }

        let table = self.register(schema, Vec::new())?;
        if let Err(err) = table.save() {
            warn!(table = %name, "create failed, rolling back: {}", err);
            self.indexes.drop_table_indexes(&name);
            return Err(err);
        }

        tables.insert(name.clone(), Arc::clone(&table));
        info!(table = %name, columns = table.schema().column_count(), "created table");
        Ok(table)
    }

    /// Drops a table, its indexes and its snapshot file.
    pub fn drop_table(&self, name: &str) -> Result<()> {
        let mut tables = self.tables.write();
        let table = tables.remove(name).ok_or_else(|| Error::table_not_found(name))?;

        table.mark_dropped();
        self.indexes.drop_table_indexes(name);
        self.snapshots.remove(name)?;
        info!(table = name, "dropped table");
        Ok(())
    }

    /// Returns a handle to a table.
    pub fn table(&self, name: &str) -> Result<Arc<Table>> {
        self.tables
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::table_not_found(name))
    }

    /// Returns true if the table exists.
    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.read().contains_key(name)
    }

    /// Returns all table names, sorted.
    pub fn list_tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Writes a snapshot of every table.
    pub fn save_all_tables(&self) -> Result<()> {
        let tables: Vec<Arc<Table>> = self.tables.read().values().cloned().collect();
        for table in tables {
            table.save()?;
        }
        Ok(())
    }

    /// Creates the indexes for a schema and wraps it in a table with the
    /// given rows, indexing them. Leaves no indexes behind on failure.
    fn register(&self, schema: Schema, rows: Vec<Row>) -> Result<Arc<Table>> {
        let name = schema.table_name().to_string();
        let columns: Vec<String> = schema
            .indexed_columns()
            .map(|(_, col)| col.name().to_string())
            .collect();

        let table = Arc::new(Table::new(
            schema,
            rows,
            Arc::clone(&self.indexes),
            Arc::clone(&self.snapshots),
        ));
        let result = columns
            .iter()
            .try_for_each(|column| self.indexes.create_index(&name, column).map_err(Error::from))
            .and_then(|()| table.rebuild_indexes());
        if let Err(err) = result {
            self.indexes.drop_table_indexes(&name);
            return Err(err);
        }
        Ok(table)
    }

    fn load_tables(&self) -> Result<()> {
        let mut tables = self.tables.write();
        for name in self.snapshots.list()? {
            let (schema, rows) = self.snapshots.load(&name)?;
            if schema.table_name() != name {
                return Err(Error::InvalidSchema(format!(
                    "snapshot {} holds table {}",
                    self.snapshots.path_for(&name).display(),
                    schema.table_name()
                )));
            }
            for row in &rows {
                schema.validate_row(row)?;
            }
            let row_count = rows.len();
            let table = self.register(schema, rows)?;
            tables.insert(name.clone(), table);
            info!(table = %name, rows = row_count, "loaded table");
        }
        Ok(())
    }
}
