//! Snapshot persistence.
//!
//! Each table is stored as one file, `<data_dir>/<table>.<extension>`,
//! holding the bincode-encoded schema followed by the bincode-encoded row
//! sequence. A save writes a temporary file and renames it over the old
//! snapshot, so readers never observe a half-written file.

use crate::config::StorageConfig;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tabula_core::schema::Schema;
use tabula_core::{Error, Result, Row};
use tracing::debug;

/// Extension used for in-flight snapshot writes.
const TMP_EXTENSION: &str = "tmp";

/// Reads and writes table snapshot files.
#[derive(Debug)]
pub struct SnapshotStore {
    dir: PathBuf,
    extension: String,
    sync_writes: bool,
}

impl SnapshotStore {
    /// Opens the store, creating the data directory if needed.
    pub fn open(config: &StorageConfig) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self {
            dir: config.data_dir.clone(),
            extension: config.file_extension.clone(),
            sync_writes: config.sync_on_write,
        })
    }

    /// Returns the data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the snapshot path for a table.
    pub fn path_for(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", table, self.extension))
    }

    /// Writes a full snapshot of a table.
    pub fn save(&self, schema: &Schema, rows: &[Row]) -> Result<()> {
        let table = schema.table_name();
        let path = self.path_for(table);
        let tmp_path = path.with_extension(format!("{}.{}", self.extension, TMP_EXTENSION));

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, schema).map_err(serialization)?;
        bincode::serialize_into(&mut writer, rows).map_err(serialization)?;
        writer.flush()?;

        if self.sync_writes {
            writer.get_ref().sync_all()?;
        }
        drop(writer);

        fs::rename(&tmp_path, &path)?;

        if self.sync_writes {
            if let Ok(dir) = File::open(&self.dir) {
                let _ = dir.sync_all();
            }
        }

        debug!(table, rows = rows.len(), "saved snapshot");
        Ok(())
    }

    /// Reads a table snapshot.
    pub fn load(&self, table: &str) -> Result<(Schema, Vec<Row>)> {
        let file = File::open(self.path_for(table))?;
        let mut reader = BufReader::new(file);
        let schema: Schema = bincode::deserialize_from(&mut reader).map_err(serialization)?;
        let rows: Vec<Row> = bincode::deserialize_from(&mut reader).map_err(serialization)?;
        Ok((schema, rows))
    }

    /// Deletes a table snapshot. A missing file is not an error.
    pub fn remove(&self, table: &str) -> Result<()> {
        match fs::remove_file(self.path_for(table)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Lists the tables that have a snapshot, sorted by name.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut tables = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str()) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                tables.push(stem.to_string());
            }
        }
        tables.sort();
        Ok(tables)
    }
}

fn serialization(err: bincode::Error) -> Error {
    Error::Serialization(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::schema::Column;
    use tabula_core::{DataType, Value};

    fn store(dir: &Path) -> SnapshotStore {
        SnapshotStore::open(&StorageConfig::new(dir)).unwrap()
    }

    fn schema(name: &str) -> Schema {
        Schema::builder(name)
            .unwrap()
            .add_column(Column::new("id", DataType::Integer).primary_key(true))
            .unwrap()
            .add_column(Column::new("name", DataType::Text(Some(10))))
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let rows = vec![
            Row::new(vec![Value::Integer(1), Value::Text("Alice".into())]),
            Row::new(vec![Value::Integer(2), Value::Null]),
        ];

        store.save(&schema("users"), &rows).unwrap();
        assert!(store.path_for("users").exists());

        let (loaded_schema, loaded_rows) = store.load("users").unwrap();
        assert_eq!(loaded_schema, schema("users"));
        assert_eq!(loaded_rows, rows);
    }

    #[test]
    fn test_save_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let row = Row::new(vec![Value::Integer(1), Value::Null]);

        store.save(&schema("t"), &[row.clone(), row.clone()]).unwrap();
        store.save(&schema("t"), &[row]).unwrap();
        assert_eq!(store.load("t").unwrap().1.len(), 1);
        // No temporary files are left behind.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_list_filters_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.save(&schema("beta"), &[]).unwrap();
        store.save(&schema("alpha"), &[]).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join("gamma.tbl.tmp"), "partial").unwrap();

        assert_eq!(store.list().unwrap(), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.remove("nope").unwrap();

        store.save(&schema("t"), &[]).unwrap();
        store.remove("t").unwrap();
        assert!(!store.path_for("t").exists());
    }

    #[test]
    fn test_load_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        fs::write(store.path_for("bad"), [0xffu8; 3]).unwrap();
        assert!(matches!(store.load("bad"), Err(Error::Serialization(_))));
        assert!(matches!(store.load("absent"), Err(Error::Io(_))));
    }

    #[test]
    fn test_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = SnapshotStore::open(&StorageConfig::new(&nested).with_sync_on_write(true)).unwrap();
        assert!(nested.is_dir());
        store.save(&schema("t"), &[]).unwrap();
        assert_eq!(store.dir(), nested.as_path());
    }
}
