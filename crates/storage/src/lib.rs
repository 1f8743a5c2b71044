//! Tabula Storage - Table storage and persistence for the Tabula engine.
//!
//! This crate provides the storage layer including:
//!
//! - `Storage`: The table catalogue, opened from a data directory
//! - `Table`: Rows of one table with constraint enforcement and index upkeep
//! - `SnapshotStore`: One snapshot file per table, replaced atomically
//! - `StorageConfig`: Data directory and write options, loadable from TOML
//!
//! # Example
//!
//! ```rust
//! use tabula_core::schema::{Column, Schema};
//! use tabula_core::{DataType, Row, Value};
//! use tabula_storage::{Storage, StorageConfig};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let storage = Storage::open(StorageConfig::new(dir.path())).unwrap();
//!
//! let schema = Schema::builder("users")
//!     .unwrap()
//!     .add_column(Column::new("id", DataType::Integer).primary_key(true))
//!     .unwrap()
//!     .add_column(Column::new("name", DataType::Text(Some(32))))
//!     .unwrap()
//!     .build()
//!     .unwrap();
//! let users = storage.create_table(schema).unwrap();
//!
//! users
//!     .insert_row(Row::new(vec![Value::Integer(1), Value::Text("Alice".into())]))
//!     .unwrap();
//! assert!(users
//!     .insert_row(Row::new(vec![Value::Integer(1), Value::Text("Bob".into())]))
//!     .is_err());
//! assert_eq!(users.select_rows().len(), 1);
//! ```

mod config;
mod engine;
mod snapshot;
mod table;

pub use config::StorageConfig;
pub use engine::Storage;
pub use snapshot::SnapshotStore;
pub use table::Table;
