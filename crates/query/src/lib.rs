//! Tabula Query - statement execution for the Tabula relational engine.
//!
//! This crate turns parsed statement trees into storage operations or
//! tabular results:
//!
//! - `ast`: statement and expression trees, as produced by an external parser
//! - `executor`: predicate evaluation, projection, nested-loop joins and the
//!   [`Executor`] that runs statements
//! - `result`: the [`QueryResult`] handed back to callers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tabula_query::ast::{ColumnDef, Expr, Select, Statement};
//! use tabula_query::Executor;
//! use tabula_storage::{Storage, StorageConfig};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let storage = Storage::open(StorageConfig::new(dir.path())).unwrap();
//! let exec = Executor::new(Arc::new(storage));
//!
//! exec.execute(&Statement::CreateTable {
//!     table: "t".into(),
//!     columns: vec![
//!         ColumnDef::new("id", "INTEGER").primary_key(),
//!         ColumnDef::new("v", "VARCHAR").size(10),
//!     ],
//! })
//! .unwrap();
//! exec.execute(&Statement::Insert {
//!     table: "t".into(),
//!     columns: None,
//!     values: vec![vec![Expr::literal(1), Expr::literal("x")]],
//! })
//! .unwrap();
//!
//! let result = exec
//!     .execute(&Statement::Select(
//!         Select::new("t").filter(Expr::eq(Expr::identifier("id"), Expr::literal(1))),
//!     ))
//!     .unwrap();
//! assert_eq!(result.rows().len(), 1);
//! ```

pub mod ast;
pub mod executor;
mod result;

pub use executor::Executor;
pub use result::QueryResult;
