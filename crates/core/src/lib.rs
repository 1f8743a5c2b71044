//! Tabula Core - Core types and schema definitions for the Tabula engine.
//!
//! This crate provides the foundational types shared by every other crate:
//!
//! - `DataType`: Supported column types (Integer, Text, Boolean, Float)
//! - `Value`: Runtime values that can be stored in a table cell
//! - `Row`: A positional row of values
//! - `schema`: Schema definitions (Column, Schema)
//! - `Error`: Error types for engine operations
//!
//! # Example
//!
//! ```rust
//! use tabula_core::{DataType, Row, Value};
//! use tabula_core::schema::{Column, Schema};
//!
//! let schema = Schema::builder("users")
//!     .unwrap()
//!     .add_column(Column::new("id", DataType::Integer).primary_key(true))
//!     .unwrap()
//!     .add_column(Column::new("name", DataType::Text(Some(32))))
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let row = Row::new(vec![Value::Integer(1), Value::Text("Alice".into())]);
//! assert!(schema.validate_row(&row).is_ok());
//! assert_eq!(row.get(1), Some(&Value::Text("Alice".into())));
//! ```

mod error;
mod row;
pub mod schema;
mod types;
mod value;

pub use error::{Error, Result};
pub use row::{Row, RowPosition};
pub use types::DataType;
pub use value::Value;
