//! Tabula Index - B-tree indexes for the Tabula engine.
//!
//! This crate provides:
//!
//! - `BTree`: a unique, ordered map from one column's values to row positions
//! - `IndexManager`: the registry owning one tree per indexed column
//! - `IndexError`: index-level failures, convertible into `tabula_core::Error`
//!
//! # Example
//!
//! ```rust
//! use tabula_core::Value;
//! use tabula_index::IndexManager;
//!
//! let manager = IndexManager::new();
//! manager.create_index("users", "id").unwrap();
//!
//! manager.insert("users", "id", &Value::Integer(10), 0).unwrap();
//! manager.insert("users", "id", &Value::Integer(20), 1).unwrap();
//! assert_eq!(manager.search("users", "id", &Value::Integer(20)).unwrap(), Some(1));
//!
//! // Duplicate keys are rejected.
//! assert!(manager.insert("users", "id", &Value::Integer(10), 2).is_err());
//! ```

pub mod btree;
pub mod comparator;
mod error;
mod manager;

pub use btree::{BTree, DEGREE};
pub use error::IndexError;
pub use manager::IndexManager;
