//! Schema module for Tabula.
//!
//! This module contains the column and table schema definitions.

mod column;
mod table;

pub use column::Column;
pub use table::{check_naming_rules, Schema, SchemaBuilder};
