//! Data type definitions for Tabula.
//!
//! This module defines the closed set of column types a table can declare.

use crate::error::{Error, Result};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Supported column data types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// 64-bit signed integer
    Integer,
    /// UTF-8 string with an optional maximum length in characters
    Text(Option<usize>),
    /// Boolean type (true/false)
    Boolean,
    /// 64-bit floating point number
    Float,
}

impl DataType {
    /// Resolves a SQL type name (case-insensitive) and optional size.
    ///
    /// A size of zero means unbounded, matching `VARCHAR` without a length.
    pub fn from_name(name: &str, size: Option<usize>) -> Result<Self> {
        match name.to_ascii_uppercase().as_str() {
            "INTEGER" | "INT" => Ok(DataType::Integer),
            "VARCHAR" | "TEXT" => Ok(DataType::Text(size.filter(|&n| n > 0))),
            "BOOLEAN" | "BOOL" => Ok(DataType::Boolean),
            "FLOAT" | "REAL" | "DOUBLE" => Ok(DataType::Float),
            _ => Err(Error::UnsupportedType(name.to_string())),
        }
    }

    /// Returns the canonical SQL name of this type.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Text(_) => "VARCHAR",
            DataType::Boolean => "BOOLEAN",
            DataType::Float => "FLOAT",
        }
    }

    /// Returns the declared maximum length for bounded text columns.
    #[inline]
    pub fn max_length(&self) -> Option<usize> {
        match self {
            DataType::Text(max) => *max,
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Text(Some(n)) => write!(f, "VARCHAR({})", n),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(DataType::from_name("integer", None).unwrap(), DataType::Integer);
        assert_eq!(DataType::from_name("INT", None).unwrap(), DataType::Integer);
        assert_eq!(
            DataType::from_name("VARCHAR", Some(10)).unwrap(),
            DataType::Text(Some(10))
        );
        assert_eq!(DataType::from_name("varchar", Some(0)).unwrap(), DataType::Text(None));
        assert_eq!(DataType::from_name("Bool", None).unwrap(), DataType::Boolean);
        assert_eq!(DataType::from_name("REAL", None).unwrap(), DataType::Float);
    }

    #[test]
    fn test_from_name_unsupported() {
        let err = DataType::from_name("BLOB", None).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(name) if name == "BLOB"));
    }

    #[test]
    fn test_max_length() {
        assert_eq!(DataType::Text(Some(5)).max_length(), Some(5));
        assert_eq!(DataType::Text(None).max_length(), None);
        assert_eq!(DataType::Integer.max_length(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(DataType::Text(Some(10)).to_string(), "VARCHAR(10)");
        assert_eq!(DataType::Text(None).to_string(), "VARCHAR");
        assert_eq!(DataType::Float.to_string(), "FLOAT");
    }
}
