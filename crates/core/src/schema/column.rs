//! Column definition for Tabula schemas.

use crate::error::{Error, Result};
use crate::types::DataType;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// A column definition in a table schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    name: String,
    /// Data type of the column.
    data_type: DataType,
    /// Whether this column is (part of) the primary key.
    primary_key: bool,
    /// Whether values in this column must be unique.
    unique: bool,
    /// Whether this column rejects null values.
    not_null: bool,
}

impl Column {
    /// Creates a new nullable, non-unique column definition.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            primary_key: false,
            unique: false,
            not_null: false,
        }
    }

    /// Marks this column as a primary key column.
    pub fn primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        self
    }

    /// Sets whether this column has unique values.
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Sets whether this column rejects nulls.
    pub fn not_null(mut self, not_null: bool) -> Self {
        self.not_null = not_null;
        self
    }

    /// Returns the column name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the data type.
    #[inline]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Returns the declared maximum length (Text columns only).
    #[inline]
    pub fn max_length(&self) -> Option<usize> {
        self.data_type.max_length()
    }

    /// Returns whether this column is a primary key column.
    #[inline]
    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// Returns whether this column has unique values.
    #[inline]
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Returns whether this column accepts nulls.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        !self.not_null
    }

    /// Returns whether this column is backed by a unique index.
    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.primary_key || self.unique
    }

    /// Validates a value against this column's type and nullability.
    pub fn validate(&self, value: &Value) -> Result<()> {
        if value.is_null() {
            return if self.is_nullable() {
                Ok(())
            } else {
                Err(Error::null_not_allowed(&self.name))
            };
        }

        if !value.matches_type(self.data_type) {
            return Err(Error::type_mismatch(
                &self.name,
                format!("expected {}, got {}", self.data_type.name(), value.kind_name()),
            ));
        }

        if let (Value::Text(s), Some(max)) = (value, self.max_length()) {
            let len = s.chars().count();
            if len > max {
                return Err(Error::type_mismatch(
                    &self.name,
                    format!("string length {} exceeds maximum {}", len, max),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_new() {
        let col = Column::new("id", DataType::Integer);
        assert_eq!(col.name(), "id");
        assert_eq!(col.data_type(), DataType::Integer);
        assert!(col.is_nullable());
        assert!(!col.is_unique());
        assert!(!col.is_indexed());
    }

    #[test]
    fn test_column_builder() {
        let col = Column::new("email", DataType::Text(Some(64)))
            .unique(true)
            .not_null(true);

        assert!(col.is_unique());
        assert!(!col.is_nullable());
        assert!(col.is_indexed());
        assert_eq!(col.max_length(), Some(64));
    }

    #[test]
    fn test_primary_key_accepts_null() {
        let col = Column::new("id", DataType::Integer).primary_key(true);
        assert!(col.is_nullable());
        assert!(col.validate(&Value::Null).is_ok());

        let col = col.not_null(true);
        assert!(matches!(
            col.validate(&Value::Null),
            Err(Error::NullNotAllowed { .. })
        ));
    }

    #[test]
    fn test_validate_types() {
        let int_col = Column::new("n", DataType::Integer);
        assert!(int_col.validate(&Value::Integer(3)).is_ok());
        assert!(int_col.validate(&Value::Null).is_ok());
        assert!(matches!(
            int_col.validate(&Value::Float(3.0)),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            int_col.validate(&Value::Text("3".into())),
            Err(Error::TypeMismatch { .. })
        ));

        let float_col = Column::new("f", DataType::Float);
        assert!(float_col.validate(&Value::Integer(1)).is_err());
        assert!(float_col.validate(&Value::Float(1.0)).is_ok());
    }

    #[test]
    fn test_validate_text_length() {
        let col = Column::new("v", DataType::Text(Some(3)));
        assert!(col.validate(&Value::Text("abc".into())).is_ok());
        // Length is measured in characters, not bytes.
        assert!(col.validate(&Value::Text("äöü".into())).is_ok());
        let err = col.validate(&Value::Text("abcd".into())).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum 3"));

        let unbounded = Column::new("v", DataType::Text(None));
        assert!(unbounded.validate(&Value::Text("x".repeat(1000))).is_ok());
    }

    #[test]
    fn test_validate_not_null() {
        let col = Column::new("flag", DataType::Boolean).not_null(true);
        assert!(matches!(
            col.validate(&Value::Null),
            Err(Error::NullNotAllowed { column }) if column == "flag"
        ));
        assert!(col.validate(&Value::Boolean(false)).is_ok());
    }
}
