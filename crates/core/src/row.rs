//! Row structure for Tabula.
//!
//! A row is a positional list of values aligned to its table's columns. Rows
//! carry no identifier of their own: a row's position in the table's sequence
//! is its only identity.

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Position of a row within its table's current row sequence.
pub type RowPosition = usize;

/// A row in a table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Values stored in this row, indexed by column position.
    values: Vec<Value>,
}

impl Row {
    /// Creates a new row with the given values.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Creates a row of `len` null values.
    pub fn nulls(len: usize) -> Self {
        Self {
            values: vec![Value::Null; len],
        }
    }

    /// Returns a reference to the values.
    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Consumes the row and returns its values.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Gets a value at the given column index.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Sets a value at the given column index.
    pub fn set(&mut self, index: usize, value: Value) -> bool {
        if index < self.values.len() {
            self.values[index] = value;
            true
        } else {
            false
        }
    }

    /// Returns the number of values in this row.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this row has no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_new() {
        let row = Row::new(vec![Value::Integer(42), Value::Text("Alice".into())]);
        assert_eq!(row.len(), 2);
        assert!(!row.is_empty());
    }

    #[test]
    fn test_row_nulls() {
        let row = Row::nulls(3);
        assert_eq!(row.len(), 3);
        assert!(row.values().iter().all(Value::is_null));
    }

    #[test]
    fn test_row_get_value() {
        let row = Row::new(vec![Value::Integer(1), Value::Text("Alice".into())]);
        assert_eq!(row.get(0), Some(&Value::Integer(1)));
        assert_eq!(row.get(1), Some(&Value::Text("Alice".into())));
        assert_eq!(row.get(2), None);
    }

    #[test]
    fn test_row_set_value() {
        let mut row = Row::new(vec![Value::Integer(1), Value::Text("Alice".into())]);
        assert!(row.set(0, Value::Integer(100)));
        assert_eq!(row.get(0), Some(&Value::Integer(100)));
        assert!(!row.set(10, Value::Integer(999)));
    }

    #[test]
    fn test_row_into_values() {
        let row: Row = vec![Value::Boolean(true)].into();
        assert_eq!(row.into_values(), vec![Value::Boolean(true)]);
    }
}
