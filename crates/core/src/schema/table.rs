//! Table schema definition for Tabula.

use super::column::Column;
use crate::error::{Error, Result};
use crate::row::Row;
use serde::{Deserialize, Serialize};

/// The schema of one table: its name and ordered columns.
///
/// Column order is positional and authoritative: value `i` of every row
/// belongs to column `i`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Table name.
    table_name: String,
    /// Column definitions.
    columns: Vec<Column>,
    /// Names of primary key columns, in column order.
    primary_keys: Vec<String>,
    /// Names of unique columns, in column order.
    unique_keys: Vec<String>,
}

impl Schema {
    /// Creates an empty schema for the given table.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            columns: Vec::new(),
            primary_keys: Vec::new(),
            unique_keys: Vec::new(),
        }
    }

    /// Returns a builder that validates names as columns are added.
    pub fn builder(table_name: impl Into<String>) -> Result<SchemaBuilder> {
        SchemaBuilder::new(table_name)
    }

    /// Returns the table name.
    #[inline]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Returns the columns.
    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the number of columns.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the primary key column names.
    #[inline]
    pub fn primary_keys(&self) -> &[String] {
        &self.primary_keys
    }

    /// Returns the unique column names.
    #[inline]
    pub fn unique_keys(&self) -> &[String] {
        &self.unique_keys
    }

    /// Returns `(position, column)` for every column that carries an index.
    pub fn indexed_columns(&self) -> impl Iterator<Item = (usize, &Column)> {
        self.columns.iter().enumerate().filter(|(_, c)| c.is_indexed())
    }

    /// Appends a column and updates the derived key lists.
    pub fn add_column(&mut self, column: Column) -> Result<()> {
        if self.columns.iter().any(|c| c.name() == column.name()) {
            return Err(Error::AlreadyExists {
                kind: "column",
                name: column.name().to_string(),
            });
        }
        if column.is_primary_key() {
            self.primary_keys.push(column.name().to_string());
        }
        if column.is_unique() {
            self.unique_keys.push(column.name().to_string());
        }
        self.columns.push(column);
        Ok(())
    }

    /// Gets a column by name.
    pub fn get_column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| Error::column_not_found(name))
    }

    /// Gets a column position by name.
    pub fn get_column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| Error::column_not_found(name))
    }

    /// Checks a row's arity, then every value against its column.
    pub fn validate_row(&self, row: &Row) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::ArityMismatch {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        for (column, value) in self.columns.iter().zip(row.values()) {
            column.validate(value)?;
        }
        Ok(())
    }
}

/// Builder for creating schemas with name validation.
///
/// Table names become file names on disk, so they are restricted to ASCII
/// identifiers.
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Creates a new schema builder.
    pub fn new(table_name: impl Into<String>) -> Result<Self> {
        let table_name = table_name.into();
        check_naming_rules(&table_name)?;
        Ok(Self {
            schema: Schema::new(table_name),
        })
    }

    /// Adds a column to the schema.
    pub fn add_column(mut self, column: Column) -> Result<Self> {
        check_naming_rules(column.name())?;
        self.schema.add_column(column)?;
        Ok(self)
    }

    /// Finishes the schema. A table needs at least one column.
    pub fn build(self) -> Result<Schema> {
        if self.schema.columns.is_empty() {
            return Err(Error::InvalidSchema(format!(
                "table {} has no columns",
                self.schema.table_name
            )));
        }
        Ok(self.schema)
    }
}

/// Validates a name follows naming rules.
pub fn check_naming_rules(name: &str) -> Result<()> {
    let mut chars = name.chars();
    match chars.next() {
        None => return Err(Error::InvalidSchema("Name cannot be empty".into())),
        Some(first) if !first.is_ascii_alphabetic() && first != '_' => {
            return Err(Error::InvalidSchema(format!(
                "Name must start with letter or underscore: {}",
                name
            )));
        }
        Some(_) => {}
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::InvalidSchema(format!(
            "Name contains invalid characters: {}",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;
    use crate::value::Value;

    fn users() -> Schema {
        Schema::builder("users")
            .unwrap()
            .add_column(Column::new("id", DataType::Integer).primary_key(true))
            .unwrap()
            .add_column(Column::new("email", DataType::Text(Some(32))).unique(true))
            .unwrap()
            .add_column(Column::new("active", DataType::Boolean))
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_derived_key_lists() {
        let schema = users();
        assert_eq!(schema.table_name(), "users");
        assert_eq!(schema.column_count(), 3);
        assert_eq!(schema.primary_keys(), &["id".to_string()]);
        assert_eq!(schema.unique_keys(), &["email".to_string()]);

        let indexed: Vec<usize> = schema.indexed_columns().map(|(i, _)| i).collect();
        assert_eq!(indexed, vec![0, 1]);
    }

    #[test]
    fn test_get_column() {
        let schema = users();
        assert_eq!(schema.get_column("email").unwrap().name(), "email");
        assert_eq!(schema.get_column_index("active").unwrap(), 2);
        assert!(matches!(
            schema.get_column_index("missing"),
            Err(Error::NotFound { kind: "column", .. })
        ));
        // Lookup is an exact, case-sensitive match.
        assert!(schema.get_column("ID").is_err());
    }

    #[test]
    fn test_duplicate_column() {
        let mut schema = Schema::new("t");
        schema.add_column(Column::new("a", DataType::Integer)).unwrap();
        let err = schema.add_column(Column::new("a", DataType::Float)).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { kind: "column", .. }));
        assert_eq!(schema.column_count(), 1);
    }

    #[test]
    fn test_naming_rules() {
        assert!(SchemaBuilder::new("").is_err());
        assert!(SchemaBuilder::new("1abc").is_err());
        assert!(SchemaBuilder::new("../etc").is_err());
        assert!(SchemaBuilder::new("_ok_1").is_ok());
        assert!(Schema::builder("t")
            .unwrap()
            .add_column(Column::new("bad name", DataType::Integer))
            .is_err());
    }

    #[test]
    fn test_empty_schema_rejected() {
        assert!(matches!(
            Schema::builder("t").unwrap().build(),
            Err(Error::InvalidSchema(_))
        ));
    }

    #[test]
    fn test_validate_row() {
        let schema = users();
        let ok = Row::new(vec![
            Value::Integer(1),
            Value::Text("a@b.c".into()),
            Value::Null,
        ]);
        assert!(schema.validate_row(&ok).is_ok());

        let short = Row::new(vec![Value::Integer(1)]);
        assert!(matches!(
            schema.validate_row(&short),
            Err(Error::ArityMismatch { expected: 3, got: 1 })
        ));

        let bad_type = Row::new(vec![Value::Text("1".into()), Value::Null, Value::Null]);
        assert!(matches!(
            schema.validate_row(&bad_type),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_schema_serde_roundtrip() {
        let schema = users();
        let bytes = bincode::serialize(&schema).unwrap();
        let decoded: Schema = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, schema);
    }
}
