//! Statement AST definitions.
//!
//! These are the trees an external parser hands to the
//! [`Executor`](crate::executor::Executor).

use super::expr::Expr;
use std::fmt;

/// A column definition in CREATE TABLE.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    /// SQL type name as written, e.g. `VARCHAR`.
    pub type_name: String,
    /// Size argument, e.g. the 10 in `VARCHAR(10)`.
    pub size: Option<usize>,
    pub primary_key: bool,
    pub unique: bool,
    pub not_null: bool,
}

impl ColumnDef {
    /// Creates a nullable, unconstrained column definition.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            size: None,
            primary_key: false,
            unique: false,
            not_null: false,
        }
    }

    /// Sets the size argument.
    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Marks the column PRIMARY KEY.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Marks the column UNIQUE.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Marks the column NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }
}

/// Join types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinKind::Inner => f.write_str("INNER JOIN"),
            JoinKind::Left => f.write_str("LEFT JOIN"),
            JoinKind::Right => f.write_str("RIGHT JOIN"),
        }
    }
}

/// `JOIN table ON expr`.
#[derive(Clone, Debug, PartialEq)]
pub struct JoinClause {
    pub kind: JoinKind,
    pub table: String,
    /// Join condition; absent means a cross product.
    pub on: Option<Expr>,
}

impl JoinClause {
    /// Creates an inner join clause.
    pub fn inner(table: impl Into<String>, on: Expr) -> Self {
        Self {
            kind: JoinKind::Inner,
            table: table.into(),
            on: Some(on),
        }
    }
}

/// SELECT statement.
#[derive(Clone, Debug, PartialEq)]
pub struct Select {
    /// Requested column names; a single `*` selects everything.
    pub columns: Vec<String>,
    pub table: String,
    pub joins: Vec<JoinClause>,
    pub filter: Option<Expr>,
}

impl Select {
    /// Creates `SELECT * FROM table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            columns: vec!["*".to_string()],
            table: table.into(),
            joins: Vec::new(),
            filter: None,
        }
    }

    /// Replaces the column list.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a join clause.
    pub fn join(mut self, join: JoinClause) -> Self {
        self.joins.push(join);
        self
    }

    /// Sets the WHERE clause.
    pub fn filter(mut self, filter: Expr) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Returns true if the column list is `*`.
    pub fn is_wildcard(&self) -> bool {
        matches!(self.columns.as_slice(), [only] if only == "*")
    }
}

/// A parsed statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    CreateTable {
        table: String,
        columns: Vec<ColumnDef>,
    },
    DropTable {
        table: String,
    },
    Insert {
        table: String,
        /// Explicit target columns; absent means schema order.
        columns: Option<Vec<String>>,
        values: Vec<Vec<Expr>>,
    },
    Select(Select),
    Update {
        table: String,
        set: Vec<(String, Expr)>,
        filter: Option<Expr>,
    },
    Delete {
        table: String,
        filter: Option<Expr>,
    },
}

impl Statement {
    /// Returns the statement keyword, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::CreateTable { .. } => "CREATE TABLE",
            Statement::DropTable { .. } => "DROP TABLE",
            Statement::Insert { .. } => "INSERT",
            Statement::Select(_) => "SELECT",
            Statement::Update { .. } => "UPDATE",
            Statement::Delete { .. } => "DELETE",
        }
    }

    /// Returns the primary table the statement addresses.
    pub fn table(&self) -> &str {
        match self {
            Statement::CreateTable { table, .. }
            | Statement::DropTable { table }
            | Statement::Insert { table, .. }
            | Statement::Update { table, .. }
            | Statement::Delete { table, .. } => table,
            Statement::Select(select) => &select.table,
        }
    }
}
