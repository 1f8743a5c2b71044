//! Abstract syntax tree consumed by the executor.

mod expr;
mod statement;

pub use expr::{BinaryOp, Expr};
pub use statement::{ColumnDef, JoinClause, JoinKind, Select, Statement};
