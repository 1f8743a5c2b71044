//! Query executor module.

mod context;
mod evaluator;
pub mod join;
mod project;
mod runner;

pub use context::{JoinedRow, RowContext, TableRow};
pub use evaluator::{compare_values, evaluate, evaluate_predicate};
pub use join::NestedLoopJoin;
pub use project::ProjectExecutor;
pub use runner::Executor;
