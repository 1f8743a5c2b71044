//! Join algorithms.

mod nested;

pub use nested::NestedLoopJoin;
