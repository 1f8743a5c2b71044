//! Nested Loop Join implementation.

use tabula_core::{Result, Row};

/// Nested Loop Join executor.
///
/// Compares every pair of rows, so it handles arbitrary join conditions.
/// Output rows are the left values followed by the right values, in
/// left-major order.
#[derive(Clone, Copy, Debug, Default)]
pub struct NestedLoopJoin;

impl NestedLoopJoin {
    /// Creates a new nested loop join executor.
    pub fn new() -> Self {
        Self
    }

    /// Emits the concatenation of every pair accepted by `predicate`.
    ///
    /// The first predicate error ends the join.
    pub fn execute_with_predicate<F>(
        &self,
        left: &[Row],
        right: &[Row],
        mut predicate: F,
    ) -> Result<Vec<Row>>
    where
        F: FnMut(&Row, &Row) -> Result<bool>,
    {
        let mut output = Vec::new();
        for l in left {
            for r in right {
                if predicate(l, r)? {
                    output.push(Self::combine(l, r));
                }
            }
        }
        Ok(output)
    }

    /// Emits the full cross product.
    pub fn cross_product(&self, left: &[Row], right: &[Row]) -> Vec<Row> {
        left.iter()
            .flat_map(|l| right.iter().map(move |r| Self::combine(l, r)))
            .collect()
    }

    fn combine(left: &Row, right: &Row) -> Row {
        let mut values = Vec::with_capacity(left.len() + right.len());
        values.extend_from_slice(left.values());
        values.extend_from_slice(right.values());
        Row::new(values)
    }
}
