//! Expression evaluation against a row context.

use super::context::RowContext;
use crate::ast::{BinaryOp, Expr};
use std::cmp::Ordering;
use tabula_core::{Error, Result, Value};

/// Evaluates an expression to a value.
///
/// Comparisons yield Boolean values. AND and OR short-circuit and require
/// Boolean operands.
pub fn evaluate(expr: &Expr, ctx: &dyn RowContext) -> Result<Value> {
    match expr {
        Expr::Identifier(name) => ctx.resolve(name).cloned(),
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Null => Ok(Value::Null),
        Expr::Binary { left, op, right } => match op {
            BinaryOp::And => {
                if !evaluate_bool(left, ctx)? {
                    return Ok(Value::Boolean(false));
                }
                evaluate_bool(right, ctx).map(Value::Boolean)
            }
            BinaryOp::Or => {
                if evaluate_bool(left, ctx)? {
                    return Ok(Value::Boolean(true));
                }
                evaluate_bool(right, ctx).map(Value::Boolean)
            }
            _ => {
                let lhs = evaluate(left, ctx)?;
                let rhs = evaluate(right, ctx)?;
                compare_values(&lhs, *op, &rhs).map(Value::Boolean)
            }
        },
    }
}

/// Evaluates a predicate; the result must be Boolean.
pub fn evaluate_predicate(expr: &Expr, ctx: &dyn RowContext) -> Result<bool> {
    evaluate_bool(expr, ctx)
}

fn evaluate_bool(expr: &Expr, ctx: &dyn RowContext) -> Result<bool> {
    match evaluate(expr, ctx)? {
        Value::Boolean(b) => Ok(b),
        other => Err(Error::type_mismatch(
            expr.to_string(),
            format!("expected BOOLEAN, got {}", other.kind_name()),
        )),
    }
}

/// Applies a comparison operator.
///
/// A null on either side makes `=` true only when both sides are null, and
/// every other operator false. Non-null operands must share a type.
pub fn compare_values(left: &Value, op: BinaryOp, right: &Value) -> Result<bool> {
    if left.is_null() || right.is_null() {
        return Ok(op == BinaryOp::Eq && left.is_null() && right.is_null());
    }

    let ord = left.compare(right)?;
    match op {
        BinaryOp::Eq => Ok(ord == Ordering::Equal),
        BinaryOp::Ne => Ok(ord != Ordering::Equal),
        BinaryOp::Lt => Ok(ord == Ordering::Less),
        BinaryOp::Le => Ok(ord != Ordering::Greater),
        BinaryOp::Gt => Ok(ord == Ordering::Greater),
        BinaryOp::Ge => Ok(ord != Ordering::Less),
        BinaryOp::And | BinaryOp::Or => Err(Error::UnsupportedExpression(format!(
            "{} is not a comparison",
            op
        ))),
    }
}
