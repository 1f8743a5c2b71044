//! Expression AST definitions.

use std::fmt;
use std::iter::Peekable;
use tabula_core::{Error, Result, Value};

/// Binary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
}

impl BinaryOp {
    /// Parses an operator symbol. Keywords are case-insensitive.
    pub fn from_symbol(symbol: &str) -> Result<Self> {
        match symbol {
            "=" => Ok(BinaryOp::Eq),
            "!=" | "<>" => Ok(BinaryOp::Ne),
            "<" => Ok(BinaryOp::Lt),
            "<=" => Ok(BinaryOp::Le),
            ">" => Ok(BinaryOp::Gt),
            ">=" => Ok(BinaryOp::Ge),
            s if s.eq_ignore_ascii_case("AND") => Ok(BinaryOp::And),
            s if s.eq_ignore_ascii_case("OR") => Ok(BinaryOp::Or),
            other => Err(Error::UnsupportedExpression(format!(
                "unknown operator {}",
                other
            ))),
        }
    }

    /// Returns the canonical symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
        }
    }

    /// Binding strength: comparisons bind tighter than AND, AND tighter than OR.
    #[inline]
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            _ => 3,
        }
    }

    /// Returns true for `=`, `!=`, `<`, `<=`, `>`, `>=`.
    #[inline]
    pub fn is_comparison(&self) -> bool {
        !self.is_logical()
    }

    /// Returns true for AND and OR.
    #[inline]
    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Expression AST node.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Column reference, either `column` or `table.column`.
    Identifier(String),
    /// Literal value.
    Literal(Value),
    /// The NULL keyword.
    Null,
    /// Binary operation.
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Creates a column reference expression.
    pub fn identifier(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }

    /// Creates a literal expression.
    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    /// Creates a NULL expression.
    pub fn null() -> Self {
        Expr::Null
    }

    /// Creates a binary expression.
    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Creates an equality expression.
    pub fn eq(left: Expr, right: Expr) -> Self {
        Self::binary(left, BinaryOp::Eq, right)
    }

    /// Creates a not-equal expression.
    pub fn ne(left: Expr, right: Expr) -> Self {
        Self::binary(left, BinaryOp::Ne, right)
    }

    /// Creates a less-than expression.
    pub fn lt(left: Expr, right: Expr) -> Self {
        Self::binary(left, BinaryOp::Lt, right)
    }

    /// Creates a less-than-or-equal expression.
    pub fn le(left: Expr, right: Expr) -> Self {
        Self::binary(left, BinaryOp::Le, right)
    }

    /// Creates a greater-than expression.
    pub fn gt(left: Expr, right: Expr) -> Self {
        Self::binary(left, BinaryOp::Gt, right)
    }

    /// Creates a greater-than-or-equal expression.
    pub fn ge(left: Expr, right: Expr) -> Self {
        Self::binary(left, BinaryOp::Ge, right)
    }

    /// Creates an AND expression.
    pub fn and(left: Expr, right: Expr) -> Self {
        Self::binary(left, BinaryOp::And, right)
    }

    /// Creates an OR expression.
    pub fn or(left: Expr, right: Expr) -> Self {
        Self::binary(left, BinaryOp::Or, right)
    }

    /// Folds a flat `first op operand op operand ...` chain into a tree that
    /// honours [`BinaryOp::precedence`]. Operators of equal precedence
    /// associate to the left.
    ///
    /// ```
    /// use tabula_query::ast::{BinaryOp, Expr};
    ///
    /// // a = 1 OR b = 2 AND c = 3
    /// let expr = Expr::from_chain(
    ///     Expr::identifier("a"),
    ///     vec![
    ///         (BinaryOp::Eq, Expr::literal(1)),
    ///         (BinaryOp::Or, Expr::identifier("b")),
    ///         (BinaryOp::Eq, Expr::literal(2)),
    ///         (BinaryOp::And, Expr::identifier("c")),
    ///         (BinaryOp::Eq, Expr::literal(3)),
    ///     ],
    /// );
    /// assert_eq!(expr.to_string(), "((a = 1) OR ((b = 2) AND (c = 3)))");
    /// ```
    pub fn from_chain(first: Expr, rest: impl IntoIterator<Item = (BinaryOp, Expr)>) -> Self {
        let mut rest = rest.into_iter().peekable();
        Self::climb(first, &mut rest, 0)
    }

    fn climb<I>(mut lhs: Expr, rest: &mut Peekable<I>, min_precedence: u8) -> Expr
    where
        I: Iterator<Item = (BinaryOp, Expr)>,
    {
        while rest
            .peek()
            .is_some_and(|(op, _)| op.precedence() >= min_precedence)
        {
            let Some((op, mut rhs)) = rest.next() else {
                break;
            };
            while let Some(next) = rest
                .peek()
                .map(|(next, _)| next.precedence())
                .filter(|&p| p > op.precedence())
            {
                rhs = Self::climb(rhs, rest, next);
            }
            lhs = Self::binary(lhs, op, rhs);
        }
        lhs
    }

    /// Returns true if this expression is a literal or NULL.
    #[inline]
    pub fn is_constant(&self) -> bool {
        matches!(self, Expr::Literal(_) | Expr::Null)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier(name) => f.write_str(name),
            Expr::Literal(Value::Text(s)) => write!(f, "'{}'", s),
            Expr::Literal(v) => write!(f, "{}", v),
            Expr::Null => f.write_str("NULL"),
            Expr::Binary { left, op, right } => write!(f, "({} {} {})", left, op, right),
        }
    }
}
