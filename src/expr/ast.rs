//! Arithmetic expression tree.

use serde::Serialize;

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
        }
    }

    fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }
}

/// Parsed arithmetic expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Number(f64),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Build a binary node.
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Evaluate the tree with IEEE semantics (division by zero yields inf/NaN).
    pub fn eval(&self) -> f64 {
        match self {
            Expr::Number(n) => *n,
            Expr::Neg(inner) => -inner.eval(),
            Expr::Binary { op, lhs, rhs } => op.apply(lhs.eval(), rhs.eval()),
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Neg(inner) => write!(f, "(-{})", inner),
            Expr::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_nested() {
        // (1800 / 2) - 15
        let expr = Expr::binary(
            BinaryOp::Sub,
            Expr::binary(BinaryOp::Div, Expr::Number(1800.0), Expr::Number(2.0)),
            Expr::Number(15.0),
        );
        assert_eq!(expr.eval(), 885.0);
        assert_eq!(expr.to_string(), "((1800 / 2) - 15)");
    }

    #[test]
    fn test_eval_division_by_zero() {
        let expr = Expr::binary(BinaryOp::Div, Expr::Number(1.0), Expr::Number(0.0));
        assert!(expr.eval().is_infinite());
    }

    #[test]
    fn test_eval_neg() {
        assert_eq!(Expr::Neg(Box::new(Expr::Number(3.0))).eval(), -3.0);
    }
}
