//! Recursive-descent parser for the restricted arithmetic grammar.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | primary
//! primary := NUMBER | '(' expr ')'
//! ```

use super::ast::{BinaryOp, Expr};
use super::lexer::{tokenize, Token};
use super::EvalError;

/// Maximum nesting of parentheses and unary operators.
pub const MAX_DEPTH: usize = 128;

/// Parse a pure arithmetic string into an expression tree.
pub fn parse_formula(input: &str) -> Result<Expr, EvalError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EvalError::Empty);
    }
    let mut parser = Parser::new(&tokens);
    let expr = parser.expr()?;
    if let Some(tok) = parser.peek() {
        return Err(parser.unexpected(tok));
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn unexpected(&self, tok: Token) -> EvalError {
        EvalError::Parse {
            message: format!("símbolo inesperado '{}' na posição {}", tok, self.pos + 1),
        }
    }

    fn enter(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::Parse {
                message: "aninhamento excessivo".to_string(),
            });
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn term(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.unary()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn unary(&mut self) -> Result<Expr, EvalError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.advance();
                self.enter()?;
                let inner = self.unary()?;
                self.depth -= 1;
                Ok(Expr::Neg(Box::new(inner)))
            }
            Some(Token::Plus) => {
                self.advance();
                self.enter()?;
                let inner = self.unary()?;
                self.depth -= 1;
                Ok(inner)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Expr, EvalError> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::LParen) => {
                self.enter()?;
                let inner = self.expr()?;
                self.depth -= 1;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    Some(tok) => {
                        self.pos -= 1;
                        Err(self.unexpected(tok))
                    }
                    None => Err(EvalError::Parse {
                        message: "parêntese não fechado".to_string(),
                    }),
                }
            }
            Some(tok) => {
                self.pos -= 1;
                Err(self.unexpected(tok))
            }
            None => Err(EvalError::Parse {
                message: "fim inesperado da fórmula".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(input: &str) -> f64 {
        parse_formula(input).expect("should parse").eval()
    }

    // ==================== precedence tests ====================

    #[test]
    fn test_precedence() {
        assert_eq!(eval("1+2*3"), 7.0);
        assert_eq!(eval("(1+2)*3"), 9.0);
        assert_eq!(eval("10-4-3"), 3.0);
        assert_eq!(eval("100/10/2"), 5.0);
        assert_eq!(eval("2*3-4/2"), 4.0);
    }

    #[test]
    fn test_unary() {
        assert_eq!(eval("-5+10"), 5.0);
        assert_eq!(eval("--5"), 5.0);
        assert_eq!(eval("+5"), 5.0);
        assert_eq!(eval("3*-2"), -6.0);
        assert_eq!(eval("-(2+3)"), -5.0);
    }

    #[test]
    fn test_parse_tree_shape() {
        let expr = parse_formula("(1800)/2-15").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                BinaryOp::Sub,
                Expr::binary(BinaryOp::Div, Expr::Number(1800.0), Expr::Number(2.0)),
                Expr::Number(15.0),
            )
        );
    }

    // ==================== malformed input tests ====================

    #[test]
    fn test_empty() {
        assert_eq!(parse_formula(""), Err(EvalError::Empty));
        assert_eq!(parse_formula("   "), Err(EvalError::Empty));
    }

    #[test]
    fn test_unbalanced_parens() {
        assert!(matches!(parse_formula("(1+2"), Err(EvalError::Parse { .. })));
        assert!(matches!(parse_formula("1+2)"), Err(EvalError::Parse { .. })));
        assert!(matches!(parse_formula("()"), Err(EvalError::Parse { .. })));
    }

    #[test]
    fn test_dangling_operator() {
        assert!(matches!(parse_formula("1+"), Err(EvalError::Parse { .. })));
        assert!(matches!(parse_formula("*2"), Err(EvalError::Parse { .. })));
        assert!(matches!(parse_formula("1 2"), Err(EvalError::Parse { .. })));
    }

    #[test]
    fn test_excessive_nesting() {
        let deep = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert!(matches!(parse_formula(&deep), Err(EvalError::Parse { .. })));

        let ok = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(parse_formula(&ok).unwrap().eval(), 1.0);
    }
}
