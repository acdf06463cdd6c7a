//! Recursive-descent parser and evaluator for conditional statements.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! or         := and ("or" and)*
//! and        := not ("and" not)*
//! not        := "not" not | comparison
//! comparison := sum (cmp sum)*
//! sum        := term (("+" | "-") term)*
//! term       := unary (("*" | "/") unary)*
//! unary      := ("-" | "+") unary | primary
//! primary    := number | letter | "(" or ")"
//! ```
//!
//! Comparisons chain as in `18 < a < 23`, which means `18 < a and a < 23`
//! with `a` read once. Truth values are numbers: comparisons yield 1 or 0 and
//! any non-zero operand counts as true.

use super::lexer::{CmpOp, Lexeme, Token};
use crate::{Error, Result};

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

/// Parsed predicate tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal.
    Number(f64),
    /// Value of the referenced series at the current hour.
    Series(usize),
    /// Unary minus.
    Neg(Box<Expr>),
    /// Binary arithmetic.
    Arith(ArithOp, Box<Expr>, Box<Expr>),
    /// First operand followed by one or more chained comparisons.
    Compare(Box<Expr>, Vec<(CmpOp, Expr)>),
    /// Short-circuit conjunction.
    And(Vec<Expr>),
    /// Short-circuit disjunction.
    Or(Vec<Expr>),
    /// Negation.
    Not(Box<Expr>),
}

impl Expr {
    /// Evaluates the expression, reading series `i` through `value(i)`.
    ///
    /// # Errors
    /// Returns `ExpressionError` on division by zero.
    pub fn evaluate(&self, value: &impl Fn(usize) -> f64) -> Result<f64> {
        Ok(match self {
            Self::Number(n) => *n,
            Self::Series(index) => value(*index),
            Self::Neg(inner) => -inner.evaluate(value)?,
            Self::Arith(op, left, right) => {
                let left = left.evaluate(value)?;
                let right = right.evaluate(value)?;
                match op {
                    ArithOp::Add => left + right,
                    ArithOp::Sub => left - right,
                    ArithOp::Mul => left * right,
                    ArithOp::Div if right == 0.0 => {
                        return Err(Error::expression("division by zero"));
                    }
                    ArithOp::Div => left / right,
                }
            }
            Self::Compare(first, chain) => {
                let mut left = first.evaluate(value)?;
                for (op, operand) in chain {
                    let right = operand.evaluate(value)?;
                    if !op.apply(left, right) {
                        return Ok(0.0);
                    }
                    left = right;
                }
                1.0
            }
            Self::And(terms) => {
                for term in terms {
                    if !is_true(term.evaluate(value)?) {
                        return Ok(0.0);
                    }
                }
                1.0
            }
            Self::Or(terms) => {
                for term in terms {
                    if is_true(term.evaluate(value)?) {
                        return Ok(1.0);
                    }
                }
                0.0
            }
            Self::Not(inner) => {
                if is_true(inner.evaluate(value)?) {
                    0.0
                } else {
                    1.0
                }
            }
        })
    }

    /// Evaluates the expression as a truth value.
    ///
    /// # Errors
    /// Returns `ExpressionError` on division by zero.
    pub fn is_satisfied(&self, value: &impl Fn(usize) -> f64) -> Result<bool> {
        self.evaluate(value).map(is_true)
    }
}

// NaN is nonzero and therefore true; comparisons against it are false.
fn is_true(value: f64) -> bool {
    value != 0.0
}

/// Parses a token stream into an expression tree.
///
/// # Errors
/// Returns `ExpressionError` for an empty statement or invalid syntax.
pub fn parse(lexemes: &[Lexeme<'_>]) -> Result<Expr> {
    if lexemes.is_empty() {
        return Err(Error::expression("empty statement"));
    }
    let mut parser = Parser { lexemes, pos: 0 };
    let expr = parser.or()?;
    match parser.peek() {
        None => Ok(expr),
        Some(lexeme) => Err(unexpected(lexeme)),
    }
}

struct Parser<'s, 'a> {
    lexemes: &'s [Lexeme<'a>],
    pos: usize,
}

impl Parser<'_, '_> {
    fn peek(&self) -> Option<&Lexeme<'_>> {
        self.lexemes.get(self.pos)
    }

    fn peek_token(&self) -> Option<Token> {
        self.peek().map(|lexeme| lexeme.token)
    }

    fn eat(&mut self, token: Token) -> bool {
        if self.peek_token() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or(&mut self) -> Result<Expr> {
        let mut terms = vec![self.and()?];
        while self.eat(Token::Or) {
            terms.push(self.and()?);
        }
        Ok(if terms.len() == 1 {
            terms.remove(0)
        } else {
            Expr::Or(terms)
        })
    }

    fn and(&mut self) -> Result<Expr> {
        let mut terms = vec![self.not()?];
        while self.eat(Token::And) {
            terms.push(self.not()?);
        }
        Ok(if terms.len() == 1 {
            terms.remove(0)
        } else {
            Expr::And(terms)
        })
    }

    fn not(&mut self) -> Result<Expr> {
        if self.eat(Token::Not) {
            return Ok(Expr::Not(Box::new(self.not()?)));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr> {
        let first = self.sum()?;
        let mut chain = Vec::new();
        while let Some(Token::Cmp(op)) = self.peek_token() {
            self.pos += 1;
            chain.push((op, self.sum()?));
        }
        Ok(if chain.is_empty() {
            first
        } else {
            Expr::Compare(Box::new(first), chain)
        })
    }

    fn sum(&mut self) -> Result<Expr> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek_token() {
                Some(Token::Plus) => ArithOp::Add,
                Some(Token::Minus) => ArithOp::Sub,
                _ => return Ok(left),
            };
            self.pos += 1;
            left = Expr::Arith(op, Box::new(left), Box::new(self.term()?));
        }
    }

    fn term(&mut self) -> Result<Expr> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek_token() {
                Some(Token::Star) => ArithOp::Mul,
                Some(Token::Slash) => ArithOp::Div,
                _ => return Ok(left),
            };
            self.pos += 1;
            left = Expr::Arith(op, Box::new(left), Box::new(self.unary()?));
        }
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.eat(Token::Minus) {
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        if self.eat(Token::Plus) {
            return self.unary();
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr> {
        let Some(&Lexeme { token, offset, .. }) = self.peek() else {
            return Err(Error::expression("unexpected end of statement"));
        };
        let expr = match token {
            Token::Number(n) => Expr::Number(n),
            Token::Series(index) => Expr::Series(index),
            Token::LParen => {
                self.pos += 1;
                let inner = self.or()?;
                if !self.eat(Token::RParen) {
                    return Err(Error::expression(format!("'(' at {offset} was never closed")));
                }
                return Ok(inner);
            }
            _ => return Err(unexpected(&self.lexemes[self.pos])),
        };
        self.pos += 1;
        Ok(expr)
    }
}

fn unexpected(lexeme: &Lexeme<'_>) -> Error {
    Error::expression(format!(
        "invalid syntax: unexpected '{}' at {}",
        lexeme.text, lexeme.offset
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::lexer::tokenize;

    fn parse_str(statement: &str) -> Result<Expr> {
        parse(&tokenize(statement)?)
    }

    fn eval(statement: &str, values: &[f64]) -> bool {
        parse_str(statement)
            .unwrap()
            .is_satisfied(&|i| values[i])
            .unwrap()
    }

    #[test]
    fn test_chained_comparison_structure() {
        let expr = parse_str("18<a<23").unwrap();
        assert_eq!(
            expr,
            Expr::Compare(
                Box::new(Expr::Number(18.0)),
                vec![
                    (CmpOp::Lt, Expr::Series(0)),
                    (CmpOp::Lt, Expr::Number(23.0))
                ]
            )
        );
    }

    #[test]
    fn test_chained_comparison_semantics() {
        assert!(eval("18<a<23", &[20.0]));
        assert!(!eval("18<a<23", &[18.0]));
        assert!(!eval("18<a<23", &[23.0]));
        assert!(eval("18<=a<=23", &[23.0]));
        assert!(!eval("1 < 3 > 2 > 5", &[]));
        assert!(eval("1 < 3 > 2 > 1", &[]));
    }

    #[test]
    fn test_boolean_precedence() {
        // and binds tighter than or
        assert!(eval("a>1 or b>1 and c>1", &[2.0, 0.0, 0.0]));
        assert!(!eval("(a>1 or b>1) and c>1", &[2.0, 0.0, 0.0]));
        assert!(eval("not a>1 and b<1", &[0.0, 0.0]));
        assert!(!eval("not (a>1 or b<1)", &[0.0, 0.0]));
    }

    #[test]
    fn test_arithmetic_operands() {
        assert!(eval("a - b > 5", &[20.0, 10.0]));
        assert!(eval("-a < -1", &[2.0]));
        assert!(eval("a * 2 + 1 == 7", &[3.0]));
        assert!(eval("(a + b) / 2 >= 15", &[10.0, 20.0]));
        assert!(eval("2 + 3 * 4 == 14", &[]));
    }

    #[test]
    fn test_truthiness_of_bare_operands() {
        assert!(eval("a", &[3.0]));
        assert!(!eval("a", &[0.0]));
        assert!(eval("a", &[f64::NAN]));
        assert!(!eval("not a", &[f64::NAN]));
        assert!(eval("a or 0", &[f64::NAN]));
    }

    #[test]
    fn test_nan_comparisons_are_false() {
        assert!(!eval("a > 0", &[f64::NAN]));
        assert!(!eval("a <= 0", &[f64::NAN]));
    }

    #[test]
    fn test_division_by_zero_is_an_error() {
        let expr = parse_str("a / b > 1").unwrap();
        assert!(matches!(
            expr.is_satisfied(&|i| [1.0, 0.0][i]),
            Err(Error::ExpressionError { .. })
        ));
    }

    #[test]
    fn test_syntax_errors() {
        for statement in ["", "a >", "a > 1 and", "(a > 1", "a > 1)", "a 1", "and a", "> 3"] {
            assert!(
                matches!(parse_str(statement), Err(Error::ExpressionError { .. })),
                "statement {statement:?} should not parse"
            );
        }
    }
}
