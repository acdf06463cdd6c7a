//! Tokenizer for conditional statements.

use crate::{Error, Result};

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

impl CmpOp {
    /// Applies the comparison. Any comparison involving NaN is false except `!=`.
    #[must_use]
    pub fn apply(self, left: f64, right: f64) -> bool {
        match self {
            Self::Lt => left < right,
            Self::Le => left <= right,
            Self::Gt => left > right,
            Self::Ge => left >= right,
            Self::Eq => left == right,
            Self::Ne => left != right,
        }
    }
}

/// A lexical token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// Numeric literal.
    Number(f64),
    /// Series reference: `a` is 0, `b` is 1, and so on.
    Series(usize),
    /// `and`
    And,
    /// `or`
    Or,
    /// `not`
    Not,
    /// Comparison operator.
    Cmp(CmpOp),
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `(`
    LParen,
    /// `)`
    RParen,
}

/// A token with its source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme<'a> {
    /// The token.
    pub token: Token,
    /// Source text of the token.
    pub text: &'a str,
    /// Byte offset in the statement.
    pub offset: usize,
}

/// Letter for a series index (`0` is `a`).
#[must_use]
pub fn series_letter(index: usize) -> char {
    (b'a' + u8::try_from(index % 26).unwrap_or(0)) as char
}

/// Splits a statement into tokens.
///
/// Names are matched as whole words: only a lone lowercase letter is a series
/// reference, so `and` never touches series `a`.
///
/// # Errors
/// Returns `ExpressionError` for unknown names, stray characters and
/// malformed numbers.
pub fn tokenize(statement: &str) -> Result<Vec<Lexeme<'_>>> {
    let bytes = statement.as_bytes();
    let mut lexemes = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;
        let token = if c.is_ascii_digit() || c == b'.' {
            pos = scan_number(bytes, pos);
            let text = &statement[start..pos];
            let value = text
                .parse::<f64>()
                .map_err(|_| Error::expression(format!("invalid number '{text}' at {start}")))?;
            Token::Number(value)
        } else if c.is_ascii_alphabetic() || c == b'_' {
            while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
                pos += 1;
            }
            match &statement[start..pos] {
                "and" => Token::And,
                "or" => Token::Or,
                "not" => Token::Not,
                name if name.len() == 1 && c.is_ascii_lowercase() => {
                    Token::Series(usize::from(c - b'a'))
                }
                name => {
                    return Err(Error::expression(format!(
                        "name '{name}' is not defined; use the letters a-z to refer to the lists"
                    )));
                }
            }
        } else {
            let next = bytes.get(pos + 1).copied();
            let (token, width) = match (c, next) {
                (b'<', Some(b'=')) => (Token::Cmp(CmpOp::Le), 2),
                (b'>', Some(b'=')) => (Token::Cmp(CmpOp::Ge), 2),
                (b'=', Some(b'=')) => (Token::Cmp(CmpOp::Eq), 2),
                (b'!', Some(b'=')) => (Token::Cmp(CmpOp::Ne), 2),
                (b'<', _) => (Token::Cmp(CmpOp::Lt), 1),
                (b'>', _) => (Token::Cmp(CmpOp::Gt), 1),
                (b'+', _) => (Token::Plus, 1),
                (b'-', _) => (Token::Minus, 1),
                (b'*', _) => (Token::Star, 1),
                (b'/', _) => (Token::Slash, 1),
                (b'(', _) => (Token::LParen, 1),
                (b')', _) => (Token::RParen, 1),
                (b'=', _) => {
                    return Err(Error::expression(format!(
                        "invalid syntax at {start}: use '==' to compare"
                    )));
                }
                _ => {
                    let ch = statement[start..].chars().next().unwrap_or('?');
                    return Err(Error::expression(format!(
                        "invalid character '{ch}' at {start}"
                    )));
                }
            };
            pos += width;
            token
        };

        lexemes.push(Lexeme {
            token,
            text: &statement[start..pos],
            offset: start,
        });
    }

    Ok(lexemes)
}

/// End of a numeric literal: digits, optional fraction and optional exponent.
fn scan_number(bytes: &[u8], mut pos: usize) -> usize {
    let digits = |bytes: &[u8], mut pos: usize| {
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        pos
    };

    pos = digits(bytes, pos);
    if bytes.get(pos) == Some(&b'.') {
        pos = digits(bytes, pos + 1);
    }
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exponent = pos + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        if bytes.get(exponent).is_some_and(u8::is_ascii_digit) {
            pos = digits(bytes, exponent);
        }
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(statement: &str) -> Vec<Token> {
        tokenize(statement)
            .unwrap()
            .into_iter()
            .map(|lexeme| lexeme.token)
            .collect()
    }

    #[test]
    fn test_chained_comparison_tokens() {
        assert_eq!(
            tokens("18<a<23 and b<80"),
            vec![
                Token::Number(18.0),
                Token::Cmp(CmpOp::Lt),
                Token::Series(0),
                Token::Cmp(CmpOp::Lt),
                Token::Number(23.0),
                Token::And,
                Token::Series(1),
                Token::Cmp(CmpOp::Lt),
                Token::Number(80.0),
            ]
        );
    }

    #[test]
    fn test_keywords_are_whole_words() {
        // keywords contain series letters but stay keywords
        assert_eq!(
            tokens("a>1 or d<=2.5"),
            vec![
                Token::Series(0),
                Token::Cmp(CmpOp::Gt),
                Token::Number(1.0),
                Token::Or,
                Token::Series(3),
                Token::Cmp(CmpOp::Le),
                Token::Number(2.5),
            ]
        );
        assert!(tokenize("andy > 3").is_err());
        assert!(tokenize("A > 3").is_err());
    }

    #[test]
    fn test_numbers() {
        assert_eq!(tokens(".5"), vec![Token::Number(0.5)]);
        assert_eq!(tokens("1e3"), vec![Token::Number(1000.0)]);
        assert_eq!(tokens("2.5E-1"), vec![Token::Number(0.25)]);
        assert!(tokenize(".").is_err());
    }

    #[test]
    fn test_operators_and_offsets() {
        let lexemes = tokenize("(a != 0) == not b").unwrap();
        let texts: Vec<&str> = lexemes.iter().map(|l| l.text).collect();
        assert_eq!(texts, vec!["(", "a", "!=", "0", ")", "==", "not", "b"]);
        assert_eq!(lexemes[2].offset, 3);
    }

    #[test]
    fn test_rejects_stray_characters() {
        assert!(tokenize("a = 3").is_err());
        assert!(tokenize("a > 3 & b < 2").is_err());
        assert!(tokenize("a > °").is_err());
    }

    #[test]
    fn test_series_letter() {
        assert_eq!(series_letter(0), 'a');
        assert_eq!(series_letter(2), 'c');
        assert_eq!(series_letter(25), 'z');
    }
}
