//! Parser for molar-amount strings.
//!
//! Accepts the arithmetic actually seen in extracted compositions: decimal
//! literals, free symbols, `+ - * /`, integer powers via `**`, and
//! parentheses — `1.0`, `1-x`, `2*x+3`, `(1-x)/2`. Decimal literals convert
//! exactly to rationals, so `1`, `1.0` and `"1"` are the same amount.

use super::{Expr, Rational};
use thiserror::Error;

/// Error raised when a molar-amount string is not a valid expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountParseError {
    /// A character that cannot start or continue any token.
    #[error("unexpected character '{found}' at position {position} in amount '{input}'")]
    UnexpectedCharacter {
        input: String,
        found: char,
        position: usize,
    },

    /// The input ended where an operand or closing parenthesis was required.
    #[error("amount '{input}' ends unexpectedly")]
    UnexpectedEnd { input: String },

    /// A numeric literal too large for exact rational arithmetic.
    #[error("numeric literal '{literal}' in amount '{input}' is out of range")]
    NumberOutOfRange { input: String, literal: String },

    /// A division whose divisor simplifies to zero.
    #[error("division by zero in amount '{input}'")]
    DivisionByZero { input: String },
}

/// Parses a molar-amount string into a canonical [`Expr`].
pub fn parse_amount(input: &str) -> Result<Expr, AmountParseError> {
    let mut parser = Parser {
        input,
        chars: input.char_indices().collect(),
        pos: 0,
    };
    let expr = parser.expression()?;
    parser.skip_whitespace();
    match parser.peek() {
        None => Ok(expr),
        Some((position, found)) => Err(AmountParseError::UnexpectedCharacter {
            input: input.to_string(),
            found,
            position,
        }),
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<(usize, char)> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let next = self.peek();
        if next.is_some() {
            self.pos += 1;
        }
        next
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some((_, ch)) if ch.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, wanted: char) -> bool {
        self.skip_whitespace();
        if matches!(self.peek(), Some((_, ch)) if ch == wanted) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn unexpected(&self) -> AmountParseError {
        match self.peek() {
            Some((position, found)) => AmountParseError::UnexpectedCharacter {
                input: self.input.to_string(),
                found,
                position,
            },
            None => AmountParseError::UnexpectedEnd {
                input: self.input.to_string(),
            },
        }
    }

    fn expression(&mut self) -> Result<Expr, AmountParseError> {
        let mut value = self.term()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some((_, '+')) => {
                    self.pos += 1;
                    let rhs = self.term()?;
                    value = &value + &rhs;
                }
                Some((_, '-')) => {
                    self.pos += 1;
                    let rhs = self.term()?;
                    value = &value - &rhs;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<Expr, AmountParseError> {
        let mut value = self.factor()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                // '**' belongs to the factor below, not to multiplication.
                Some((_, '*')) if !matches!(self.chars.get(self.pos + 1), Some((_, '*'))) => {
                    self.pos += 1;
                    let rhs = self.factor()?;
                    value = &value * &rhs;
                }
                Some((_, '/')) => {
                    self.pos += 1;
                    let rhs = self.factor()?;
                    value = value.checked_div(&rhs).ok_or_else(|| {
                        AmountParseError::DivisionByZero {
                            input: self.input.to_string(),
                        }
                    })?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn factor(&mut self) -> Result<Expr, AmountParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some((_, '-')) => {
                self.pos += 1;
                Ok(-&self.factor()?)
            }
            Some((_, '+')) => {
                self.pos += 1;
                self.factor()
            }
            _ => {
                let base = self.primary()?;
                self.power(base)
            }
        }
    }

    fn power(&mut self, base: Expr) -> Result<Expr, AmountParseError> {
        self.skip_whitespace();
        if !matches!(
            (self.peek(), self.chars.get(self.pos + 1)),
            (Some((_, '*')), Some((_, '*')))
        ) {
            return Ok(base);
        }
        self.pos += 2;
        self.skip_whitespace();
        let start = self.pos;
        while matches!(self.peek(), Some((_, ch)) if ch.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.unexpected());
        }
        let exponent: u32 = self.chars[start..self.pos]
            .iter()
            .map(|(_, ch)| ch)
            .collect::<String>()
            .parse()
            .map_err(|_| AmountParseError::NumberOutOfRange {
                input: self.input.to_string(),
                literal: self.input[self.chars[start].0..].to_string(),
            })?;
        let mut value = Expr::from_integer(1);
        for _ in 0..exponent {
            value = &value * &base;
        }
        Ok(value)
    }

    fn primary(&mut self) -> Result<Expr, AmountParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some((_, '(')) => {
                self.pos += 1;
                let inner = self.expression()?;
                if self.eat(')') {
                    Ok(inner)
                } else {
                    Err(self.unexpected())
                }
            }
            Some((_, ch)) if ch.is_ascii_digit() || ch == '.' => self.number(),
            Some((_, ch)) if ch.is_alphabetic() || ch == '_' => Ok(self.identifier()),
            _ => Err(self.unexpected()),
        }
    }

    fn number(&mut self) -> Result<Expr, AmountParseError> {
        let start = self.pos;
        while matches!(self.peek(), Some((_, ch)) if ch.is_ascii_digit()) {
            self.pos += 1;
        }
        let mut fraction_digits: u32 = 0;
        if matches!(self.peek(), Some((_, '.'))) {
            self.pos += 1;
            while matches!(self.peek(), Some((_, ch)) if ch.is_ascii_digit()) {
                self.pos += 1;
                fraction_digits += 1;
            }
        }
        let literal: String = self.chars[start..self.pos].iter().map(|(_, ch)| ch).collect();
        let out_of_range = || AmountParseError::NumberOutOfRange {
            input: self.input.to_string(),
            literal: literal.clone(),
        };
        let digits: String = literal.chars().filter(|ch| *ch != '.').collect();
        if digits.is_empty() {
            return Err(self.unexpected());
        }
        let numerator: i128 = digits.parse().map_err(|_| out_of_range())?;
        let denominator = 10i128
            .checked_pow(fraction_digits)
            .ok_or_else(out_of_range)?;
        Ok(Expr::constant(Rational::new(numerator, denominator)))
    }

    fn identifier(&mut self) -> Expr {
        let start = self.pos;
        while matches!(self.peek(), Some((_, ch)) if ch.is_alphanumeric() || ch == '_') {
            self.pos += 1;
        }
        let name: String = self.chars[start..self.pos].iter().map(|(_, ch)| ch).collect();
        Expr::symbol(&name)
    }
}
