//! Canonical surface syntax for [`Expr`] values.
//!
//! Printed amounts feed directly into rendered reaction strings, so the
//! format is pinned: polynomial terms in ascending degree (`1-x`, never
//! `-x+1`), integer coefficients printed bare, non-integer coefficients
//! rounded to 3 decimal places with trailing zeros stripped (`0.25`, `7.5`,
//! `0.5*x`), and parentheses only where operator precedence requires them.

use super::{Expr, Monomial, Poly, Rational};
use itertools::Itertools;
use std::fmt;

/// Rounds to 3 decimal places (half away from zero) and strips trailing
/// zeros; integers print without a decimal point.
pub(crate) fn format_rational(value: Rational) -> String {
    if value.is_integer() {
        return value.numer().to_string();
    }
    let negative = value.is_negative();
    let num = value.numer().unsigned_abs();
    let den = value.denom().unsigned_abs();
    let scaled = num * 1000;
    let mut quotient = scaled / den;
    if (scaled % den) * 2 >= den {
        quotient += 1;
    }
    let integer = quotient / 1000;
    let fraction = format!("{:03}", quotient % 1000);
    let fraction = fraction.trim_end_matches('0');
    let body = if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{integer}.{fraction}")
    };
    if negative && body != "0" {
        format!("-{body}")
    } else {
        body
    }
}

fn format_monomial(monomial: &Monomial) -> String {
    monomial
        .symbols()
        .map(|(sym, exp)| {
            if exp == 1 {
                sym.to_string()
            } else {
                format!("{sym}**{exp}")
            }
        })
        .join("*")
}

fn format_term(monomial: &Monomial, coeff: Rational) -> String {
    if monomial.is_unit() {
        return format_rational(coeff);
    }
    let symbols = format_monomial(monomial);
    if coeff == Rational::ONE {
        symbols
    } else if coeff == -Rational::ONE {
        format!("-{symbols}")
    } else {
        format!("{}*{}", format_rational(coeff), symbols)
    }
}

fn format_poly(poly: &Poly) -> String {
    let mut out = String::new();
    for (monomial, coeff) in poly.terms() {
        let term = format_term(monomial, coeff);
        if term == "0" {
            continue;
        }
        if out.is_empty() || term.starts_with('-') {
            out.push_str(&term);
        } else {
            out.push('+');
            out.push_str(&term);
        }
    }
    if out.is_empty() { "0".to_string() } else { out }
}

fn is_single_factor(poly: &Poly) -> bool {
    let mut terms = poly.terms();
    let Some((monomial, coeff)) = terms.next() else {
        return true;
    };
    if terms.next().is_some() {
        return false;
    }
    monomial.symbols().count() <= 1 && (coeff == Rational::ONE || monomial.is_unit())
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_poly(self))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (num, den) = self.parts();
        if den.as_constant() == Some(Rational::ONE) {
            return f.write_str(&format_poly(num));
        }
        let num_str = format_poly(num);
        let num_str = if num.terms().count() > 1 {
            format!("({num_str})")
        } else {
            num_str
        };
        let den_str = format_poly(den);
        let den_str = if is_single_factor(den) {
            den_str
        } else {
            format!("({den_str})")
        };
        write!(f, "{num_str}/{den_str}")
    }
}
