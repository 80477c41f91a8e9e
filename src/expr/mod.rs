//! Exact symbolic arithmetic over rational expressions in a small set of
//! free symbols (typically `x`, `y`).
//!
//! Molar amounts extracted from synthesis text are rarely plain numbers:
//! doped targets carry coefficients such as `1-x` or `(1-x)/2`. Balancing
//! therefore runs over [`Expr`], a quotient of multivariate polynomials with
//! rational coefficients kept in canonical form, so that two amounts are
//! equal exactly when their difference simplifies to zero.

mod parse;
mod print;
mod solve;

pub use parse::{AmountParseError, parse_amount};
pub use solve::{LinearSolution, gauss_jordan};

use std::collections::BTreeMap;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Probe value substituted for every free symbol when a sign must be decided
/// numerically (see [`Expr::probe_sign`]).
pub const SIGN_PROBE: f64 = 0.001;

/// A reduced fraction of two `i128` integers with a strictly positive
/// denominator.
///
/// Stoichiometric coefficients are tiny, so `i128` headroom is ample even
/// through repeated cross-multiplication in the eliminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    num: i128,
    den: i128,
}

fn gcd(mut a: i128, mut b: i128) -> i128 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl Rational {
    pub const ZERO: Rational = Rational { num: 0, den: 1 };
    pub const ONE: Rational = Rational { num: 1, den: 1 };

    /// Builds the reduced form of `num/den`.
    ///
    /// A zero denominator is rejected by the callers before this point; the
    /// constructor maps it to zero to stay total.
    pub fn new(num: i128, den: i128) -> Rational {
        if den == 0 {
            return Rational::ZERO;
        }
        let sign = if den < 0 { -1 } else { 1 };
        let g = gcd(num, den).max(1);
        Rational {
            num: sign * num / g,
            den: sign * den / g,
        }
    }

    pub fn from_integer(n: i128) -> Rational {
        Rational { num: n, den: 1 }
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub fn is_negative(&self) -> bool {
        self.num < 0
    }

    pub fn is_integer(&self) -> bool {
        self.den == 1
    }

    pub fn numer(&self) -> i128 {
        self.num
    }

    pub fn denom(&self) -> i128 {
        self.den
    }

    pub fn recip(&self) -> Option<Rational> {
        if self.num == 0 {
            None
        } else {
            Some(Rational::new(self.den, self.num))
        }
    }

    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

impl Add for Rational {
    type Output = Rational;
    fn add(self, rhs: Rational) -> Rational {
        Rational::new(self.num * rhs.den + rhs.num * self.den, self.den * rhs.den)
    }
}

impl Sub for Rational {
    type Output = Rational;
    fn sub(self, rhs: Rational) -> Rational {
        Rational::new(self.num * rhs.den - rhs.num * self.den, self.den * rhs.den)
    }
}

impl Mul for Rational {
    type Output = Rational;
    fn mul(self, rhs: Rational) -> Rational {
        Rational::new(self.num * rhs.num, self.den * rhs.den)
    }
}

impl Div for Rational {
    type Output = Rational;
    fn div(self, rhs: Rational) -> Rational {
        Rational::new(self.num * rhs.den, self.den * rhs.num)
    }
}

impl Neg for Rational {
    type Output = Rational;
    fn neg(self) -> Rational {
        Rational {
            num: -self.num,
            den: self.den,
        }
    }
}

/// A product of symbol powers, e.g. `x`, `x*y`, `x**2`.
///
/// The empty monomial is the constant term. Ordering is graded (total degree
/// first, then lexicographic), which both fixes the printing order — constant
/// term first, so `1-x` rather than `-x+1` — and gives the polynomial
/// division in [`Poly::div_exact`] a well-founded leading term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Monomial(BTreeMap<String, u32>);

impl Monomial {
    pub fn unit() -> Monomial {
        Monomial(BTreeMap::new())
    }

    pub fn symbol(name: &str) -> Monomial {
        let mut powers = BTreeMap::new();
        powers.insert(name.to_string(), 1);
        Monomial(powers)
    }

    pub fn is_unit(&self) -> bool {
        self.0.is_empty()
    }

    pub fn degree(&self) -> u32 {
        self.0.values().sum()
    }

    fn mul(&self, other: &Monomial) -> Monomial {
        let mut powers = self.0.clone();
        for (sym, exp) in &other.0 {
            *powers.entry(sym.clone()).or_insert(0) += exp;
        }
        Monomial(powers)
    }

    /// Componentwise division; `None` when any exponent would go negative.
    fn div(&self, other: &Monomial) -> Option<Monomial> {
        let mut powers = self.0.clone();
        for (sym, exp) in &other.0 {
            let own = powers.get_mut(sym)?;
            if *own < *exp {
                return None;
            }
            *own -= exp;
            if *own == 0 {
                powers.remove(sym);
            }
        }
        Some(Monomial(powers))
    }

    pub fn symbols(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(sym, exp)| (sym.as_str(), *exp))
    }
}

impl Ord for Monomial {
    fn cmp(&self, other: &Monomial) -> std::cmp::Ordering {
        self.degree()
            .cmp(&other.degree())
            .then_with(|| self.0.iter().cmp(other.0.iter()))
    }
}

impl PartialOrd for Monomial {
    fn partial_cmp(&self, other: &Monomial) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A multivariate polynomial with rational coefficients in canonical form:
/// no zero terms, terms keyed by graded monomial order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Poly {
    terms: BTreeMap<Monomial, Rational>,
}

impl Poly {
    pub fn zero() -> Poly {
        Poly::default()
    }

    pub fn constant(value: Rational) -> Poly {
        Poly::term(Monomial::unit(), value)
    }

    pub fn symbol(name: &str) -> Poly {
        Poly::term(Monomial::symbol(name), Rational::ONE)
    }

    fn term(monomial: Monomial, coeff: Rational) -> Poly {
        let mut terms = BTreeMap::new();
        if !coeff.is_zero() {
            terms.insert(monomial, coeff);
        }
        Poly { terms }
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// `Some(c)` when the polynomial is the constant `c` (including zero).
    pub fn as_constant(&self) -> Option<Rational> {
        match self.terms.len() {
            0 => Some(Rational::ZERO),
            1 => {
                let (monomial, coeff) = self.terms.iter().next()?;
                monomial.is_unit().then_some(*coeff)
            }
            _ => None,
        }
    }

    pub fn add(&self, other: &Poly) -> Poly {
        let mut terms = self.terms.clone();
        for (monomial, coeff) in &other.terms {
            let entry = terms.entry(monomial.clone()).or_insert(Rational::ZERO);
            *entry = *entry + *coeff;
            if entry.is_zero() {
                terms.remove(monomial);
            }
        }
        Poly { terms }
    }

    pub fn sub(&self, other: &Poly) -> Poly {
        self.add(&other.neg())
    }

    pub fn neg(&self) -> Poly {
        Poly {
            terms: self
                .terms
                .iter()
                .map(|(monomial, coeff)| (monomial.clone(), -*coeff))
                .collect(),
        }
    }

    pub fn mul(&self, other: &Poly) -> Poly {
        let mut result = Poly::zero();
        for (ma, ca) in &self.terms {
            for (mb, cb) in &other.terms {
                result = result.add(&Poly::term(ma.mul(mb), *ca * *cb));
            }
        }
        result
    }

    pub fn scale(&self, factor: Rational) -> Poly {
        if factor.is_zero() {
            return Poly::zero();
        }
        Poly {
            terms: self
                .terms
                .iter()
                .map(|(monomial, coeff)| (monomial.clone(), *coeff * factor))
                .collect(),
        }
    }

    fn leading_term(&self) -> Option<(&Monomial, Rational)> {
        self.terms
            .iter()
            .next_back()
            .map(|(monomial, coeff)| (monomial, *coeff))
    }

    /// Exact multivariate division; `None` when `divisor` does not divide
    /// `self` evenly (or is zero).
    fn div_exact(&self, divisor: &Poly) -> Option<Poly> {
        let (div_monomial, div_coeff) = divisor.leading_term()?;
        let div_monomial = div_monomial.clone();
        let mut remainder = self.clone();
        let mut quotient = Poly::zero();
        while !remainder.is_zero() {
            let (rem_monomial, rem_coeff) = match remainder.leading_term() {
                Some((monomial, coeff)) => (monomial.clone(), coeff),
                None => break,
            };
            let step_monomial = rem_monomial.div(&div_monomial)?;
            let step = Poly::term(step_monomial, rem_coeff / div_coeff);
            remainder = remainder.sub(&step.mul(divisor));
            quotient = quotient.add(&step);
        }
        Some(quotient)
    }

    /// Evaluates with every free symbol set to `probe`.
    pub fn eval(&self, probe: f64) -> f64 {
        self.terms
            .iter()
            .map(|(monomial, coeff)| {
                coeff.to_f64() * probe.powi(monomial.degree() as i32)
            })
            .sum()
    }

    pub(crate) fn terms(&self) -> impl Iterator<Item = (&Monomial, Rational)> {
        self.terms.iter().map(|(monomial, coeff)| (monomial, *coeff))
    }
}

/// A quotient of two polynomials in canonical form.
///
/// Invariants: the denominator is never zero; constant denominators are
/// folded into the numerator coefficients; a non-constant denominator is
/// monic and collapsed by exact division whenever possible.
#[derive(Debug, Clone)]
pub struct Expr {
    num: Poly,
    den: Poly,
}

impl Expr {
    pub fn zero() -> Expr {
        Expr {
            num: Poly::zero(),
            den: Poly::constant(Rational::ONE),
        }
    }

    pub fn constant(value: Rational) -> Expr {
        Expr {
            num: Poly::constant(value),
            den: Poly::constant(Rational::ONE),
        }
    }

    pub fn from_integer(n: i128) -> Expr {
        Expr::constant(Rational::from_integer(n))
    }

    pub fn symbol(name: &str) -> Expr {
        Expr {
            num: Poly::symbol(name),
            den: Poly::constant(Rational::ONE),
        }
    }

    /// Canonicalizing constructor; `None` when `den` is the zero polynomial.
    pub fn checked_new(num: Poly, den: Poly) -> Option<Expr> {
        if den.is_zero() {
            return None;
        }
        if num.is_zero() {
            return Some(Expr::zero());
        }
        if let Some(c) = den.as_constant() {
            let inv = c.recip()?;
            return Some(Expr {
                num: num.scale(inv),
                den: Poly::constant(Rational::ONE),
            });
        }
        if let Some(quotient) = num.div_exact(&den) {
            return Some(Expr {
                num: quotient,
                den: Poly::constant(Rational::ONE),
            });
        }
        // Monic denominator as the canonical representative.
        let lead = den
            .leading_term()
            .map(|(_, coeff)| coeff)
            .unwrap_or(Rational::ONE);
        let inv = lead.recip()?;
        Some(Expr {
            num: num.scale(inv),
            den: den.scale(inv),
        })
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    pub fn checked_div(&self, rhs: &Expr) -> Option<Expr> {
        if rhs.is_zero() {
            return None;
        }
        Expr::checked_new(self.num.mul(&rhs.den), self.den.mul(&rhs.num))
    }

    pub fn recip(&self) -> Option<Expr> {
        Expr::from_integer(1).checked_div(self)
    }

    /// Evaluates with every free symbol set to `probe`.
    pub fn eval(&self, probe: f64) -> f64 {
        self.num.eval(probe) / self.den.eval(probe)
    }

    /// `true` when the expression is strictly negative at the standard sign
    /// probe ([`SIGN_PROBE`] for every free symbol).
    ///
    /// Parametric coefficients cannot be sign-classified purely symbolically;
    /// sampling at a small positive value decides which side of the reaction
    /// an amount belongs to.
    pub fn probe_sign(&self) -> bool {
        self.eval(SIGN_PROBE) < 0.0
    }

    pub(crate) fn parts(&self) -> (&Poly, &Poly) {
        (&self.num, &self.den)
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Expr) -> bool {
        self.num.mul(&other.den) == other.num.mul(&self.den)
    }
}

impl Eq for Expr {}

impl Add for &Expr {
    type Output = Expr;
    fn add(self, rhs: &Expr) -> Expr {
        let num = self.num.mul(&rhs.den).add(&rhs.num.mul(&self.den));
        let den = self.den.mul(&rhs.den);
        Expr::checked_new(num, den).unwrap_or_else(Expr::zero)
    }
}

impl Sub for &Expr {
    type Output = Expr;
    fn sub(self, rhs: &Expr) -> Expr {
        self + &(-rhs)
    }
}

impl Mul for &Expr {
    type Output = Expr;
    fn mul(self, rhs: &Expr) -> Expr {
        Expr::checked_new(self.num.mul(&rhs.num), self.den.mul(&rhs.den))
            .unwrap_or_else(Expr::zero)
    }
}

impl Neg for &Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr {
            num: self.num.neg(),
            den: self.den.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn rational_reduces_on_construction() {
        let half = Rational::new(2, 4);
        assert_eq!(half, Rational::new(1, 2));
        assert_eq!(Rational::new(3, -6), Rational::new(-1, 2));
        assert!(Rational::new(3, -6).is_negative());
    }

    #[test]
    fn expression_arithmetic_cancels_exactly() {
        let one_minus_x = &Expr::from_integer(1) - &x();
        let back = &one_minus_x + &x();
        assert_eq!(back, Expr::from_integer(1));
        assert!((&one_minus_x - &one_minus_x).is_zero());
    }

    #[test]
    fn constant_denominator_folds_into_coefficients() {
        let num = Poly::constant(Rational::ONE).sub(&Poly::symbol("x"));
        let expr = Expr::checked_new(num, Poly::constant(Rational::from_integer(2))).unwrap();
        assert_eq!(expr.to_string(), "0.5-0.5*x");
    }

    #[test]
    fn exact_polynomial_division_collapses_quotients() {
        // (1 - x**2) / (1 - x) == 1 + x
        let one = Poly::constant(Rational::ONE);
        let x_poly = Poly::symbol("x");
        let num = one.sub(&x_poly.mul(&x_poly));
        let den = one.sub(&x_poly);
        let expr = Expr::checked_new(num, den).unwrap();
        let expected = &Expr::from_integer(1) + &x();
        assert_eq!(expr, expected);
        assert_eq!(expr.to_string(), "1+x");
    }

    #[test]
    fn division_by_zero_is_rejected() {
        assert!(x().checked_div(&Expr::zero()).is_none());
        assert!(Expr::checked_new(Poly::symbol("x"), Poly::zero()).is_none());
    }

    #[test]
    fn sign_probe_classifies_parametric_amounts() {
        let six_minus_x = &Expr::from_integer(6) - &x();
        let x_minus_six = -&six_minus_x;
        assert!(!six_minus_x.probe_sign());
        assert!(x_minus_six.probe_sign());
        assert!(!Expr::zero().probe_sign());
    }

    #[test]
    fn probe_evaluation_matches_hand_computation() {
        // (6 - x) / 2 at x = 0.001
        let expr = Expr::checked_new(
            Poly::constant(Rational::from_integer(6)).sub(&Poly::symbol("x")),
            Poly::constant(Rational::from_integer(2)),
        )
        .unwrap();
        assert!((expr.eval(SIGN_PROBE) - 2.9995).abs() < 1e-12);
    }
}
