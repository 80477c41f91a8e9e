//! The periodic table and the volatility classification that drives
//! stoichiometric bookkeeping.
//!
//! Balancing conserves every element, but only the *non-volatile* ones pin a
//! solid-state recipe down: H, C, N, O, the noble gases, and the halogens are
//! freely supplied or escape as gases and acids during firing, so they may
//! enter or leave through byproduct and exchange species. Everything else is
//! structural and must be sourced from the precursors.

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Every chemical element the balancer understands, in atomic-number order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    // Period 1
    H,
    He,
    // Period 2
    Li,
    Be,
    B,
    C,
    N,
    O,
    F,
    Ne,
    // Period 3
    Na,
    Mg,
    Al,
    Si,
    P,
    S,
    Cl,
    Ar,
    // Period 4
    K,
    Ca,
    Sc,
    Ti,
    V,
    Cr,
    Mn,
    Fe,
    Co,
    Ni,
    Cu,
    Zn,
    Ga,
    Ge,
    As,
    Se,
    Br,
    Kr,
    // Period 5
    Rb,
    Sr,
    Y,
    Zr,
    Nb,
    Mo,
    Tc,
    Ru,
    Rh,
    Pd,
    Ag,
    Cd,
    In,
    Sn,
    Sb,
    Te,
    I,
    Xe,
    // Period 6
    Cs,
    Ba,
    La,
    Ce,
    Pr,
    Nd,
    Pm,
    Sm,
    Eu,
    Gd,
    Tb,
    Dy,
    Ho,
    Er,
    Tm,
    Yb,
    Lu,
    Hf,
    Ta,
    W,
    Re,
    Os,
    Ir,
    Pt,
    Au,
    Hg,
    Tl,
    Pb,
    Bi,
    Po,
    At,
    Rn,
    // Period 7
    Fr,
    Ra,
    Ac,
    Th,
    Pa,
    U,
    Np,
    Pu,
    Am,
    Cm,
    Bk,
    Cf,
    Es,
    Fm,
    Md,
    No,
    Lr,
    Rf,
    Db,
    Sg,
    Bh,
    Hs,
    Mt,
    Ds,
    Rg,
    Cn,
    Nh,
    Fl,
    Mc,
    Lv,
    Ts,
    Og,
}

/// Error returned when parsing an unknown or misspelled element symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid element symbol: '{0}'")]
pub struct ParseElementError(pub String);

macro_rules! element_symbols {
    ($($variant:ident),+ $(,)?) => {
        impl Element {
            /// Every element, in atomic-number order.
            pub const ALL: &'static [Element] = &[$(Element::$variant),+];

            /// The IUPAC symbol.
            pub fn symbol(&self) -> &'static str {
                match self {
                    $(Element::$variant => stringify!($variant)),+
                }
            }
        }

        impl FromStr for Element {
            type Err = ParseElementError;

            /// Parses a standard IUPAC symbol (e.g. `"C"`, `"Mg"`) without
            /// case folding.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok(Element::$variant),)+
                    _ => Err(ParseElementError(s.to_string())),
                }
            }
        }
    };
}

element_symbols!(
    H, He, Li, Be, B, C, N, O, F, Ne, Na, Mg, Al, Si, P, S, Cl, Ar, K, Ca, Sc, Ti, V, Cr, Mn, Fe,
    Co, Ni, Cu, Zn, Ga, Ge, As, Se, Br, Kr, Rb, Sr, Y, Zr, Nb, Mo, Tc, Ru, Rh, Pd, Ag, Cd, In, Sn,
    Sb, Te, I, Xe, Cs, Ba, La, Ce, Pr, Nd, Pm, Sm, Eu, Gd, Tb, Dy, Ho, Er, Tm, Yb, Lu, Hf, Ta, W,
    Re, Os, Ir, Pt, Au, Hg, Tl, Pb, Bi, Po, At, Rn, Fr, Ra, Ac, Th, Pa, U, Np, Pu, Am, Cm, Bk, Cf,
    Es, Fm, Md, No, Lr, Rf, Db, Sg, Bh, Hs, Mt, Ds, Rg, Cn, Nh, Fl, Mc, Lv, Ts, Og,
);

impl Element {
    /// `true` for the structural elements whose conservation pins the
    /// recipe: everything except H, C, N, O, the noble gases, and the
    /// halogens.
    pub fn is_non_volatile(&self) -> bool {
        use Element::*;
        !matches!(
            self,
            H | C | N | O | He | Ne | Ar | Kr | Xe | Rn | F | Cl | Br | I | At
        )
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// One axis of the conservation system: a chemical element or the synthetic
/// charge carrier `e-` that ionic byproducts contribute.
///
/// The charge carrier is volatile by construction and can only enter the
/// system through byproduct species, never through an input composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpeciesKey {
    Element(Element),
    Charge,
}

impl SpeciesKey {
    pub fn is_non_volatile(&self) -> bool {
        match self {
            SpeciesKey::Element(element) => element.is_non_volatile(),
            SpeciesKey::Charge => false,
        }
    }
}

impl From<Element> for SpeciesKey {
    fn from(element: Element) -> SpeciesKey {
        SpeciesKey::Element(element)
    }
}

impl fmt::Display for SpeciesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeciesKey::Element(element) => element.fmt(f),
            SpeciesKey::Charge => f.write_str("e-"),
        }
    }
}
