//! Error types describing the failure modes of material interpretation and
//! reaction balancing.
//!
//! The taxonomy mirrors how the driver recovers: formula problems drop a
//! single material, degenerate recipes and solver verdicts feed the fallback
//! cascade, and everything is aggregated under [`RecipeError`] so library
//! consumers keep ergonomic `Result` signatures.

use crate::core::element::Element;
use crate::expr::AmountParseError;
use thiserror::Error;

/// Root error emitted by the fallible operations of the crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
    /// A material record could not be interpreted.
    #[error("material could not be interpreted")]
    Formula(#[from] FormulaError),

    /// The balancing attempt failed; inspect the variant to pick a fallback.
    #[error("reaction could not be balanced")]
    Balance(#[from] CannotBalance),
}

/// A material string, amount, or element failed interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// An element symbol (after substitution) is not in the periodic table.
    #[error("'{symbol}' is not a chemical element")]
    UnknownElement { symbol: String },

    /// A molar amount string did not parse as an arithmetic expression.
    #[error("bad molar amount")]
    Amount(#[from] AmountParseError),

    /// A substitution names a token that never occurs in the composition.
    #[error("substitution source '{placeholder}' does not occur in the composition")]
    DanglingSubstitution { placeholder: String },
}

/// The reaction cannot be balanced with the given materials.
///
/// This is the supertype callers catch; the driver inspects the variants to
/// choose between dropping organics ([`CannotBalance::TooFewPrecursors`]) and
/// pruning by sentence co-location ([`CannotBalance::TooManyPrecursors`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CannotBalance {
    /// The inputs are structurally nonsensical before any algebra runs.
    #[error("degenerate recipe")]
    Degenerate(#[from] DegenerateRecipe),

    /// The conservation system is inconsistent; some element cannot be
    /// sourced or disposed of.
    #[error("too few precursors: the conservation system is inconsistent")]
    TooFewPrecursors,

    /// The conservation system is underdetermined; the candidate set must be
    /// pruned before a unique reaction exists.
    #[error("too many precursors: {free} free parameters remain")]
    TooManyPrecursors { free: usize },
}

/// A recipe rejected on structural grounds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DegenerateRecipe {
    /// The target has too few non-volatile elements to be interesting.
    #[error("target {formula} has {found} non-volatile elements, needs at least {needed}")]
    TrivialTarget {
        formula: String,
        found: usize,
        needed: usize,
    },

    /// A precursor has exactly the target's element quantities.
    #[error("precursor list contains the target {formula}")]
    TargetAmongPrecursors { formula: String },

    /// Screening left nothing to balance with.
    #[error("no usable precursor candidates")]
    NoCandidates,

    /// The surviving precursors cannot source every structural element.
    #[error("precursors provide no source for non-volatile elements {missing:?}")]
    MissingElements { missing: Vec<Element> },
}
