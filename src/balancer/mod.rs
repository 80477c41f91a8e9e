//! Sets up and solves the conservation system for one (precursors, target)
//! pair.
//!
//! Construction screens the inputs and aggregates the byproduct and exchange
//! species; [`ReactionBalancer::balance`] builds the element-by-species
//! matrix, runs the symbolic elimination, and assigns every solved amount to
//! a side of the reaction. The target amount is pinned to 1 rather than
//! solved, so a unique solution is a fully balanced recipe.

use crate::core::{CannotBalance, DegenerateRecipe, Element, SpeciesKey};
use crate::expr::{Expr, LinearSolution, gauss_jordan};
use crate::material::MaterialInfo;
use crate::rules::Species;
use indexmap::IndexMap;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Minimum number of non-volatile elements a target needs to be worth
/// balancing; single-element targets are rejected as degenerate.
pub const DEFAULT_TARGET_MIN_NV: usize = 2;

/// A balanced reaction: printed amounts keyed by formula, one map per side.
///
/// The target is always present on the right with amount `"1"`. Insertion
/// order is precursors, then decomposition species, then exchange species,
/// each group in its solving order; the renderer applies display ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalancedReaction {
    pub left: IndexMap<String, String>,
    pub right: IndexMap<String, String>,
}

/// Side tag for an unknown: where its amount lands, and how the sign of the
/// solved value can flip it.
#[derive(Debug, Clone, Copy)]
enum SideTag {
    /// Precursors stay on the left with the value as solved.
    Precursor,
    /// Exchange gases default to the left; a negative amount moves the
    /// species to the right, negated.
    ExchangeLeft,
    /// Decomposition products default to the right; the solved value is
    /// negative when the species really is produced, so a negative amount
    /// lands on the right negated and a positive one on the left as-is.
    DecompositionRight,
}

fn side_and_value(tag: SideTag, value: &Expr) -> (bool, Expr) {
    match tag {
        SideTag::Precursor => (true, value.clone()),
        SideTag::ExchangeLeft | SideTag::DecompositionRight => {
            if value.probe_sign() {
                (false, -value)
            } else {
                (true, value.clone())
            }
        }
    }
}

/// Balances one candidate precursor set against one target.
pub struct ReactionBalancer<'a> {
    candidates: Vec<&'a MaterialInfo>,
    target: &'a MaterialInfo,
    decompositions: BTreeMap<String, Species>,
    exchanges: BTreeMap<String, Species>,
}

impl<'a> ReactionBalancer<'a> {
    /// Screens the inputs with the default target threshold.
    pub fn new(
        precursors: impl IntoIterator<Item = &'a MaterialInfo>,
        target: &'a MaterialInfo,
    ) -> Result<ReactionBalancer<'a>, CannotBalance> {
        ReactionBalancer::with_target_min_nv(precursors, target, DEFAULT_TARGET_MIN_NV)
    }

    /// Screens the inputs: rejects degenerate targets, deduplicates
    /// precursors by formula, drops empty or chemically excessive ones, and
    /// checks that the survivors can source every structural element.
    ///
    /// # Errors
    ///
    /// [`CannotBalance::Degenerate`] for a trivial target, a precursor equal
    /// to the target, an empty candidate set, or a coverage gap.
    pub fn with_target_min_nv(
        precursors: impl IntoIterator<Item = &'a MaterialInfo>,
        target: &'a MaterialInfo,
        target_min_nv: usize,
    ) -> Result<ReactionBalancer<'a>, CannotBalance> {
        let target_nv = target.nv_elements();
        if target_nv.len() < target_min_nv {
            return Err(DegenerateRecipe::TrivialTarget {
                formula: target.material_formula().to_string(),
                found: target_nv.len(),
                needed: target_min_nv,
            }
            .into());
        }

        let mut candidates: Vec<&MaterialInfo> = Vec::new();
        let mut decompositions: BTreeMap<String, Species> = BTreeMap::new();
        let mut seen: BTreeSet<&str> = BTreeSet::new();

        for precursor in precursors {
            if !seen.insert(precursor.material_formula()) {
                continue;
            }
            if precursor.same_composition_as(target) {
                return Err(DegenerateRecipe::TargetAmongPrecursors {
                    formula: target.material_formula().to_string(),
                }
                .into());
            }
            if precursor.is_empty() {
                debug!("skipping empty precursor {}", precursor.material_formula());
                continue;
            }
            if !precursor.nv_elements().is_subset(&target_nv) {
                debug!(
                    "skipping precursor {} with excessive chemical elements",
                    precursor.material_formula()
                );
                continue;
            }
            decompositions.extend(
                precursor
                    .decompose_chemicals()
                    .iter()
                    .map(|(formula, species)| (formula.clone(), species.clone())),
            );
            candidates.push(precursor);
        }

        if candidates.is_empty() {
            return Err(DegenerateRecipe::NoCandidates.into());
        }

        let provided: BTreeSet<Element> = candidates
            .iter()
            .flat_map(|candidate| candidate.nv_elements())
            .collect();
        let missing: Vec<Element> = target_nv.difference(&provided).copied().collect();
        if !missing.is_empty() {
            return Err(DegenerateRecipe::MissingElements { missing }.into());
        }

        Ok(ReactionBalancer {
            candidates,
            target,
            decompositions,
            exchanges: target.exchange_chemicals().clone(),
        })
    }

    /// The precursors that survived screening, in input order.
    pub fn candidates(&self) -> impl Iterator<Item = &MaterialInfo> {
        self.candidates.iter().copied()
    }

    /// Solves the conservation system and renders the amounts.
    ///
    /// # Errors
    ///
    /// [`CannotBalance::TooManyPrecursors`] when the system is
    /// underdetermined and [`CannotBalance::TooFewPrecursors`] when it is
    /// inconsistent.
    pub fn balance(&self) -> Result<BalancedReaction, CannotBalance> {
        let (matrix, rhs) = self.conservation_system();
        match gauss_jordan(&matrix, &rhs) {
            LinearSolution::Underdetermined { free } => {
                Err(CannotBalance::TooManyPrecursors { free })
            }
            LinearSolution::Inconsistent => Err(CannotBalance::TooFewPrecursors),
            LinearSolution::Unique(solution) => Ok(self.assign_sides(&solution)),
        }
    }

    /// One row per conserved axis, one column per unknown amount, columns
    /// ordered precursors, then decompositions, then exchanges.
    fn conservation_system(&self) -> (Vec<Vec<Expr>>, Vec<Expr>) {
        let mut axes: BTreeSet<SpeciesKey> = BTreeSet::new();
        for candidate in &self.candidates {
            axes.extend(candidate.all_elements().into_iter().map(SpeciesKey::from));
        }
        axes.extend(self.target.all_elements().into_iter().map(SpeciesKey::from));
        for species in self.decompositions.values().chain(self.exchanges.values()) {
            axes.extend(species.counts.keys().copied());
        }

        let mut columns: Vec<BTreeMap<SpeciesKey, Expr>> = Vec::new();
        for candidate in &self.candidates {
            columns.push(
                candidate
                    .all_elements_map()
                    .into_iter()
                    .map(|(element, amount)| (SpeciesKey::from(element), amount))
                    .collect(),
            );
        }
        for species in self.decompositions.values().chain(self.exchanges.values()) {
            columns.push(
                species
                    .counts
                    .iter()
                    .map(|(key, count)| (*key, Expr::from_integer(i128::from(*count))))
                    .collect(),
            );
        }

        let target_map = self.target.all_elements_map();
        let mut matrix = Vec::with_capacity(axes.len());
        let mut rhs = Vec::with_capacity(axes.len());
        for axis in &axes {
            matrix.push(
                columns
                    .iter()
                    .map(|column| column.get(axis).cloned().unwrap_or_else(Expr::zero))
                    .collect(),
            );
            let target_amount = match axis {
                SpeciesKey::Element(element) => {
                    target_map.get(element).cloned().unwrap_or_else(Expr::zero)
                }
                SpeciesKey::Charge => Expr::zero(),
            };
            rhs.push(target_amount);
        }
        (matrix, rhs)
    }

    fn assign_sides(&self, solution: &[Expr]) -> BalancedReaction {
        let mut reaction = BalancedReaction {
            left: IndexMap::new(),
            right: IndexMap::new(),
        };
        reaction
            .right
            .insert(self.target.material_formula().to_string(), "1".to_string());

        let tagged = self
            .candidates
            .iter()
            .map(|candidate| (candidate.material_formula(), SideTag::Precursor))
            .chain(
                self.decompositions
                    .keys()
                    .map(|formula| (formula.as_str(), SideTag::DecompositionRight)),
            )
            .chain(
                self.exchanges
                    .keys()
                    .map(|formula| (formula.as_str(), SideTag::ExchangeLeft)),
            );

        for ((formula, tag), value) in tagged.zip(solution) {
            let (left, amount) = side_and_value(tag, value);
            let printed = amount.to_string();
            if printed == "0" {
                continue;
            }
            let side = if left {
                &mut reaction.left
            } else {
                &mut reaction.right
            };
            side.insert(formula.to_string(), printed);
        }
        reaction
    }
}
