//! The public entry point: expand target variants, screen precursors, and
//! run the balancing cascade.
//!
//! Each (target, substitution) variant is balanced against all screened
//! precursors first. An inconsistent system retries without organic
//! materials; an underdetermined one walks the sentence co-location subsets
//! and keeps the first success. Variants that still fail are logged and
//! skipped — one bad target never aborts the batch.

use crate::balancer::{BalancedReaction, DEFAULT_TARGET_MIN_NV, ReactionBalancer};
use crate::core::{CannotBalance, RecipeError};
use crate::material::{
    MaterialInfo, MaterialOptions, MaterialRecord, Substitution, TargetRecord,
};
use crate::render::render_reaction;
use crate::select::{nonorganic_subset, screen_precursors, subsets_by_sentence};
use log::{debug, warn};

/// Options threaded through one balancing run.
#[derive(Debug, Clone)]
pub struct RecipeOptions {
    pub material: MaterialOptions,
    /// Minimum non-volatile elements a target needs; see
    /// [`DEFAULT_TARGET_MIN_NV`].
    pub target_min_nv: usize,
}

impl Default for RecipeOptions {
    fn default() -> RecipeOptions {
        RecipeOptions {
            material: MaterialOptions::default(),
            target_min_nv: DEFAULT_TARGET_MIN_NV,
        }
    }
}

/// One successfully balanced (target, substitution) variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedReaction {
    /// The target's display formula.
    pub target_formula: String,
    /// Amounts by formula for each side; target on the right with `"1"`.
    pub reaction: BalancedReaction,
    /// The element substitution this variant was balanced under, if any.
    pub substitution: Option<Substitution>,
    /// The human-readable reaction string.
    pub rendered: String,
}

/// Expands every target into its concrete (target, substitution) variants.
///
/// Each placeholder that actually occurs in the composition yields one
/// variant per candidate element; a target without applicable element
/// variables yields a single unsubstituted variant.
pub fn expand_element_vars(
    targets: &[TargetRecord],
) -> Vec<(&TargetRecord, Option<Substitution>)> {
    let mut variants = Vec::new();
    for target in targets {
        let used: Vec<&String> = target
            .elements_vars
            .keys()
            .filter(|placeholder| {
                target
                    .material
                    .composition
                    .iter()
                    .any(|component| component.elements.contains_key(placeholder.as_str()))
            })
            .collect();
        if used.is_empty() {
            variants.push((target, None));
            continue;
        }
        for placeholder in used {
            for element in &target.elements_vars[placeholder] {
                let substitution =
                    Substitution::from_iter([(placeholder.clone(), element.clone())]);
                variants.push((target, Some(substitution)));
            }
        }
    }
    variants
}

fn try_balance(
    candidates: &[&MaterialInfo],
    target: &TargetRecord,
    substitution: Option<&Substitution>,
    all_precursors: &[MaterialRecord],
    options: &RecipeOptions,
) -> Result<CompletedReaction, RecipeError> {
    let target_info =
        MaterialInfo::from_record_with(&target.material, substitution, &options.material)?;
    let balancer = ReactionBalancer::with_target_min_nv(
        candidates.iter().copied(),
        &target_info,
        options.target_min_nv,
    )?;
    let reaction = balancer.balance()?;
    let rendered = render_reaction(all_precursors, target, &reaction, substitution);
    Ok(CompletedReaction {
        target_formula: target_info.material_formula().to_string(),
        reaction,
        substitution: substitution.cloned(),
        rendered,
    })
}

/// Balances a recipe extracted from a synthesis paragraph.
///
/// `precursors` and `targets` are the records produced upstream; `sentences`
/// are the paragraph's sentences and feed the co-location fallback when the
/// precursor set is underdetermined. Returns one [`CompletedReaction`] per
/// variant that balanced; failures are logged and skipped.
pub fn balance_recipe(
    precursors: &[MaterialRecord],
    targets: &[TargetRecord],
    sentences: &[String],
) -> Vec<CompletedReaction> {
    balance_recipe_with_options(precursors, targets, sentences, &RecipeOptions::default())
}

/// [`balance_recipe`] with explicit decomposition-model and threshold knobs.
pub fn balance_recipe_with_options(
    precursors: &[MaterialRecord],
    targets: &[TargetRecord],
    sentences: &[String],
    options: &RecipeOptions,
) -> Vec<CompletedReaction> {
    let screened = screen_precursors(precursors, &options.material);
    let variants = expand_element_vars(targets);

    let mut solutions = Vec::new();
    for (target, substitution) in variants {
        let substitution = substitution.as_ref();
        let target_info = match MaterialInfo::from_record_with(
            &target.material,
            substitution,
            &options.material,
        ) {
            Ok(info) => info,
            Err(err) => {
                debug!(
                    "failed to convert target {}: {err}",
                    target.material.material_formula
                );
                continue;
            }
        };
        let target_formula = target_info.material_formula();

        let everything: Vec<&MaterialInfo> = screened.iter().collect();
        match try_balance(&everything, target, substitution, precursors, options) {
            Ok(solution) => solutions.push(solution),
            Err(RecipeError::Balance(CannotBalance::TooFewPrecursors)) => {
                let inorganic = nonorganic_subset(&screened);
                match try_balance(&inorganic, target, substitution, precursors, options) {
                    Ok(solution) => solutions.push(solution),
                    Err(err) => debug!(
                        "failed trying inorganic precursor subset for target {target_formula}: {err}"
                    ),
                }
            }
            Err(RecipeError::Balance(CannotBalance::TooManyPrecursors { .. })) => {
                let candidate_subsets = subsets_by_sentence(&screened, sentences);
                if candidate_subsets.is_empty() {
                    debug!("no possible precursor subsets for target {target_formula}");
                    continue;
                }
                let mut success = false;
                for subset in candidate_subsets {
                    match try_balance(&subset, target, substitution, precursors, options) {
                        Ok(solution) => {
                            solutions.push(solution);
                            success = true;
                            break;
                        }
                        Err(err) => debug!(
                            "failed trying precursor subset for target {target_formula}: {err}"
                        ),
                    }
                }
                if !success {
                    debug!("cannot find a subset of precursors for target {target_formula}");
                }
            }
            Err(RecipeError::Balance(err)) => {
                debug!("cannot balance reaction for target {target_formula}: {err}");
            }
            Err(err) => {
                warn!("unexpected error for target {target_formula}: {err}");
            }
        }
    }
    solutions
}
