#![doc = include_str!("../README.md")]

mod balancer;
mod core;
mod driver;
mod expr;
mod material;
mod render;
mod select;

pub mod rules;

pub use crate::balancer::{BalancedReaction, DEFAULT_TARGET_MIN_NV, ReactionBalancer};
pub use crate::core::{
    CannotBalance, DegenerateRecipe, Element, FormulaError, ParseElementError, RecipeError,
    SpeciesKey,
};
pub use crate::driver::{
    CompletedReaction, RecipeOptions, balance_recipe, balance_recipe_with_options,
    expand_element_vars,
};
pub use crate::expr::{
    AmountParseError, Expr, LinearSolution, Monomial, Poly, Rational, gauss_jordan, parse_amount,
};
pub use crate::material::{
    CompositionRecord, MaterialInfo, MaterialOptions, MaterialRecord, Substitution, TargetRecord,
};
pub use crate::render::{find_ions, render_reaction};
pub use crate::select::{nonorganic_subset, screen_precursors, subsets_by_sentence};
