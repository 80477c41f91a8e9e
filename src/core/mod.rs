//! Core types shared across the balancer: the periodic table, the species
//! axes of the conservation system, and the error taxonomy.

pub mod element;
pub mod error;

pub use element::{Element, ParseElementError, SpeciesKey};
pub use error::{CannotBalance, DegenerateRecipe, FormulaError, RecipeError};
