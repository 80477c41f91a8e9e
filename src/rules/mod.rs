//! Data-driven byproduct and functional-group rules.
//!
//! Which species a material can shed during synthesis is chemistry knowledge,
//! not algorithm: a carbonate group leaves as CO2, a nitrate group as
//! nitrate ions plus the aqueous solution pair, an `NH4` salt as ammonia.
//! These facts live in a TOML document compiled into the library and parsed
//! once on first access; [`parse_rules`] accepts alternative rule sets with
//! the same shape for experimentation.

use crate::core::{Element, SpeciesKey};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use thiserror::Error;

mod default;

/// Error raised when a rule document is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The TOML payload did not deserialize.
    #[error("failed to parse byproduct rules: {0}")]
    Parse(String),

    /// A group releases a species the document never defines.
    #[error("group '{group}' releases undefined species '{formula}'")]
    UndefinedSpecies { group: String, formula: String },

    /// A group defines neither a composition signature nor a formula
    /// substring, so it can never match.
    #[error("group '{group}' has no signature and no formula substring")]
    NoTrigger { group: String },
}

/// A byproduct or exchange species together with its conservation vector.
///
/// Ionic species carry the synthetic charge axis: a charge of −1 contributes
/// `e- = +1`, so the charge column of the linear system balances electrons
/// exactly like any element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Species {
    pub formula: String,
    pub counts: BTreeMap<SpeciesKey, i64>,
}

/// A functional-group rule.
///
/// A group is detected either by its stoichiometric `signature` — matched
/// against a component's volatile sub-composition up to a strictly positive
/// scalar — or by a literal `formula_substring` in the material formula.
/// Once detected, the group contributes every species in `releases` to the
/// material's decomposition candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRule {
    pub name: String,
    pub signature: BTreeMap<Element, i64>,
    pub formula_substring: Option<String>,
    pub releases: Vec<String>,
}

/// A validated set of species definitions and group rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ruleset {
    species: BTreeMap<String, Species>,
    groups: Vec<GroupRule>,
}

impl Ruleset {
    pub fn species(&self, formula: &str) -> Option<&Species> {
        self.species.get(formula)
    }

    pub fn groups(&self) -> &[GroupRule] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&GroupRule> {
        self.groups.iter().find(|group| group.name == name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RulesetData {
    species: BTreeMap<String, SpeciesData>,
    #[serde(rename = "group")]
    groups: Vec<GroupData>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SpeciesData {
    elements: BTreeMap<Element, i64>,
    #[serde(default)]
    charge: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GroupData {
    name: String,
    #[serde(default)]
    signature: BTreeMap<Element, i64>,
    #[serde(default)]
    formula_substring: Option<String>,
    releases: Vec<String>,
}

/// Parses and validates a TOML rule document.
///
/// # Errors
///
/// Returns [`RuleError::Parse`] for malformed TOML or unknown fields,
/// [`RuleError::UndefinedSpecies`] when a group releases a species that is
/// not defined, and [`RuleError::NoTrigger`] when a group could never match.
pub fn parse_rules(content: &str) -> Result<Ruleset, RuleError> {
    let data: RulesetData =
        toml::from_str(content).map_err(|e| RuleError::Parse(e.to_string()))?;

    let species: BTreeMap<String, Species> = data
        .species
        .into_iter()
        .map(|(formula, definition)| {
            let mut counts: BTreeMap<SpeciesKey, i64> = definition
                .elements
                .into_iter()
                .map(|(element, count)| (SpeciesKey::Element(element), count))
                .collect();
            if definition.charge != 0 {
                counts.insert(SpeciesKey::Charge, -definition.charge);
            }
            let species = Species {
                formula: formula.clone(),
                counts,
            };
            (formula, species)
        })
        .collect();

    let groups = data
        .groups
        .into_iter()
        .map(|group| {
            if group.signature.is_empty() && group.formula_substring.is_none() {
                return Err(RuleError::NoTrigger { group: group.name });
            }
            for formula in &group.releases {
                if !species.contains_key(formula) {
                    return Err(RuleError::UndefinedSpecies {
                        group: group.name.clone(),
                        formula: formula.clone(),
                    });
                }
            }
            Ok(GroupRule {
                name: group.name,
                signature: group.signature,
                formula_substring: group.formula_substring,
                releases: group.releases,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Ruleset { species, groups })
}

static DEFAULT_RULESET: LazyLock<Ruleset> = LazyLock::new(|| {
    parse_rules(default::DEFAULT_RULES_TOML).expect("embedded byproduct rules are valid")
});

/// The byproduct rules compiled into the library, parsed on first access.
pub fn default_ruleset() -> &'static Ruleset {
    &DEFAULT_RULESET
}
