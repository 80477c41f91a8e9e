//! Human-readable rendering of balanced reactions.
//!
//! Produces strings like
//! `6 Fe2O3 + 6 SrCO3 == 1 Sr6(A2O4)6 + 6 CO2; A = Fe ; target Sr6(A2O4)6
//! with additives Mn2+ via MnO`: amounts and formulas joined with ` + `
//! within a side, sides separated by ` == `, substitutions and additive
//! annotations appended after semicolons.

use crate::balancer::BalancedReaction;
use crate::core::Element;
use crate::material::{MaterialInfo, MaterialRecord, Substitution, TargetRecord};
use itertools::Itertools;
use regex::Regex;
use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::LazyLock;

/// Longest-first alternation of every element symbol, so `Mn2+` scans as
/// `Mn` rather than `N`.
static ELEMENT_SCAN: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = Element::ALL
        .iter()
        .map(|element| element.symbol())
        .sorted_by_key(|symbol| (std::cmp::Reverse(symbol.len()), *symbol))
        .join("|");
    Regex::new(&alternation).expect("element alternation is a valid pattern")
});

/// Elements too ubiquitous to identify an additive's carrier.
const OMIT_IONS: [Element; 3] = [Element::O, Element::H, Element::N];

/// Scans a string for element symbols, longest match first, skipping the
/// ubiquitous O/H/N.
pub fn find_ions(text: &str) -> BTreeSet<Element> {
    ELEMENT_SCAN
        .find_iter(text)
        .filter_map(|found| Element::from_str(found.as_str()).ok())
        .filter(|element| !OMIT_IONS.contains(element))
        .collect()
}

/// Renders a balanced reaction against its target record.
///
/// The left side lists terms alphabetically by formula; the right side puts
/// the target first, the rest alphabetically. A non-empty substitution is
/// appended as `; A = Fe`; a target with additives gains an annotation
/// naming the precursors that share an element with the additive ions.
pub fn render_reaction(
    precursors: &[MaterialRecord],
    target: &TargetRecord,
    reaction: &BalancedReaction,
    substitution: Option<&Substitution>,
) -> String {
    let left = reaction
        .left
        .iter()
        .sorted_by(|a, b| a.0.cmp(b.0))
        .map(|(formula, amount)| format!("{amount} {formula}"))
        .join(" + ");
    let target_formula = target.material.material_formula.as_str();
    let right = reaction
        .right
        .iter()
        .sorted_by_key(|(formula, _)| (formula.as_str() != target_formula, formula.as_str()))
        .map(|(formula, amount)| format!("{amount} {formula}"))
        .join(" + ");

    let mut rendered = format!("{left} == {right}");

    if let Some(substitution) = substitution.filter(|substitution| !substitution.is_empty()) {
        let pairs = substitution
            .iter()
            .map(|(placeholder, element)| format!("{placeholder} = {element}"))
            .join(", ");
        rendered.push_str("; ");
        rendered.push_str(&pairs);
    }

    if !target.additives.is_empty() {
        let additive_ions = find_ions(&target.additives.join(" "));
        let carriers = additive_carriers(precursors, &additive_ions);
        rendered.push_str(&format!(
            " ; target {} with additives {} via {}",
            target_formula,
            target.additives.join(", "),
            carriers.join(", "),
        ));
    }

    rendered
}

/// Formulas of the precursors sharing an element with the additive ions,
/// sorted. Records that fail interpretation are skipped.
fn additive_carriers(
    precursors: &[MaterialRecord],
    additive_ions: &BTreeSet<Element>,
) -> Vec<String> {
    let mut carriers: Vec<String> = precursors
        .iter()
        .filter_map(|record| MaterialInfo::from_record(record).ok())
        .filter(|info| {
            !info.is_empty()
                && info
                    .all_elements()
                    .iter()
                    .any(|element| additive_ions.contains(element))
        })
        .map(|info| info.material_formula().to_string())
        .collect();
    carriers.sort();
    carriers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::CompositionRecord;
    use indexmap::IndexMap;

    fn simple_target(formula: &str, additives: &[&str]) -> TargetRecord {
        let mut target: TargetRecord = MaterialRecord::new(formula, formula).into();
        target.additives = additives.iter().map(|s| s.to_string()).collect();
        target
    }

    #[test]
    fn ions_scan_longest_first_and_omit_ubiquitous_elements() {
        let ions = find_ions("Mn2+ and Nb5+");
        assert!(ions.contains(&Element::Mn));
        assert!(ions.contains(&Element::Nb));
        // N alone would match inside "Nb" or "Mn2+" but is omitted anyway.
        assert!(!ions.contains(&Element::N));
        assert!(find_ions("H2O + NH3").is_empty());
    }

    #[test]
    fn sides_are_sorted_and_target_leads_the_right() {
        let reaction = BalancedReaction {
            left: IndexMap::from_iter([
                ("TiO2".to_string(), "1".to_string()),
                ("BaCO3".to_string(), "1".to_string()),
            ]),
            right: IndexMap::from_iter([
                ("BaTiO3".to_string(), "1".to_string()),
                ("CO2".to_string(), "1".to_string()),
            ]),
        };
        let rendered = render_reaction(&[], &simple_target("BaTiO3", &[]), &reaction, None);
        assert_eq!(rendered, "1 BaCO3 + 1 TiO2 == 1 BaTiO3 + 1 CO2");
    }

    #[test]
    fn substitutions_are_appended_in_order() {
        let reaction = BalancedReaction {
            left: IndexMap::from_iter([("Fe2O3".to_string(), "6".to_string())]),
            right: IndexMap::from_iter([("Sr6(A2O4)6".to_string(), "1".to_string())]),
        };
        let substitution =
            Substitution::from_iter([("A".to_string(), "Fe".to_string())]);
        let rendered = render_reaction(
            &[],
            &simple_target("Sr6(A2O4)6", &[]),
            &reaction,
            Some(&substitution),
        );
        assert_eq!(rendered, "6 Fe2O3 == 1 Sr6(A2O4)6; A = Fe");
    }

    #[test]
    fn additive_annotation_names_the_carrier_precursors() {
        let reaction = BalancedReaction {
            left: IndexMap::from_iter([("SrCO3".to_string(), "6".to_string())]),
            right: IndexMap::from_iter([("Sr6(A2O4)6".to_string(), "1".to_string())]),
        };
        let precursors = vec![
            MaterialRecord::new("MnO", "MnO").component(
                CompositionRecord::new("1.0").element("Mn", "1.0").element("O", "1.0"),
            ),
            MaterialRecord::new("ZrO2", "ZrO2").component(
                CompositionRecord::new("1.0").element("Zr", "1.0").element("O", "2.0"),
            ),
        ];
        let rendered = render_reaction(
            &precursors,
            &simple_target("Sr6(A2O4)6", &["Mn2+"]),
            &reaction,
            None,
        );
        assert_eq!(
            rendered,
            "6 SrCO3 == 1 Sr6(A2O4)6 ; target Sr6(A2O4)6 with additives Mn2+ via MnO"
        );
    }
}
