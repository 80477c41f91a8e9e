use super::super::{RecipeCase, material, target};

/// A single-element target is not worth balancing.
pub fn trivial_target() -> RecipeCase {
    RecipeCase {
        name: "trivial single-element target",
        precursors: vec![material(
            "MgCO3",
            "MgCO3",
            &[("Mg", "1.0"), ("C", "1.0"), ("O", "3.0")],
        )],
        targets: vec![target(material("MgO", "MgO", &[("Mg", "1.0"), ("O", "1.0")]))],
        sentences: vec![],
        expected: vec![],
    }
}

/// A precursor identical to the target is rejected outright.
pub fn target_among_precursors() -> RecipeCase {
    RecipeCase {
        name: "precursor equals target",
        precursors: vec![
            material("BaCO3", "BaCO3", &[("Ba", "1.0"), ("C", "1.0"), ("O", "3.0")]),
            material("BaTiO3", "BaTiO3", &[("Ba", "1.0"), ("Ti", "1.0"), ("O", "3.0")]),
        ],
        targets: vec![target(material(
            "BaTiO3",
            "BaTiO3",
            &[("Ba", "1.0"), ("Ti", "1.0"), ("O", "3.0")],
        ))],
        sentences: vec![],
        expected: vec![],
    }
}

/// No precursor supplies titanium, so the recipe has a coverage gap.
pub fn missing_structural_element() -> RecipeCase {
    RecipeCase {
        name: "missing non-volatile element",
        precursors: vec![material(
            "BaCO3",
            "BaCO3",
            &[("Ba", "1.0"), ("C", "1.0"), ("O", "3.0")],
        )],
        targets: vec![target(material(
            "BaTiO3",
            "BaTiO3",
            &[("Ba", "1.0"), ("Ti", "1.0"), ("O", "3.0")],
        ))],
        sentences: vec![],
        expected: vec![],
    }
}
