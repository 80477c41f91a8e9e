use super::super::{RecipeCase, hydrate, material, target};

/// Hydrated acetates in aqueous solution: the acetate groups leave as ions,
/// the solution set balances hydrogen, and oxygen is topped up from O2.
pub fn lithium_cobaltate_from_acetates() -> RecipeCase {
    RecipeCase {
        name: "LiCoO2 from hydrated acetates",
        precursors: vec![
            hydrate(
                "Co(CH3COO)2·4H2O",
                &[("Co", "1.0"), ("C", "4.0"), ("H", "6.0"), ("O", "4.0")],
                "4.0",
            ),
            hydrate(
                "Li(CH3COO)·2H2O",
                &[("Li", "1.0"), ("C", "2.0"), ("H", "3.0"), ("O", "2.0")],
                "2.0",
            ),
        ],
        targets: vec![target(material(
            "LiCoO2",
            "LiCoO2",
            &[("Li", "1.0"), ("Co", "1.0"), ("O", "2.0")],
        ))],
        sentences: vec![],
        expected: vec![
            "1 Co(CH3COO)2·4H2O + 1 Li(CH3COO)·2H2O + 0.25 O2 + 3 [OH-] == 1 LiCoO2 + 7.5 H2O + 3 [CH3COO-]",
        ],
    }
}
