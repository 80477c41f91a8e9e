use super::super::{RecipeCase, material, sentences, target_with_vars};

/// Element substitution with additives and sentence co-location: the raw
/// precursor set is underdetermined, the first sentence names the subset
/// that balances, and the Mn2+ dopant is annotated via its carrier oxide.
pub fn strontium_ferrite_aluminate() -> RecipeCase {
    RecipeCase {
        name: "Sr6(A2O4)6 with A in {Fe, Al}",
        precursors: vec![
            material("SrCO3", "SrCO3", &[("Sr", "1.0"), ("C", "1.0"), ("O", "3.0")]),
            material("Al2O3", "Al2O3", &[("Al", "2.0"), ("O", "3.0")]),
            material("MnO", "MnO", &[("Mn", "1.0"), ("O", "1.0")]),
            material("Fe2O3", "Fe2O3", &[("Fe", "2.0"), ("O", "3.0")]),
            material("ZrO2", "ZrO2", &[("Zr", "1.0"), ("O", "2.0")]),
            material("H2O", "H2O", &[("H", "2.0"), ("O", "1.0")]),
        ],
        targets: vec![target_with_vars(
            material(
                "Sr6(A2O4)6",
                "Sr6(A2O4)6",
                &[("A", "12.0"), ("O", "24.0"), ("Sr", "6.0")],
            ),
            &[("A", &["Fe", "Al"])],
            &["Mn2+"],
        )],
        sentences: sentences(&[
            "SrCO3, Al2O3, MnO and Fe2O3 are used to synthesize Mn2+doped-Sr6(A2O4)6, A=Fe, Al.",
            "Milling media is ZrO2",
            "There is some H2O found in the final product.",
        ]),
        expected: vec![
            "6 Fe2O3 + 6 SrCO3 == 1 Sr6(A2O4)6 + 6 CO2; A = Fe ; target Sr6(A2O4)6 with additives Mn2+ via MnO",
            "6 Al2O3 + 6 SrCO3 == 1 Sr6(A2O4)6 + 6 CO2; A = Al ; target Sr6(A2O4)6 with additives Mn2+ via MnO",
        ],
    }
}
