use super::super::{RecipeCase, material, target, target_with_vars};

/// The canonical solid-state route: carbonate plus oxide, CO2 released.
pub fn barium_titanate() -> RecipeCase {
    RecipeCase {
        name: "BaCO3 + TiO2 -> BaTiO3",
        precursors: vec![
            material("BaCO3", "BaCO3", &[("Ba", "1.0"), ("C", "1.0"), ("O", "3.0")]),
            material("TiO2", "TiO2", &[("Ti", "1.0"), ("O", "2.0")]),
        ],
        targets: vec![target(material(
            "BaTiO3",
            "BaTiO3",
            &[("Ba", "1.0"), ("Ti", "1.0"), ("O", "3.0")],
        ))],
        sentences: vec![],
        expected: vec!["1 BaCO3 + 1 TiO2 == 1 BaTiO3 + 1 CO2"],
    }
}

/// A chemically irrelevant precursor is screened out without changing the
/// balanced reaction.
pub fn barium_titanate_with_milling_media() -> RecipeCase {
    let mut case = barium_titanate();
    case.name = "BaTiO3 with unrelated ZrO2 present";
    case.precursors.push(material(
        "ZrO2",
        "ZrO2",
        &[("Zr", "1.0"), ("O", "2.0")],
    ));
    case
}

/// A target whose element variables are single-valued still expands to
/// exactly one reaction.
pub fn single_valued_variable() -> RecipeCase {
    RecipeCase {
        name: "single-valued element variable",
        precursors: vec![
            material("SrCO3", "SrCO3", &[("Sr", "1.0"), ("C", "1.0"), ("O", "3.0")]),
            material("Fe2O3", "Fe2O3", &[("Fe", "2.0"), ("O", "3.0")]),
        ],
        targets: vec![target_with_vars(
            material(
                "Sr6(A2O4)6",
                "Sr6(A2O4)6",
                &[("A", "12.0"), ("O", "24.0"), ("Sr", "6.0")],
            ),
            &[("A", &["Fe"])],
            &[],
        )],
        sentences: vec![],
        expected: vec!["6 Fe2O3 + 6 SrCO3 == 1 Sr6(A2O4)6 + 6 CO2; A = Fe"],
    }
}
