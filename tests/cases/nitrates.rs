use super::super::{RecipeCase, material, target};

/// A doped perovskite from nitrates: the dopant fraction `x` flows through
/// the elimination and lands in the printed coefficients.
pub fn samarium_strontium_cobaltite() -> RecipeCase {
    RecipeCase {
        name: "Sm1-xSrxCoO3 from nitrates",
        precursors: vec![
            material("Sm(NO3)3", "Sm(NO3)3", &[("Sm", "1.0"), ("N", "3.0"), ("O", "9.0")]),
            material("Co(NO3)3", "Co(NO3)3", &[("Co", "1.0"), ("N", "3.0"), ("O", "9.0")]),
            material("Sr(NO3)2", "Sr(NO3)2", &[("Sr", "1.0"), ("N", "2.0"), ("O", "6.0")]),
        ],
        targets: vec![target(material(
            "Sm1-xSrxCoO3",
            "Sm1-xSrxCoO3",
            &[("Sm", "1-x"), ("Sr", "x"), ("Co", "1.0"), ("O", "3.0")],
        ))],
        sentences: vec![],
        expected: vec![
            "1 Co(NO3)3 + 0.25*x O2 + 1-x Sm(NO3)3 + x Sr(NO3)2 + 6-x [OH-] == 1 Sm1-xSrxCoO3 + 3-0.5*x H2O + 6-x [NO3-]",
        ],
    }
}
