use super::super::{RecipeCase, hydrate, material, target};

/// An ammonium phosphate precursor sheds NH3 (triggered by the `NH4`
/// substring in its formula) alongside the acetate solution chemistry.
pub fn lithium_manganese_phosphate() -> RecipeCase {
    RecipeCase {
        name: "LiMnPO4 with NH4H2PO4",
        precursors: vec![
            material(
                "Li(COOCH3)",
                "Li(COOCH3)",
                &[("Li", "1.0"), ("C", "2.0"), ("H", "3.0"), ("O", "2.0")],
            ),
            hydrate(
                "Mn(COOCH3)2·H2O",
                &[("Mn", "1.0"), ("C", "4.0"), ("H", "6.0"), ("O", "4.0")],
                "1.0",
            ),
            material(
                "NH4H2PO4",
                "NH4H2PO4",
                &[("N", "1.0"), ("H", "6.0"), ("P", "1.0"), ("O", "4.0")],
            ),
        ],
        targets: vec![target(material(
            "LiMnPO4",
            "LiMnPO4",
            &[("Li", "1.0"), ("Mn", "1.0"), ("P", "1.0"), ("O", "4.0")],
        ))],
        sentences: vec![],
        expected: vec![
            "1 Li(COOCH3) + 1 Mn(COOCH3)2·H2O + 1 NH4H2PO4 + 3 [OH-] == 1 LiMnPO4 + 4 H2O + 1 NH3 + 3 [CH3COO-]",
        ],
    }
}
