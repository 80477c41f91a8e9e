//! The byproduct rules compiled into the library.

/// Byproduct species and functional-group rules for aqueous and solid-state
/// oxide synthesis. Charges are ionic charges; the parser converts a charge
/// of −1 into one unit of the synthetic `e-` axis.
pub(crate) const DEFAULT_RULES_TOML: &str = r#"
[species.H2O]
elements = { H = 2, O = 1 }

[species.CO2]
elements = { C = 1, O = 2 }

[species.NH3]
elements = { N = 1, H = 3 }

[species.NO2]
elements = { N = 1, O = 2 }

[species.O2]
elements = { O = 2 }

[species."[OH-]"]
elements = { H = 1, O = 1 }
charge = -1

[species."[NO3-]"]
elements = { N = 1, O = 3 }
charge = -1

[species."[CH3COO-]"]
elements = { C = 2, H = 3, O = 2 }
charge = -1

[[group]]
name = "water"
signature = { H = 2, O = 1 }
releases = ["H2O", "[OH-]"]

[[group]]
name = "hydroxide"
signature = { H = 1, O = 1 }
releases = ["H2O", "[OH-]"]

[[group]]
name = "carbonate"
signature = { C = 1, O = 3 }
releases = ["CO2"]

[[group]]
name = "acetate"
signature = { C = 2, H = 3, O = 2 }
releases = ["[CH3COO-]", "[OH-]", "H2O"]

[[group]]
name = "nitrate"
signature = { N = 1, O = 3 }
releases = ["[NO3-]", "[OH-]", "H2O"]

[[group]]
name = "ammonium"
signature = { N = 1, H = 4 }
formula_substring = "NH4"
releases = ["NH3"]
"#;
