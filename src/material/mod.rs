//! Structured material semantics: from raw composition records to the
//! per-element quantities, functional groups, and candidate byproducts that
//! drive balancing.
//!
//! A [`MaterialRecord`] is the loosely-typed shape produced by upstream text
//! extraction. [`MaterialInfo`] is its validated view: amounts parsed into
//! symbolic expressions, placeholder elements substituted, every element
//! classified volatile or non-volatile, functional groups detected, and the
//! decomposition/exchange species inferred. All of it is immutable after
//! construction.

use crate::core::{Element, FormulaError};
use crate::expr::{Expr, parse_amount};
use crate::rules::{Ruleset, Species, default_ruleset};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Element substitution applied to a target variant, e.g. `A -> Fe`.
pub type Substitution = IndexMap<String, String>;

/// One formula unit of a material together with its molar amount.
///
/// Amounts and element counts are strings so that `1`, `1.0` and `"1"` are
/// interchangeable; use [`CompositionRecord::new`] and
/// [`CompositionRecord::element`] to build records from numbers directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionRecord {
    pub amount: String,
    pub elements: IndexMap<String, String>,
}

impl CompositionRecord {
    pub fn new(amount: impl ToString) -> CompositionRecord {
        CompositionRecord {
            amount: amount.to_string(),
            elements: IndexMap::new(),
        }
    }

    pub fn element(mut self, symbol: impl AsRef<str>, amount: impl ToString) -> CompositionRecord {
        self.elements
            .insert(symbol.as_ref().to_string(), amount.to_string());
        self
    }
}

/// A material as extracted from text: the original excerpt, the display
/// formula, and one or more composition components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRecord {
    /// Original text excerpt; used by sentence co-location heuristics.
    pub material_string: String,
    /// Canonical formula for display and substring heuristics (`NH4`).
    pub material_formula: String,
    pub composition: Vec<CompositionRecord>,
}

impl MaterialRecord {
    pub fn new(formula: &str, string: &str) -> MaterialRecord {
        MaterialRecord {
            material_string: string.to_string(),
            material_formula: formula.to_string(),
            composition: Vec::new(),
        }
    }

    pub fn component(mut self, component: CompositionRecord) -> MaterialRecord {
        self.composition.push(component);
        self
    }
}

/// A target material: a [`MaterialRecord`] plus the element variables to
/// expand and the additive ions to annotate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRecord {
    #[serde(flatten)]
    pub material: MaterialRecord,
    /// Placeholder element -> candidate real elements, e.g. `A -> [Fe, Al]`.
    #[serde(default)]
    pub elements_vars: IndexMap<String, Vec<String>>,
    /// Dopant ions annotated on the rendered reaction, not balanced.
    #[serde(default)]
    pub additives: Vec<String>,
}

impl From<MaterialRecord> for TargetRecord {
    fn from(material: MaterialRecord) -> TargetRecord {
        TargetRecord {
            material,
            elements_vars: IndexMap::new(),
            additives: Vec::new(),
        }
    }
}

/// Knobs selecting between the rich and the legacy decomposition models.
#[derive(Debug, Clone, Default)]
pub struct MaterialOptions {
    /// Use the legacy minimal decomposition model: CO2 when C and O are both
    /// volatile, NH3/NO2 from formula substrings, H2O from a literal water
    /// component or volatile hydrogen — and no ionic species.
    pub simple_decomposition: bool,
    /// Detect ammonia release from the ammonium composition signature
    /// instead of the literal `NH4` formula substring.
    pub composition_ammonia: bool,
    /// Byproduct rules to apply; `None` selects the compiled-in set.
    pub ruleset: Option<Ruleset>,
}

impl MaterialOptions {
    fn rules(&self) -> &Ruleset {
        self.ruleset.as_ref().unwrap_or_else(|| default_ruleset())
    }
}

/// One parsed composition component.
#[derive(Debug, Clone)]
struct Component {
    fraction: Expr,
    elements: IndexMap<Element, Expr>,
}

impl Component {
    fn volatile_submap(&self) -> IndexMap<Element, &Expr> {
        self.elements
            .iter()
            .filter(|(element, _)| !element.is_non_volatile())
            .map(|(element, amount)| (*element, amount))
            .collect()
    }
}

/// The validated, derived view of a material.
#[derive(Debug, Clone)]
pub struct MaterialInfo {
    material_string: String,
    material_formula: String,
    components: Vec<Component>,
    substitution: Substitution,
    non_volatile: IndexMap<Element, Expr>,
    volatile: IndexMap<Element, Expr>,
    decompose: BTreeMap<String, Species>,
    exchange: BTreeMap<String, Species>,
    groups: BTreeSet<String>,
}

impl fmt::Display for MaterialInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<material {}>", self.material_formula)
    }
}

impl MaterialInfo {
    /// Builds the derived view with no substitution and default options.
    pub fn from_record(record: &MaterialRecord) -> Result<MaterialInfo, FormulaError> {
        MaterialInfo::from_record_with(record, None, &MaterialOptions::default())
    }

    /// Builds the derived view, applying `substitution` to placeholder
    /// element tokens before any legality check.
    ///
    /// # Errors
    ///
    /// [`FormulaError::DanglingSubstitution`] when a substitution source is
    /// absent from the composition, [`FormulaError::UnknownElement`] when a
    /// substitution value or an unsubstituted token is not a chemical
    /// element, and [`FormulaError::Amount`] when an amount string does not
    /// parse.
    pub fn from_record_with(
        record: &MaterialRecord,
        substitution: Option<&Substitution>,
        options: &MaterialOptions,
    ) -> Result<MaterialInfo, FormulaError> {
        let substitution = substitution.cloned().unwrap_or_default();

        let tokens: BTreeSet<&str> = record
            .composition
            .iter()
            .flat_map(|component| component.elements.keys())
            .map(String::as_str)
            .collect();
        for (source, replacement) in &substitution {
            if !tokens.contains(source.as_str()) {
                return Err(FormulaError::DanglingSubstitution {
                    placeholder: source.clone(),
                });
            }
            if Element::from_str(replacement).is_err() {
                return Err(FormulaError::UnknownElement {
                    symbol: replacement.clone(),
                });
            }
        }

        let mut components = Vec::with_capacity(record.composition.len());
        for raw in &record.composition {
            let fraction = parse_amount(&raw.amount)?;
            let mut elements: IndexMap<Element, Expr> = IndexMap::new();
            for (token, amount) in &raw.elements {
                let symbol = substitution
                    .get(token)
                    .map(String::as_str)
                    .unwrap_or(token);
                let element = Element::from_str(symbol).map_err(|_| {
                    FormulaError::UnknownElement {
                        symbol: symbol.to_string(),
                    }
                })?;
                let amount = parse_amount(amount)?;
                match elements.get_mut(&element) {
                    Some(total) => *total = &*total + &amount,
                    None => {
                        elements.insert(element, amount);
                    }
                }
            }
            components.push(Component { fraction, elements });
        }

        let mut non_volatile: IndexMap<Element, Expr> = IndexMap::new();
        let mut volatile: IndexMap<Element, Expr> = IndexMap::new();
        for component in &components {
            for (element, amount) in &component.elements {
                let total = &component.fraction * amount;
                let bucket = if element.is_non_volatile() {
                    &mut non_volatile
                } else {
                    &mut volatile
                };
                match bucket.get_mut(element) {
                    Some(sum) => *sum = &*sum + &total,
                    None => {
                        bucket.insert(*element, total);
                    }
                }
            }
        }

        let mut info = MaterialInfo {
            material_string: record.material_string.clone(),
            material_formula: record.material_formula.clone(),
            components,
            substitution,
            non_volatile,
            volatile,
            decompose: BTreeMap::new(),
            exchange: BTreeMap::new(),
            groups: BTreeSet::new(),
        };
        info.detect_groups(options);
        info.infer_decompositions(options);
        info.infer_exchanges(options);
        Ok(info)
    }

    pub fn material_string(&self) -> &str {
        &self.material_string
    }

    pub fn material_formula(&self) -> &str {
        &self.material_formula
    }

    pub fn substitution(&self) -> &Substitution {
        &self.substitution
    }

    /// Per-element non-volatile quantities, in first-seen order.
    pub fn nv_elements_map(&self) -> &IndexMap<Element, Expr> {
        &self.non_volatile
    }

    /// Per-element volatile quantities, in first-seen order.
    pub fn v_elements_map(&self) -> &IndexMap<Element, Expr> {
        &self.volatile
    }

    pub fn nv_elements(&self) -> BTreeSet<Element> {
        self.non_volatile.keys().copied().collect()
    }

    pub fn v_elements(&self) -> BTreeSet<Element> {
        self.volatile.keys().copied().collect()
    }

    pub fn all_elements(&self) -> BTreeSet<Element> {
        self.non_volatile
            .keys()
            .chain(self.volatile.keys())
            .copied()
            .collect()
    }

    /// Union of both partitions: non-volatile entries first.
    pub fn all_elements_map(&self) -> IndexMap<Element, Expr> {
        let mut all = self.non_volatile.clone();
        for (element, amount) in &self.volatile {
            all.insert(*element, amount.clone());
        }
        all
    }

    pub fn is_empty(&self) -> bool {
        self.non_volatile.is_empty() && self.volatile.is_empty()
    }

    /// Same full element-quantity map, up to symbolic equality.
    pub fn same_composition_as(&self, other: &MaterialInfo) -> bool {
        let own = self.all_elements_map();
        let theirs = other.all_elements_map();
        own.len() == theirs.len()
            && own
                .iter()
                .all(|(element, amount)| theirs.get(element) == Some(amount))
    }

    /// `true` when the elements are exactly {C, H, O} — the signature of an
    /// organic solvent miscounted as a precursor.
    pub fn is_hco(&self) -> bool {
        let all = self.all_elements();
        all == BTreeSet::from([Element::C, Element::H, Element::O])
    }

    pub fn has_water(&self) -> bool {
        self.groups.contains("water")
    }

    pub fn has_hydroxide(&self) -> bool {
        self.groups.contains("hydroxide")
    }

    pub fn has_carbonate(&self) -> bool {
        self.groups.contains("carbonate")
    }

    pub fn has_acetate(&self) -> bool {
        self.groups.contains("acetate")
    }

    pub fn has_nitrate(&self) -> bool {
        self.groups.contains("nitrate")
    }

    pub fn has_ammonium(&self) -> bool {
        self.groups.contains("ammonium")
    }

    /// Byproduct species this material may shed, keyed by formula.
    pub fn decompose_chemicals(&self) -> &BTreeMap<String, Species> {
        &self.decompose
    }

    /// Exchange species available to this material's reactions.
    pub fn exchange_chemicals(&self) -> &BTreeMap<String, Species> {
        &self.exchange
    }

    fn any_component_matches(&self, signature: &BTreeMap<Element, i64>) -> bool {
        self.components
            .iter()
            .any(|component| signature_matches(&component.volatile_submap(), signature))
    }

    fn detect_groups(&mut self, options: &MaterialOptions) {
        for rule in options.rules().groups() {
            if !rule.signature.is_empty() && self.any_component_matches(&rule.signature) {
                self.groups.insert(rule.name.clone());
            }
        }
    }

    fn infer_decompositions(&mut self, options: &MaterialOptions) {
        if options.simple_decomposition {
            self.infer_simple_decompositions(options);
            return;
        }
        let rules = options.rules();
        for rule in rules.groups() {
            let triggered = match &rule.formula_substring {
                Some(needle) if !options.composition_ammonia => {
                    self.material_formula.contains(needle)
                }
                _ => !rule.signature.is_empty() && self.groups.contains(&rule.name),
            };
            if !triggered {
                continue;
            }
            for formula in &rule.releases {
                if let Some(species) = rules.species(formula) {
                    self.decompose.insert(formula.clone(), species.clone());
                }
            }
        }
    }

    /// Legacy model: volatile C+O release CO2, `NH4`/`NO3` formula
    /// substrings release NH3/NO2, water components or volatile H release
    /// H2O. No ionic species, no charge axis.
    fn infer_simple_decompositions(&mut self, options: &MaterialOptions) {
        let rules = options.rules();
        let volatile = self.v_elements();
        let mut release = |formula: &str, decompose: &mut BTreeMap<String, Species>| {
            if let Some(species) = rules.species(formula) {
                decompose.insert(formula.to_string(), species.clone());
            }
        };
        if volatile.contains(&Element::C) && volatile.contains(&Element::O) {
            release("CO2", &mut self.decompose);
        }
        if self.material_formula.contains("NH4") {
            release("NH3", &mut self.decompose);
        }
        if self.material_formula.contains("NO3") {
            release("NO2", &mut self.decompose);
        }
        let water = self.components.iter().any(|component| {
            component.elements.len() == 2
                && component.elements.get(&Element::H) == Some(&Expr::from_integer(2))
                && component.elements.get(&Element::O) == Some(&Expr::from_integer(1))
        });
        if water || volatile.contains(&Element::H) {
            release("H2O", &mut self.decompose);
        }
    }

    fn infer_exchanges(&mut self, options: &MaterialOptions) {
        if self.volatile.contains_key(&Element::O)
            && let Some(species) = options.rules().species("O2")
        {
            self.exchange.insert("O2".to_string(), species.clone());
        }
    }
}

/// Decides whether `submap` is a strictly positive scalar multiple of
/// `signature` — the one comparator every functional-group check shares.
///
/// `{H: 4, O: 2}` matches the water signature `{H: 2, O: 1}`; equality of
/// the ratios is symbolic, positivity is decided at the sign probe.
fn signature_matches(
    submap: &IndexMap<Element, &Expr>,
    signature: &BTreeMap<Element, i64>,
) -> bool {
    if signature.is_empty() || submap.len() != signature.len() {
        return false;
    }
    let mut ratio: Option<Expr> = None;
    for (element, count) in signature {
        let Some(amount) = submap.get(element) else {
            return false;
        };
        let Some(current) =
            amount.checked_div(&Expr::from_integer(i128::from(*count)))
        else {
            return false;
        };
        match &ratio {
            Some(previous) if *previous != current => return false,
            Some(_) => {}
            None => ratio = Some(current),
        }
    }
    ratio.is_some_and(|r| !r.is_zero() && !r.probe_sign())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(formula: &str, components: &[(&str, &[(&str, &str)])]) -> MaterialRecord {
        let mut record = MaterialRecord::new(formula, formula);
        for (amount, elements) in components {
            let mut component = CompositionRecord::new(amount);
            for (symbol, count) in elements.iter() {
                component = component.element(symbol, count);
            }
            record = record.component(component);
        }
        record
    }

    fn info(record: &MaterialRecord) -> MaterialInfo {
        MaterialInfo::from_record(record).unwrap()
    }

    #[test]
    fn numeric_spellings_are_equivalent() {
        let a = info(&record("TiO2", &[("1", &[("Ti", "1"), ("O", "2")])]));
        let b = info(&record("TiO2", &[("1.0", &[("Ti", "1.0"), ("O", "2.0")])]));
        assert!(a.same_composition_as(&b));
    }

    #[test]
    fn elements_partition_by_volatility() {
        let baco3 = info(&record(
            "BaCO3",
            &[("1.0", &[("Ba", "1.0"), ("C", "1.0"), ("O", "3.0")])],
        ));
        assert_eq!(baco3.nv_elements(), BTreeSet::from([Element::Ba]));
        assert_eq!(baco3.v_elements(), BTreeSet::from([Element::C, Element::O]));
        assert_eq!(baco3.all_elements().len(), 3);
        assert!(!baco3.is_empty());
    }

    #[test]
    fn substitution_applies_before_legality_checks() {
        let target = record("Sr6(A2O4)6", &[("1.0", &[("A", "12.0"), ("O", "24.0"), ("Sr", "6.0")])]);
        let substitution = Substitution::from_iter([("A".to_string(), "Fe".to_string())]);
        let with_fe = MaterialInfo::from_record_with(
            &target,
            Some(&substitution),
            &MaterialOptions::default(),
        )
        .unwrap();
        assert!(with_fe.nv_elements().contains(&Element::Fe));

        // Without a substitution the placeholder is not a legal element.
        assert_eq!(
            MaterialInfo::from_record(&target).unwrap_err(),
            FormulaError::UnknownElement {
                symbol: "A".to_string()
            }
        );
    }

    #[test]
    fn dangling_substitution_is_rejected() {
        let target = record("TiO2", &[("1.0", &[("Ti", "1"), ("O", "2")])]);
        let substitution = Substitution::from_iter([("A".to_string(), "Fe".to_string())]);
        assert_eq!(
            MaterialInfo::from_record_with(
                &target,
                Some(&substitution),
                &MaterialOptions::default()
            )
            .unwrap_err(),
            FormulaError::DanglingSubstitution {
                placeholder: "A".to_string()
            }
        );
    }

    #[test]
    fn bad_amounts_are_formula_errors() {
        let broken = record("TiO2", &[("1..0", &[("Ti", "1")])]);
        assert!(matches!(
            MaterialInfo::from_record(&broken),
            Err(FormulaError::Amount(_))
        ));
    }

    #[test]
    fn carbonate_releases_carbon_dioxide_only() {
        let baco3 = info(&record(
            "BaCO3",
            &[("1.0", &[("Ba", "1.0"), ("C", "1.0"), ("O", "3.0")])],
        ));
        assert!(baco3.has_carbonate());
        assert!(!baco3.has_water());
        let formulas: Vec<&str> = baco3.decompose_chemicals().keys().map(String::as_str).collect();
        assert_eq!(formulas, vec!["CO2"]);
    }

    #[test]
    fn hydrated_acetate_releases_the_aqueous_set() {
        // Co(CH3COO)2 . 4H2O
        let acetate = info(&record(
            "Co(CH3COO)2·4H2O",
            &[
                ("1.0", &[("Co", "1.0"), ("C", "4.0"), ("H", "6.0"), ("O", "4.0")]),
                ("4.0", &[("H", "2.0"), ("O", "1.0")]),
            ],
        ));
        assert!(acetate.has_acetate());
        assert!(acetate.has_water());
        assert!(!acetate.is_hco());
        let formulas: Vec<&str> =
            acetate.decompose_chemicals().keys().map(String::as_str).collect();
        assert_eq!(formulas, vec!["H2O", "[CH3COO-]", "[OH-]"]);
        assert!(acetate.exchange_chemicals().contains_key("O2"));
    }

    #[test]
    fn nitrate_releases_nitrate_ions_and_solution_set() {
        let nitrate = info(&record(
            "Sr(NO3)2",
            &[("1.0", &[("Sr", "1.0"), ("N", "2.0"), ("O", "6.0")])],
        ));
        assert!(nitrate.has_nitrate());
        let formulas: Vec<&str> =
            nitrate.decompose_chemicals().keys().map(String::as_str).collect();
        assert_eq!(formulas, vec!["H2O", "[NO3-]", "[OH-]"]);
    }

    #[test]
    fn scaled_signatures_still_match() {
        // {H: 4, O: 2} is water scaled by two, but not hydroxide (1:1).
        let doubled = info(&record("2H2O", &[("1.0", &[("H", "4.0"), ("O", "2.0")])]));
        assert!(doubled.has_water());
        assert!(!doubled.has_hydroxide());
        // A 1:1 ratio is hydroxide but not water.
        let hydroxide = info(&record("OH", &[("1.0", &[("H", "1.0"), ("O", "1.0")])]));
        assert!(hydroxide.has_hydroxide());
        assert!(!hydroxide.has_water());
    }

    #[test]
    fn ammonia_triggers_on_formula_substring_by_default() {
        let record = record(
            "NH4H2PO4",
            &[("1.0", &[("N", "1.0"), ("H", "6.0"), ("P", "1.0"), ("O", "4.0")])],
        );
        let default = info(&record);
        assert!(default.decompose_chemicals().contains_key("NH3"));

        // The composition of NH4H2PO4 has no pure ammonium component, so the
        // signature-based rule does not fire.
        let by_composition = MaterialInfo::from_record_with(
            &record,
            None,
            &MaterialOptions {
                composition_ammonia: true,
                ..MaterialOptions::default()
            },
        )
        .unwrap();
        assert!(!by_composition.decompose_chemicals().contains_key("NH3"));
    }

    #[test]
    fn simple_model_uses_legacy_heuristics() {
        let options = MaterialOptions {
            simple_decomposition: true,
            ..MaterialOptions::default()
        };
        let nitrate = MaterialInfo::from_record_with(
            &record(
                "Sr(NO3)2",
                &[("1.0", &[("Sr", "1.0"), ("N", "2.0"), ("O", "6.0")])],
            ),
            None,
            &options,
        )
        .unwrap();
        let formulas: Vec<&str> =
            nitrate.decompose_chemicals().keys().map(String::as_str).collect();
        assert_eq!(formulas, vec!["NO2"]);

        let hydrate = MaterialInfo::from_record_with(
            &record(
                "MgCl2·6H2O",
                &[
                    ("1.0", &[("Mg", "1.0"), ("Cl", "2.0")]),
                    ("6.0", &[("H", "2.0"), ("O", "1.0")]),
                ],
            ),
            None,
            &options,
        )
        .unwrap();
        let formulas: Vec<&str> =
            hydrate.decompose_chemicals().keys().map(String::as_str).collect();
        assert_eq!(formulas, vec!["H2O"]);
    }

    #[test]
    fn organic_solvents_are_flagged_hco() {
        let ethanol = info(&record(
            "C2H5OH",
            &[("1.0", &[("C", "2.0"), ("H", "6.0"), ("O", "1.0")])],
        ));
        assert!(ethanol.is_hco());
        let water = info(&record("H2O", &[("1.0", &[("H", "2.0"), ("O", "1.0")])]));
        assert!(!water.is_hco());
    }

    #[test]
    fn parametric_amounts_survive_to_the_element_maps() {
        let target = info(&record(
            "Sm1-xSrxCoO3",
            &[(
                "1.0",
                &[("Sm", "1-x"), ("Sr", "x"), ("Co", "1.0"), ("O", "3.0")],
            )],
        ));
        let map = target.all_elements_map();
        assert_eq!(map.get(&Element::Sm).unwrap().to_string(), "1-x");
        assert_eq!(map.get(&Element::Sr).unwrap().to_string(), "x");
    }
}
