//! Precursor screening and candidate-subset generation.
//!
//! When the raw precursor set is underdetermined, the driver prunes it with
//! text heuristics: materials mentioned in the same sentence probably react
//! together, a formula that is nothing like its source string was probably
//! converted from an English name, and among same-chemistry duplicates the
//! non-word mention is the more trustworthy one. Subsets are emitted in a
//! fixed order and the driver accepts the first one that balances.

use crate::material::{MaterialInfo, MaterialOptions, MaterialRecord};
use indexmap::IndexMap;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

/// A material string that is a plain word or phrase ("manganese nitrate")
/// rather than a formula-like mention.
static WORD_MATERIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w\s()]+$").expect("word-material pattern is valid"));

/// Builds [`MaterialInfo`] for every record, dropping the ones that fail
/// interpretation.
pub fn screen_precursors(
    records: &[MaterialRecord],
    options: &MaterialOptions,
) -> Vec<MaterialInfo> {
    records
        .iter()
        .filter_map(|record| {
            match MaterialInfo::from_record_with(record, None, options) {
                Ok(info) => Some(info),
                Err(err) => {
                    debug!(
                        "dropping precursor {}: {err}",
                        record.material_string
                    );
                    None
                }
            }
        })
        .collect()
}

/// Everything that is not a {C, H, O} material — the fallback set when
/// organic solvents were miscounted as precursors.
pub fn nonorganic_subset(precursors: &[MaterialInfo]) -> Vec<&MaterialInfo> {
    precursors
        .iter()
        .filter(|precursor| !precursor.is_hco())
        .collect()
}

/// Standard Levenshtein distance with unit costs, over characters.
pub(crate) fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut current = Vec::with_capacity(b.len() + 1);
        current.push(i + 1);
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current.push(substitution.min(previous[j + 1] + 1).min(current[j] + 1));
        }
        previous = current;
    }
    previous[b.len()]
}

/// A formula close enough to the raw mention that no name-to-formula
/// conversion happened upstream.
fn is_faithful_mention(precursor: &MaterialInfo) -> bool {
    let string_len = precursor.material_string().chars().count();
    let distance = edit_distance(precursor.material_formula(), precursor.material_string());
    (distance as f64) < (string_len as f64) * 0.5
}

fn faithful_subset<'a>(found: &[&'a MaterialInfo]) -> Vec<&'a MaterialInfo> {
    found
        .iter()
        .copied()
        .filter(|precursor| is_faithful_mention(precursor))
        .collect()
}

fn is_word_material(precursor: &MaterialInfo) -> bool {
    WORD_MATERIAL.is_match(precursor.material_string())
}

/// Among precursors sharing an element-set signature, keeps the ones whose
/// mention is not a plain word; a group with only word mentions is kept
/// whole.
fn deduplicate_word_materials<'a>(found: &[&'a MaterialInfo]) -> Vec<&'a MaterialInfo> {
    let mut by_chemistry: IndexMap<Vec<crate::core::Element>, Vec<&MaterialInfo>> =
        IndexMap::new();
    for &precursor in found {
        let signature: Vec<_> = precursor.all_elements().into_iter().collect();
        by_chemistry.entry(signature).or_default().push(precursor);
    }
    let mut kept = Vec::new();
    for materials in by_chemistry.values() {
        if materials.len() > 1 {
            let non_words: Vec<&MaterialInfo> = materials
                .iter()
                .copied()
                .filter(|material| !is_word_material(material))
                .collect();
            if non_words.is_empty() {
                kept.extend(materials.iter().copied());
            } else {
                kept.extend(non_words);
            }
        } else {
            kept.extend(materials.iter().copied());
        }
    }
    kept
}

/// Emits candidate precursor subsets from sentence co-location, in the order
/// the driver must try them: per-sentence formula matches (plain, then
/// edit-distance filtered), then per-sentence string matches (filtered, then
/// plain, then word-material deduplicated).
pub fn subsets_by_sentence<'a>(
    precursors: &'a [MaterialInfo],
    sentences: &[String],
) -> Vec<Vec<&'a MaterialInfo>> {
    let mut subsets: Vec<Vec<&MaterialInfo>> = Vec::new();

    for sentence in sentences {
        let found: Vec<&MaterialInfo> = precursors
            .iter()
            .filter(|precursor| sentence.contains(precursor.material_formula()))
            .collect();
        if !found.is_empty() {
            subsets.push(found.clone());
        }
        let faithful = faithful_subset(&found);
        if !faithful.is_empty() {
            subsets.push(faithful);
        }
    }

    for sentence in sentences {
        let found: Vec<&MaterialInfo> = precursors
            .iter()
            .filter(|precursor| sentence.contains(precursor.material_string()))
            .collect();
        let faithful = faithful_subset(&found);
        if !faithful.is_empty() {
            subsets.push(faithful);
        }
        if !found.is_empty() {
            subsets.push(found.clone());
            subsets.push(deduplicate_word_materials(&found));
        }
    }

    subsets
}
