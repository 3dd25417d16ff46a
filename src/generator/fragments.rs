//! Filter fragment resolution.
//!
//! Turns one metadata item's effective category combo plus the operator's
//! category-option filter map into one boolean filter fragment and display
//! suffix per category option combo.

use std::collections::{HashMap, HashSet};

use crate::error::{MapperError, Result};
use crate::types::{CategoryCombo, CategoryOption, CategoryOptionCombo, CoMapping};

/// Resolved fragment for one category option combo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CocFilter {
    pub coc_id: String,
    pub filter: String,
    pub suffix: String,
}

/// Reorder a combo's category options to their first-occurrence order in
/// the combo display name. Suffix text is built in this order, so it must
/// be deterministic. Options whose name does not occur in the combo name
/// sort last; the leftmost match disambiguates partial name overlaps.
pub fn order_cos(coc: &CategoryOptionCombo) -> Vec<&CategoryOption> {
    let mut cos: Vec<&CategoryOption> = coc.category_options.iter().collect();
    cos.sort_by_key(|co| coc.name.find(&co.name).unwrap_or(usize::MAX));
    cos
}

/// Ids of category options belonging to fully blank categories: every
/// non-default option in the category maps to an empty filter. These
/// options contribute nothing to a fragment but do not block the combos
/// that use them. A category holding only the `default` option is ignored.
pub fn forgivably_empty_co_ids(
    category_combo: &CategoryCombo,
    co_maps: &HashMap<String, CoMapping>,
) -> HashSet<String> {
    let mut forgivable = HashSet::new();
    for category in &category_combo.categories {
        let cos: Vec<&CategoryOption> = category
            .category_options
            .iter()
            .filter(|co| !co.is_default())
            .collect();
        if cos.is_empty() {
            continue;
        }
        let all_blank = cos
            .iter()
            .all(|co| co_maps.get(&co.id).is_none_or(|m| m.filter.is_empty()));
        if all_blank {
            forgivable.extend(cos.iter().map(|co| co.id.clone()));
        }
    }
    forgivable
}

/// Resolve one fragment per category option combo of `category_combo`.
///
/// The `default` option never contributes. An option missing from
/// `co_maps` is a data-modeling error (the disaggregation changed upstream
/// after the filters were configured). An option with a blank filter skips
/// its whole combo unless its category is fully blank, in which case it is
/// forgiven and the combo stays alive.
pub fn resolve_fragments(
    category_combo: &CategoryCombo,
    co_maps: &HashMap<String, CoMapping>,
) -> Result<Vec<CocFilter>> {
    if category_combo.category_option_combos.is_empty() {
        return Err(MapperError::generation(format!(
            "Category combo {} has no category option combos, the disaggregation has not \
             been configured upstream",
            category_combo.id
        )));
    }

    let forgivable = forgivably_empty_co_ids(category_combo, co_maps);
    let mut result: Vec<CocFilter> = Vec::new();

    'coc: for coc in &category_combo.category_option_combos {
        let mut filter = String::new();
        let mut suffix = String::new();
        for co in order_cos(coc) {
            if co.is_default() {
                continue;
            }
            let Some(mapping) = co_maps.get(&co.id) else {
                return Err(MapperError::generation(format!(
                    "Category option {} ({}) in combo {} has no configured filter, the \
                     category assignment may have changed upstream",
                    co.name, co.id, coc.name
                )));
            };
            if mapping.filter.is_empty() {
                if forgivable.contains(&co.id) {
                    continue;
                }
                tracing::debug!(
                    "Skipping combo {}: category option {} has a blank filter",
                    coc.id,
                    co.id
                );
                continue 'coc;
            }
            if !filter.is_empty() {
                filter.push_str(" && ");
            }
            filter.push('(');
            filter.push_str(&mapping.filter);
            filter.push(')');
            suffix.push_str(&format!(" ({})", co.suffix_name()));
        }

        let candidate = CocFilter {
            coc_id: coc.id.clone(),
            filter,
            suffix,
        };
        if !result.contains(&candidate) {
            result.push(candidate);
        }
    }

    Ok(result)
}
