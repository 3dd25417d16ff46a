//! Cross-product combination of resolved filter fragments.

use super::fragments::CocFilter;
use crate::types::ProgramIndicator;

/// Suffix produced by a combo that only disaggregates by `default`; never
/// propagated into generated names.
const DEFAULT_SUFFIX: &str = " (default)";

/// Combined filter for one (attribute option combo, category option combo)
/// pair. The data-set side plays the attribute-option-combo role, the
/// data-element side the category-option-combo role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedFilter {
    pub coc_id: String,
    pub aoc_id: String,
    pub filter: String,
    pub suffix: String,
}

/// Trimmed source filter of the template program indicator, wrapped in
/// parentheses unless already bracketed or empty.
pub fn base_filter(pi: &ProgramIndicator) -> String {
    let filter = pi.filter.as_deref().unwrap_or("").trim();
    if filter.is_empty() || (filter.starts_with('(') && filter.ends_with(')')) {
        filter.to_string()
    } else {
        format!("({filter})")
    }
}

/// Cross-join the data-set fragments with the data-element fragments.
/// Outer loop over the data-set side, inner over the data-element side;
/// synthesized object order follows this loop order.
pub fn combine_filters(
    base: &str,
    ds_fragments: &[CocFilter],
    de_fragments: &[CocFilter],
) -> Vec<CombinedFilter> {
    let mut result = Vec::with_capacity(ds_fragments.len() * de_fragments.len());
    for ds_fragment in ds_fragments {
        for de_fragment in de_fragments {
            let filter = [base, ds_fragment.filter.as_str(), de_fragment.filter.as_str()]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" && ");
            let suffix = [ds_fragment.suffix.as_str(), de_fragment.suffix.as_str()]
                .into_iter()
                .filter(|suffix| *suffix != DEFAULT_SUFFIX)
                .collect::<String>();
            result.push(CombinedFilter {
                coc_id: de_fragment.coc_id.clone(),
                aoc_id: ds_fragment.coc_id.clone(),
                filter,
                suffix,
            });
        }
    }
    result
}
