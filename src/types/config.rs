//! Persisted mapping configuration.
//!
//! The operator's mapping table lives in the host key-value store as one
//! JSON document. The shapes here match that document; reading and writing
//! the store itself is the caller's concern.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Uid of the custom attribute linking generated objects to their target
/// data element. Provisioned by the host-side bootstrap.
pub const CUSTOM_ATTRIBUTE_UID: &str = "b8KbU93phhz";

/// Fields compared when reconciling program indicators.
pub const PI_MATCH_FIELDS: &[&str] = &[
    "name",
    "shortName",
    "expression",
    "filter",
    "description",
    "attributeValues",
];

/// Fields compared when reconciling indicators.
pub const INDICATOR_MATCH_FIELDS: &[&str] = &[
    "name",
    "shortName",
    "numeratorDescription",
    "description",
    "indicatorType",
    "attributeValues",
];

/// Filter fragment configured for one category option. An empty `filter`
/// means "not yet configured / intentionally blank".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoMapping {
    pub name: String,
    #[serde(default)]
    pub filter: String,
}

/// One data-set / data-element / program-indicator mapping definition.
/// `row_id` is immutable once created; it tags every generated object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MappingRow {
    pub row_id: String,
    pub ds_uid: String,
    pub ds_name: String,
    pub de_uid: String,
    pub de_name: String,
    pub pi_uid: String,
    pub pi_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co_filters: Option<HashMap<String, CoMapping>>,
}

impl fmt::Display for MappingRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} / {} <- {}",
            self.row_id, self.ds_name, self.de_name, self.pi_name
        )
    }
}

/// The full configuration document. Rows are keyed by `row_id`; a BTreeMap
/// keeps regeneration order deterministic across runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MapperConfig {
    #[serde(default)]
    pub de_pi_maps: BTreeMap<String, MappingRow>,
    #[serde(default)]
    pub co_maps: HashMap<String, CoMapping>,
    #[serde(default)]
    pub generate_indicators: bool,
    #[serde(default = "default_public_sharing")]
    pub generated_metadata_public_sharing: String,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            de_pi_maps: BTreeMap::new(),
            co_maps: HashMap::new(),
            generate_indicators: false,
            generated_metadata_public_sharing: default_public_sharing(),
        }
    }
}

fn default_public_sharing() -> String {
    "r-------".to_string()
}

impl MapperConfig {
    pub fn row(&self, row_id: &str) -> Option<&MappingRow> {
        self.de_pi_maps.get(row_id)
    }

    pub fn rows(&self) -> impl Iterator<Item = &MappingRow> {
        self.de_pi_maps.values()
    }

    /// Category-option filter map seen by one row: the global map with the
    /// row's own overrides merged on top (row values win).
    pub fn effective_co_maps(&self, row: &MappingRow) -> HashMap<String, CoMapping> {
        let mut merged = self.co_maps.clone();
        if let Some(overrides) = &row.co_filters {
            for (co_uid, mapping) in overrides {
                merged.insert(co_uid.clone(), mapping.clone());
            }
        }
        merged
    }
}

/// Rows whose data set, data element, or program indicator name contains
/// the given text (case-insensitive), preserving row order. Empty text
/// keeps everything.
pub fn filter_rows_by_text<'a>(
    rows: impl Iterator<Item = &'a MappingRow>,
    text: &str,
) -> Vec<&'a MappingRow> {
    if text.is_empty() {
        return rows.collect();
    }
    let needle = text.to_lowercase();
    rows.filter(|row| {
        row.ds_name.to_lowercase().contains(&needle)
            || row.de_name.to_lowercase().contains(&needle)
            || row.pi_name.to_lowercase().contains(&needle)
    })
    .collect()
}
