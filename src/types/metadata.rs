//! In-memory metadata snapshot types.
//!
//! These mirror the host system's camelCase JSON wire shapes. Objects that
//! serve as synthesis templates (program indicators) carry a flattened
//! `extra` map so fields this crate does not model survive the
//! clone-and-patch round trip unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use crate::error::{MapperError, Result};

/// Display name of the sentinel category option meaning "no disaggregation".
pub const DEFAULT_CATEGORY_OPTION_NAME: &str = "default";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdRef {
    pub id: String,
}

impl IdRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOption {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
}

impl CategoryOption {
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_CATEGORY_OPTION_NAME
    }

    /// Name used in generated suffix text, preferring the short name.
    pub fn suffix_name(&self) -> &str {
        self.short_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    #[serde(default)]
    pub category_options: Vec<CategoryOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOptionCombo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category_options: Vec<CategoryOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCombo {
    pub id: String,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub category_option_combos: Vec<CategoryOptionCombo>,
}

/// Data-set-element relation on a data element. When `category_combo` is
/// present it overrides the element's own combo within that data set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataSetElement {
    pub data_set: IdRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_combo: Option<CategoryCombo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataSet {
    pub id: String,
    pub name: String,
    pub category_combo: CategoryCombo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataElement {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub category_combo: CategoryCombo,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_set_elements: Vec<DataSetElement>,
}

impl DataElement {
    /// Effective category combo for this element. With a data-set scope
    /// hint, a category-combo override on the matching data-set-element
    /// relation replaces the element's own combo.
    pub fn category_combo_for(&self, ds_uid: Option<&str>) -> &CategoryCombo {
        let Some(ds_uid) = ds_uid else {
            return &self.category_combo;
        };
        match self
            .data_set_elements
            .iter()
            .find(|dse| dse.data_set.id == ds_uid)
        {
            Some(dse) => dse.category_combo.as_ref().unwrap_or(&self.category_combo),
            None => {
                tracing::warn!(
                    "Data set {} not found in the data set elements for {}",
                    ds_uid,
                    self.id
                );
                &self.category_combo
            }
        }
    }

    /// Code used to link generated metadata back to this element. Falls
    /// back to the uid, the value the code bootstrap would have written.
    pub fn mapping_code(&self) -> &str {
        match self.code.as_deref() {
            Some(code) if !code.is_empty() => code,
            _ => &self.id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValue {
    pub value: String,
    pub attribute: IdRef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsPeriodBoundary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgramIndicator {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub analytics_period_boundaries: Vec<AnalyticsPeriodBoundary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_values: Vec<AttributeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_export_category_option_combo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_export_attribute_option_combo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_access: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl ProgramIndicator {
    /// Whether this object carries the given row tag in its description.
    pub fn tagged_with(&self, row_id: &str) -> bool {
        self.description
            .as_deref()
            .is_some_and(|d| d.contains(row_id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Indicator {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub numerator: String,
    #[serde(default)]
    pub numerator_description: String,
    pub denominator: String,
    #[serde(default)]
    pub denominator_description: String,
    pub indicator_type: IdRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_values: Vec<AttributeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_export_category_option_combo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_export_attribute_option_combo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_access: Option<String>,
}

impl Indicator {
    pub fn tagged_with(&self, row_id: &str) -> bool {
        self.description
            .as_deref()
            .is_some_and(|d| d.contains(row_id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorType {
    pub id: String,
    pub name: String,
    pub factor: i32,
    #[serde(default)]
    pub number: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgramIndicatorGroup {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub program_indicators: Vec<IdRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_access: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorGroup {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indicators: Vec<IdRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_access: Option<String>,
}

/// Read-only snapshot of the host metadata the generator consumes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetadataSnapshot {
    #[serde(default)]
    pub data_sets: Vec<DataSet>,
    #[serde(default)]
    pub data_elements: Vec<DataElement>,
    #[serde(default)]
    pub program_indicators: Vec<ProgramIndicator>,
    #[serde(default)]
    pub indicator_types: Vec<IndicatorType>,
}

impl MetadataSnapshot {
    pub fn data_set(&self, uid: &str) -> Result<&DataSet> {
        self.data_sets
            .iter()
            .find(|ds| ds.id == uid)
            .ok_or_else(|| MapperError::not_found("data set", uid))
    }

    pub fn data_element(&self, uid: &str) -> Result<&DataElement> {
        self.data_elements
            .iter()
            .find(|de| de.id == uid)
            .ok_or_else(|| MapperError::not_found("data element", uid))
    }

    pub fn program_indicator(&self, uid: &str) -> Result<&ProgramIndicator> {
        self.program_indicators
            .iter()
            .find(|pi| pi.id == uid)
            .ok_or_else(|| MapperError::not_found("program indicator", uid))
    }

    /// The indicator type used for generated indicators. The host must
    /// have exactly one numeric factor-1 type provisioned.
    pub fn factor_one_indicator_type(&self) -> Result<&IndicatorType> {
        self.indicator_types
            .iter()
            .find(|it| it.number && it.factor == 1)
            .ok_or_else(|| MapperError::not_found("indicator type", "factor=1"))
    }
}

/// Previously generated metadata, already narrowed by the caller to the
/// objects owned by the rows being regenerated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedMetadata {
    #[serde(default)]
    pub program_indicators: Vec<ProgramIndicator>,
    #[serde(default)]
    pub indicators: Vec<Indicator>,
    #[serde(default)]
    pub program_indicator_groups: Vec<ProgramIndicatorGroup>,
    #[serde(default)]
    pub indicator_groups: Vec<IndicatorGroup>,
}

impl fmt::Display for ProgramIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProgramIndicator({})", self.id)?;
        if !self.name.is_empty() {
            write!(f, " - {}", self.name)?;
        }
        Ok(())
    }
}
