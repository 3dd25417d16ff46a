//! Change-set output handed to the persistence collaborator.

use serde::{Deserialize, Serialize};

use super::metadata::{Indicator, IndicatorGroup, ProgramIndicator, ProgramIndicatorGroup};

/// Reconciler output for one metadata kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeLists<T> {
    pub create_update: Vec<T>,
    pub delete: Vec<T>,
}

impl<T> ChangeLists<T> {
    pub fn is_empty(&self) -> bool {
        self.create_update.is_empty() && self.delete.is_empty()
    }
}

impl<T> Default for ChangeLists<T> {
    fn default() -> Self {
        Self {
            create_update: Vec::new(),
            delete: Vec::new(),
        }
    }
}

/// Objects to create or update, shaped as a host metadata-import payload
/// (empty collections are omitted on the wire).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateUpdateMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub program_indicators: Vec<ProgramIndicator>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub program_indicator_groups: Vec<ProgramIndicatorGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indicators: Vec<Indicator>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indicator_groups: Vec<IndicatorGroup>,
}

/// Objects whose backing disaggregation no longer exists, shaped for an
/// import with the DELETE strategy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub program_indicators: Vec<ProgramIndicator>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indicators: Vec<Indicator>,
}

/// Result of regenerating one mapping row.
///
/// When `needs_delete` is set, the delete import must complete before the
/// create/update import for the same row is considered applied: a stale
/// object awaiting deletion can collide with a new object on `shortName`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
    pub create_update_metadata: CreateUpdateMetadata,
    pub delete_metadata: DeleteMetadata,
    pub needs_delete: bool,
}
