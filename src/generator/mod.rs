mod combine;
mod fragments;
mod reconcile;
mod synthesize;

pub use combine::{base_filter, combine_filters, CombinedFilter};
pub use fragments::{forgivably_empty_co_ids, order_cos, resolve_fragments, CocFilter};
pub use reconcile::{metadata_match, reconcile, update_group_members, Reconcilable};
pub use synthesize::{
    assemble_indicator_group, assemble_pi_group, synthesize_indicator,
    synthesize_program_indicators,
};

use std::collections::HashSet;

use crate::error::Result;
use crate::types::{
    ChangeLists, ChangeSet, CreateUpdateMetadata, DeleteMetadata, GeneratedMetadata, Indicator,
    MapperConfig, MappingRow, MetadataSnapshot, ProgramIndicator, CUSTOM_ATTRIBUTE_UID,
    INDICATOR_MATCH_FIELDS, PI_MATCH_FIELDS,
};

/// Engine knobs threaded explicitly into every generation step: the custom
/// attribute that links generated objects to their target data element,
/// and the field lists the reconciler compares.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub custom_attribute_uid: String,
    pub pi_match_fields: Vec<String>,
    pub indicator_match_fields: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            custom_attribute_uid: CUSTOM_ATTRIBUTE_UID.to_string(),
            pi_match_fields: PI_MATCH_FIELDS.iter().map(|s| s.to_string()).collect(),
            indicator_match_fields: INDICATOR_MATCH_FIELDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// The mapping orchestrator: expands one mapping row into a change-set
/// against the current metadata snapshot and the row's previously
/// generated objects. Pure computation; persisting the result is the
/// caller's job.
#[derive(Debug, Clone, Default)]
pub struct MappingGenerator {
    config: GeneratorConfig,
}

impl MappingGenerator {
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
        }
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Regenerate one row. Returns `Ok(None)` when the existing generated
    /// metadata already matches what the row would produce; callers must
    /// not issue persistence calls in that case.
    pub fn generate_mapping(
        &self,
        row: &MappingRow,
        snapshot: &MetadataSnapshot,
        existing: &GeneratedMetadata,
        config: &MapperConfig,
    ) -> Result<Option<ChangeSet>> {
        let pi = snapshot.program_indicator(&row.pi_uid)?;
        let ds = snapshot.data_set(&row.ds_uid)?;
        let de = snapshot.data_element(&row.de_uid)?;

        let co_maps = config.effective_co_maps(row);

        let ds_fragments = resolve_fragments(&ds.category_combo, &co_maps)?;
        let de_fragments = resolve_fragments(de.category_combo_for(Some(&row.ds_uid)), &co_maps)?;
        let combined = combine_filters(&base_filter(pi), &ds_fragments, &de_fragments);
        tracing::debug!(
            "Row {}: {} data set x {} data element fragments -> {} combined filters",
            row.row_id,
            ds_fragments.len(),
            de_fragments.len(),
            combined.len()
        );

        let sharing = config.generated_metadata_public_sharing.as_str();
        let candidates = synthesize_program_indicators(
            pi,
            &combined,
            row,
            de.mapping_code(),
            &self.config.custom_attribute_uid,
            sharing,
        );

        let existing_pis: Vec<ProgramIndicator> = existing
            .program_indicators
            .iter()
            .filter(|p| p.tagged_with(&row.row_id))
            .cloned()
            .collect();
        let pi_fields: Vec<&str> = self.config.pi_match_fields.iter().map(String::as_str).collect();
        let pi_changes = reconcile(candidates, existing_pis, &pi_fields);

        if pi_changes.is_empty() {
            tracing::info!("Row {}: no updates detected", row.row_id);
            return Ok(None);
        }

        let pi_group =
            assemble_pi_group(row, &existing.program_indicator_groups, &pi_changes, sharing);

        let mut ind_changes = ChangeLists::default();
        let mut indicator_groups = Vec::new();
        if config.generate_indicators {
            ind_changes = self.reconcile_indicators(row, snapshot, existing, &pi_changes)?;
            indicator_groups.push(assemble_indicator_group(
                row,
                &existing.indicator_groups,
                &ind_changes,
                sharing,
            ));
        }

        let needs_delete = !pi_changes.delete.is_empty() || !ind_changes.delete.is_empty();
        tracing::info!(
            "Row {}: {} program indicators to create/update, {} to delete",
            row.row_id,
            pi_changes.create_update.len(),
            pi_changes.delete.len()
        );

        Ok(Some(ChangeSet {
            create_update_metadata: CreateUpdateMetadata {
                program_indicators: pi_changes.create_update,
                program_indicator_groups: vec![pi_group],
                indicators: ind_changes.create_update,
                indicator_groups,
            },
            delete_metadata: DeleteMetadata {
                program_indicators: pi_changes.delete,
                indicators: ind_changes.delete,
            },
            needs_delete,
        }))
    }

    /// Indicator synthesis + reconciliation, layered on the program
    /// indicator results. Only indicators backed by touched program
    /// indicators take part: objects belonging to unchanged program
    /// indicators are left alone, so the leftover-means-delete rule cannot
    /// reach them.
    fn reconcile_indicators(
        &self,
        row: &MappingRow,
        snapshot: &MetadataSnapshot,
        existing: &GeneratedMetadata,
        pi_changes: &ChangeLists<ProgramIndicator>,
    ) -> Result<ChangeLists<Indicator>> {
        let indicator_type = snapshot.factor_one_indicator_type()?;

        let candidates: Vec<Indicator> = pi_changes
            .create_update
            .iter()
            .map(|pi| synthesize_indicator(pi, indicator_type, &self.config.custom_attribute_uid))
            .collect::<Result<_>>()?;

        let touched: HashSet<&str> = pi_changes
            .create_update
            .iter()
            .chain(&pi_changes.delete)
            .filter_map(|pi| pi.description.as_deref())
            .collect();
        let existing_inds: Vec<Indicator> = existing
            .indicators
            .iter()
            .filter(|ind| {
                ind.tagged_with(&row.row_id)
                    && ind
                        .description
                        .as_deref()
                        .is_some_and(|d| touched.contains(d))
            })
            .cloned()
            .collect();

        let ind_fields: Vec<&str> = self
            .config
            .indicator_match_fields
            .iter()
            .map(String::as_str)
            .collect();
        Ok(reconcile(candidates, existing_inds, &ind_fields))
    }
}

/// Estimate how many program indicators a row will expand into, before
/// generating anything: per category of both effective category combos,
/// the number of member options carrying a non-empty filter, clamped to at
/// least one, multiplied together.
pub fn expected_pi_count(
    row: &MappingRow,
    snapshot: &MetadataSnapshot,
    config: &MapperConfig,
) -> Result<usize> {
    let ds = snapshot.data_set(&row.ds_uid)?;
    let de = snapshot.data_element(&row.de_uid)?;
    let co_maps = config.effective_co_maps(row);
    let configured: HashSet<&str> = co_maps
        .iter()
        .filter(|(_, mapping)| !mapping.filter.is_empty())
        .map(|(co_uid, _)| co_uid.as_str())
        .collect();

    let mut count = 1usize;
    for category_combo in [de.category_combo_for(Some(&row.ds_uid)), &ds.category_combo] {
        for category in &category_combo.categories {
            let configured_cos = category
                .category_options
                .iter()
                .filter(|co| configured.contains(co.id.as_str()))
                .count();
            count *= configured_cos.max(1);
        }
    }
    Ok(count)
}
