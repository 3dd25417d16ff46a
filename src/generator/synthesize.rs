//! Synthesis of generated metadata objects from templates.

use super::combine::CombinedFilter;
use super::reconcile::update_group_members;
use crate::error::{MapperError, Result};
use crate::types::{
    AttributeValue, ChangeLists, IdRef, Indicator, IndicatorGroup, IndicatorType, MappingRow,
    ProgramIndicator, ProgramIndicatorGroup,
};
use crate::uid::make_uid;

fn uid_head(uid: &str) -> &str {
    uid.get(..3).unwrap_or(uid)
}

/// Deterministic short name for one synthesized object. Composed of uid
/// prefixes so it stays inside the host short-name length limit while
/// remaining unique per (row, combo pair).
fn short_name_key(aoc_id: &str, coc_id: &str, row: &MappingRow) -> String {
    format!(
        "{}-{}-{}-{}-{}",
        uid_head(aoc_id),
        uid_head(coc_id),
        uid_head(&row.ds_uid),
        uid_head(&row.de_uid),
        uid_head(&row.pi_uid)
    )
}

/// Row tag embedded in generated descriptions. Must literally contain the
/// row id; it is the only link back to the owning row across regenerations.
fn description_tag(row_id: &str, aoc_id: &str, coc_id: &str) -> String {
    format!("{row_id}-{aoc_id}-{coc_id}")
}

/// Clone the template program indicator once per combined filter, patching
/// identity, filter, tagging, disaggregation target and attribute linkage.
/// Unmodeled template fields travel along in the flattened `extra` map.
pub fn synthesize_program_indicators(
    template: &ProgramIndicator,
    combined: &[CombinedFilter],
    row: &MappingRow,
    de_code: &str,
    custom_attribute_uid: &str,
    public_sharing: &str,
) -> Vec<ProgramIndicator> {
    combined
        .iter()
        .map(|cf| {
            let mut pi = template.clone();
            // Boundary ids are freshly assigned by the receiving system
            for boundary in &mut pi.analytics_period_boundaries {
                boundary.id = None;
            }
            pi.id = make_uid();
            pi.filter = Some(cf.filter.clone());
            pi.code = Some(String::new());
            pi.description = Some(description_tag(&row.row_id, &cf.aoc_id, &cf.coc_id));
            pi.short_name = short_name_key(&cf.aoc_id, &cf.coc_id, row);
            pi.name = format!("{}{} ({})", template.name, cf.suffix, row.row_id);
            pi.aggregate_export_category_option_combo = Some(cf.coc_id.clone());
            pi.aggregate_export_attribute_option_combo = Some(cf.aoc_id.clone());
            pi.attribute_values = vec![AttributeValue {
                value: de_code.to_string(),
                attribute: IdRef::new(custom_attribute_uid),
            }];
            pi.public_access = Some(public_sharing.to_string());
            pi
        })
        .collect()
}

/// Build the aggregate-side indicator for one generated program indicator.
/// The numerator references the program indicator by id, so the id must
/// already be its final (possibly reconciler-reused) value.
pub fn synthesize_indicator(
    pi: &ProgramIndicator,
    indicator_type: &IndicatorType,
    custom_attribute_uid: &str,
) -> Result<Indicator> {
    let attribute = pi
        .attribute_values
        .iter()
        .find(|av| av.attribute.id == custom_attribute_uid)
        .ok_or_else(|| {
            MapperError::generation(format!(
                "Program indicator {} does not carry the mapping attribute {}",
                pi.id, custom_attribute_uid
            ))
        })?;

    Ok(Indicator {
        id: make_uid(),
        name: pi.name.clone(),
        short_name: pi.short_name.clone(),
        description: pi.description.clone(),
        numerator: format!("I{{{}}}", pi.id),
        numerator_description: pi.name.clone(),
        denominator: "1".to_string(),
        denominator_description: "1".to_string(),
        indicator_type: IdRef::new(&indicator_type.id),
        attribute_values: vec![attribute.clone()],
        aggregate_export_category_option_combo: pi.aggregate_export_category_option_combo.clone(),
        aggregate_export_attribute_option_combo: pi.aggregate_export_attribute_option_combo.clone(),
        public_access: pi.public_access.clone(),
    })
}

fn group_name(row: &MappingRow) -> String {
    format!("{} / {} ({})", row.ds_name, row.de_name, row.row_id)
}

fn group_description(row: &MappingRow, resource: &str) -> String {
    format!(
        "Generated for mapping {}. Members: /api/{}.json?filter=description:like:{}",
        row.row_id, resource, row.row_id
    )
}

/// Reuse the row's previously generated program indicator group when one
/// exists (updating its membership), otherwise create a fresh one holding
/// all created/updated members.
pub fn assemble_pi_group(
    row: &MappingRow,
    existing_groups: &[ProgramIndicatorGroup],
    changes: &ChangeLists<ProgramIndicator>,
    public_sharing: &str,
) -> ProgramIndicatorGroup {
    let create_update: Vec<IdRef> = changes
        .create_update
        .iter()
        .map(|pi| IdRef::new(&pi.id))
        .collect();
    let delete: Vec<IdRef> = changes.delete.iter().map(|pi| IdRef::new(&pi.id)).collect();

    match existing_groups.iter().find(|g| g.name.contains(&row.row_id)) {
        Some(group) => {
            let mut updated = group.clone();
            updated.program_indicators =
                update_group_members(&group.program_indicators, &create_update, &delete);
            updated
        }
        None => ProgramIndicatorGroup {
            id: make_uid(),
            name: group_name(row),
            description: Some(group_description(row, "programIndicators")),
            program_indicators: create_update,
            public_access: Some(public_sharing.to_string()),
        },
    }
}

/// Indicator-group counterpart of [`assemble_pi_group`].
pub fn assemble_indicator_group(
    row: &MappingRow,
    existing_groups: &[IndicatorGroup],
    changes: &ChangeLists<Indicator>,
    public_sharing: &str,
) -> IndicatorGroup {
    let create_update: Vec<IdRef> = changes
        .create_update
        .iter()
        .map(|ind| IdRef::new(&ind.id))
        .collect();
    let delete: Vec<IdRef> = changes
        .delete
        .iter()
        .map(|ind| IdRef::new(&ind.id))
        .collect();

    match existing_groups.iter().find(|g| g.name.contains(&row.row_id)) {
        Some(group) => {
            let mut updated = group.clone();
            updated.indicators = update_group_members(&group.indicators, &create_update, &delete);
            updated
        }
        None => IndicatorGroup {
            id: make_uid(),
            name: group_name(row),
            description: Some(group_description(row, "indicators")),
            indicators: create_update,
            public_access: Some(public_sharing.to_string()),
        },
    }
}
