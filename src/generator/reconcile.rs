//! Change-set reconciliation.
//!
//! Pure diffing of freshly synthesized metadata against what a previous
//! generation run left behind. Never raises: generation must not be blocked
//! by partially corrupt legacy objects.

use serde::Serialize;
use std::collections::HashSet;

use crate::types::{ChangeLists, IdRef, Indicator, ProgramIndicator};

/// Metadata kinds the reconciler can diff. `short_name` is the stable
/// cross-run key; `set_id` lets an update inherit its predecessor's id.
pub trait Reconcilable: Clone + Serialize {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn short_name(&self) -> &str;
}

impl Reconcilable for ProgramIndicator {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn short_name(&self) -> &str {
        &self.short_name
    }
}

impl Reconcilable for Indicator {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn short_name(&self) -> &str {
        &self.short_name
    }
}

/// Field-by-field comparison over `match_fields`, through the serialized
/// form so compound fields (attribute values, object references) compare
/// structurally. Fields absent on both sides count as equal. A
/// serialization failure degrades to "not a match" on purpose: a corrupt
/// legacy object should fall through to delete-and-recreate, not abort the
/// whole run.
pub fn metadata_match<T: Reconcilable>(new_item: &T, old_item: &T, match_fields: &[&str]) -> bool {
    let (Ok(new_value), Ok(old_value)) = (
        serde_json::to_value(new_item),
        serde_json::to_value(old_item),
    ) else {
        return false;
    };
    match_fields
        .iter()
        .all(|field| new_value.get(field) == old_value.get(field))
}

/// Partition newly synthesized items against the previous generation,
/// keyed by short name:
///
/// - no old item with the same short name: net-new, created with its fresh
///   id;
/// - matching old item, all `match_fields` equal: unchanged, dropped from
///   both sides;
/// - matching old item, any field differs: update carrying the old item's
///   id, so downstream references keep resolving;
/// - old items never matched: their backing disaggregation is gone, delete.
pub fn reconcile<T: Reconcilable>(
    new_items: Vec<T>,
    old_items: Vec<T>,
    match_fields: &[&str],
) -> ChangeLists<T> {
    let mut delete = old_items;
    let mut create_update = Vec::new();

    for mut new_item in new_items {
        match delete
            .iter()
            .position(|old| old.short_name() == new_item.short_name())
        {
            None => create_update.push(new_item),
            Some(pos) => {
                let old_item = delete.remove(pos);
                if !metadata_match(&new_item, &old_item, match_fields) {
                    new_item.set_id(old_item.id().to_string());
                    create_update.push(new_item);
                }
            }
        }
    }

    ChangeLists {
        create_update,
        delete,
    }
}

/// Apply a change-set to a group membership list: drop deleted ids, keep
/// survivors in their original order, append newly created/updated ids,
/// deduplicated by id.
pub fn update_group_members(
    current: &[IdRef],
    create_update: &[IdRef],
    delete: &[IdRef],
) -> Vec<IdRef> {
    let deleted: HashSet<&str> = delete.iter().map(|m| m.id.as_str()).collect();
    let mut members: Vec<IdRef> = current
        .iter()
        .filter(|m| !deleted.contains(m.id.as_str()))
        .cloned()
        .collect();
    for candidate in create_update {
        if !members.iter().any(|m| m.id == candidate.id) {
            members.push(candidate.clone());
        }
    }
    members
}
