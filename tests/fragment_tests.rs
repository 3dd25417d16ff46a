mod common;

use common::*;
use event_aggregate_mapper::generator::{
    forgivably_empty_co_ids, order_cos, resolve_fragments,
};
use event_aggregate_mapper::{DataElement, DataSetElement, IdRef, MapperError};
use std::collections::HashMap;

#[test]
fn default_co_contributes_no_fragment_and_no_suffix() {
    let fragments = resolve_fragments(&default_combo(), &HashMap::new()).unwrap();
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].coc_id, "DefCocUid01");
    assert_eq!(fragments[0].filter, "");
    assert_eq!(fragments[0].suffix, "");
}

#[test]
fn configured_options_resolve_to_bracketed_fragments() {
    let fragments = resolve_fragments(&sex_combo(), &sex_co_maps()).unwrap();
    assert_eq!(fragments.len(), 2);
    assert_eq!(fragments[0].coc_id, "MalCocUid01");
    assert_eq!(fragments[0].filter, "(#{attrSexUid1} == 'M')");
    assert_eq!(fragments[0].suffix, " (Male)");
    assert_eq!(fragments[1].coc_id, "FemCocUid01");
    assert_eq!(fragments[1].filter, "(#{attrSexUid1} == 'F')");
    assert_eq!(fragments[1].suffix, " (Female)");
}

#[test]
fn zero_cocs_is_a_mapping_generation_error() {
    let combo = category_combo("ccEmptyUid1", Vec::new(), Vec::new());
    let err = resolve_fragments(&combo, &HashMap::new()).unwrap_err();
    assert!(matches!(err, MapperError::MappingGeneration { .. }));
}

#[test]
fn option_missing_from_co_maps_is_a_mapping_generation_error() {
    let mut co_maps = sex_co_maps();
    co_maps.remove("FemCoUid001");
    let err = resolve_fragments(&sex_combo(), &co_maps).unwrap_err();
    let MapperError::MappingGeneration { message } = err else {
        panic!("expected MappingGeneration");
    };
    assert!(message.contains("FemCoUid001"));
}

#[test]
fn blank_filter_in_a_configured_category_skips_the_whole_coc() {
    let mut co_maps = sex_co_maps();
    co_maps.insert("FemCoUid001".to_string(), co_mapping("Female", ""));
    let fragments = resolve_fragments(&sex_combo(), &co_maps).unwrap();
    let ids: Vec<&str> = fragments.iter().map(|f| f.coc_id.as_str()).collect();
    assert_eq!(ids, vec!["MalCocUid01"]);
}

fn two_category_combo() -> event_aggregate_mapper::CategoryCombo {
    category_combo(
        "ccSexAgeUi1",
        vec![
            category(
                "catSexUid01",
                vec![co("MalCoUid001", "Male"), co("FemCoUid001", "Female")],
            ),
            category(
                "catAgeUid01",
                vec![co("coUnder5Ui1", "<5y"), co("coOver5Uid1", ">5y")],
            ),
        ],
        vec![
            coc(
                "cocMu5Uid01",
                "Male, <5y",
                vec![co("coUnder5Ui1", "<5y"), co("MalCoUid001", "Male")],
            ),
            coc(
                "cocMo5Uid01",
                "Male, >5y",
                vec![co("MalCoUid001", "Male"), co("coOver5Uid1", ">5y")],
            ),
            coc(
                "cocFu5Uid01",
                "Female, <5y",
                vec![co("FemCoUid001", "Female"), co("coUnder5Ui1", "<5y")],
            ),
            coc(
                "cocFo5Uid01",
                "Female, >5y",
                vec![co("FemCoUid001", "Female"), co("coOver5Uid1", ">5y")],
            ),
        ],
    )
}

#[test]
fn fully_blank_category_is_forgiven_but_still_tracked() {
    let mut co_maps = sex_co_maps();
    co_maps.insert("coUnder5Ui1".to_string(), co_mapping("<5y", ""));
    co_maps.insert("coOver5Uid1".to_string(), co_mapping(">5y", ""));

    let forgivable = forgivably_empty_co_ids(&two_category_combo(), &co_maps);
    assert!(forgivable.contains("coUnder5Ui1"));
    assert!(forgivable.contains("coOver5Uid1"));
    assert!(!forgivable.contains("MalCoUid001"));

    // Age contributes nothing, but its combos stay alive on the sex axis
    let fragments = resolve_fragments(&two_category_combo(), &co_maps).unwrap();
    assert_eq!(fragments.len(), 4);
    assert_eq!(fragments[0].filter, "(#{attrSexUid1} == 'M')");
    assert_eq!(fragments[0].suffix, " (Male)");
}

#[test]
fn partially_blank_category_still_skips_its_cocs() {
    let mut co_maps = sex_co_maps();
    // Age category configured for <5y only: >5y combos are blocked
    co_maps.insert(
        "coUnder5Ui1".to_string(),
        co_mapping("<5y", "#{attrAgeUid1} < 5"),
    );
    co_maps.insert("coOver5Uid1".to_string(), co_mapping(">5y", ""));

    let fragments = resolve_fragments(&two_category_combo(), &co_maps).unwrap();
    let ids: Vec<&str> = fragments.iter().map(|f| f.coc_id.as_str()).collect();
    assert_eq!(ids, vec!["cocMu5Uid01", "cocFu5Uid01"]);
}

#[test]
fn default_category_is_never_forgivable() {
    let forgivable = forgivably_empty_co_ids(&default_combo(), &HashMap::new());
    assert!(forgivable.is_empty());
}

#[test]
fn cos_are_ordered_by_first_occurrence_in_coc_name() {
    let combo = coc(
        "cocTestUid1",
        "Male, <5y",
        vec![co("coTestUid01", "<5y"), co("coTestUid02", "Male")],
    );
    let ordered: Vec<&str> = order_cos(&combo).iter().map(|c| c.name.as_str()).collect();
    assert_eq!(ordered, vec!["Male", "<5y"]);
}

#[test]
fn ordering_disambiguates_partial_name_overlap() {
    let combo = coc(
        "cocTestUid1",
        "Female, Female sex worker",
        vec![
            co("coTestUid01", "Female sex worker"),
            co("coTestUid02", "Female"),
        ],
    );
    let ordered: Vec<&str> = order_cos(&combo).iter().map(|c| c.name.as_str()).collect();
    assert_eq!(ordered, vec!["Female", "Female sex worker"]);
}

#[test]
fn suffix_order_follows_coc_name_order() {
    let mut co_maps = sex_co_maps();
    co_maps.insert(
        "coUnder5Ui1".to_string(),
        co_mapping("<5y", "#{attrAgeUid1} < 5"),
    );
    co_maps.insert(
        "coOver5Uid1".to_string(),
        co_mapping(">5y", "#{attrAgeUid1} >= 5"),
    );
    let fragments = resolve_fragments(&two_category_combo(), &co_maps).unwrap();
    // cocMu5Uid01 lists <5y before Male, but the display name says Male first
    assert_eq!(fragments[0].suffix, " (Male) (<5y)");
    assert_eq!(
        fragments[0].filter,
        "(#{attrSexUid1} == 'M') && (#{attrAgeUid1} < 5)"
    );
}

#[test]
fn duplicate_fragments_collapse() {
    let mut combo = sex_combo();
    let duplicate = combo.category_option_combos[0].clone();
    combo.category_option_combos.push(duplicate);
    let fragments = resolve_fragments(&combo, &sex_co_maps()).unwrap();
    assert_eq!(fragments.len(), 2);
}

#[test]
fn data_set_scoped_override_replaces_the_elements_own_combo() {
    let de = DataElement {
        id: "deUid123456".to_string(),
        name: "Confirmed cases".to_string(),
        code: None,
        category_combo: sex_combo(),
        data_set_elements: vec![DataSetElement {
            data_set: IdRef::new("dsUid123456"),
            category_combo: Some(default_combo()),
        }],
    };

    assert_eq!(de.category_combo_for(Some("dsUid123456")).id, "ccDefaultU1");
    // No hint, or a data set without an override entry: own combo
    assert_eq!(de.category_combo_for(None).id, "ccSexUid001");
    assert_eq!(de.category_combo_for(Some("dsOtherUid1")).id, "ccSexUid001");
}

#[test]
fn override_without_combo_falls_back_to_own_combo() {
    let de = DataElement {
        id: "deUid123456".to_string(),
        name: "Confirmed cases".to_string(),
        code: None,
        category_combo: sex_combo(),
        data_set_elements: vec![DataSetElement {
            data_set: IdRef::new("dsUid123456"),
            category_combo: None,
        }],
    };
    assert_eq!(de.category_combo_for(Some("dsUid123456")).id, "ccSexUid001");
}
