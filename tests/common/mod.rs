use event_aggregate_mapper::*;
use std::collections::HashMap;

#[allow(dead_code)]
pub fn co(id: &str, name: &str) -> CategoryOption {
    CategoryOption {
        id: id.to_string(),
        name: name.to_string(),
        short_name: None,
    }
}

#[allow(dead_code)]
pub fn coc(id: &str, name: &str, cos: Vec<CategoryOption>) -> CategoryOptionCombo {
    CategoryOptionCombo {
        id: id.to_string(),
        name: name.to_string(),
        category_options: cos,
    }
}

#[allow(dead_code)]
pub fn category(id: &str, cos: Vec<CategoryOption>) -> Category {
    Category {
        id: id.to_string(),
        category_options: cos,
    }
}

#[allow(dead_code)]
pub fn category_combo(
    id: &str,
    categories: Vec<Category>,
    cocs: Vec<CategoryOptionCombo>,
) -> CategoryCombo {
    CategoryCombo {
        id: id.to_string(),
        categories,
        category_option_combos: cocs,
    }
}

/// Combo disaggregated by sex only: one category, two options, two combos.
#[allow(dead_code)]
pub fn sex_combo() -> CategoryCombo {
    category_combo(
        "ccSexUid001",
        vec![category(
            "catSexUid01",
            vec![co("MalCoUid001", "Male"), co("FemCoUid001", "Female")],
        )],
        vec![
            coc("MalCocUid01", "Male", vec![co("MalCoUid001", "Male")]),
            coc("FemCocUid01", "Female", vec![co("FemCoUid001", "Female")]),
        ],
    )
}

/// The host's default (no disaggregation) combo.
#[allow(dead_code)]
pub fn default_combo() -> CategoryCombo {
    category_combo(
        "ccDefaultU1",
        vec![category(
            "catDefault1",
            vec![co("DefCoUid001", "default")],
        )],
        vec![coc(
            "DefCocUid01",
            "default",
            vec![co("DefCoUid001", "default")],
        )],
    )
}

#[allow(dead_code)]
pub fn co_mapping(name: &str, filter: &str) -> CoMapping {
    CoMapping {
        name: name.to_string(),
        filter: filter.to_string(),
    }
}

/// Filter map covering the sex combo.
#[allow(dead_code)]
pub fn sex_co_maps() -> HashMap<String, CoMapping> {
    HashMap::from([
        (
            "MalCoUid001".to_string(),
            co_mapping("Male", "#{attrSexUid1} == 'M'"),
        ),
        (
            "FemCoUid001".to_string(),
            co_mapping("Female", "#{attrSexUid1} == 'F'"),
        ),
    ])
}

#[allow(dead_code)]
pub fn template_pi(id: &str, name: &str, filter: Option<&str>) -> ProgramIndicator {
    ProgramIndicator {
        id: id.to_string(),
        name: name.to_string(),
        short_name: name.to_string(),
        code: None,
        description: None,
        filter: filter.map(str::to_string),
        analytics_period_boundaries: vec![AnalyticsPeriodBoundary {
            id: Some("apbUid12345".to_string()),
            extra: HashMap::new(),
        }],
        attribute_values: Vec::new(),
        aggregate_export_category_option_combo: None,
        aggregate_export_attribute_option_combo: None,
        public_access: None,
        extra: HashMap::new(),
    }
}

#[allow(dead_code)]
pub fn mapping_row(row_id: &str) -> MappingRow {
    MappingRow {
        row_id: row_id.to_string(),
        ds_uid: "dsUid123456".to_string(),
        ds_name: "Monthly Cases".to_string(),
        de_uid: "deUid123456".to_string(),
        de_name: "Confirmed cases".to_string(),
        pi_uid: "piUid123456".to_string(),
        pi_name: "Confirmed cases PI".to_string(),
        co_filters: None,
    }
}

/// Snapshot wiring the standard row fixture: data set on the default
/// combo, data element disaggregated by sex, one template program
/// indicator and a factor-1 indicator type.
#[allow(dead_code)]
pub fn snapshot() -> MetadataSnapshot {
    MetadataSnapshot {
        data_sets: vec![DataSet {
            id: "dsUid123456".to_string(),
            name: "Monthly Cases".to_string(),
            category_combo: default_combo(),
        }],
        data_elements: vec![DataElement {
            id: "deUid123456".to_string(),
            name: "Confirmed cases".to_string(),
            code: Some("CONF_CASES".to_string()),
            category_combo: sex_combo(),
            data_set_elements: Vec::new(),
        }],
        program_indicators: vec![template_pi(
            "piUid123456",
            "Confirmed cases PI",
            Some("#{dataElmUid1} == 'CONFIRMED'"),
        )],
        indicator_types: vec![IndicatorType {
            id: "itFactor1U1".to_string(),
            name: "Number (Factor 1)".to_string(),
            factor: 1,
            number: true,
        }],
    }
}

/// Config whose global co map covers the sex combo.
#[allow(dead_code)]
pub fn config(row: &MappingRow) -> MapperConfig {
    let mut config = MapperConfig {
        generated_metadata_public_sharing: "r-------".to_string(),
        ..Default::default()
    };
    config.de_pi_maps.insert(row.row_id.clone(), row.clone());
    config.co_maps = sex_co_maps();
    config
}
