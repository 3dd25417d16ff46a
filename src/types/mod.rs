pub mod change_set;
pub mod config;
pub mod metadata;

pub use change_set::{ChangeLists, ChangeSet, CreateUpdateMetadata, DeleteMetadata};
pub use config::{
    filter_rows_by_text, CoMapping, MapperConfig, MappingRow, CUSTOM_ATTRIBUTE_UID,
    INDICATOR_MATCH_FIELDS, PI_MATCH_FIELDS,
};
pub use metadata::{
    AnalyticsPeriodBoundary, AttributeValue, Category, CategoryCombo, CategoryOption,
    CategoryOptionCombo, DataElement, DataSet, DataSetElement, GeneratedMetadata, IdRef,
    Indicator, IndicatorGroup, IndicatorType, MetadataSnapshot, ProgramIndicator,
    ProgramIndicatorGroup, DEFAULT_CATEGORY_OPTION_NAME,
};
