//! # Event Aggregate Mapper
//!
//! A Rust library for expanding event-to-aggregate mappings on a DHIS2-style
//! metadata store: each mapping row links a program indicator to a data
//! element within a data set, and the engine expands it into one generated
//! program indicator (and optionally indicator) per disaggregation pair,
//! keeping previously generated metadata synchronized across regenerations.
//!
//! ## Features
//!
//! - **Filter resolution**: per-category-option filter fragments combined
//!   across both disaggregation schemes, honoring category-combo overrides
//! - **Synthesis**: template-based generation with stable row tagging
//! - **Reconciliation**: minimal create/update/delete sets with identifier
//!   preservation across runs
//! - **Pure core**: no I/O anywhere in the engine; persistence stays with
//!   the caller
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use event_aggregate_mapper::*;
//!
//! # fn example() -> Result<()> {
//! let snapshot: MetadataSnapshot = serde_json::from_str("{}")?;
//! let config: MapperConfig = serde_json::from_str("{}")?;
//! let existing = GeneratedMetadata::default();
//!
//! let generator = MappingGenerator::new();
//! for row in config.rows() {
//!     match generator.generate_mapping(row, &snapshot, &existing, &config)? {
//!         Some(change_set) => println!("{}", serde_json::to_string_pretty(&change_set)?),
//!         None => println!("{}: no updates detected", row.row_id),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod types;
pub mod uid;

pub use error::Result; // Our Result type takes precedence
pub use error::MapperError;
pub use generator::{
    expected_pi_count, CocFilter, CombinedFilter, GeneratorConfig, MappingGenerator, Reconcilable,
};
pub use types::*;
pub use uid::{is_valid_uid, make_uid};
