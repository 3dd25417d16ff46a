use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use event_aggregate_mapper::{
    expected_pi_count, filter_rows_by_text, is_valid_uid, ChangeSet, GeneratedMetadata,
    MapperConfig, MappingGenerator, MetadataSnapshot,
};

#[derive(Parser)]
#[command(name = "event-aggregate-mapper")]
#[command(about = "Expand event-to-aggregate mappings into metadata change-sets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate change-sets for configured mapping rows
    Generate {
        /// Path to the metadata snapshot JSON
        #[arg(short, long)]
        metadata: PathBuf,
        /// Path to the mapping configuration JSON
        #[arg(short, long)]
        config: PathBuf,
        /// Path to previously generated metadata JSON
        #[arg(short, long)]
        generated: Option<PathBuf>,
        /// Only process this row id
        #[arg(short, long)]
        row: Option<String>,
        /// Write the change-sets here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Estimate how many program indicators a row will expand into
    Count {
        /// Path to the metadata snapshot JSON
        #[arg(short, long)]
        metadata: PathBuf,
        /// Path to the mapping configuration JSON
        #[arg(short, long)]
        config: PathBuf,
        /// Row id to estimate
        #[arg(short, long)]
        row: String,
    },
    /// List configured mapping rows
    Rows {
        /// Path to the mapping configuration JSON
        #[arg(short, long)]
        config: PathBuf,
        /// Only show rows whose names contain this text
        #[arg(short, long, default_value = "")]
        filter: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            metadata,
            config,
            generated,
            row,
            output,
        } => generate(&metadata, &config, generated.as_deref(), row.as_deref(), output.as_deref()),
        Commands::Count {
            metadata,
            config,
            row,
        } => count(&metadata, &config, &row),
        Commands::Rows { config, filter } => rows(&config, &filter),
    }
}

fn load_config(path: &Path) -> Result<MapperConfig, Box<dyn std::error::Error>> {
    let config: MapperConfig = serde_json::from_str(&fs::read_to_string(path)?)?;
    for row in config.rows() {
        for uid in [&row.ds_uid, &row.de_uid, &row.pi_uid] {
            if !is_valid_uid(uid) {
                return Err(format!("Row {}: malformed UID {uid} in configuration", row.row_id).into());
            }
        }
    }
    Ok(config)
}

fn load_snapshot(path: &Path) -> Result<MetadataSnapshot, Box<dyn std::error::Error>> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

fn generate(
    metadata: &Path,
    config_path: &Path,
    generated: Option<&Path>,
    row_id: Option<&str>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = load_snapshot(metadata)?;
    let config = load_config(config_path)?;
    let existing: GeneratedMetadata = match generated {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => GeneratedMetadata::default(),
    };

    let selected: Vec<_> = match row_id {
        Some(id) => vec![config
            .row(id)
            .ok_or_else(|| format!("Row {id} not found in configuration"))?],
        None => config.rows().collect(),
    };

    let generator = MappingGenerator::new();
    let mut change_sets: BTreeMap<String, ChangeSet> = BTreeMap::new();
    for row in selected {
        match generator.generate_mapping(row, &snapshot, &existing, &config) {
            Ok(Some(change_set)) => {
                change_sets.insert(row.row_id.clone(), change_set);
            }
            Ok(None) => eprintln!("{}: no updates detected", row.row_id),
            // Data-modeling problems skip the row; anything else is a bug
            // and propagates
            Err(err) if err.is_user_actionable() => {
                eprintln!("{}: skipped: {err}", row.row_id);
            }
            Err(err) => return Err(err.into()),
        }
    }

    let rendered = serde_json::to_string_pretty(&change_sets)?;
    match output {
        Some(path) => fs::write(path, rendered)?,
        None => println!("{rendered}"),
    }
    Ok(())
}

fn count(
    metadata: &Path,
    config_path: &Path,
    row_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = load_snapshot(metadata)?;
    let config = load_config(config_path)?;
    let row = config
        .row(row_id)
        .ok_or_else(|| format!("Row {row_id} not found in configuration"))?;
    let count = expected_pi_count(row, &snapshot, &config)?;
    println!("{count}");
    Ok(())
}

fn rows(config_path: &Path, filter: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    for row in filter_rows_by_text(config.rows(), filter) {
        println!("{row}");
    }
    Ok(())
}
