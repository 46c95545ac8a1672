use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use pe2loaddata::config::ChannelConfig;
use pe2loaddata::load_data::LoadData;
use pe2loaddata::postprocess::{append_illum_columns, IllumOptions};

/// Append illumination function columns to a LoadData CSV
pub fn run(
    config: PathBuf,
    input: PathBuf,
    output: PathBuf,
    illum_directory: String,
    illum_filetype: String,
    plate_id: Option<String>,
) -> Result<()> {
    let channels = ChannelConfig::from_file(&config)
        .with_context(|| format!("Failed to load config {}", config.display()))?;
    let mut table = LoadData::read_csv_file(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let options = IllumOptions {
        directory: illum_directory,
        file_type: illum_filetype,
        plate_id,
    };
    append_illum_columns(&mut table, &channels, &options);

    table
        .write_csv_file(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Wrote {} rows to {}", table.len(), output.display());
    Ok(())
}
