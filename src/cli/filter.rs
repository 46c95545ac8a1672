use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use pe2loaddata::load_data::LoadData;
use pe2loaddata::postprocess::filter_max_plane;

/// Keep only the rows of the projected plane
pub fn run(input: PathBuf, output: PathBuf) -> Result<()> {
    let mut table = LoadData::read_csv_file(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let before = table.len();

    let kept = filter_max_plane(&mut table)?;
    table
        .write_csv_file(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Kept {kept} of {before} rows");
    Ok(())
}
