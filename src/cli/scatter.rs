use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use pe2loaddata::load_data::LoadData;
use pe2loaddata::postprocess::{scatter_index, split_scatter};

fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Print and save the unique values of the split column
pub fn run_index(csv_file: PathBuf, splitby_metadata: String, output_file: PathBuf) -> Result<()> {
    let table = LoadData::read_csv_file(&csv_file)
        .with_context(|| format!("Failed to read {}", csv_file.display()))?;
    let values = scatter_index(&table, &splitby_metadata)?;

    println!("{}", values.join("\n"));
    write_lines(&output_file, &values)
}

/// Write one scatter share and the files it needs
pub fn run_split(
    image_directory: String,
    illum_directory: String,
    csv_file: PathBuf,
    splitby_metadata: String,
    index: String,
    output_text: PathBuf,
    output_csv: PathBuf,
) -> Result<()> {
    let table = LoadData::read_csv_file(&csv_file)
        .with_context(|| format!("Failed to read {}", csv_file.display()))?;
    let split = split_scatter(
        &table,
        &splitby_metadata,
        &index,
        &image_directory,
        &illum_directory,
    )?;

    split
        .table
        .write_csv_file(&output_csv)
        .with_context(|| format!("Failed to write {}", output_csv.display()))?;
    info!("Wrote {} rows to {}", split.table.len(), output_csv.display());

    println!("{}", split.files.join("\n"));
    write_lines(&output_text, &split.files)
}
