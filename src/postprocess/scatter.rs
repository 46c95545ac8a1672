//! Splitting a LoadData table for scatter workers

use super::PostProcessError;
use crate::load_data::LoadData;

/// Column used to split by default
pub const DEFAULT_SPLIT_COLUMN: &str = "Metadata_Well";

const FILE_NAME_PREFIX: &str = "FileName_";
const ILLUM_FILE_NAME_PREFIX: &str = "FileName_Illum";

/// One worker's share of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScatterSplit {
    /// Rows matching the split value
    pub table: LoadData,
    /// Files the worker must fetch: images first, then unique
    /// illumination functions
    pub files: Vec<String>,
}

/// Unique values of `column` in first-appearance order
pub fn scatter_index(table: &LoadData, column: &str) -> Result<Vec<String>, PostProcessError> {
    let index = column_index(table, column)?;
    let mut unique = Vec::new();
    for cell in table.rows().iter().filter_map(|row| row.get(index)) {
        if !unique.contains(cell) {
            unique.push(cell.clone());
        }
    }
    Ok(unique)
}

/// Rows where `column == value`, plus the files those rows reference
///
/// Image file names are prefixed with `image_directory` in row-major
/// order; illumination file names with `illum_directory`, each once.
pub fn split_scatter(
    table: &LoadData,
    column: &str,
    value: &str,
    image_directory: &str,
    illum_directory: &str,
) -> Result<ScatterSplit, PostProcessError> {
    let index = column_index(table, column)?;
    let rows: Vec<Vec<String>> = table
        .rows()
        .iter()
        .filter(|row| row.get(index).is_some_and(|cell| cell == value))
        .cloned()
        .collect();

    let mut image_columns = Vec::new();
    let mut illum_columns = Vec::new();
    for (i, name) in table.header().iter().enumerate() {
        if name.starts_with(ILLUM_FILE_NAME_PREFIX) {
            illum_columns.push(i);
        } else if name.starts_with(FILE_NAME_PREFIX) {
            image_columns.push(i);
        }
    }

    let mut files = Vec::new();
    for row in &rows {
        for cell in image_columns.iter().filter_map(|&i| row.get(i)) {
            files.push(join(image_directory, cell));
        }
    }
    let mut illum_files: Vec<String> = Vec::new();
    for row in &rows {
        for cell in illum_columns.iter().filter_map(|&i| row.get(i)) {
            let file = join(illum_directory, cell);
            if !illum_files.contains(&file) {
                illum_files.push(file);
            }
        }
    }
    files.extend(illum_files);

    log::info!(
        "{column}={value}: {} rows, {} files",
        rows.len(),
        files.len()
    );
    Ok(ScatterSplit {
        table: LoadData::from_rows(table.header().to_vec(), rows)?,
        files,
    })
}

fn column_index(table: &LoadData, column: &str) -> Result<usize, PostProcessError> {
    table
        .column_index(column)
        .ok_or_else(|| PostProcessError::MissingColumn(column.to_string()))
}

fn join(directory: &str, file_name: &str) -> String {
    format!("{}/{file_name}", directory.trim_end_matches('/'))
}
