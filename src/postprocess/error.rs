use crate::load_data::LoadDataError;

/// Errors that can occur while post-processing a LoadData table
#[derive(Debug, thiserror::Error)]
pub enum PostProcessError {
    /// Reading or writing the table failed
    #[error("LoadData error: {0}")]
    LoadDataError(#[from] LoadDataError),

    /// The table has no column with this name
    #[error("Column '{0}' not found in LoadData table")]
    MissingColumn(String),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
