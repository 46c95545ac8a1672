//! Index to LoadData conversion pipeline
//!
//! parse -> extract hierarchy -> resolve paths -> join -> write CSV

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[cfg(feature = "colorized_output")]
use console::style;

use crate::config::ChannelConfig;
use crate::load_data::{LoadData, LoadDataBuilder, LoadDataError};
use crate::paths::{PathError, PathMap, PathSource};
use crate::phenix::{
    Hierarchy, IndexStreamer, PhenixError, DEFAULT_INDEX_FILE_NAME, DEFAULT_INPUT_BUFFER_SIZE,
};

/// Errors that can occur during conversion
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// The index file is malformed or has an unexpected shape
    #[error("Index error in {path:?}: {source}")]
    PhenixError {
        /// Index file being read
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: PhenixError,
    },

    /// Image directories could not be resolved
    #[error("Path resolution error: {0}")]
    PathError(#[from] PathError),

    /// Joining or writing the table failed
    #[error("LoadData error: {0}")]
    LoadDataError(#[from] LoadDataError),
}

/// Statistics from a conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// Plates in the index
    pub plates: usize,
    /// Wells in the index
    pub wells: usize,
    /// Images in the index
    pub images: usize,
    /// Image files with a resolved directory
    pub resolved_paths: usize,
    /// Data rows written
    pub rows_written: usize,
    /// Fields dropped for a missing channel, file name or path
    pub fields_skipped: usize,
}

impl ConversionStats {
    /// Summary with the skipped-field count highlighted
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let skipped = if self.fields_skipped == 0 {
                style(self.fields_skipped).green()
            } else {
                style(self.fields_skipped).yellow().bold()
            };
            format!(
                "{}\n  Plates: {}\n  Wells: {}\n  Images: {}\n  Files resolved: {}\n  Rows written: {}\n  Fields skipped: {}",
                style("Conversion complete").bold().cyan(),
                self.plates,
                self.wells,
                self.images,
                self.resolved_paths,
                style(self.rows_written).green(),
                skipped
            )
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            self.to_string()
        }
    }
}

impl fmt::Display for ConversionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Conversion complete\n  Plates: {}\n  Wells: {}\n  Images: {}\n  Files resolved: {}\n  Rows written: {}\n  Fields skipped: {}",
            self.plates,
            self.wells,
            self.images,
            self.resolved_paths,
            self.rows_written,
            self.fields_skipped
        )
    }
}

/// Converter from a Phenix index to a LoadData CSV
#[derive(Debug, Clone)]
pub struct IndexConverter {
    config: ChannelConfig,
    buffer_size: usize,
}

impl IndexConverter {
    /// Create a converter for a channel configuration
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            config,
            buffer_size: DEFAULT_INPUT_BUFFER_SIZE,
        }
    }

    /// Set the read buffer size for the index file
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Channel configuration in use
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Convert an index file and write the CSV to `output`
    pub fn convert(
        &self,
        index_file: &Path,
        path_source: &PathSource,
        output: &Path,
    ) -> Result<ConversionStats, ConversionError> {
        let start = Instant::now();
        let (hierarchy, paths) = self.prepare(index_file, path_source)?;
        let table = LoadDataBuilder::new(&hierarchy, &self.config, &paths).build()?;
        table.write_csv_file(output)?;

        let stats = ConversionStats {
            plates: hierarchy.plates().len(),
            wells: hierarchy.wells().len(),
            images: hierarchy.images().len(),
            resolved_paths: paths.len(),
            rows_written: table.len(),
            fields_skipped: table.skipped().len(),
        };
        log::info!(
            "Wrote {} rows to {} in {:.2?}",
            stats.rows_written,
            output.display(),
            start.elapsed()
        );
        Ok(stats)
    }

    /// Convert an index file into an in-memory table
    pub fn convert_to_load_data(
        &self,
        index_file: &Path,
        path_source: &PathSource,
    ) -> Result<LoadData, ConversionError> {
        let (hierarchy, paths) = self.prepare(index_file, path_source)?;
        Ok(LoadDataBuilder::new(&hierarchy, &self.config, &paths).build()?)
    }

    fn prepare(
        &self,
        index_file: &Path,
        path_source: &PathSource,
    ) -> Result<(Hierarchy, PathMap), ConversionError> {
        let with_path = |source| ConversionError::PhenixError {
            path: index_file.to_path_buf(),
            source,
        };

        log::info!("Parsing {}", index_file.display());
        let tree = IndexStreamer::open_with_buffer_size(index_file, self.buffer_size)
            .and_then(IndexStreamer::parse)
            .map_err(with_path)?;
        let hierarchy = Hierarchy::from_tree(&tree).map_err(with_path)?;
        let paths = PathMap::resolve(path_source)?;
        Ok((hierarchy, paths))
    }
}

/// Index file inside a measurement directory
pub fn default_index_file(index_directory: &Path) -> PathBuf {
    index_directory.join(DEFAULT_INDEX_FILE_NAME)
}
