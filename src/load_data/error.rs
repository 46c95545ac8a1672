use std::fmt;

use crate::phenix::{AttributeError, FieldKey};

/// Errors that abort building a LoadData table
#[derive(Debug, thiserror::Error)]
pub enum LoadDataError {
    /// An image uses a channel that is not in the configuration
    #[error(
        "{channel} is not one of the channels found in the config file ({configured}); \
         found in field {field}, well {well} (id {well_id}), plate {plate}. \
         Correct the list of channels in the config file and try again."
    )]
    UnknownChannel {
        /// Space-free channel name of the image
        channel: String,
        /// Field the image belongs to
        field: FieldKey,
        /// Well name, e.g. `B02`
        well: String,
        /// Well id in the index
        well_id: String,
        /// Plate name
        plate: String,
        /// Comma-separated configured channel keys
        configured: String,
    },

    /// A plate references a well that the Wells section does not define
    #[error("Plate {plate} references unknown well {well_id}")]
    DanglingWell {
        /// Referenced well id
        well_id: String,
        /// Plate name
        plate: String,
    },

    /// A well references an image that the Images section does not define
    #[error("Well {well_id} on plate {plate} references unknown image {image_id}")]
    DanglingImage {
        /// Referenced image id
        image_id: String,
        /// Referencing well id
        well_id: String,
        /// Plate name
        plate: String,
    },

    /// An image attribute needed for joining is missing or malformed
    #[error("Image {image_id}: {source}")]
    InvalidImage {
        /// Image id
        image_id: String,
        /// What is wrong with the attribute
        #[source]
        source: AttributeError,
    },

    /// A well's Row/Col attributes are missing or malformed
    #[error("Well {well_id}: {source}")]
    InvalidWell {
        /// Well id
        well_id: String,
        /// What is wrong with the attribute
        #[source]
        source: AttributeError,
    },

    /// A configured metadata attribute is absent from an image
    #[error("Image {image_id} has no '{key}' attribute required by the metadata configuration")]
    MissingMetadata {
        /// Configured attribute name
        key: String,
        /// Image id
        image_id: String,
    },

    /// A row's cell count differs from the header's
    #[error("Row {row} has {found} cells but the header has {expected}")]
    RaggedRow {
        /// Zero-based row index
        row: usize,
        /// Header width
        expected: usize,
        /// Cells in the row
        found: usize,
    },

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Why a field produced no row
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IncompleteField {
    /// No image for a configured channel
    #[error("no image for channel {0}")]
    MissingChannel(String),

    /// The channel's image has no `URL`
    #[error("image {image_id} for channel {channel} has no file name")]
    MissingFileName {
        /// Channel key
        channel: String,
        /// Image id
        image_id: String,
    },

    /// The image file name is unknown to the path resolver
    #[error("no directory known for {file_name} (channel {channel})")]
    MissingPath {
        /// Channel key
        channel: String,
        /// Image file name
        file_name: String,
    },
}

/// A field that was dropped from the output, with its coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedField {
    /// Plate name
    pub plate: String,
    /// Well name, e.g. `B02`
    pub well: String,
    /// Well id in the index
    pub well_id: String,
    /// Field and plane
    pub field: FieldKey,
    /// What was missing
    pub reason: IncompleteField,
}

impl fmt::Display for SkippedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "plate {} well {} (id {}) field {}: {}",
            self.plate, self.well, self.well_id, self.field, self.reason
        )
    }
}
