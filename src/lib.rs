//! # pe2loaddata - Phenix Index to LoadData Conversion
//!
//! `pe2loaddata` converts the `Index.idx.xml` metadata file written by
//! PerkinElmer Phenix/Opera high-content screening instruments into the
//! LoadData CSV manifests read by CellProfiler, one row per imaged field.
//!
//! ## Key Features
//!
//! - **Streaming Parser**: the index is pulled through quick-xml event by
//!   event into an arena of typed element records; no DOM is built.
//!
//! - **Relational Join**: plates, wells, fields and channels are joined into
//!   rows with a fully deterministic order, so repeated runs produce
//!   byte-identical CSVs.
//!
//! - **Flexible Path Resolution**: image directories come from a recursive
//!   walk, a flat directory, or a plain listing of object-store URLs.
//!
//! - **Post-processing**: illumination columns, max-projection plane
//!   filtering and scatter splitting for distributed pipelines.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use pe2loaddata::config::ChannelConfig;
//! use pe2loaddata::converter::IndexConverter;
//! use pe2loaddata::paths::PathSource;
//!
//! let config = ChannelConfig::from_file(Path::new("config.yml"))?;
//! let source = PathSource::Walk {
//!     root: "images".into(),
//!     extension: ".tiff".to_string(),
//! };
//!
//! let stats = IndexConverter::new(config).convert(
//!     Path::new("images/Index.idx.xml"),
//!     &source,
//!     Path::new("load_data.csv"),
//! )?;
//! println!("Wrote {} rows, skipped {} fields", stats.rows_written, stats.fields_skipped);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Lower-level Pipeline
//!
//! ```rust,no_run
//! use pe2loaddata::prelude::*;
//!
//! let tree = parse_index_file("Index.idx.xml")?;
//! let hierarchy = Hierarchy::from_tree(&tree)?;
//! let config = ChannelConfig::from_str("channels:\n  HOECHST 33342: OrigDNA\n")?;
//! let paths = PathMap::from_listing_file("listing.txt".as_ref(), "/data")?;
//!
//! let table = LoadDataBuilder::new(&hierarchy, &config, &paths).build()?;
//! for skipped in table.skipped() {
//!     eprintln!("skipped {skipped}");
//! }
//! table.write_csv_file("load_data.csv")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Configuration
//!
//! ```yaml
//! channels:
//!   HOECHST 33342: OrigDNA
//!   Alexa 488: OrigER
//! metadata:
//!   AbsPositionZ: AbsPositionZ
//! ```
//!
//! Channel keys are matched against each image's `ChannelName` with spaces
//! removed; an image with an unconfigured channel aborts the conversion.

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod converter;
pub mod load_data;
pub mod paths;
pub mod phenix;
pub mod postprocess;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ChannelConfig, ConfigError};
    pub use crate::converter::{ConversionError, ConversionStats, IndexConverter};
    pub use crate::load_data::{
        IncompleteField, LoadData, LoadDataBuilder, LoadDataError, SkippedField,
    };
    pub use crate::paths::{PathError, PathMap, PathSource};
    pub use crate::phenix::{
        parse_index, parse_index_file, FieldKey, Hierarchy, Image, Plate, PhenixError, Well,
    };
    pub use crate::postprocess::{
        append_illum_columns, filter_max_plane, scatter_index, split_scatter, IllumOptions,
        PostProcessError,
    };
}
