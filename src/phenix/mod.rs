//! # Phenix Index Parser Module
//!
//! This module reads the `Index.idx.xml` metadata file written by
//! PerkinElmer Phenix/Opera high-content screening instruments.
//!
//! ## Index Structure
//!
//! ```text
//! EvaluationInputData (document element)
//! ├── Plates
//! │   └── Plate* (Name, PlateRows, ...)
//! │       └── Well* (reference: id)
//! ├── Wells
//! │   └── Well* (id, Row, Col)
//! │       └── Image* (reference: id)
//! ├── Maps (channel settings, ignored)
//! └── Images
//!     └── Image* (id, URL, Row, Col, FieldID, PlaneID, ChannelName, ...)
//! ```
//!
//! Values may be attributes or text-only child elements; both end up in the
//! element's metadata.
//!
//! ## Pipeline
//!
//! 1. [`IndexStreamer`] pulls XML events with quick-xml and feeds them to an
//!    [`ElementTreeBuilder`], producing an [`ElementTree`] arena.
//! 2. [`Hierarchy::from_tree`] turns the arena into id-keyed [`Image`],
//!    [`Well`] and [`Plate`] lookup tables.

mod builder;
mod element;
mod error;
mod hierarchy;
mod streamer;

#[cfg(test)]
mod tests;

pub use builder::ElementTreeBuilder;
pub use element::{Element, ElementId, ElementKind, ElementTree};
pub use error::PhenixError;
pub use hierarchy::{well_name, AttributeError, FieldKey, Hierarchy, Image, Plate, Well};
pub use streamer::{
    parse_index, parse_index_file, IndexStreamer, DEFAULT_INDEX_FILE_NAME,
    DEFAULT_INPUT_BUFFER_SIZE,
};
