//! # LoadData Module
//!
//! Joins a [`Hierarchy`](crate::phenix::Hierarchy) with a
//! [`ChannelConfig`](crate::config::ChannelConfig) and a
//! [`PathMap`](crate::paths::PathMap) into a [`LoadData`] table, one row per
//! imaged field:
//!
//! ```text
//! FileName_<label>,PathName_<label>,...,Metadata_Plate,Metadata_Well,Metadata_Site,Metadata_<suffix>,...
//! ```
//!
//! ## Failure modes
//!
//! - An image whose channel is not configured aborts the join with
//!   [`LoadDataError::UnknownChannel`].
//! - A field missing a channel, a file name or a directory is dropped and
//!   recorded as a [`SkippedField`]; the join continues.

mod error;
mod joiner;
mod table;


pub use error::{IncompleteField, LoadDataError, SkippedField};
pub use joiner::{load_data_header, LoadDataBuilder};
pub use table::LoadData;
