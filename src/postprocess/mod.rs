//! # LoadData Post-processing
//!
//! Table transforms applied to an existing LoadData CSV before it is handed
//! to the analysis pipeline:
//!
//! - [`append_illum_columns`]: add `FileName_Illum*`/`PathName_Illum*`
//!   columns pointing at precomputed illumination functions.
//! - [`filter_max_plane`]: keep only the plane holding a max projection.
//! - [`scatter_index`] and [`split_scatter`]: split a table by a metadata
//!   column so each part can be processed by its own worker.

mod error;
mod filter;
mod illum;
mod scatter;

pub use error::PostProcessError;
pub use filter::{filter_max_plane, filter_to_max, PLANE_COLUMN};
pub use illum::{append_illum_columns, IllumOptions, DEFAULT_ILLUM_FILE_TYPE};
pub use scatter::{scatter_index, split_scatter, ScatterSplit, DEFAULT_SPLIT_COLUMN};
