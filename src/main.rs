//! # pe2loaddata
//!
//! Command-line tool converting Phenix `Index.idx.xml` files into
//! CellProfiler LoadData CSVs, plus the post-processing steps run on those
//! CSVs.
//!
//! ## Usage
//!
//! ```bash
//! # Convert, resolving images in the index directory
//! pe2loaddata convert config.yml load_data.csv --index-directory /images/plate1
//!
//! # Append illumination columns
//! pe2loaddata append-illum config.yml load_data.csv load_data_with_illum.csv --illum-directory /illum
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::{dispatch, init_logging, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity());
    dispatch(cli)
}
