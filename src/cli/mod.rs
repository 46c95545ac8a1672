use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use pe2loaddata::paths::{DEFAULT_IMAGE_EXTENSION, DEFAULT_PATH_PREFIX};
use pe2loaddata::postprocess::{DEFAULT_ILLUM_FILE_TYPE, DEFAULT_SPLIT_COLUMN};

mod convert;
mod filter;
mod illum;
mod scatter;

/// pe2loaddata - Phenix index to CellProfiler LoadData converter
#[derive(Parser)]
#[command(name = "pe2loaddata")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a Phenix index file into a LoadData CSV
    Convert {
        /// YAML file choosing channels and metadata columns
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// LoadData CSV to create
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Directory holding the index file and images
        #[arg(long, default_value = ".")]
        index_directory: PathBuf,

        /// Index file (defaults to <INDEX_DIRECTORY>/Index.idx.xml)
        #[arg(long, value_name = "FILE")]
        index_file: Option<PathBuf>,

        /// Walk the index directory recursively for images
        #[arg(long)]
        search_subdirectories: bool,

        /// Newline-delimited listing of image paths or URLs
        #[arg(long, value_name = "FILE", conflicts_with = "search_subdirectories")]
        image_listing: Option<PathBuf>,

        /// Directory reported for listed or flat-directory images
        #[arg(long, default_value = DEFAULT_PATH_PREFIX)]
        path_prefix: String,

        /// Image extension collected by --search-subdirectories
        #[arg(long, default_value = DEFAULT_IMAGE_EXTENSION)]
        extension: String,
    },

    /// Append illumination function columns to a LoadData CSV
    AppendIllum {
        /// YAML file choosing channels
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// LoadData CSV to read
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// LoadData CSV to create
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Directory containing the illumination functions
        #[arg(long)]
        illum_directory: String,

        /// File type of the illumination functions (.mat for CP2, .npy for CP3+)
        #[arg(long, default_value = DEFAULT_ILLUM_FILE_TYPE)]
        illum_filetype: String,

        /// Plate id prefixed to every illumination file name
        #[arg(long)]
        plate_id: Option<String>,
    },

    /// Keep only the rows of the max-projected (last) plane
    FilterPlane {
        /// LoadData CSV to read
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// LoadData CSV to create
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// List the unique values of a metadata column
    ScatterIndex {
        /// LoadData CSV to read
        #[arg(long, default_value = "load_data_with_illum.csv")]
        csv_file: PathBuf,

        /// Column to split by
        #[arg(long, default_value = DEFAULT_SPLIT_COLUMN)]
        splitby_metadata: String,

        /// Where to write the values, one per line
        #[arg(long, default_value = "unique_ids.txt")]
        output_file: PathBuf,
    },

    /// Extract one scatter share of a LoadData CSV and its file list
    SplitScatter {
        /// Directory prefixed to image file names
        #[arg(long)]
        image_directory: String,

        /// Directory prefixed to illumination file names
        #[arg(long)]
        illum_directory: String,

        /// LoadData CSV to split
        #[arg(long, default_value = "load_data_with_illum.csv")]
        csv_file: PathBuf,

        /// Column to split by
        #[arg(long, default_value = DEFAULT_SPLIT_COLUMN)]
        splitby_metadata: String,

        /// Value of the split column to keep
        #[arg(long)]
        index: String,

        /// Where to write the list of files to fetch
        #[arg(long, default_value = "filename_array.txt")]
        output_text: PathBuf,

        /// Where to write the filtered LoadData CSV
        #[arg(long, default_value = "tiny_load_data.csv")]
        output_csv: PathBuf,
    },
}

impl Cli {
    /// Verbosity level from the command line
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

/// Initialize env_logger based on verbosity level
pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

/// Dispatch CLI commands to their handlers
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert {
            config,
            output,
            index_directory,
            index_file,
            search_subdirectories,
            image_listing,
            path_prefix,
            extension,
        } => convert::run(convert::ConvertArgs {
            config,
            output,
            index_directory,
            index_file,
            search_subdirectories,
            image_listing,
            path_prefix,
            extension,
        }),
        Commands::AppendIllum {
            config,
            input,
            output,
            illum_directory,
            illum_filetype,
            plate_id,
        } => illum::run(config, input, output, illum_directory, illum_filetype, plate_id),
        Commands::FilterPlane { input, output } => filter::run(input, output),
        Commands::ScatterIndex {
            csv_file,
            splitby_metadata,
            output_file,
        } => scatter::run_index(csv_file, splitby_metadata, output_file),
        Commands::SplitScatter {
            image_directory,
            illum_directory,
            csv_file,
            splitby_metadata,
            index,
            output_text,
            output_csv,
        } => scatter::run_split(
            image_directory,
            illum_directory,
            csv_file,
            splitby_metadata,
            index,
            output_text,
            output_csv,
        ),
    }
}
