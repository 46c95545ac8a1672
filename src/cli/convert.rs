use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use pe2loaddata::config::ChannelConfig;
use pe2loaddata::converter::{default_index_file, IndexConverter};
use pe2loaddata::paths::PathSource;

/// Options of the `convert` command
pub struct ConvertArgs {
    pub config: PathBuf,
    pub output: PathBuf,
    pub index_directory: PathBuf,
    pub index_file: Option<PathBuf>,
    pub search_subdirectories: bool,
    pub image_listing: Option<PathBuf>,
    pub path_prefix: String,
    pub extension: String,
}

impl ConvertArgs {
    fn path_source(&self) -> PathSource {
        match &self.image_listing {
            Some(listing) => PathSource::Listing {
                listing: listing.clone(),
                prefix: self.path_prefix.clone(),
            },
            None if self.search_subdirectories => PathSource::Walk {
                root: self.index_directory.clone(),
                extension: self.extension.clone(),
            },
            None => PathSource::Flat {
                directory: self.index_directory.clone(),
                prefix: self.path_prefix.clone(),
            },
        }
    }
}

/// Convert a Phenix index file to a LoadData CSV
pub fn run(args: ConvertArgs) -> Result<()> {
    let index_file = args
        .index_file
        .clone()
        .unwrap_or_else(|| default_index_file(&args.index_directory));
    if !index_file.is_file() {
        anyhow::bail!("Index file does not exist: {}", index_file.display());
    }

    let config = ChannelConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;
    let source = args.path_source();

    info!("pe2loaddata - Phenix index to LoadData");
    info!("Index:  {}", index_file.display());
    info!("Config: {}", args.config.display());
    info!("Output: {}", args.output.display());
    info!("Images: {:?}", source);

    let stats = IndexConverter::new(config)
        .convert(&index_file, &source, &args.output)
        .context("Conversion failed")?;

    #[cfg(feature = "colorized_output")]
    {
        println!("{}", stats.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", stats);
    }

    Ok(())
}
