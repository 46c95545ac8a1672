//! Image file name to directory resolution
//!
//! The LoadData CSV lists every image as a (file name, directory) pair. The
//! index file only knows file names, so the directories come from one of
//! three sources:
//!
//! - a recursive walk of a local directory ([`PathSource::Walk`]),
//! - a newline-delimited listing of paths, e.g. the output of a bucket
//!   listing, mapped to one logical directory ([`PathSource::Listing`]),
//! - the files directly inside one directory, mapped to one logical
//!   directory ([`PathSource::Flat`]).
//!
//! No existence checks are made; a file name absent from the map makes the
//! row joiner skip the field it belongs to.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Image extension collected by directory walks
pub const DEFAULT_IMAGE_EXTENSION: &str = ".tiff";

/// Logical directory used for listed images
pub const DEFAULT_PATH_PREFIX: &str = "/data";

/// Errors that can occur while resolving image paths
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// I/O error reading a listing or directory
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error during a recursive directory walk
    #[error("Directory walk failed: {0}")]
    WalkError(#[from] walkdir::Error),

    /// The given root is not a directory
    #[error("{0:?} is not a directory")]
    NotADirectory(PathBuf),
}

/// Where image directories come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSource {
    /// Walk `root` recursively, keeping files ending in `extension`
    Walk {
        /// Directory to walk
        root: PathBuf,
        /// File name suffix to keep, e.g. `.tiff`
        extension: String,
    },
    /// Read one path per line from `listing`, mapping every basename to `prefix`
    Listing {
        /// Newline-delimited file listing
        listing: PathBuf,
        /// Logical directory reported for every listed file
        prefix: String,
    },
    /// Map every file directly inside `directory` to `prefix`
    Flat {
        /// Directory to list
        directory: PathBuf,
        /// Logical directory reported for every file
        prefix: String,
    },
}

/// Image file name -> containing directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMap {
    paths: HashMap<String, String>,
}

impl PathMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the map from a configured source
    pub fn resolve(source: &PathSource) -> Result<Self, PathError> {
        let map = match source {
            PathSource::Walk { root, extension } => Self::from_walk(root, extension)?,
            PathSource::Listing { listing, prefix } => Self::from_listing_file(listing, prefix)?,
            PathSource::Flat { directory, prefix } => Self::from_directory(directory, prefix)?,
        };
        log::info!("Resolved directories for {} image files", map.len());
        Ok(map)
    }

    /// Walk `root` recursively and record the parent directory of every
    /// file whose name ends with `extension`
    ///
    /// Entries are visited in file name order; when a basename occurs in
    /// several directories the last one visited wins.
    pub fn from_walk(root: &Path, extension: &str) -> Result<Self, PathError> {
        if !root.is_dir() {
            return Err(PathError::NotADirectory(root.to_path_buf()));
        }

        let mut map = Self::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            if !file_name.ends_with(extension) {
                continue;
            }
            let directory = entry
                .path()
                .parent()
                .unwrap_or(root)
                .to_string_lossy()
                .into_owned();
            map.insert(file_name.into_owned(), directory);
        }
        Ok(map)
    }

    /// Read a listing file, one path or URL per line
    pub fn from_listing_file(listing: &Path, prefix: &str) -> Result<Self, PathError> {
        let file = File::open(listing)?;
        Self::from_listing(BufReader::new(file), prefix)
    }

    /// Map the basename of every line to `prefix`
    ///
    /// Blank lines and lines ending in `/` are ignored.
    pub fn from_listing<R: BufRead>(reader: R, prefix: &str) -> Result<Self, PathError> {
        let mut map = Self::new();
        for line in reader.lines() {
            let line = line?;
            let Some(file_name) = basename(line.trim()) else {
                continue;
            };
            map.insert(file_name.to_string(), prefix.to_string());
        }
        Ok(map)
    }

    /// Map every file directly inside `directory` to `prefix`
    pub fn from_directory(directory: &Path, prefix: &str) -> Result<Self, PathError> {
        if !directory.is_dir() {
            return Err(PathError::NotADirectory(directory.to_path_buf()));
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(directory)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();

        let mut map = Self::new();
        for name in names {
            map.insert(name, prefix.to_string());
        }
        Ok(map)
    }

    /// Record a file's directory, returning the directory it replaces
    pub fn insert(&mut self, file_name: String, directory: String) -> Option<String> {
        if let Some(previous) = self.paths.get(&file_name) {
            if *previous != directory {
                log::warn!("{file_name} found in both {previous} and {directory}; using the latter");
            }
        }
        self.paths.insert(file_name, directory)
    }

    /// Directory of a file name
    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.paths.get(file_name).map(String::as_str)
    }

    /// Number of known files
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether no file is known
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FromIterator<(String, String)> for PathMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

fn basename(path: &str) -> Option<&str> {
    path.rsplit('/').next().filter(|name| !name.is_empty())
}
