//! In-memory LoadData table and its CSV form
//!
//! CSV output is comma-delimited with `\n` record terminators and fields
//! quoted only when necessary.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, Terminator, WriterBuilder};

use super::error::{LoadDataError, SkippedField};

/// A header plus rows of string cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadData {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    skipped: Vec<SkippedField>,
}

impl LoadData {
    /// Create an empty table with the given header
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Create a table from a header and rows
    ///
    /// Every row must have as many cells as the header.
    pub fn from_rows(header: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, LoadDataError> {
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != header.len())
        {
            return Err(LoadDataError::RaggedRow {
                row,
                expected: header.len(),
                found: cells.len(),
            });
        }
        Ok(Self {
            header,
            rows,
            skipped: Vec::new(),
        })
    }

    /// Column names
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Data rows
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Fields that were dropped while joining
    pub fn skipped(&self) -> &[SkippedField] {
        &self.skipped
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|column| column == name)
    }

    /// Append a data row
    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.header.len());
        self.rows.push(row);
    }

    pub(crate) fn push_skipped(&mut self, skipped: SkippedField) {
        self.skipped.push(skipped);
    }

    /// Append columns to the header and matching cells to every row
    pub fn append_columns(&mut self, columns: &[String], cells: &[String]) {
        self.header.extend_from_slice(columns);
        for row in &mut self.rows {
            row.extend_from_slice(cells);
        }
    }

    /// Keep only the rows matching a predicate
    pub fn retain_rows<F>(&mut self, keep: F)
    where
        F: FnMut(&Vec<String>) -> bool,
    {
        self.rows.retain(keep);
    }

    /// Serialize as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), LoadDataError> {
        let mut csv_writer = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(writer);
        csv_writer.write_record(&self.header)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Serialize as CSV into a file, replacing it
    pub fn write_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<(), LoadDataError> {
        let file = File::create(path.as_ref())?;
        self.write_csv(BufWriter::new(file))
    }

    /// Serialize as a CSV string
    pub fn to_csv_string(&self) -> Result<String, LoadDataError> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| {
            LoadDataError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    /// Read a CSV with a header row
    ///
    /// Every record must have as many cells as the header.
    pub fn read_csv<R: Read>(reader: R) -> Result<Self, LoadDataError> {
        let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let header = csv_reader
            .headers()?
            .iter()
            .map(String::from)
            .collect();
        let mut rows = Vec::new();
        for record in csv_reader.records() {
            rows.push(record?.iter().map(String::from).collect());
        }
        Self::from_rows(header, rows)
    }

    /// Read a CSV file with a header row
    pub fn read_csv_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadDataError> {
        let file = File::open(path.as_ref())?;
        Self::read_csv(std::io::BufReader::new(file))
    }
}
