//! Illumination function columns

use crate::config::ChannelConfig;
use crate::load_data::LoadData;

/// File type of illumination functions saved by CellProfiler 3+
pub const DEFAULT_ILLUM_FILE_TYPE: &str = ".npy";

/// Where the illumination functions live and how they are named
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IllumOptions {
    /// Directory holding the illumination files
    pub directory: String,
    /// File suffix including the dot, e.g. `.npy` or `.mat`
    pub file_type: String,
    /// Prefix `<plate_id>_` added to every file name when set
    pub plate_id: Option<String>,
}

impl IllumOptions {
    /// Options for a directory with the default file type and no plate id
    pub fn new(directory: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            file_type: DEFAULT_ILLUM_FILE_TYPE.to_string(),
            plate_id: None,
        }
    }

    /// Header and row cells for the channels of `config`
    ///
    /// One `FileName_Illum<X>, PathName_Illum<X>` pair per label in sorted
    /// label order, where `X` is the label without `Orig`.
    pub fn columns(&self, config: &ChannelConfig) -> (Vec<String>, Vec<String>) {
        let mut header = Vec::new();
        let mut cells = Vec::new();
        for label in config.sorted_labels() {
            let name = label.replace("Orig", "");
            header.push(format!("FileName_Illum{name}"));
            header.push(format!("PathName_Illum{name}"));
            cells.push(match &self.plate_id {
                Some(plate_id) => format!("{plate_id}_Illum{name}{}", self.file_type),
                None => format!("Illum{name}{}", self.file_type),
            });
            cells.push(self.directory.clone());
        }
        (header, cells)
    }
}

/// Append illumination columns to every row of `table`
pub fn append_illum_columns(table: &mut LoadData, config: &ChannelConfig, options: &IllumOptions) {
    let (header, cells) = options.columns(config);
    log::info!(
        "Appending {} illumination columns to {} rows",
        header.len(),
        table.len()
    );
    table.append_columns(&header, &cells);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ChannelConfig {
        ChannelConfig::from_str("channels:\n  DNA: OrigDNA\n  Mito: OrigMito\n  Alexa 488: OrigER\n")
            .unwrap()
    }

    #[test]
    fn test_columns_sorted_by_label() {
        let (header, cells) = IllumOptions::new("/illum").columns(&config());
        assert_eq!(
            header,
            vec![
                "FileName_IllumDNA",
                "PathName_IllumDNA",
                "FileName_IllumER",
                "PathName_IllumER",
                "FileName_IllumMito",
                "PathName_IllumMito",
            ]
        );
        assert_eq!(cells[0], "IllumDNA.npy");
        assert_eq!(cells[1], "/illum");
        assert_eq!(cells[4], "IllumMito.npy");
    }

    #[test]
    fn test_plate_prefix_and_file_type() {
        let options = IllumOptions {
            directory: "/illum".to_string(),
            file_type: ".mat".to_string(),
            plate_id: Some("BR00117035".to_string()),
        };
        let (_, cells) = options.columns(&config());
        assert_eq!(cells[2], "BR00117035_IllumER.mat");
    }

    #[test]
    fn test_append_preserves_rows() {
        let mut table = LoadData::from_rows(
            vec!["FileName_OrigDNA".to_string()],
            vec![vec!["a.tiff".to_string()], vec!["b.tiff".to_string()]],
        )
        .unwrap();
        let config = ChannelConfig::from_str("channels:\n  DNA: OrigDNA\n").unwrap();

        append_illum_columns(&mut table, &config, &IllumOptions::new("/illum"));

        assert_eq!(
            table.to_csv_string().unwrap(),
            "FileName_OrigDNA,FileName_IllumDNA,PathName_IllumDNA\n\
             a.tiff,IllumDNA.npy,/illum\n\
             b.tiff,IllumDNA.npy,/illum\n"
        );
    }
}
