//! Plane filtering after a max projection

use super::PostProcessError;
use crate::load_data::LoadData;

/// Column holding the plane number
pub const PLANE_COLUMN: &str = "Metadata_PlaneID";

/// Keep only the rows of the last plane, where the projection is saved
///
/// Returns the number of rows kept.
pub fn filter_max_plane(table: &mut LoadData) -> Result<usize, PostProcessError> {
    filter_to_max(table, PLANE_COLUMN)
}

/// Keep only the rows whose `column` holds the column's maximum
///
/// Cells that parse as finite numbers compare numerically and blank or
/// non-numeric cells are ignored. Only a column without a single number
/// compares as strings.
pub fn filter_to_max(table: &mut LoadData, column: &str) -> Result<usize, PostProcessError> {
    let index = table
        .column_index(column)
        .ok_or_else(|| PostProcessError::MissingColumn(column.to_string()))?;

    let numeric_max = table
        .rows()
        .iter()
        .filter_map(|row| number(row, index))
        .max_by(f64::total_cmp);

    if let Some(max) = numeric_max {
        table.retain_rows(|row| number(row, index) == Some(max));
    } else {
        let Some(max) = table
            .rows()
            .iter()
            .filter_map(|row| row.get(index))
            .max()
            .cloned()
        else {
            return Ok(0);
        };
        table.retain_rows(|row| row.get(index) == Some(&max));
    }

    log::info!("Kept {} rows where {column} is maximal", table.len());
    Ok(table.len())
}

fn number(row: &[String], index: usize) -> Option<f64> {
    row.get(index)
        .and_then(|cell| cell.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(planes: &[&str]) -> LoadData {
        LoadData::from_rows(
            vec!["FileName_OrigDNA".to_string(), PLANE_COLUMN.to_string()],
            planes
                .iter()
                .enumerate()
                .map(|(i, plane)| vec![format!("{i}.tiff"), plane.to_string()])
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_keeps_max_plane_numerically() {
        let mut t = table(&["1", "2", "10", "10", "9"]);
        assert_eq!(filter_max_plane(&mut t).unwrap(), 2);
        assert_eq!(t.rows()[0][0], "2.tiff");
        assert_eq!(t.rows()[1][0], "3.tiff");
    }

    #[test]
    fn test_non_numeric_falls_back_to_strings() {
        let mut t = table(&["a", "c", "b"]);
        assert_eq!(filter_max_plane(&mut t).unwrap(), 1);
        assert_eq!(t.rows()[0][1], "c");
    }

    #[test]
    fn test_blank_and_text_cells_are_ignored() {
        let mut t = table(&["9", "10", "", "n/a", "10"]);
        assert_eq!(filter_max_plane(&mut t).unwrap(), 2);
        assert_eq!(t.rows()[0][0], "1.tiff");
        assert_eq!(t.rows()[1][0], "4.tiff");
    }

    #[test]
    fn test_nan_never_wins() {
        let mut t = table(&["NaN", "3", "inf", " 3 "]);
        assert_eq!(filter_max_plane(&mut t).unwrap(), 2);
        assert_eq!(t.rows()[0][1], "3");
        assert_eq!(t.rows()[1][1], " 3 ");
    }

    #[test]
    fn test_missing_column() {
        let mut t = LoadData::from_rows(vec!["Metadata_Well".to_string()], Vec::new()).unwrap();
        let err = filter_max_plane(&mut t).unwrap_err();
        assert!(matches!(err, PostProcessError::MissingColumn(c) if c == PLANE_COLUMN));
    }

    #[test]
    fn test_empty_table() {
        let mut t = table(&[]);
        assert_eq!(filter_max_plane(&mut t).unwrap(), 0);
    }
}
