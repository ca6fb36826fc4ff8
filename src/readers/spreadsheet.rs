//! SpreadsheetReader: reads delimited-text and workbook files into a raw
//! string grid with no header interpretation and no type coercion.
//!
//! Workbook reading follows `importers/cei_excel.rs`'s `calamine` usage
//! (`Xlsx::<_>::new`, `worksheet_range`), generalized to
//! `calamine::open_workbook_auto` so both `.xlsx` and legacy `.xls` are
//! handled uniformly. Delimited-text reading follows the teacher's `csv`
//! usage in `importers/cei_csv.rs`.

use crate::model::RawGrid;
use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Reads the first sheet of a workbook file (`.xlsx`/`.xls`) into a RawGrid.
/// Every cell is stringified without date/number type interpretation,
/// RawGrid stays untyped per the data model.
pub fn read_workbook(path: &Path) -> Result<RawGrid> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("opening workbook {}", path.display()))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .with_context(|| format!("{} has no sheets", path.display()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("reading sheet {sheet_name} from {}", path.display()))?;

    let grid = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    Ok(grid)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => format_float(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
    }
}

fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{f}")
    }
}

/// Reads a delimited-text file (CSV; UTF-8 assumed) into a RawGrid, with no
/// header row assumed and no column-count enforcement across rows
/// (`flexible(true)`, since supplier CSVs are not guaranteed rectangular
/// before normalization).
pub fn read_delimited_text(path: &Path) -> Result<RawGrid> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut grid = RawGrid::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("reading row from {}", path.display()))?;
        grid.push(record.iter().map(|s| s.to_string()).collect());
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_delimited_text_without_header_interpretation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Taladro 1/2,17.684,21").unwrap();
        writeln!(file, "Maza 500g,864,05").unwrap();
        let grid = read_delimited_text(file.path()).unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0][0], "Taladro 1/2");
    }

    #[test]
    fn tolerates_ragged_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "a,b,c").unwrap();
        writeln!(file, "d,e").unwrap();
        let grid = read_delimited_text(file.path()).unwrap();
        assert_eq!(grid[0].len(), 3);
        assert_eq!(grid[1].len(), 2);
    }

    #[test]
    fn format_float_avoids_scientific_notation_for_integers() {
        assert_eq!(format_float(108200.0), "108200");
        assert_eq!(format_float(100.5), "100.5");
    }
}
