//! Station-coordinate extraction from spreadsheet workbooks
//!
//! Survey crews deliver geometry as an xlsx workbook containing a
//! "Station Coords - N X Y Z" sheet: two banner rows, a header row
//! whose first column is `Phone`, then one station per row with X, Y, Z
//! in the following three columns.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use masw_common::models::GeometryPoint;

use super::ExtractError;

/// Literal prefix of the geometry sheet name. An alphanumeric suffix
/// (revision markers like `v2`) is allowed; anything else is not.
const SHEET_NAME_PREFIX: &str = "Station Coords - N X Y Z";

/// Physical row index of the column header row. Rows above it are
/// banner/title rows and carry no data.
const HEADER_ROW: u32 = 2;

/// Expected first header cell of the station table.
const FIRST_HEADER: &str = "Phone";

/// Extract receiver geometry from an in-memory xlsx workbook.
///
/// One point per data row, indexed by zero-based position within the
/// parsed table, with X/Y/Z taken from the three columns after the
/// station column.
pub fn extract_geometry(workbook: &[u8]) -> Result<Vec<GeometryPoint>, ExtractError> {
    let mut xlsx = open_workbook(workbook)?;

    // First matching sheet in workbook order wins.
    let sheet = xlsx
        .sheet_names()
        .into_iter()
        .find(|name| is_station_sheet(name))
        .ok_or(ExtractError::NoMatchingSheet)?;

    let range = xlsx.worksheet_range(&sheet)?;

    match range.get_value((HEADER_ROW, 0)) {
        Some(Data::String(s)) if s == FIRST_HEADER => {}
        other => {
            return Err(ExtractError::SchemaMismatch(format!(
                "first header column is {other:?}, expected {FIRST_HEADER:?}"
            )))
        }
    }

    let last_row = match range.end() {
        Some((row, _)) => row,
        None => return Ok(Vec::new()),
    };

    let mut points = Vec::new();
    for row in (HEADER_ROW + 1)..=last_row {
        let index = points.len();
        let x = coerce_cell(range.get_value((row, 1)), row, "X")?;
        let y = coerce_cell(range.get_value((row, 2)), row, "Y")?;
        let z = coerce_cell(range.get_value((row, 3)), row, "Z")?;
        points.push(GeometryPoint {
            index: index.into(),
            x,
            y,
            z,
        });
    }

    Ok(points)
}

/// List every sheet name in the workbook, unfiltered.
///
/// Fails only if the workbook itself is unreadable.
pub fn list_sheet_names(workbook: &[u8]) -> Result<Vec<String>, ExtractError> {
    let xlsx = open_workbook(workbook)?;
    Ok(xlsx.sheet_names())
}

fn open_workbook(workbook: &[u8]) -> Result<Xlsx<Cursor<&[u8]>>, ExtractError> {
    Ok(Xlsx::new(Cursor::new(workbook))?)
}

/// Sheet name match: the literal prefix, optionally followed by ASCII
/// alphanumeric characters only.
fn is_station_sheet(name: &str) -> bool {
    name.strip_prefix(SHEET_NAME_PREFIX)
        .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Coerce a coordinate cell to f64. Numeric cells and numeric strings
/// pass; anything else fails the whole extraction.
fn coerce_cell(cell: Option<&Data>, row: u32, column: &str) -> Result<f64, ExtractError> {
    match cell {
        Some(Data::Float(f)) => Ok(*f),
        Some(Data::Int(i)) => Ok(*i as f64),
        Some(Data::String(s)) => s.trim().parse::<f64>().map_err(|_| {
            ExtractError::SchemaMismatch(format!(
                "row {row}: {column} cell {s:?} is not numeric"
            ))
        }),
        other => Err(ExtractError::SchemaMismatch(format!(
            "row {row}: {column} cell is not numeric ({other:?})"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_name_matching() {
        assert!(is_station_sheet("Station Coords - N X Y Z"));
        assert!(is_station_sheet("Station Coords - N X Y Zv2"));
        assert!(is_station_sheet("Station Coords - N X Y Z2024"));

        // Suffix must be alphanumeric only
        assert!(!is_station_sheet("Station Coords - N X Y Z (rev)"));
        assert!(!is_station_sheet("Station Coords - N X Y Z v2"));
        // Prefix must be exact
        assert!(!is_station_sheet("station coords - n x y z"));
        assert!(!is_station_sheet("Sheet1"));
        assert!(!is_station_sheet("Coords - N X Y Z"));
    }

    #[test]
    fn cell_coercion() {
        assert_eq!(coerce_cell(Some(&Data::Float(1.5)), 3, "X").unwrap(), 1.5);
        assert_eq!(coerce_cell(Some(&Data::Int(-4)), 3, "Y").unwrap(), -4.0);
        assert_eq!(
            coerce_cell(Some(&Data::String(" 12.25 ".into())), 3, "Z").unwrap(),
            12.25
        );

        assert!(matches!(
            coerce_cell(Some(&Data::String("n/a".into())), 3, "X"),
            Err(ExtractError::SchemaMismatch(_))
        ));
        assert!(matches!(
            coerce_cell(None, 3, "X"),
            Err(ExtractError::SchemaMismatch(_))
        ));
        assert!(matches!(
            coerce_cell(Some(&Data::Empty), 3, "X"),
            Err(ExtractError::SchemaMismatch(_))
        ));
    }
}
