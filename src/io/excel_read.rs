use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};

use crate::error::{CompareError, Result};
use crate::model::{CellValue, Table};

/// Reads the two BOM tables from an xlsx workbook on disk.
pub fn read_bom_tables(path: &Path, plm_sheet: &str, sap_sheet: &str) -> Result<(Table, Table)> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    read_tables(&mut workbook, plm_sheet, sap_sheet)
}

/// Reads the two BOM tables from workbook bytes already in memory, as
/// handed over by an upload surface.
pub fn read_bom_tables_from_bytes(
    bytes: &[u8],
    plm_sheet: &str,
    sap_sheet: &str,
) -> Result<(Table, Table)> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))?;
    read_tables(&mut workbook, plm_sheet, sap_sheet)
}

fn read_tables<R: Read + Seek>(
    workbook: &mut Xlsx<R>,
    plm_sheet: &str,
    sap_sheet: &str,
) -> Result<(Table, Table)> {
    let plm = read_table(workbook, plm_sheet)?;
    let sap = read_table(workbook, sap_sheet)?;
    Ok((plm, sap))
}

/// Reads one named sheet into a table: the first row becomes the header
/// row, every following row the body. Rows without a single non-empty cell
/// are dropped.
pub fn read_table<R: Read + Seek>(workbook: &mut Xlsx<R>, name: &str) -> Result<Table> {
    let range = read_required_sheet(workbook, name)?;
    let mut rows = range.rows();

    let columns: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| convert_cell(cell).to_text())
            .collect(),
        None => Vec::new(),
    };

    let mut table = Table::new(name, columns);
    for row in rows {
        let cells: Vec<CellValue> = row.iter().map(convert_cell).collect();
        if cells.iter().all(CellValue::is_empty) {
            continue;
        }
        table.rows.push(cells);
    }
    Ok(table)
}

fn read_required_sheet<R: Read + Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<calamine::Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| CompareError::MissingSheet(name.to_string()))?;
    let range = range_result.map_err(CompareError::from)?;
    Ok(range)
}

fn convert_cell(cell: &DataType) -> CellValue {
    match cell {
        DataType::String(value) => CellValue::Text(value.clone()),
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Int(value) => CellValue::Number(*value as f64),
        DataType::Bool(value) => CellValue::Bool(*value),
        DataType::Empty => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}
