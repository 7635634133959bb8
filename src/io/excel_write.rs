use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};

use crate::error::Result;
use crate::model::{CellValue, Table};
use crate::report::{Decoration, Fill, ReportWorkbook};

/// Fill colour for rows whose quantities agree exactly.
const MATCH_COLOR: Color = Color::RGB(0x90EE90);
/// Fill colour for rows whose quantities differ.
const MISMATCH_COLOR: Color = Color::RGB(0xFF7F7F);

/// Serialises the report into an in-memory xlsx artifact, ready for an
/// external surface to persist or offer as a download. The comparison sheet
/// is written first, then the two unmatched sheets.
pub fn write_report(report: &ReportWorkbook) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    write_sheet(&mut workbook, &report.comparison, Some(&report.decoration))?;
    write_sheet(&mut workbook, &report.plm_only, None)?;
    write_sheet(&mut workbook, &report.sap_only, None)?;

    Ok(workbook.save_to_buffer()?)
}

fn write_sheet(
    workbook: &mut Workbook,
    table: &Table,
    decoration: Option<&Decoration>,
) -> Result<()> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&table.name)?;

    for (col_idx, header) in table.columns.iter().enumerate() {
        worksheet.write_string(0, col_idx as u16, header)?;
    }

    let match_fill = Format::new().set_background_color(MATCH_COLOR);
    let mismatch_fill = Format::new().set_background_color(MISMATCH_COLOR);

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_fill = decoration.map(|plan| match plan.fills[row_idx] {
            Fill::Match => &match_fill,
            Fill::Mismatch => &mismatch_fill,
        });
        for (col_idx, value) in row.iter().enumerate() {
            let format = row_fill.filter(|_| is_decorated(decoration, col_idx));
            write_cell(worksheet, (row_idx + 1) as u32, col_idx as u16, value, format)?;
        }
    }

    Ok(())
}

fn is_decorated(decoration: Option<&Decoration>, column: usize) -> bool {
    decoration.is_some_and(|plan| plan.quantity_columns.contains(&column))
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    format: Option<&Format>,
) -> Result<()> {
    match (value, format) {
        (CellValue::Text(text), Some(format)) => {
            worksheet.write_string_with_format(row, col, text, format)?;
        }
        (CellValue::Text(text), None) => {
            worksheet.write_string(row, col, text)?;
        }
        (CellValue::Number(number), Some(format)) => {
            worksheet.write_number_with_format(row, col, *number, format)?;
        }
        (CellValue::Number(number), None) => {
            worksheet.write_number(row, col, *number)?;
        }
        (CellValue::Bool(flag), Some(format)) => {
            worksheet.write_boolean_with_format(row, col, *flag, format)?;
        }
        (CellValue::Bool(flag), None) => {
            worksheet.write_boolean(row, col, *flag)?;
        }
        (CellValue::Empty, Some(format)) => {
            worksheet.write_blank(row, col, format)?;
        }
        (CellValue::Empty, None) => {}
    }
    Ok(())
}
