use std::fmt::Write as _;

use crate::model::ReconciledRecord;

/// Projects the first `limit` reconciled records into display rows in the
/// comparison sheet's column order.
pub fn preview_rows(records: &[ReconciledRecord], limit: usize) -> Vec<Vec<String>> {
    records
        .iter()
        .take(limit)
        .map(|record| {
            vec![
                record.key.clone(),
                record.plm_material.to_text(),
                record.sap_material.to_text(),
                record.plm_vendor.to_text(),
                record.sap_vendor.to_text(),
                record.plm_color.to_text(),
                record.sap_color.to_text(),
                record.plm_qty.to_string(),
                record.sap_qty.to_string(),
                record.difference.to_string(),
            ]
        })
        .collect()
}

/// Renders headers and rows as a fixed-width text table with a dashed
/// separator under the header line.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(widths.len()) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));
    let separator: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    let _ = writeln!(output, "{}", format_row(&separator, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut cells = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        let Some(width) = widths.get(idx) else {
            break;
        };
        let padding = width.saturating_sub(value.chars().count());
        let mut cell = value.clone();
        if padding > 0 {
            cell.push_str(&" ".repeat(padding));
        }
        cells.push(cell);
    }
    let mut line = cells.join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}
