use crate::error::{CompareError, Result};
use crate::key::KEY_COLUMN;
use crate::model::{
    CellValue, DIFFERENCE_COLUMN, MATERIAL_COLUMN, PLM_COLOR_COLUMN, PLM_QTY_COLUMN,
    ReconciledRecord, SAP_COLOR_COLUMN, SAP_QTY_COLUMN, Table, VENDOR_COLUMN,
};
use crate::reconcile::Reconciliation;

/// Sheet holding the reconciled, sorted projection.
pub const COMPARISON_SHEET: &str = "Comparison";
/// Sheet holding PLM rows whose key never matched.
pub const PLM_ONLY_SHEET: &str = "PLM_Not_in_SAP";
/// Sheet holding SAP rows whose key never matched.
pub const SAP_ONLY_SHEET: &str = "SAP_Not_in_PLM";

/// Visual indicator applied to the three quantity cells of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// Quantities agree exactly.
    Match,
    /// Quantities differ.
    Mismatch,
}

/// Per-cell decoration of the comparison sheet, resolved against the
/// written header row rather than fixed positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoration {
    /// Indices of the PLM quantity, SAP quantity, and difference columns.
    pub quantity_columns: [usize; 3],
    /// One fill per comparison row, in row order.
    pub fills: Vec<Fill>,
}

/// The three output tables in their fixed sheet order, plus the decoration
/// applied to the comparison sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportWorkbook {
    pub comparison: Table,
    pub plm_only: Table,
    pub sap_only: Table,
    pub decoration: Decoration,
}

impl ReportWorkbook {
    /// Tables in the order they appear in the workbook.
    pub fn tables(&self) -> [&Table; 3] {
        [&self.comparison, &self.plm_only, &self.sap_only]
    }
}

/// Header row of the comparison sheet. Material and vendor reference come
/// from both sides and carry a side suffix to stay distinguishable.
pub fn comparison_columns() -> Vec<String> {
    vec![
        KEY_COLUMN.to_string(),
        format!("{MATERIAL_COLUMN}_PLM"),
        format!("{MATERIAL_COLUMN}_SAP"),
        format!("{VENDOR_COLUMN}_PLM"),
        format!("{VENDOR_COLUMN}_SAP"),
        PLM_COLOR_COLUMN.to_string(),
        SAP_COLOR_COLUMN.to_string(),
        PLM_QTY_COLUMN.to_string(),
        SAP_QTY_COLUMN.to_string(),
        DIFFERENCE_COLUMN.to_string(),
    ]
}

/// Assembles the output workbook from a reconciliation: the comparison
/// projection first, then the two unmatched tables under their output sheet
/// names. No row-index column is emitted for any table.
pub fn build_report(reconciliation: &Reconciliation) -> Result<ReportWorkbook> {
    let comparison = comparison_table(&reconciliation.records);
    let decoration = decoration_plan(&comparison)?;

    let mut plm_only = reconciliation.plm_only.clone();
    plm_only.name = PLM_ONLY_SHEET.to_string();
    let mut sap_only = reconciliation.sap_only.clone();
    sap_only.name = SAP_ONLY_SHEET.to_string();

    Ok(ReportWorkbook {
        comparison,
        plm_only,
        sap_only,
        decoration,
    })
}

/// Decides the fill for every comparison row by inspecting the written
/// difference cell: exactly zero marks a match, anything else a mismatch.
/// The three decorated columns are located by header text so incidental
/// column reordering upstream cannot shift the decoration onto the wrong
/// cells; a missing label aborts the run instead.
pub fn decoration_plan(comparison: &Table) -> Result<Decoration> {
    let plm_qty = header_index(comparison, PLM_QTY_COLUMN)?;
    let sap_qty = header_index(comparison, SAP_QTY_COLUMN)?;
    let difference = header_index(comparison, DIFFERENCE_COLUMN)?;

    let fills = comparison
        .rows
        .iter()
        .map(|row| match row.get(difference) {
            Some(CellValue::Number(value)) if *value == 0.0 => Fill::Match,
            _ => Fill::Mismatch,
        })
        .collect();

    Ok(Decoration {
        quantity_columns: [plm_qty, sap_qty, difference],
        fills,
    })
}

fn comparison_table(records: &[ReconciledRecord]) -> Table {
    let mut table = Table::new(COMPARISON_SHEET, comparison_columns());
    for record in records {
        table.rows.push(vec![
            CellValue::Text(record.key.clone()),
            record.plm_material.clone(),
            record.sap_material.clone(),
            record.plm_vendor.clone(),
            record.sap_vendor.clone(),
            record.plm_color.clone(),
            record.sap_color.clone(),
            CellValue::Number(record.plm_qty),
            CellValue::Number(record.sap_qty),
            CellValue::Number(record.difference),
        ]);
    }
    table
}

fn header_index(table: &Table, header: &str) -> Result<usize> {
    let mut found = table
        .columns
        .iter()
        .enumerate()
        .filter(|(_, label)| label.as_str() == header)
        .map(|(idx, _)| idx);

    let index = found.next().ok_or_else(|| CompareError::HeaderNotFound {
        sheet: table.name.clone(),
        header: header.to_string(),
    })?;
    if found.next().is_some() {
        return Err(CompareError::AmbiguousColumn {
            sheet: table.name.clone(),
            column: header.to_string(),
        });
    }
    Ok(index)
}
