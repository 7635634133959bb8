use serde::Serialize;

use crate::error::{CompareError, Result};

/// Sheet name the PLM bill of material is read from by default.
pub const PLM_SHEET: &str = "PLM";
/// Sheet name the SAP bill of material is read from by default.
pub const SAP_SHEET: &str = "SAP";

/// Material number column, present in both tables.
pub const MATERIAL_COLUMN: &str = "Material";
/// Vendor reference column, present in both tables.
pub const VENDOR_COLUMN: &str = "Vendor Reference";
/// Colour column as named on the PLM side.
pub const PLM_COLOR_COLUMN: &str = "Color Reference";
/// Colour column as named on the SAP side.
pub const SAP_COLOR_COLUMN: &str = "Comp. Colour";
/// Consumption quantity column on the PLM side.
pub const PLM_QTY_COLUMN: &str = "Qty(Cons.)";
/// Component quantity column on the SAP side.
pub const SAP_QTY_COLUMN: &str = "Comp.Qty.";
/// Derived absolute quantity discrepancy column.
pub const DIFFERENCE_COLUMN: &str = "Consumption Difference";

/// A single spreadsheet cell, decoupled from the reader so the
/// reconciliation core stays a pure function over in-memory tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Plain text cell.
    Text(String),
    /// Numeric cell.
    Number(f64),
    /// Boolean cell.
    Bool(bool),
    /// Empty cell.
    Empty,
}

impl CellValue {
    /// Textual representation of the cell. Empty cells render as the empty
    /// string; numbers use their shortest round-trip form.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Text(value) => value.clone(),
            CellValue::Number(value) => value.to_string(),
            CellValue::Bool(value) => value.to_string(),
            CellValue::Empty => String::new(),
        }
    }

    /// Coerces the cell to a quantity. Numeric cells pass through; text
    /// cells are trimmed and parsed. Everything else is not a quantity.
    pub fn as_quantity(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            CellValue::Text(value) => value.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

/// A named table: one header row plus zero or more body rows. Every row has
/// one cell per header.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Sheet name the table was read from, or will be written to.
    pub name: String,
    /// Header row.
    pub columns: Vec<String>,
    /// Body rows, in source order.
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Creates an empty table with the provided name and header row.
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Resolves a column by its exact header text. A header that is absent
    /// or occurs more than once is an error; the caller never gets a guess.
    pub fn column_index(&self, column: &str) -> Result<usize> {
        let mut found = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, header)| header.as_str() == column)
            .map(|(idx, _)| idx);

        let index = found.next().ok_or_else(|| CompareError::MissingColumn {
            sheet: self.name.clone(),
            column: column.to_string(),
        })?;
        if found.next().is_some() {
            return Err(CompareError::AmbiguousColumn {
                sheet: self.name.clone(),
                column: column.to_string(),
            });
        }
        Ok(index)
    }

    /// Replaces the named column if it already exists, otherwise appends it.
    /// `values` must hold one cell per existing row.
    pub fn set_column(&mut self, column: &str, values: Vec<CellValue>) {
        debug_assert_eq!(values.len(), self.rows.len());
        if let Some(index) = self
            .columns
            .iter()
            .position(|header| header.as_str() == column)
        {
            for (row, value) in self.rows.iter_mut().zip(values) {
                row[index] = value;
            }
        } else {
            self.columns.push(column.to_string());
            for (row, value) in self.rows.iter_mut().zip(values) {
                row.push(value);
            }
        }
    }
}

/// One matched (PLM row, SAP row) pairing produced by the inner join.
///
/// Serialisation uses the spreadsheet column labels so a JSON preview
/// carries the same schema as the Comparison sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledRecord {
    /// Composite key the pairing was matched on.
    #[serde(rename = "Combined")]
    pub key: String,
    #[serde(rename = "Material_PLM")]
    pub plm_material: CellValue,
    #[serde(rename = "Material_SAP")]
    pub sap_material: CellValue,
    #[serde(rename = "Vendor Reference_PLM")]
    pub plm_vendor: CellValue,
    #[serde(rename = "Vendor Reference_SAP")]
    pub sap_vendor: CellValue,
    #[serde(rename = "Color Reference")]
    pub plm_color: CellValue,
    #[serde(rename = "Comp. Colour")]
    pub sap_color: CellValue,
    #[serde(rename = "Qty(Cons.)")]
    pub plm_qty: f64,
    #[serde(rename = "Comp.Qty.")]
    pub sap_qty: f64,
    /// Absolute difference between the two quantities, never negative.
    #[serde(rename = "Consumption Difference")]
    pub difference: f64,
}
