use crate::error::Result;
use crate::model::{
    CellValue, MATERIAL_COLUMN, PLM_COLOR_COLUMN, SAP_COLOR_COLUMN, Table, VENDOR_COLUMN,
};

/// Column the derived composite key is stored under on both tables.
pub const KEY_COLUMN: &str = "Combined";

/// Stand-in for cells that are missing or trim to nothing, so every key
/// component is non-empty and blank-for-blank rows still join.
const BLANK_COMPONENT: &str = "(blank)";

/// Names of the three source columns a composite key is derived from.
#[derive(Debug, Clone, Copy)]
pub struct KeyColumns {
    pub material: &'static str,
    pub vendor: &'static str,
    pub color: &'static str,
}

/// Key columns on the PLM side.
pub const PLM_KEY_COLUMNS: KeyColumns = KeyColumns {
    material: MATERIAL_COLUMN,
    vendor: VENDOR_COLUMN,
    color: PLM_COLOR_COLUMN,
};

/// Key columns on the SAP side. Only the colour column is named differently.
pub const SAP_KEY_COLUMNS: KeyColumns = KeyColumns {
    material: MATERIAL_COLUMN,
    vendor: VENDOR_COLUMN,
    color: SAP_COLOR_COLUMN,
};

/// Derives one composite key per row: the three components stringified,
/// whitespace-trimmed, and joined with underscores. No case folding and no
/// internal whitespace normalisation. Fails if any of the three columns is
/// missing from the table.
pub fn composite_keys(table: &Table, columns: &KeyColumns) -> Result<Vec<String>> {
    let material = table.column_index(columns.material)?;
    let vendor = table.column_index(columns.vendor)?;
    let color = table.column_index(columns.color)?;

    let keys = table
        .rows
        .iter()
        .map(|row| {
            format!(
                "{}_{}_{}",
                component(row.get(material)),
                component(row.get(vendor)),
                component(row.get(color)),
            )
        })
        .collect();
    Ok(keys)
}

/// Derives the composite keys and stores them on the table under
/// [`KEY_COLUMN`], replacing any column of that name already present.
pub fn append_composite_keys(table: &mut Table, columns: &KeyColumns) -> Result<()> {
    let keys = composite_keys(table, columns)?;
    table.set_column(KEY_COLUMN, keys.into_iter().map(CellValue::Text).collect());
    Ok(())
}

fn component(cell: Option<&CellValue>) -> String {
    let text = cell.map(CellValue::to_text).unwrap_or_default();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        BLANK_COMPONENT.to_string()
    } else {
        trimmed.to_string()
    }
}
