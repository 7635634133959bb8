use std::collections::{HashMap, HashSet};

use crate::error::{CompareError, Result};
use crate::key::KEY_COLUMN;
use crate::model::{
    CellValue, MATERIAL_COLUMN, PLM_COLOR_COLUMN, PLM_QTY_COLUMN, ReconciledRecord,
    SAP_COLOR_COLUMN, SAP_QTY_COLUMN, Table, VENDOR_COLUMN,
};

/// Outcome of reconciling the two BOM tables.
///
/// `records` hold every matched pairing, already sorted by descending
/// quantity difference. The two unmatched tables keep all columns of their
/// source table, including the appended key column.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub records: Vec<ReconciledRecord>,
    pub plm_only: Table,
    pub sap_only: Table,
}

/// Inner-joins the two tables on their composite key column and partitions
/// the rows that matched nowhere.
///
/// The join is an explicit hash join: a key → row-indices lookup is built
/// over the SAP table, then every PLM row probes it in input order. Rows
/// sharing a key on either side pair up cross-product style, one record per
/// pairing. Unmatched rows are decided by key-set membership, so a
/// duplicated key that matches keeps all of its rows out of the unmatched
/// tables.
pub fn reconcile(plm: &Table, sap: &Table) -> Result<Reconciliation> {
    let plm_columns = SideColumns::resolve(plm, PLM_COLOR_COLUMN, PLM_QTY_COLUMN)?;
    let sap_columns = SideColumns::resolve(sap, SAP_COLOR_COLUMN, SAP_QTY_COLUMN)?;

    let plm_keys = column_text(plm, plm_columns.key);
    let sap_keys = column_text(sap, sap_columns.key);

    let mut sap_lookup: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, sap_key) in sap_keys.iter().enumerate() {
        sap_lookup.entry(sap_key.as_str()).or_default().push(index);
    }

    let mut records = Vec::new();
    for (plm_index, plm_row) in plm.rows.iter().enumerate() {
        let Some(bucket) = sap_lookup.get(plm_keys[plm_index].as_str()) else {
            continue;
        };
        for &sap_index in bucket {
            let sap_row = &sap.rows[sap_index];
            let plm_qty = quantity(plm, plm_row, plm_columns.qty, plm_index)?;
            let sap_qty = quantity(sap, sap_row, sap_columns.qty, sap_index)?;
            records.push(ReconciledRecord {
                key: plm_keys[plm_index].clone(),
                plm_material: cell(plm_row, plm_columns.material),
                sap_material: cell(sap_row, sap_columns.material),
                plm_vendor: cell(plm_row, plm_columns.vendor),
                sap_vendor: cell(sap_row, sap_columns.vendor),
                plm_color: cell(plm_row, plm_columns.color),
                sap_color: cell(sap_row, sap_columns.color),
                plm_qty,
                sap_qty,
                difference: (plm_qty - sap_qty).abs(),
            });
        }
    }

    // Stable sort: ties keep their join order.
    records.sort_by(|lhs, rhs| rhs.difference.total_cmp(&lhs.difference));

    let plm_key_set: HashSet<&str> = plm_keys.iter().map(String::as_str).collect();
    let plm_only = unmatched(plm, &plm_keys, |plm_key| {
        !sap_lookup.contains_key(plm_key)
    });
    let sap_only = unmatched(sap, &sap_keys, |sap_key| !plm_key_set.contains(sap_key));

    Ok(Reconciliation {
        records,
        plm_only,
        sap_only,
    })
}

/// Resolved indices of the columns one side of the join reads from.
struct SideColumns {
    key: usize,
    material: usize,
    vendor: usize,
    color: usize,
    qty: usize,
}

impl SideColumns {
    fn resolve(table: &Table, color_column: &str, qty_column: &str) -> Result<Self> {
        Ok(Self {
            key: table.column_index(KEY_COLUMN)?,
            material: table.column_index(MATERIAL_COLUMN)?,
            vendor: table.column_index(VENDOR_COLUMN)?,
            color: table.column_index(color_column)?,
            qty: table.column_index(qty_column)?,
        })
    }
}

fn column_text(table: &Table, column: usize) -> Vec<String> {
    table
        .rows
        .iter()
        .map(|row| row.get(column).map(CellValue::to_text).unwrap_or_default())
        .collect()
}

fn cell(row: &[CellValue], column: usize) -> CellValue {
    row.get(column).cloned().unwrap_or(CellValue::Empty)
}

fn quantity(table: &Table, row: &[CellValue], column: usize, row_index: usize) -> Result<f64> {
    let value = cell(row, column);
    value
        .as_quantity()
        .ok_or_else(|| CompareError::NonNumericQuantity {
            sheet: table.name.clone(),
            column: table.columns[column].clone(),
            // Spreadsheet row number; the header occupies row 1.
            row: row_index + 2,
            value: value.to_text(),
        })
}

fn unmatched(table: &Table, keys: &[String], missing: impl Fn(&str) -> bool) -> Table {
    let rows = table
        .rows
        .iter()
        .zip(keys)
        .filter(|(_, row_key)| missing(row_key.as_str()))
        .map(|(row, _)| row.clone())
        .collect();
    Table {
        name: table.name.clone(),
        columns: table.columns.clone(),
        rows,
    }
}
