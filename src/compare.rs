use std::path::Path;

use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::io::excel_read;
use crate::io::excel_write;
use crate::key::{self, PLM_KEY_COLUMNS, SAP_KEY_COLUMNS};
use crate::model::Table;
use crate::reconcile::{self, Reconciliation};
use crate::report;

/// Suggested file name for the produced artifact.
pub const DOWNLOAD_FILE_NAME: &str = "comparison_results.xlsx";
/// Content type of the produced artifact.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
/// Number of reconciled records shown in the on-screen preview.
pub const PREVIEW_LIMIT: usize = 20;

/// Result of one full pipeline run: the reconciliation itself plus the
/// serialised workbook bytes ready for transfer.
#[derive(Debug)]
pub struct ComparisonOutcome {
    pub reconciliation: Reconciliation,
    pub artifact: Vec<u8>,
}

/// Runs the full pipeline over a workbook on disk.
#[instrument(level = "info", skip_all, fields(input = %input.display()))]
pub fn compare_file(input: &Path, plm_sheet: &str, sap_sheet: &str) -> Result<ComparisonOutcome> {
    let (plm, sap) = excel_read::read_bom_tables(input, plm_sheet, sap_sheet)?;
    compare_tables(plm, sap)
}

/// Runs the full pipeline over workbook bytes, as supplied by an upload
/// surface.
#[instrument(level = "info", skip_all, fields(size = bytes.len()))]
pub fn compare_bytes(bytes: &[u8], plm_sheet: &str, sap_sheet: &str) -> Result<ComparisonOutcome> {
    let (plm, sap) = excel_read::read_bom_tables_from_bytes(bytes, plm_sheet, sap_sheet)?;
    compare_tables(plm, sap)
}

/// Reconciles two already-loaded tables: derive the composite keys, join,
/// assemble the three-sheet report, and serialise it. Each invocation is one
/// atomic unit of work; any failure aborts with no partial artifact.
pub fn compare_tables(mut plm: Table, mut sap: Table) -> Result<ComparisonOutcome> {
    key::append_composite_keys(&mut plm, &PLM_KEY_COLUMNS)?;
    key::append_composite_keys(&mut sap, &SAP_KEY_COLUMNS)?;

    let reconciliation = reconcile::reconcile(&plm, &sap)?;
    info!(
        matched = reconciliation.records.len(),
        plm_unmatched = reconciliation.plm_only.rows.len(),
        sap_unmatched = reconciliation.sap_only.rows.len(),
        "tables reconciled"
    );

    let workbook = report::build_report(&reconciliation)?;
    let artifact = excel_write::write_report(&workbook)?;
    debug!(artifact_bytes = artifact.len(), "workbook serialised");

    Ok(ComparisonOutcome {
        reconciliation,
        artifact,
    })
}
