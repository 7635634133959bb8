use bom_compare::CompareError;
use bom_compare::key::{self, KEY_COLUMN, KeyColumns, PLM_KEY_COLUMNS, SAP_KEY_COLUMNS};
use bom_compare::model::{CellValue, Table};
use bom_compare::reconcile::{Reconciliation, reconcile};
use bom_compare::report::{self, Fill};

fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

fn plm_table(rows: Vec<Vec<CellValue>>) -> Table {
    let mut table = Table::new(
        "PLM",
        vec![
            "Material".to_string(),
            "Vendor Reference".to_string(),
            "Color Reference".to_string(),
            "Qty(Cons.)".to_string(),
        ],
    );
    table.rows = rows;
    table
}

fn sap_table(rows: Vec<Vec<CellValue>>) -> Table {
    let mut table = Table::new(
        "SAP",
        vec![
            "Material".to_string(),
            "Vendor Reference".to_string(),
            "Comp. Colour".to_string(),
            "Comp.Qty.".to_string(),
        ],
    );
    table.rows = rows;
    table
}

fn bom_row(material: &str, vendor: &str, color: &str, qty: f64) -> Vec<CellValue> {
    vec![
        text(material),
        text(vendor),
        text(color),
        CellValue::Number(qty),
    ]
}

fn keyed(mut table: Table, columns: &KeyColumns) -> Table {
    key::append_composite_keys(&mut table, columns).expect("keys derived");
    table
}

fn reconciled(plm_rows: Vec<Vec<CellValue>>, sap_rows: Vec<Vec<CellValue>>) -> Reconciliation {
    let plm = keyed(plm_table(plm_rows), &PLM_KEY_COLUMNS);
    let sap = keyed(sap_table(sap_rows), &SAP_KEY_COLUMNS);
    reconcile(&plm, &sap).expect("tables reconciled")
}

#[test]
fn composite_keys_trim_and_join_components() {
    let table = plm_table(vec![vec![
        text(" M1 "),
        CellValue::Number(7.0),
        text("C1"),
        CellValue::Number(1.0),
    ]]);
    let keys = key::composite_keys(&table, &PLM_KEY_COLUMNS).expect("keys derived");
    assert_eq!(keys, vec!["M1_7_C1".to_string()]);
}

#[test]
fn blank_key_components_use_placeholder() {
    let table = plm_table(vec![vec![
        text("M1"),
        text("   "),
        CellValue::Empty,
        CellValue::Number(1.0),
    ]]);
    let keys = key::composite_keys(&table, &PLM_KEY_COLUMNS).expect("keys derived");
    assert_eq!(keys, vec!["M1_(blank)_(blank)".to_string()]);
}

#[test]
fn blank_components_on_both_sides_still_join() {
    let recon = reconciled(
        vec![vec![
            text("M1"),
            text("V1"),
            CellValue::Empty,
            CellValue::Number(3.0),
        ]],
        vec![vec![
            text("M1"),
            text("V1"),
            CellValue::Empty,
            CellValue::Number(3.0),
        ]],
    );
    assert_eq!(recon.records.len(), 1);
    assert_eq!(recon.records[0].key, "M1_V1_(blank)");
}

#[test]
fn key_derivation_fails_on_missing_column() {
    let mut table = plm_table(Vec::new());
    table.columns.retain(|column| column != "Color Reference");

    let error = key::composite_keys(&table, &PLM_KEY_COLUMNS).expect_err("column is missing");
    match error {
        CompareError::MissingColumn { sheet, column } => {
            assert_eq!(sheet, "PLM");
            assert_eq!(column, "Color Reference");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn matched_and_unmatched_rows_partition_the_inputs() {
    let recon = reconciled(
        vec![
            bom_row("M1", "V1", "C1", 10.0),
            bom_row("M2", "V2", "C2", 5.0),
        ],
        vec![
            bom_row("M1", "V1", "C1", 10.0),
            bom_row("M3", "V3", "C3", 7.0),
        ],
    );

    assert_eq!(recon.records.len(), 1);
    assert_eq!(recon.records[0].key, "M1_V1_C1");
    assert_eq!(recon.records[0].difference, 0.0);

    assert_eq!(recon.plm_only.rows.len(), 1);
    assert_eq!(recon.plm_only.rows[0][0], text("M2"));
    assert_eq!(recon.sap_only.rows.len(), 1);
    assert_eq!(recon.sap_only.rows[0][0], text("M3"));

    // Unmatched tables keep every source column, including the key.
    assert_eq!(
        recon.plm_only.columns.last().map(String::as_str),
        Some(KEY_COLUMN)
    );
    assert_eq!(recon.plm_only.rows[0].last(), Some(&text("M2_V2_C2")));
}

#[test]
fn duplicate_keys_expand_cross_product() {
    let recon = reconciled(
        vec![
            bom_row("M1", "V1", "C1", 10.0),
            bom_row("M1", "V1", "C1", 12.0),
        ],
        vec![bom_row("M1", "V1", "C1", 10.0)],
    );

    assert_eq!(recon.records.len(), 2);
    let differences: Vec<f64> = recon
        .records
        .iter()
        .map(|record| record.difference)
        .collect();
    assert_eq!(differences, vec![2.0, 0.0]);
    assert!(recon.plm_only.rows.is_empty());
    assert!(recon.sap_only.rows.is_empty());
}

#[test]
fn records_sort_descending_by_difference() {
    let recon = reconciled(
        vec![
            bom_row("M1", "V1", "C1", 10.0),
            bom_row("M2", "V2", "C2", 5.0),
            bom_row("M3", "V3", "C3", 9.0),
        ],
        vec![
            bom_row("M1", "V1", "C1", 11.0),
            bom_row("M2", "V2", "C2", 5.0),
            bom_row("M3", "V3", "C3", 2.0),
        ],
    );

    assert_eq!(recon.records.len(), 3);
    for pair in recon.records.windows(2) {
        assert!(pair[0].difference >= pair[1].difference);
    }
    assert_eq!(recon.records[0].key, "M3_V3_C3");
    assert!(recon.records.iter().all(|record| record.difference >= 0.0));
}

#[test]
fn unmatched_keys_are_absent_from_the_other_side() {
    let plm = keyed(
        plm_table(vec![
            bom_row("M1", "V1", "C1", 1.0),
            bom_row("M2", "V2", "C2", 2.0),
            bom_row("M2", "V2", "C2", 3.0),
        ]),
        &PLM_KEY_COLUMNS,
    );
    let sap = keyed(
        sap_table(vec![
            bom_row("M1", "V1", "C1", 1.0),
            bom_row("M9", "V9", "C9", 9.0),
        ]),
        &SAP_KEY_COLUMNS,
    );
    let recon = reconcile(&plm, &sap).expect("tables reconciled");

    let plm_keys = key::composite_keys(&plm, &PLM_KEY_COLUMNS).expect("plm keys");
    let sap_keys = key::composite_keys(&sap, &SAP_KEY_COLUMNS).expect("sap keys");

    for record in &recon.records {
        assert!(plm_keys.contains(&record.key));
        assert!(sap_keys.contains(&record.key));
    }
    for row in &recon.plm_only.rows {
        let row_key = row.last().expect("key cell").to_text();
        assert!(!sap_keys.contains(&row_key));
    }
    for row in &recon.sap_only.rows {
        let row_key = row.last().expect("key cell").to_text();
        assert!(!plm_keys.contains(&row_key));
    }

    // Matched rows plus unmatched rows recover each source table.
    let matched_plm_rows = plm_keys
        .iter()
        .filter(|plm_key| sap_keys.contains(plm_key))
        .count();
    assert_eq!(matched_plm_rows + recon.plm_only.rows.len(), plm.rows.len());
    let matched_sap_rows = sap_keys
        .iter()
        .filter(|sap_key| plm_keys.contains(sap_key))
        .count();
    assert_eq!(matched_sap_rows + recon.sap_only.rows.len(), sap.rows.len());
}

#[test]
fn text_quantities_that_parse_are_accepted() {
    let recon = reconciled(
        vec![vec![text("M1"), text("V1"), text("C1"), text(" 10.5 ")]],
        vec![bom_row("M1", "V1", "C1", 10.0)],
    );
    assert_eq!(recon.records[0].plm_qty, 10.5);
    assert_eq!(recon.records[0].difference, 0.5);
}

#[test]
fn non_numeric_quantity_aborts_the_run() {
    let plm = keyed(
        plm_table(vec![bom_row("M1", "V1", "C1", 10.0)]),
        &PLM_KEY_COLUMNS,
    );
    let sap = keyed(
        sap_table(vec![vec![
            text("M1"),
            text("V1"),
            text("C1"),
            text("pending"),
        ]]),
        &SAP_KEY_COLUMNS,
    );

    let error = reconcile(&plm, &sap).expect_err("quantity is not numeric");
    match error {
        CompareError::NonNumericQuantity {
            sheet,
            column,
            row,
            value,
        } => {
            assert_eq!(sheet, "SAP");
            assert_eq!(column, "Comp.Qty.");
            assert_eq!(row, 2);
            assert_eq!(value, "pending");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_quantity_cell_aborts_the_run() {
    let plm = keyed(
        plm_table(vec![vec![
            text("M1"),
            text("V1"),
            text("C1"),
            CellValue::Empty,
        ]]),
        &PLM_KEY_COLUMNS,
    );
    let sap = keyed(
        sap_table(vec![bom_row("M1", "V1", "C1", 10.0)]),
        &SAP_KEY_COLUMNS,
    );

    let error = reconcile(&plm, &sap).expect_err("quantity is empty");
    match error {
        CompareError::NonNumericQuantity { sheet, value, .. } => {
            assert_eq!(sheet, "PLM");
            assert_eq!(value, "");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicated_source_header_is_ambiguous() {
    let mut table = plm_table(vec![vec![
        text("M1"),
        text("V1"),
        text("C1"),
        CellValue::Number(1.0),
        text("M1-bis"),
    ]]);
    table.columns.push("Material".to_string());

    let error = key::composite_keys(&table, &PLM_KEY_COLUMNS).expect_err("header is duplicated");
    match error {
        CompareError::AmbiguousColumn { sheet, column } => {
            assert_eq!(sheet, "PLM");
            assert_eq!(column, "Material");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn decoration_marks_matches_green_and_mismatches_red() {
    let recon = reconciled(
        vec![
            bom_row("M1", "V1", "C1", 10.0),
            bom_row("M2", "V2", "C2", 5.0),
        ],
        vec![
            bom_row("M1", "V1", "C1", 10.0),
            bom_row("M2", "V2", "C2", 8.0),
        ],
    );
    let workbook = report::build_report(&recon).expect("report built");

    // Records are sorted, so the mismatching pair comes first.
    assert_eq!(
        workbook.decoration.fills,
        vec![Fill::Mismatch, Fill::Match]
    );

    let columns = report::comparison_columns();
    let labels: Vec<&str> = workbook
        .decoration
        .quantity_columns
        .iter()
        .map(|&idx| columns[idx].as_str())
        .collect();
    assert_eq!(labels, vec!["Qty(Cons.)", "Comp.Qty.", "Consumption Difference"]);
}

#[test]
fn decoration_fails_without_difference_header() {
    let table = Table::new(
        "Comparison",
        vec!["Qty(Cons.)".to_string(), "Comp.Qty.".to_string()],
    );
    let error = report::decoration_plan(&table).expect_err("difference header is missing");
    match error {
        CompareError::HeaderNotFound { sheet, header } => {
            assert_eq!(sheet, "Comparison");
            assert_eq!(header, "Consumption Difference");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn decoration_fails_on_duplicated_header() {
    let table = Table::new(
        "Comparison",
        vec![
            "Qty(Cons.)".to_string(),
            "Qty(Cons.)".to_string(),
            "Comp.Qty.".to_string(),
            "Consumption Difference".to_string(),
        ],
    );
    let error = report::decoration_plan(&table).expect_err("header is duplicated");
    assert!(matches!(error, CompareError::AmbiguousColumn { .. }));
}

#[test]
fn report_sheets_come_in_fixed_order() {
    let recon = reconciled(
        vec![bom_row("M1", "V1", "C1", 10.0)],
        vec![bom_row("M1", "V1", "C1", 10.0)],
    );
    let workbook = report::build_report(&recon).expect("report built");
    let names: Vec<&str> = workbook
        .tables()
        .iter()
        .map(|table| table.name.as_str())
        .collect();
    assert_eq!(names, vec!["Comparison", "PLM_Not_in_SAP", "SAP_Not_in_PLM"]);
}
