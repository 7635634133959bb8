use std::fs;
use std::path::PathBuf;

use bom_compare::{CompareError, Result, compare, model, preview, report};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_tracing().and_then(|_| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .map_err(|error| CompareError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Compare(args) => execute_compare(args),
    }
}

fn execute_compare(args: CompareArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(CompareError::MissingInput(args.input));
    }

    let outcome = compare::compare_file(&args.input, &args.plm_sheet, &args.sap_sheet)?;
    fs::write(&args.output, &outcome.artifact)?;

    let records = &outcome.reconciliation.records;
    match args.format {
        PreviewFormat::Table => {
            let rows = preview::preview_rows(records, args.preview);
            preview::print_table(&report::comparison_columns(), &rows);
        }
        PreviewFormat::Json => {
            let shown = &records[..records.len().min(args.preview)];
            println!("{}", serde_json::to_string_pretty(shown)?);
        }
    }

    println!(
        "{} matched, {} PLM-only, {} SAP-only; workbook written to {}",
        records.len(),
        outcome.reconciliation.plm_only.rows.len(),
        outcome.reconciliation.sap_only.rows.len(),
        args.output.display()
    );
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Compare PLM and SAP bills of material from one Excel workbook."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reconcile the two BOM sheets and write the annotated workbook.
    Compare(CompareArgs),
}

#[derive(clap::Args)]
struct CompareArgs {
    /// Input workbook containing the PLM and SAP sheets.
    #[arg(long)]
    input: PathBuf,

    /// Where to write the annotated result workbook.
    #[arg(long, default_value = compare::DOWNLOAD_FILE_NAME)]
    output: PathBuf,

    /// Sheet the PLM table is read from.
    #[arg(long, default_value = model::PLM_SHEET)]
    plm_sheet: String,

    /// Sheet the SAP table is read from.
    #[arg(long, default_value = model::SAP_SHEET)]
    sap_sheet: String,

    /// Number of reconciled records to show on screen.
    #[arg(long, default_value_t = compare::PREVIEW_LIMIT)]
    preview: usize,

    /// How to render the preview.
    #[arg(long, value_enum, default_value_t = PreviewFormat::Table)]
    format: PreviewFormat,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PreviewFormat {
    Table,
    Json,
}

impl std::fmt::Display for PreviewFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreviewFormat::Table => write!(f, "table"),
            PreviewFormat::Json => write!(f, "json"),
        }
    }
}
