use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;

use data_pipeline::Config;

#[derive(Parser, Debug)]
#[command(
    name = "quantx",
    about = "Merge statement, catalog and market workbooks into one company report."
)]
struct Args {
    /// Financial-statement workbooks, repeatable or comma-separated
    #[arg(short, long = "statement", alias = "fn-guide", value_delimiter = ',')]
    statements: Vec<PathBuf>,

    /// Full-catalog workbook
    #[arg(short, long, alias = "full-catalog")]
    catalog: Option<PathBuf>,

    /// Market-data workbook
    #[arg(short, long, alias = "shopping-guide")]
    market: Option<PathBuf>,

    /// Report path; defaults to output-<timestamp>.csv
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the ledger as JSON here
    #[arg(long)]
    json: Option<PathBuf>,

    /// Optional settings.json
    #[arg(long)]
    settings: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

fn default_output() -> PathBuf {
    PathBuf::from(Local::now().format("output-%Y%m%d%H%M%S.csv").to_string())
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.verbose);

    let cfg = Config {
        statement_files: args.statements,
        catalog_file: args.catalog,
        market_file: args.market,
        output_file: args.output.unwrap_or_else(default_output),
        json_file: args.json,
        settings_file: args.settings,
    };

    let summary = data_pipeline::run(cfg)?;

    for failed in &summary.failed_files {
        println!("[WARN] skipped {}", failed.display());
    }
    match &summary.report {
        Some(report) => println!(
            "Wrote {} companies ({} columns) to {}",
            report.rows,
            report.columns,
            report.path.display()
        ),
        None => println!("No companies ingested, report not written"),
    }
    if let Some(json) = &summary.json_file {
        println!("Ledger export: {}", json.display());
    }
    Ok(())
}
