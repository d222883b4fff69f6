use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use catalog_parser::CatalogParser;
use market_parser::MarketParser;
use statement_parser::StatementParser;
use utils::{HeaderResolver, for_each_sheet};

#[derive(Parser, Debug)]
#[command(
    name = "inspect-workbook",
    about = "Print sheet sizes, leading rows and the header map every source parser resolves."
)]
struct Args {
    workbook: PathBuf,

    /// Non-empty rows to print per sheet
    #[arg(long, default_value_t = 15)]
    rows: usize,

    /// Columns to print per row
    #[arg(long, default_value_t = 12)]
    cols: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let resolvers: [(&str, &dyn HeaderResolver); 3] = [
        ("statement", &StatementParser),
        ("catalog", &CatalogParser),
        ("market", &MarketParser),
    ];

    let mut sheets = 0usize;
    for_each_sheet(&args.workbook, |sheet| {
        sheets += 1;
        println!("\n== {} ==", sheet.name());
        println!("  size: rows={}, cols={}", sheet.len(), sheet.width());

        let mut printed = 0usize;
        for r_idx in 0..sheet.len() {
            if printed >= args.rows {
                break;
            }

            let row = sheet.row(r_idx);
            let mut cells: Vec<String> = (0..row.width().min(args.cols))
                .map(|col| row.text(col))
                .collect();
            if cells.iter().all(|s| s.is_empty()) {
                continue;
            }
            while matches!(cells.last(), Some(s) if s.is_empty()) {
                cells.pop();
            }

            println!("  row {:>4}: {}", r_idx + 1, cells.join(" | "));
            printed += 1;
        }

        for (name, resolver) in resolvers {
            match resolver.resolve(sheet) {
                Some(header) if !header.fields.is_empty() => {
                    println!("  {} header (data after row {}):", name, header.row + 1);
                    for (col, key) in &header.fields {
                        println!("    col {:>3}: {}", col, key);
                    }
                }
                _ => println!("  {} header: (none)", name),
            }
        }
    })?;
    println!("\nSheets read: {}", sheets);

    Ok(())
}
