use std::path::{Path, PathBuf};

use anyhow::Result;

use catalog_parser::CatalogParser;
use derivation::{DerivationStats, derive_ledger};
use market_parser::MarketParser;
use models::{Ledger, Settings};
use report::{ReportSummary, write_report};
use statement_parser::StatementParser;
use utils::{IngestStats, SourceParser, write_export};

pub struct Config {
    pub statement_files: Vec<PathBuf>,
    pub catalog_file: Option<PathBuf>,
    pub market_file: Option<PathBuf>,
    pub output_file: PathBuf,
    pub json_file: Option<PathBuf>,
    pub settings_file: Option<PathBuf>,
}

/// Outcome of one batch run.
#[derive(Debug, Default)]
pub struct PipelineSummary {
    pub companies: usize,
    pub ingest: IngestStats,
    pub failed_files: Vec<PathBuf>,
    pub derivation: DerivationStats,
    pub report: Option<ReportSummary>,
    pub json_file: Option<PathBuf>,
}

/// Source files in ingestion order: every statement file, then the catalog,
/// then the market data.
fn ordered_sources(cfg: &Config) -> Vec<(Box<dyn SourceParser>, &Path)> {
    let mut sources: Vec<(Box<dyn SourceParser>, &Path)> = cfg
        .statement_files
        .iter()
        .map(|p| (Box::new(StatementParser::new()) as Box<dyn SourceParser>, p.as_path()))
        .collect();
    if let Some(p) = &cfg.catalog_file {
        sources.push((Box::new(CatalogParser::new()), p.as_path()));
    }
    if let Some(p) = &cfg.market_file {
        sources.push((Box::new(MarketParser::new()), p.as_path()));
    }
    sources
}

/// Ingests every configured source into a fresh ledger. A file that cannot
/// be read is logged and recorded in `failed`; the run goes on.
pub fn ingest_sources(
    cfg: &Config,
    settings: &Settings,
    stats: &mut IngestStats,
    failed: &mut Vec<PathBuf>,
) -> Ledger {
    let mut ledger = Ledger::new();

    for (parser, path) in ordered_sources(cfg) {
        let source = parser.kind().as_str();
        tracing::info!(source, path = %path.display(), "ingesting");
        match parser.ingest_file(path, &mut ledger, settings) {
            Ok(file_stats) => {
                tracing::info!(
                    source,
                    sheets = file_stats.sheets,
                    rows = file_stats.rows,
                    fields = file_stats.fields_written,
                    rejected = file_stats.fields_rejected,
                    created = file_stats.merge.created,
                    skipped = file_stats.merge.skipped,
                    "ingested"
                );
                stats.absorb(&file_stats);
            }
            Err(e) => {
                tracing::error!(source, path = %path.display(), error = %format!("{:#}", e), "cannot ingest file");
                failed.push(path.to_path_buf());
            }
        }
    }

    ledger
}

/// Main pipeline: ingest, derive, then write the report and optional export.
pub fn run(cfg: Config) -> Result<PipelineSummary> {
    let settings = settings_loader::load_optional_settings(cfg.settings_file.as_ref())?;

    let mut summary = PipelineSummary::default();
    let mut ledger = ingest_sources(&cfg, &settings, &mut summary.ingest, &mut summary.failed_files);
    summary.companies = ledger.len();

    summary.derivation = derive_ledger(&mut ledger);

    summary.report = write_report(&cfg.output_file, &ledger, &settings)?;
    match &summary.report {
        Some(report) => {
            tracing::info!(path = %report.path.display(), rows = report.rows, "report written")
        }
        None => tracing::warn!("nothing to report, no report written"),
    }

    if let Some(json_file) = &cfg.json_file {
        let written = write_export(json_file, &ledger.to_json())?;
        tracing::info!(path = %written.display(), "export written");
        summary.json_file = Some(written);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::Data;
    use models::AccountValue;
    use models::accounts::*;
    use utils::Sheet;

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    fn f(v: f64) -> Data {
        Data::Float(v)
    }

    fn config(dir: &Path) -> Config {
        Config {
            statement_files: vec![dir.join("a.xlsx"), dir.join("b.xlsx")],
            catalog_file: Some(dir.join("catalog.xlsx")),
            market_file: None,
            output_file: dir.join("report.csv"),
            json_file: Some(dir.join("ledger.json")),
            settings_file: None,
        }
    }

    #[test]
    fn test_sources_are_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config(dir.path());
        cfg.market_file = Some(dir.path().join("market.xlsx"));

        let kinds: Vec<&str> = ordered_sources(&cfg)
            .iter()
            .map(|(p, _)| p.kind().as_str())
            .collect();
        assert_eq!(kinds, vec!["statement", "statement", "catalog", "market"]);
    }

    #[test]
    fn test_unreadable_files_do_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());

        let summary = run(cfg).unwrap();
        assert_eq!(summary.failed_files.len(), 3);
        assert_eq!(summary.companies, 0);
        assert!(summary.report.is_none());
        assert!(!dir.path().join("report.csv").exists());
        assert!(dir.path().join("ledger.json").exists());
    }

    #[test]
    fn test_sources_merge_then_derive() {
        let settings = Settings::default();
        let mut ledger = Ledger::new();

        let mut field_row = vec![s("시장"), s("코드"), s("이름"), Data::Empty, s("산업"), s("업종"), Data::Empty];
        field_row.extend([s("매출액"), s("매출액"), s("당기순이익"), s("당기순이익"), s("자본총계"), s("자산총계")]);
        let mut period_row = vec![Data::Empty; 7];
        period_row.extend([f(202103.0), f(202106.0), f(202103.0), f(202106.0), f(202106.0), f(202106.0)]);
        let mut data = vec![s("KS"), s("A005930"), s("Old name"), Data::Empty, s("032604"), s("반도체"), Data::Empty];
        data.extend([f(100.0), f(280.0), f(10.0), f(30.0), f(80.0), f(400.0)]);
        StatementParser.ingest_sheet(&Sheet::from_rows("주재무제표", &[field_row, period_row, data]), &mut ledger, &settings);

        let mut row0 = vec![s("코드"), s("이름"), s("업종"), s("산업"), s("시장"), s("설명")];
        row0.extend([s("매출"), s("등급")]);
        let mut row1 = vec![Data::Empty; 6];
        row1.extend([f(2021.0), s("12")]);
        let mut row2 = vec![Data::Empty; 6];
        row2.extend([f(6.0), Data::Empty]);
        let catalog_row = vec![
            s("A005930"), s("삼성전자"), s("반도체"), s("032604"), s("KS"), s("메모"), f(999.0), s("A"),
        ];
        CatalogParser.ingest_sheet(&Sheet::from_rows("catalog", &[row0, row1, row2, catalog_row]), &mut ledger, &settings);

        let market_rows = vec![
            vec![s("등급"), s("종목명"), s("종목코드"), s("시장"), s("시가총액"), s("PBR")],
            vec![s("A"), s("삼성전자"), s("005930"), s("KS"), f(20.0), f(9.9)],
            vec![s("A"), s("New co"), s("000660"), s("KS"), f(20.0), f(9.9)],
        ];
        MarketParser.ingest_sheet(&Sheet::from_rows("market", &market_rows), &mut ledger, &settings);

        let stats = derive_ledger(&mut ledger);
        assert_eq!(ledger.len(), 1);
        assert_eq!(stats.companies, 1);

        let c = ledger.get("A005930").unwrap();
        assert_eq!(c.name(), "삼성전자");
        assert_eq!(c.comment(), "메모");
        // statement line items survive the catalog's write-if-absent columns
        assert_eq!(c.get_account(SALES, 202106).unwrap(), &AccountValue::Integer(280));
        assert_eq!(c.get_account(RATING, 202106).unwrap(), &AccountValue::from("A"));
        assert_eq!(c.get_account(QUARTERLY_SALES, 202106).unwrap(), &AccountValue::Integer(180));
        assert_eq!(c.get_account(QUARTERLY_INCOME, 202106).unwrap(), &AccountValue::Integer(20));
        assert_eq!(c.get_account(QUARTERLY_ROE, 202106).unwrap(), &AccountValue::Float(0.25));
        assert_eq!(c.market_capitalization(), 2_000_000);
        // derived PBR replaces the market value
        assert_eq!(c.pbr(), 5000.0);
    }
}
