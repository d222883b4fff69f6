use anyhow::{Context, Result};
use models::{Ledger, Settings};
use std::path::{Path, PathBuf};

use crate::layout::ReportLayout;
use crate::row::company_row;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
}

/// Writes one CSV row per company, ordered by numeric code. Returns `None`
/// without touching `path` when the ledger holds nothing to report.
pub fn write_report<P: AsRef<Path>>(
    path: P,
    ledger: &Ledger,
    settings: &Settings,
) -> Result<Option<ReportSummary>> {
    let path = path.as_ref();
    let Some(layout) = ReportLayout::from_ledger(ledger, settings) else {
        tracing::debug!("no data to write");
        return Ok(None);
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory {}", parent.display()))?;
        }
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Cannot create report at {}", path.display()))?;

    let headers = layout.headers();
    writer.write_record(&headers)?;

    let mut rows = 0;
    for company in ledger.sorted_companies() {
        let record: Vec<String> = company_row(company, &layout)
            .iter()
            .map(|cell| cell.to_string())
            .collect();
        writer
            .write_record(&record)
            .with_context(|| format!("Cannot write report row for {}", company.code()))?;
        rows += 1;
    }
    writer.flush()?;

    Ok(Some(ReportSummary {
        path: path.to_path_buf(),
        rows,
        columns: headers.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{AccountValue, CompanyIdentity, SourceKind};

    #[test]
    fn test_write_report_orders_by_code() {
        let mut ledger = Ledger::new();
        for code in ["A100000", "A000020"] {
            let (company, _) = ledger
                .merge_identity(SourceKind::Catalog, CompanyIdentity::from_code(code))
                .unwrap();
            company
                .set_account("SALES", 202103, Some(AccountValue::Integer(5)))
                .unwrap();
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.csv");
        let summary = write_report(&path, &ledger, &Settings::default())
            .unwrap()
            .unwrap();
        assert_eq!(summary.rows, 2);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), summary.columns);
        assert_eq!(&headers[0], "코드");

        let codes: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[0].to_string())
            .collect();
        assert_eq!(codes, vec!["A000020", "A100000"]);
    }

    #[test]
    fn test_empty_ledger_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let summary = write_report(&path, &Ledger::new(), &Settings::default()).unwrap();
        assert!(summary.is_none());
        assert!(!path.exists());
    }
}
