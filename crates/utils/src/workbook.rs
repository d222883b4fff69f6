//! Workbook access and the contract every source parser implements.

use anyhow::{Context, Result};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use models::{Ledger, MergeStats, Settings, SourceKind};
use std::path::Path;

use crate::cells::cell_str;

/// One row of a sheet, addressed by absolute column.
#[derive(Debug, Clone, Copy)]
pub struct SheetRow<'a> {
    cells: &'a [Data],
    col_offset: usize,
}

impl<'a> SheetRow<'a> {
    pub fn new(cells: &'a [Data], col_offset: usize) -> Self {
        Self { cells, col_offset }
    }

    pub fn get(&self, col: usize) -> Option<&'a Data> {
        col.checked_sub(self.col_offset)
            .and_then(|idx| self.cells.get(idx))
    }

    /// Text of column `col`, trimmed; empty when missing.
    pub fn text(&self, col: usize) -> String {
        cell_str(self.get(col))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    /// Absolute column one past the last cell.
    pub fn width(&self) -> usize {
        if self.cells.is_empty() {
            0
        } else {
            self.col_offset + self.cells.len()
        }
    }

    /// Cells paired with their absolute column.
    pub fn cells(&self) -> impl Iterator<Item = (usize, &'a Data)> + 'a {
        let offset = self.col_offset;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (idx + offset, cell))
    }
}

/// Borrowed view of one sheet, addressed by absolute sheet row. Rows and
/// columns before the used range read as empty; no cell is copied.
#[derive(Debug, Clone)]
pub struct Sheet<'a> {
    name: &'a str,
    rows: Vec<&'a [Data]>,
    row_offset: usize,
    col_offset: usize,
}

impl<'a> Sheet<'a> {
    pub fn from_range(name: &'a str, range: &'a Range<Data>) -> Self {
        let (row_offset, col_offset) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));
        Self {
            name,
            rows: range.rows().collect(),
            row_offset,
            col_offset,
        }
    }

    /// In-memory rows starting at sheet row 0, column 0.
    pub fn from_rows(name: &'a str, rows: &'a [Vec<Data>]) -> Self {
        Self {
            name,
            rows: rows.iter().map(Vec::as_slice).collect(),
            row_offset: 0,
            col_offset: 0,
        }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Absolute row one past the last used row.
    pub fn len(&self) -> usize {
        if self.rows.is_empty() {
            0
        } else {
            self.row_offset + self.rows.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest row, as an absolute column count.
    pub fn width(&self) -> usize {
        (0..self.len())
            .map(|idx| self.row(idx).width())
            .max()
            .unwrap_or(0)
    }

    pub fn row(&self, idx: usize) -> SheetRow<'a> {
        let cells = idx
            .checked_sub(self.row_offset)
            .and_then(|i| self.rows.get(i))
            .copied()
            .unwrap_or(&[]);
        SheetRow::new(cells, self.col_offset)
    }

    /// Rows from absolute row `start` to the end of the sheet.
    pub fn rows_from(&self, start: usize) -> impl Iterator<Item = SheetRow<'a>> + '_ {
        (start..self.len()).map(move |idx| self.row(idx))
    }

    /// Absolute index of the first row matching `predicate`.
    pub fn position<F>(&self, mut predicate: F) -> Option<usize>
    where
        F: FnMut(usize, SheetRow<'a>) -> bool,
    {
        (0..self.len()).find(|idx| predicate(*idx, self.row(*idx)))
    }
}

/// Opens the `.xlsx` file at `path` and hands its sheets to `visit` one at a
/// time; each sheet is dropped before the next is loaded. Sheets that fail to
/// load are logged and skipped.
pub fn for_each_sheet<F>(path: &Path, mut visit: F) -> Result<()>
where
    F: FnMut(&Sheet<'_>),
{
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("Cannot open workbook {}", path.display()))?;

    let sheet_names = workbook.sheet_names().to_vec();
    for sheet_name in sheet_names {
        let range = match workbook.worksheet_range(&sheet_name) {
            Ok(range) => range,
            Err(e) => {
                tracing::warn!(sheet = %sheet_name, error = %e, "cannot read sheet");
                continue;
            }
        };
        visit(&Sheet::from_range(&sheet_name, &range));
    }
    Ok(())
}

/// Counters of one ingestion, summed across sheets and files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestStats {
    pub sheets: usize,
    pub rows: usize,
    pub fields_written: usize,
    pub fields_rejected: usize,
    pub merge: MergeStats,
}

impl IngestStats {
    pub fn absorb(&mut self, other: &IngestStats) {
        self.sheets += other.sheets;
        self.rows += other.rows;
        self.fields_written += other.fields_written;
        self.fields_rejected += other.fields_rejected;
        self.merge.absorb(&other.merge);
    }
}

/// A spreadsheet family that writes into the ledger.
pub trait SourceParser {
    fn kind(&self) -> SourceKind;

    /// Ingests one sheet, row by row.
    fn ingest_sheet(&self, sheet: &Sheet<'_>, ledger: &mut Ledger, settings: &Settings) -> IngestStats;

    /// Ingests every sheet of the workbook at `path`.
    fn ingest_file(&self, path: &Path, ledger: &mut Ledger, settings: &Settings) -> Result<IngestStats> {
        let mut stats = IngestStats::default();
        for_each_sheet(path, |sheet| {
            let sheet_stats = self.ingest_sheet(sheet, ledger, settings);
            tracing::debug!(
                source = self.kind().as_str(),
                sheet = %sheet.name(),
                rows = sheet_stats.rows,
                fields = sheet_stats.fields_written,
                "sheet ingested"
            );
            stats.absorb(&sheet_stats);
        })?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_reads_absolute_positions() {
        let mut range: Range<Data> = Range::new((1, 2), (2, 3));
        range.set_value((1, 2), Data::String("시장".into()));
        range.set_value((2, 3), Data::Float(1.0));

        let sheet = Sheet::from_range("Sheet1", &range);
        assert_eq!(sheet.len(), 3);
        assert_eq!(sheet.width(), 4);
        assert_eq!(sheet.row(0).width(), 0);
        assert_eq!(sheet.row(1).get(2), Some(&Data::String("시장".into())));
        assert_eq!(sheet.row(1).get(0), None);
        assert_eq!(sheet.row(1).text(2), "시장");
        assert_eq!(sheet.row(2).get(3), Some(&Data::Float(1.0)));
        assert_eq!(sheet.row(7).get(3), None);
        assert_eq!(sheet.position(|_, row| row.text(2) == "시장"), Some(1));
    }

    #[test]
    fn test_row_cells_carry_absolute_columns() {
        let cells = vec![Data::String("a".into()), Data::Empty];
        let row = SheetRow::new(&cells, 5);
        let cols: Vec<usize> = row.cells().map(|(col, _)| col).collect();
        assert_eq!(cols, vec![5, 6]);
        assert_eq!(row.width(), 7);
        assert_eq!(row.text(6), "");
    }

    #[test]
    fn test_rows_from_skips_header() {
        let rows = vec![vec![Data::String("h".into())], vec![Data::Int(1)], vec![Data::Int(2)]];
        let sheet = Sheet::from_rows("s", &rows);
        let firsts: Vec<Option<&Data>> = sheet.rows_from(1).map(|r| r.get(0)).collect();
        assert_eq!(firsts, vec![Some(&Data::Int(1)), Some(&Data::Int(2))]);
    }

    #[test]
    fn test_ingest_stats_absorb() {
        let mut total = IngestStats::default();
        let mut one = IngestStats {
            sheets: 1,
            rows: 4,
            fields_written: 10,
            fields_rejected: 1,
            ..IngestStats::default()
        };
        one.merge.created = 4;
        total.absorb(&one);
        total.absorb(&one);
        assert_eq!(total.rows, 8);
        assert_eq!(total.fields_rejected, 2);
        assert_eq!(total.merge.created, 8);
    }

    #[test]
    fn test_missing_workbook_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut visited = 0;
        let result = for_each_sheet(&dir.path().join("missing.xlsx"), |_| visited += 1);
        assert!(result.is_err());
        assert_eq!(visited, 0);
    }
}
