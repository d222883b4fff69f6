//! Financial-statement workbooks: raw cumulative line items per quarter.
//!
//! Every sheet carries an account row (column 0 reads `시장`) with the period
//! row directly beneath it. The account dictionary is picked by template
//! name, taken from the sheet name or, failing that, from the first text
//! cell of the sheet.

use calamine::Data;
use models::{AccountValue, CompanyIdentity, Ledger, Settings, SourceKind};
use utils::{
    header_text, is_all_digits, is_numeric, to_long, FieldKey, HeaderMap, HeaderResolver,
    IngestStats, ResolvedHeader, Sheet, SheetRow, SourceParser, Template,
};

pub const MARKET_INDEX: usize = 0;
pub const ITEM_CODE_INDEX: usize = 1;
pub const NAME_INDEX: usize = 2;
pub const INDUSTRY_INDEX: usize = 4;
pub const CATEGORY_INDEX: usize = 5;
pub const START_OF_DATA_INDEX: usize = 7;

const FIELD_ROW_MARKER: &str = "시장";
const CUMULATIVE_SUFFIX: &str = "/누적";

#[derive(Debug, Clone, Copy, Default)]
pub struct StatementParser;

impl StatementParser {
    pub fn new() -> Self {
        Self
    }

    /// Template named by the sheet, or by the first text cell of row 0.
    pub fn template_for(sheet: &Sheet<'_>) -> Option<Template> {
        Template::from_name(sheet.name()).or_else(|| {
            let first_title = sheet.row(0).cells().find_map(|(_, cell)| match cell {
                Data::String(s) if !s.trim().is_empty() => Some(s.trim()),
                _ => None,
            })?;
            Template::from_name(first_title)
        })
    }
}

/// `YYYYMM/누적` marks a cumulative column; only the `YYYYMM` part is kept.
pub fn normalize_period(period: &str) -> String {
    match period.strip_suffix(CUMULATIVE_SUFFIX) {
        Some(prefix) if is_all_digits(prefix) => period.chars().take(6).collect(),
        _ => period.to_string(),
    }
}

fn is_data_row(row: SheetRow<'_>, settings: &Settings) -> bool {
    match row.get(MARKET_INDEX) {
        Some(Data::String(tag)) => settings.is_market(tag.trim()),
        _ => false,
    }
}

impl HeaderResolver for StatementParser {
    fn resolve(&self, sheet: &Sheet<'_>) -> Option<ResolvedHeader> {
        let field_idx = sheet.position(|idx, row| {
            row.text(MARKET_INDEX) == FIELD_ROW_MARKER && idx + 1 < sheet.len()
        })?;

        let Some(template) = Self::template_for(sheet) else {
            tracing::debug!(sheet = %sheet.name(), "no statement template for sheet");
            return None;
        };

        let period_row = sheet.row(field_idx + 1);

        let mut fields = HeaderMap::new();
        for (col, cell) in sheet.row(field_idx).cells() {
            let title = header_text(Some(cell));
            let Some(account) = template.lookup(&title) else {
                continue;
            };
            let period = normalize_period(&header_text(period_row.get(col)));
            fields.insert(col, FieldKey::with_period(account, period));
        }

        tracing::debug!(
            sheet = %sheet.name(),
            ?template,
            row = field_idx,
            columns = fields.len(),
            "statement header resolved"
        );
        Some(ResolvedHeader {
            row: field_idx + 1,
            fields,
        })
    }
}

impl SourceParser for StatementParser {
    fn kind(&self) -> SourceKind {
        SourceKind::Statement
    }

    fn ingest_sheet(&self, sheet: &Sheet<'_>, ledger: &mut Ledger, settings: &Settings) -> IngestStats {
        let mut stats = IngestStats::default();
        let Some(header) = self.resolve(sheet) else {
            return stats;
        };
        stats.sheets = 1;

        for row in sheet.rows_from(header.row + 1) {
            if !is_data_row(row, settings) {
                continue;
            }

            let identity = CompanyIdentity {
                code: row.text(ITEM_CODE_INDEX),
                market: row.text(MARKET_INDEX),
                name: row.text(NAME_INDEX),
                industry_code: row.text(INDUSTRY_INDEX),
                categories: row.text(CATEGORY_INDEX),
                comment: String::new(),
            };
            if identity.code.is_empty() {
                continue;
            }
            stats.rows += 1;

            let code = identity.code.clone();
            let Some((company, outcome)) = ledger.merge_identity(SourceKind::Statement, identity)
            else {
                stats.merge.record(None);
                continue;
            };
            stats.merge.record(Some(outcome));

            for (col, key) in header.fields.range(START_OF_DATA_INDEX..) {
                let Some(cell) = row.get(*col).filter(|c| is_numeric(c)) else {
                    continue;
                };
                let value = to_long(cell).map(AccountValue::Integer);
                match company.set_account_by_period(&key.account, key.period_str(), value) {
                    Ok(Some(_)) => stats.fields_written += 1,
                    Ok(None) => {}
                    Err(e) => {
                        stats.fields_rejected += 1;
                        tracing::error!(
                            code = %code,
                            account = %key.account,
                            period = %key.period_str(),
                            error = %e,
                            "invalid statement value"
                        );
                    }
                }
            }
        }

        stats
    }
}
