//! Full-catalog workbooks: identity authority, pre-derived columns and ratings.
//!
//! The header spans sheet rows 0-2 with merged groups. Row 0 holds the account
//! title (or a year), row 1 the period group and row 2 the period fragment or,
//! under a year column, the account title.

use anyhow::{anyhow, bail, Result};
use calamine::Data;
use models::accounts::*;
use models::{AccountValue, Company, CompanyIdentity, Ledger, Session, Settings, SourceKind};
use utils::{
    carry_forward, header_text, is_all_digits, pad_period_fragment, to_long, to_percent, FieldKey,
    HeaderMap, HeaderResolver, IngestStats, ResolvedHeader, Sheet, SheetRow, SourceParser,
    Template,
};

pub const ITEM_CODE_INDEX: usize = 0;
pub const NAME_INDEX: usize = 1;
pub const CATEGORY_INDEX: usize = 2;
pub const INDUSTRY_INDEX: usize = 3;
pub const MARKET_INDEX: usize = 4;
pub const COMMENT_INDEX: usize = 5;
pub const START_OF_DATA_INDEX: usize = 6;

const HEADER_ROWS: usize = 3;
const RATING_BASE_YEAR: u32 = 2020;

/// Row-0 titles whose row-1 cells repeat across a merged group.
const REPEATING_GROUPS: &[&str] = &["등급", "ROE/4", "SALES/4"];

const ACCEPTED_ACCOUNTS: &[&str] = &[
    RATING,
    ROE,
    PBR,
    QUARTERLY_ROE,
    QUARTERLY_SALES,
    MARKET_CAPITALIZATION,
    INCOME,
    CAPITAL,
    SALES,
];

#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogParser;

impl CatalogParser {
    pub fn new() -> Self {
        Self
    }
}

fn header_cells(row: SheetRow<'_>, width: usize) -> Vec<String> {
    (0..width).map(|col| header_text(row.get(col))).collect()
}

/// Rating periods: `YQ` counts years from 2020, `YYYYQ` is explicit. The
/// quarter digit becomes its end month. Anything else passes through.
pub fn rating_period(period: &str) -> String {
    if !is_all_digits(period) {
        return period.to_string();
    }
    let Ok(raw) = period.parse::<u32>() else {
        return period.to_string();
    };
    match period.len() {
        2 => ((RATING_BASE_YEAR + raw / 10) * 100 + raw % 10 * 3).to_string(),
        5 => ((raw / 10) * 100 + raw % 10 * 3).to_string(),
        _ => period.to_string(),
    }
}

fn session_of(key: &FieldKey) -> Result<Session> {
    key.period_str()
        .parse::<Session>()
        .map_err(|_| anyhow!("period '{}' is not numeric", key.period_str()))
}

fn is_data_row(row: SheetRow<'_>, settings: &Settings) -> bool {
    match row.get(MARKET_INDEX) {
        Some(Data::String(tag)) => settings.is_market(tag.trim()),
        _ => false,
    }
}

/// Writes one catalog cell. Returns whether the ledger changed.
fn apply_field(company: &mut Company, key: &FieldKey, cell: &Data, settings: &Settings) -> Result<bool> {
    let account = key.account.as_str();
    match account {
        SALES | INCOME | CAPITAL => {
            if company.has_account(account, session_of(key)?) {
                return Ok(false);
            }
            let value = to_long(cell).map(AccountValue::Integer);
            Ok(company.set_account_by_period(account, key.period_str(), value)?.is_some())
        }
        QUARTERLY_SALES => {
            if company.has_account(account, session_of(key)?) {
                return Ok(false);
            }
            let value = match to_long(cell) {
                Some(v) => Some(AccountValue::Integer(
                    v.checked_mul(settings.unit_scale)
                        .ok_or_else(|| anyhow!("value {} overflows the ledger unit", v))?,
                )),
                None => None,
            };
            Ok(company.set_account_by_period(account, key.period_str(), value)?.is_some())
        }
        ROE | QUARTERLY_ROE => {
            if company.has_account(account, session_of(key)?) {
                return Ok(false);
            }
            let value = to_percent(cell).map(AccountValue::Float);
            Ok(company.set_account_by_period(account, key.period_str(), value)?.is_some())
        }
        RATING => {
            let Data::String(text) = cell else {
                bail!("rating cell is not text");
            };
            let period = rating_period(key.period_str());
            let value = Some(AccountValue::from(text.trim()));
            Ok(company.set_account_by_period(account, &period, value)?.is_some())
        }
        PBR => match cell {
            Data::Float(v) => {
                company.set_pbr(*v);
                Ok(true)
            }
            Data::Int(v) => {
                company.set_pbr(*v as f64);
                Ok(true)
            }
            _ => Ok(false),
        },
        MARKET_CAPITALIZATION => match cell {
            Data::Float(_) | Data::Int(_) | Data::String(_) => {
                let value = to_long(cell)
                    .ok_or_else(|| anyhow!("market capitalization '{}' is not a number", cell))?;
                company.set_market_capitalization(value);
                Ok(true)
            }
            _ => Ok(false),
        },
        _ => Ok(false),
    }
}

impl HeaderResolver for CatalogParser {
    fn resolve(&self, sheet: &Sheet<'_>) -> Option<ResolvedHeader> {
        let width = sheet.row(0).width();
        if sheet.len() < HEADER_ROWS || width == 0 {
            return None;
        }

        let titles = carry_forward(&header_cells(sheet.row(0), width), |_, cell| {
            cell.is_empty() || cell == "0"
        });
        let groups = carry_forward(&header_cells(sheet.row(1), width), |col, cell| {
            cell.is_empty() && REPEATING_GROUPS.contains(&titles[col].as_str())
        });
        let fragments = header_cells(sheet.row(2), width);

        let mut fields = HeaderMap::new();
        for col in 0..width {
            let title = &titles[col];
            let key = if is_all_digits(title) {
                Template::Catalog
                    .lookup(&fragments[col])
                    .map(|account| FieldKey::with_period(account, title.as_str()))
            } else {
                let period = format!("{}{}", groups[col], pad_period_fragment(&fragments[col]));
                Template::Catalog
                    .lookup(title)
                    .map(|account| FieldKey::with_period(account, period))
            };
            if let Some(key) = key {
                fields.insert(col, key);
            }
        }

        tracing::debug!(sheet = %sheet.name(), columns = fields.len(), "catalog header resolved");
        Some(ResolvedHeader {
            row: HEADER_ROWS - 1,
            fields,
        })
    }
}

impl SourceParser for CatalogParser {
    fn kind(&self) -> SourceKind {
        SourceKind::Catalog
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
                comment: row.text(COMMENT_INDEX),
            };
            if identity.code.is_empty() {
                continue;
            }
            stats.rows += 1;

            let code = identity.code.clone();
            let Some((company, outcome)) = ledger.merge_identity(SourceKind::Catalog, identity)
            else {
                stats.merge.record(None);
                continue;
            };
            stats.merge.record(Some(outcome));

            for (col, key) in header.fields.range(START_OF_DATA_INDEX..) {
                if !ACCEPTED_ACCOUNTS.contains(&key.account.as_str()) {
                    continue;
                }
                let Some(cell) = row.get(*col).filter(|c| !matches!(c, Data::Empty)) else {
                    continue;
                };

                match apply_field(company, key, cell, settings) {
                    Ok(true) => stats.fields_written += 1,
                    Ok(false) => {}
                    Err(e) => {
                        stats.fields_rejected += 1;
                        tracing::error!(
                            code = %code,
                            account = %key.account,
                            period = %key.period_str(),
                            error = %e,
                            "invalid catalog value"
                        );
                    }
                }
            }
        }

        stats
    }
}
