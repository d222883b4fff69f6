//! Market-data workbooks: capitalization and PBR for companies already in the
//! ledger. Rows never create companies.

use calamine::Data;
use models::accounts::{CODE, MARKET_CAPITALIZATION, PBR};
use models::{CompanyIdentity, Ledger, Settings, SourceKind};
use utils::{
    cell_str, header_text, is_all_digits, to_double, to_long, FieldKey, HeaderMap, HeaderResolver,
    IngestStats, ResolvedHeader, Sheet, SourceParser, Template,
};

pub const MARKET_INDEX: usize = 3;
pub const ITEM_CODE_INDEX: usize = 2;
pub const MARKET_CAPITALIZATION_INDEX: usize = 7;
pub const PBR_INDEX: usize = 11;
/// First data row when the sheet has no recognizable header.
pub const START_OF_DATA_ROW: usize = 3;

const HEADER_MARKER: &str = "시장";
const CODE_DIGITS: usize = 6;

#[derive(Debug, Clone, Copy, Default)]
pub struct MarketParser;

impl MarketParser {
    pub fn new() -> Self {
        Self
    }
}

/// Digits-only codes get `prefix`; codes already of the form prefix+digits are
/// kept; anything else is not a company code.
pub fn normalize_code(raw: &str, prefix: &str) -> Option<String> {
    let code = raw.trim();
    if is_all_digits(code) {
        return Some(format!("{}{}", prefix, code));
    }
    match code.strip_prefix(prefix) {
        Some(digits) if is_all_digits(digits) => Some(code.to_string()),
        _ => None,
    }
}

/// Code cell as text. A numeric cell has lost its leading zeros, so its
/// digits are padded back to the code width.
pub fn code_text(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::Int(v)) if *v >= 0 => format!("{:0width$}", v, width = CODE_DIGITS),
        Some(Data::Float(v)) if *v >= 0.0 && v.fract() == 0.0 => {
            format!("{:0width$}", *v as i64, width = CODE_DIGITS)
        }
        other => cell_str(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

struct Columns {
    code: usize,
    capitalization: usize,
    pbr: usize,
}

impl Columns {
    fn from_header(header: Option<&ResolvedHeader>) -> Self {
        let find = |account: &str, fallback: usize| {
            header
                .and_then(|h| h.column_of(account))
                .unwrap_or(fallback)
        };
        Self {
            code: find(CODE, ITEM_CODE_INDEX),
            capitalization: find(MARKET_CAPITALIZATION, MARKET_CAPITALIZATION_INDEX),
            pbr: find(PBR, PBR_INDEX),
        }
    }
}

impl HeaderResolver for MarketParser {
    fn resolve(&self, sheet: &Sheet<'_>) -> Option<ResolvedHeader> {
        let header_idx = sheet.position(|_, row| row.text(MARKET_INDEX) == HEADER_MARKER)?;

        let fields: HeaderMap = sheet
            .row(header_idx)
            .cells()
            .filter_map(|(col, cell)| {
                Template::Market
                    .lookup(&header_text(Some(cell)))
                    .map(|account| (col, FieldKey::new(account)))
            })
            .collect();

        tracing::debug!(sheet = %sheet.name(), row = header_idx, columns = fields.len(), "market header resolved");
        Some(ResolvedHeader {
            row: header_idx,
            fields,
        })
    }
}

impl SourceParser for MarketParser {
    fn kind(&self) -> SourceKind {
        SourceKind::Market
    }

    fn ingest_sheet(&self, sheet: &Sheet<'_>, ledger: &mut Ledger, settings: &Settings) -> IngestStats {
        let mut stats = IngestStats {
            sheets: 1,
            ..IngestStats::default()
        };

        let header = self.resolve(sheet);
        let columns = Columns::from_header(header.as_ref());
        let start = header.as_ref().map_or(START_OF_DATA_ROW, |h| h.row + 1);

        for row in sheet.rows_from(start) {
            let Some(code) = normalize_code(&code_text(row.get(columns.code)), &settings.market_code_prefix)
            else {
                continue;
            };
            stats.rows += 1;

            let Some((company, outcome)) =
                ledger.merge_identity(SourceKind::Market, CompanyIdentity::from_code(code.as_str()))
            else {
                stats.merge.record(None);
                continue;
            };
            stats.merge.record(Some(outcome));

            if let Some(capitalization) = row.get(columns.capitalization).and_then(to_long) {
                match capitalization.checked_mul(settings.unit_scale) {
                    Some(value) => {
                        company.set_market_capitalization(value);
                        stats.fields_written += 1;
                    }
                    None => {
                        stats.fields_rejected += 1;
                        tracing::error!(code = %code, capitalization, "market capitalization overflows the ledger unit");
                    }
                }
            }

            if let Some(pbr) = row.get(columns.pbr).and_then(to_double) {
                company.set_pbr(pbr);
                stats.fields_written += 1;
            }
        }

        stats
    }
}
