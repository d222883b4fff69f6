use models::{Ledger, Session, Settings, quarter_key};
use std::collections::BTreeSet;

const QUARTER_END_MONTHS_DESC: [u32; 4] = [12, 9, 6, 3];

pub const IDENTITY_HEADERS: [&str; 6] = ["코드", "이름", "산업", "산업코드", "시장", "설명"];

pub const TITLE_RATING: &str = "등급";
pub const TITLE_ROE: &str = "ROE";
pub const TITLE_PBR: &str = "PBR";
pub const TITLE_YEARLY_SALES: &str = "SALES";
pub const TITLE_QUARTERLY_ROE: &str = "ROE/4";
pub const TITLE_QUARTERLY_SALES: &str = "SALES/4";
pub const TITLE_MARKET_CAPITALIZATION: &str = "시총";
pub const TITLE_SALES: &str = "매출";
pub const TITLE_INCOME: &str = "순익";
pub const TITLE_CAPITAL: &str = "자본";

/// Column plan shared by every company row of one report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    /// Every year from the latest down to the earliest, gaps included.
    pub years: Vec<u32>,
    /// All four quarter keys of each year in `years`, descending.
    pub full_quarters: Vec<Session>,
    /// Quarter keys present in any company, descending.
    pub quarters: Vec<Session>,
    pub yearly_roe_cutoff_year: u32,
    pub unit_scale: i64,
}

impl ReportLayout {
    /// `None` when no company holds yearly or quarterly data.
    pub fn from_ledger(ledger: &Ledger, settings: &Settings) -> Option<Self> {
        let mut years = BTreeSet::new();
        let mut quarters = BTreeSet::new();
        for company in ledger.companies() {
            years.extend(company.years());
            quarters.extend(company.quarterlies());
        }

        let (min_year, max_year) = (*years.first()?, *years.last()?);
        if quarters.is_empty() {
            return None;
        }

        let years: Vec<u32> = (min_year..=max_year).rev().collect();
        let full_quarters = years
            .iter()
            .flat_map(|year| QUARTER_END_MONTHS_DESC.iter().map(move |m| quarter_key(*year, *m)))
            .collect();

        Some(Self {
            years,
            full_quarters,
            quarters: quarters.into_iter().rev().collect(),
            yearly_roe_cutoff_year: settings.yearly_roe_cutoff_year,
            unit_scale: settings.unit_scale,
        })
    }

    pub fn headers(&self) -> Vec<String> {
        let mut headers: Vec<String> = IDENTITY_HEADERS.iter().map(|h| h.to_string()).collect();

        let labelled = |title: &str, periods: &[u32]| -> Vec<String> {
            periods.iter().map(|p| format!("{}-{}", title, p)).collect()
        };

        headers.extend(labelled(TITLE_RATING, &self.full_quarters));
        headers.extend(labelled(TITLE_ROE, &self.years));
        headers.push(TITLE_PBR.to_string());
        headers.extend(labelled(TITLE_YEARLY_SALES, &self.years));
        headers.extend(labelled(TITLE_QUARTERLY_ROE, &self.full_quarters));
        headers.extend(labelled(TITLE_QUARTERLY_SALES, &self.full_quarters));
        headers.push(TITLE_MARKET_CAPITALIZATION.to_string());
        for quarter in &self.quarters {
            for title in [TITLE_SALES, TITLE_INCOME, TITLE_CAPITAL] {
                headers.push(format!("{}-{}", title, quarter));
            }
        }
        headers
    }
}
