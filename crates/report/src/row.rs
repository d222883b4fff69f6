use models::accounts::{CAPITAL, INCOME, QUARTERLY_ROE, QUARTERLY_SALES, RATING, ROE, SALES};
use models::{AccountValue, Company, Session};
use std::fmt;

use crate::layout::ReportLayout;

const QUARTERS_PER_YEAR: usize = 4;

/// One cell of a report row.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportCell {
    Empty,
    Text(String),
    Integer(i64),
    Float(f64),
}

impl fmt::Display for ReportCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportCell::Empty => Ok(()),
            ReportCell::Text(s) => write!(f, "{}", s),
            ReportCell::Integer(v) => write!(f, "{}", v),
            ReportCell::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<Option<i64>> for ReportCell {
    fn from(v: Option<i64>) -> Self {
        v.map_or(ReportCell::Empty, ReportCell::Integer)
    }
}

impl From<Option<f64>> for ReportCell {
    fn from(v: Option<f64>) -> Self {
        v.map_or(ReportCell::Empty, ReportCell::Float)
    }
}

fn integer(value: &AccountValue) -> Option<i64> {
    value.as_f64().map(|v| v as i64)
}

/// Sum of the four most recent quarterly `item` values between the second
/// quarter of the previous year and the last quarter of `year`.
fn trailing_four_quarters(company: &Company, item: &str, year: u32) -> Option<f64> {
    let previous = year.checked_sub(1)?;
    let values = company.values(item, year * 100 + 12, previous * 100 + 6);
    if values.len() < QUARTERS_PER_YEAR {
        return None;
    }
    values
        .values()
        .rev()
        .take(QUARTERS_PER_YEAR)
        .map(|v| v.as_f64())
        .sum::<Option<f64>>()
}

/// Yearly ROE: the reported figure before `cutoff_year`, from then on the
/// sum of the trailing four quarterly ROE values.
pub fn yearly_roe(company: &Company, year: u32, cutoff_year: u32) -> Option<f64> {
    if year < cutoff_year {
        if let Some(roe) = company.get_account(ROE, year).ok().and_then(AccountValue::as_f64) {
            return Some(roe);
        }
    }
    trailing_four_quarters(company, QUARTERLY_ROE, year)
}

/// Yearly sales: the yearly account as reported, otherwise the trailing four
/// quarterly sales converted to display units.
pub fn yearly_sales(company: &Company, year: u32, unit_scale: i64) -> Option<i64> {
    if let Some(sales) = company.get_account(SALES, year).ok().and_then(integer) {
        return Some(sales);
    }
    trailing_four_quarters(company, QUARTERLY_SALES, year).map(|sum| sum as i64 / unit_scale)
}

/// `[SALES, INCOME, CAPITAL]` of `quarter`, zero when absent.
pub fn quarter_finance(company: &Company, quarter: Session) -> [i64; 3] {
    let Ok(finance) = company.get_finance_by_key(quarter) else {
        return [0; 3];
    };
    [SALES, INCOME, CAPITAL].map(|title| finance.account(title).and_then(integer).unwrap_or(0))
}

pub fn company_row(company: &Company, layout: &ReportLayout) -> Vec<ReportCell> {
    let mut row: Vec<ReportCell> = [
        company.code(),
        company.name(),
        company.categories(),
        company.industry_code(),
        company.market(),
        company.comment(),
    ]
    .iter()
    .map(|s| ReportCell::Text(s.to_string()))
    .collect();

    let ratings = company.quarterly_items(RATING);
    row.extend(layout.full_quarters.iter().map(|q| {
        ratings
            .get(q)
            .map_or(ReportCell::Empty, |r| ReportCell::Text(r.to_string()))
    }));

    row.extend(
        layout
            .years
            .iter()
            .map(|y| yearly_roe(company, *y, layout.yearly_roe_cutoff_year).into()),
    );

    row.push(ReportCell::Float(company.pbr()));

    row.extend(
        layout
            .years
            .iter()
            .map(|y| yearly_sales(company, *y, layout.unit_scale).into()),
    );

    row.extend(layout.full_quarters.iter().map(|q| {
        company
            .get_account(QUARTERLY_ROE, *q)
            .ok()
            .and_then(AccountValue::as_f64)
            .into()
    }));

    row.extend(layout.full_quarters.iter().map(|q| {
        company
            .get_account(QUARTERLY_SALES, *q)
            .ok()
            .and_then(integer)
            .map(|v| v / layout.unit_scale)
            .into()
    }));

    row.push(ReportCell::Integer(company.market_capitalization() / layout.unit_scale));

    for quarter in &layout.quarters {
        row.extend(quarter_finance(company, *quarter).map(ReportCell::Integer));
    }
    row
}
