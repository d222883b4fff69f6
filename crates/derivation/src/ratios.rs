use models::accounts::{ASSETS, CAPITAL, QUARTERLY_INCOME, QUARTERLY_ROE};
use models::{AccountValue, Company, LedgerError, Session};

/// Quarterly ROE as a raw ratio of quarterly income to capital. Both operands
/// negative yields 0.0. Missing operands or a non-finite ratio give `None`.
pub fn quarterly_roe(company: &Company, key: Session) -> Option<f64> {
    let income = company.get_account(QUARTERLY_INCOME, key).ok()?.as_f64()?;
    let capital = company.get_account(CAPITAL, key).ok()?.as_f64()?;

    if income < 0.0 && capital < 0.0 {
        return Some(0.0);
    }
    let roe = income / capital;
    roe.is_finite().then_some(roe)
}

/// Writes quarterly ROE at `key` when absent. Returns whether it was written.
pub fn derive_quarterly_roe(company: &mut Company, key: Session) -> Result<bool, LedgerError> {
    if company.has_account(QUARTERLY_ROE, key) {
        return Ok(false);
    }
    let Some(roe) = quarterly_roe(company, key) else {
        return Ok(false);
    };
    company.set_account(QUARTERLY_ROE, key, Some(AccountValue::Float(roe)))?;
    Ok(true)
}

/// Market capitalization over total assets at the latest quarter.
pub fn price_to_book(company: &Company) -> Option<f64> {
    let last = company.last_quarterly().ok()?;
    let assets = company.get_account(ASSETS, last).ok()?.as_f64()?;
    let pbr = company.market_capitalization() as f64 / assets;
    pbr.is_finite().then_some(pbr)
}

/// Updates the company PBR; left untouched when it cannot be computed.
pub fn derive_pbr(company: &mut Company) -> bool {
    match price_to_book(company) {
        Some(pbr) => {
            company.set_pbr(pbr);
            true
        }
        None => false,
    }
}
