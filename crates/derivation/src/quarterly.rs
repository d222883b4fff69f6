use models::accounts::{INCOME, QUARTERLY_INCOME, QUARTERLY_SALES, SALES};
use models::{AccountValue, Company, LedgerError, Session};

/// Cumulative account paired with the single-quarter account derived from it.
const FLOWS: [(&str, &str); 2] = [(SALES, QUARTERLY_SALES), (INCOME, QUARTERLY_INCOME)];

const FIRST_QUARTER_MONTH: Session = 3;
const QUARTER_STEP: Session = 3;

fn numeric(company: &Company, title: &str, key: Session) -> Option<AccountValue> {
    company
        .get_account(title, key)
        .ok()
        .filter(|v| v.as_f64().is_some())
        .cloned()
}

/// Single-quarter value of `cumulative` at `key`: the first quarter is the
/// cumulative figure itself, later quarters subtract the previous quarter.
pub fn quarter_flow(company: &Company, cumulative: &str, key: Session) -> Option<AccountValue> {
    let current = numeric(company, cumulative, key)?;
    if key % 100 == FIRST_QUARTER_MONTH {
        return Some(current);
    }
    let previous = numeric(company, cumulative, key - QUARTER_STEP)?;
    current.checked_sub(&previous)
}

/// Fills missing quarterly sales and income at `key`. Returns the number of
/// accounts written.
pub fn derive_quarterly_flows(company: &mut Company, key: Session) -> Result<usize, LedgerError> {
    let mut written = 0;
    for (cumulative, derived) in FLOWS {
        if company.has_account(derived, key) {
            continue;
        }
        let Some(value) = quarter_flow(company, cumulative, key) else {
            continue;
        };
        company.set_account(derived, key, Some(value))?;
        written += 1;
    }
    Ok(written)
}
