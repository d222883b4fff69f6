//! Post-ingestion pass filling metrics no single source carries:
//! single-quarter sales and income, quarterly ROE, and PBR.
//!
//! Every derived account is written only when absent, so a second run over
//! the same ledger changes nothing and a quarter derived before its base
//! figures changed keeps its earlier value.

pub mod quarterly;
pub mod ratios;

use models::{Company, Ledger};
use rayon::prelude::*;

pub use quarterly::{derive_quarterly_flows, quarter_flow};
pub use ratios::{derive_pbr, derive_quarterly_roe, price_to_book, quarterly_roe};

/// What one derivation pass wrote.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivationStats {
    pub companies: usize,
    pub quarterly_flows: usize,
    pub quarterly_roe: usize,
    pub pbr: usize,
    pub rejected: usize,
}

impl DerivationStats {
    pub fn combine(mut self, other: DerivationStats) -> Self {
        self.companies += other.companies;
        self.quarterly_flows += other.quarterly_flows;
        self.quarterly_roe += other.quarterly_roe;
        self.pbr += other.pbr;
        self.rejected += other.rejected;
        self
    }
}

/// Derives one company, walking its quarters in ascending order.
pub fn derive_company(company: &mut Company) -> DerivationStats {
    let mut stats = DerivationStats {
        companies: 1,
        ..DerivationStats::default()
    };

    for key in company.quarterlies() {
        match derive_quarterly_flows(company, key) {
            Ok(written) => stats.quarterly_flows += written,
            Err(e) => {
                stats.rejected += 1;
                tracing::warn!(code = company.code(), quarter = key, error = %e, "quarterly flow not derived");
            }
        }

        match derive_quarterly_roe(company, key) {
            Ok(true) => stats.quarterly_roe += 1,
            Ok(false) => {}
            Err(e) => {
                stats.rejected += 1;
                tracing::warn!(code = company.code(), quarter = key, error = %e, "quarterly ROE not derived");
            }
        }
    }

    if derive_pbr(company) {
        stats.pbr += 1;
    }
    stats
}

/// Runs the pass over every company. Companies are independent, so the work
/// is spread over the rayon pool.
pub fn derive_ledger(ledger: &mut Ledger) -> DerivationStats {
    let companies: Vec<&mut Company> = ledger.companies_mut().collect();
    let stats = companies
        .into_par_iter()
        .map(derive_company)
        .reduce(DerivationStats::default, DerivationStats::combine);

    tracing::info!(
        companies = stats.companies,
        quarterly_flows = stats.quarterly_flows,
        quarterly_roe = stats.quarterly_roe,
        pbr = stats.pbr,
        "derivation finished"
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::accounts::*;
    use models::{AccountValue, CompanyIdentity, SourceKind};

    fn ledger_with(code: &str, entries: &[(&str, u32, i64)]) -> Ledger {
        let mut ledger = Ledger::new();
        let (company, _) = ledger
            .merge_identity(SourceKind::Statement, CompanyIdentity::from_code(code))
            .unwrap();
        for (title, key, value) in entries {
            company
                .set_account(title, *key, Some(AccountValue::Integer(*value)))
                .unwrap();
        }
        ledger
    }

    #[test]
    fn test_cumulative_sales_become_quarterly() {
        let mut ledger = ledger_with("A005930", &[(SALES, 202103, 100), (SALES, 202106, 280)]);
        derive_ledger(&mut ledger);

        let c = ledger.get("A005930").unwrap();
        assert_eq!(c.get_account(QUARTERLY_SALES, 202103).unwrap(), &AccountValue::Integer(100));
        assert_eq!(c.get_account(QUARTERLY_SALES, 202106).unwrap(), &AccountValue::Integer(180));
    }

    #[test]
    fn test_roe_uses_derived_income() {
        let mut ledger = ledger_with(
            "A005930",
            &[
                (INCOME, 202103, -50),
                (CAPITAL, 202103, -200),
                (INCOME, 202106, 0),
                (CAPITAL, 202106, 200),
            ],
        );
        let stats = derive_ledger(&mut ledger);
        assert_eq!(stats.quarterly_roe, 2);

        let c = ledger.get("A005930").unwrap();
        assert_eq!(c.get_account(QUARTERLY_ROE, 202103).unwrap(), &AccountValue::Float(0.0));
        // Q2 income: 0 - (-50) = 50
        assert_eq!(c.get_account(QUARTERLY_INCOME, 202106).unwrap(), &AccountValue::Integer(50));
        assert_eq!(c.get_account(QUARTERLY_ROE, 202106).unwrap(), &AccountValue::Float(0.25));
    }

    #[test]
    fn test_second_pass_is_idempotent() {
        let mut ledger = ledger_with(
            "A005930",
            &[
                (SALES, 202103, 100),
                (SALES, 202106, 280),
                (INCOME, 202103, 10),
                (CAPITAL, 202103, 100),
                (ASSETS, 202106, 50),
            ],
        );
        ledger
            .get_mut("A005930")
            .unwrap()
            .set_market_capitalization(100);

        derive_ledger(&mut ledger);
        let once = ledger.clone();
        let stats = derive_ledger(&mut ledger);

        assert_eq!(ledger, once);
        assert_eq!(stats.quarterly_flows, 0);
        assert_eq!(stats.quarterly_roe, 0);
        assert_eq!(ledger.get("A005930").unwrap().pbr(), 2.0);
    }

    #[test]
    fn test_stale_values_are_not_refreshed() {
        let mut ledger = ledger_with("A005930", &[(SALES, 202103, 100), (SALES, 202106, 280)]);
        derive_ledger(&mut ledger);

        ledger
            .get_mut("A005930")
            .unwrap()
            .set_account(SALES, 202106, Some(AccountValue::Integer(300)))
            .unwrap();
        derive_ledger(&mut ledger);

        let c = ledger.get("A005930").unwrap();
        assert_eq!(c.get_account(QUARTERLY_SALES, 202106).unwrap(), &AccountValue::Integer(180));
    }

    #[test]
    fn test_stats_cover_every_company() {
        let mut ledger = ledger_with("A005930", &[(SALES, 202103, 1)]);
        ledger.merge_identity(SourceKind::Catalog, CompanyIdentity::from_code("A000020"));

        let stats = derive_ledger(&mut ledger);
        assert_eq!(stats.companies, 2);
        assert_eq!(stats.quarterly_flows, 1);
    }
}
