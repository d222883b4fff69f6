use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::LedgerError;
use crate::finance::Finance;
use crate::value::AccountValue;

/// Reporting period key: a 4-digit year for yearly data or
/// `year * 100 + quarter_end_month` for quarterly data.
pub type Session = u32;

/// Sessions above this value are quarterly, everything else is yearly.
pub const YEARLY_SESSION_MAX: Session = 9999;

pub fn is_quarterly(session: Session) -> bool {
    session > YEARLY_SESSION_MAX
}

pub fn quarter_key(year: u32, month: u32) -> Session {
    year * 100 + month
}

/// Identity fields a source carries for a company row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyIdentity {
    pub code: String,
    pub market: String,
    pub name: String,
    pub industry_code: String,
    pub categories: String,
    pub comment: String,
}

impl CompanyIdentity {
    /// Identity known only by its join key (market data rows).
    pub fn from_code(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    code: String,
    market: String,
    name: String,
    industry_code: String,
    categories: String,
    comment: String,
    pbr: f64,
    market_capitalization: i64,
    yearly_financial: BTreeMap<Session, Finance>,
    quarterly_financial: BTreeMap<Session, Finance>,
}

impl Company {
    pub fn new(identity: CompanyIdentity) -> Self {
        Self {
            code: identity.code,
            market: identity.market,
            name: identity.name,
            industry_code: identity.industry_code,
            categories: identity.categories,
            comment: identity.comment,
            pbr: 0.0,
            market_capitalization: 0,
            yearly_financial: BTreeMap::new(),
            quarterly_financial: BTreeMap::new(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn market(&self) -> &str {
        &self.market
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn industry_code(&self) -> &str {
        &self.industry_code
    }

    pub fn categories(&self) -> &str {
        &self.categories
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    pub fn pbr(&self) -> f64 {
        self.pbr
    }

    pub fn set_pbr(&mut self, pbr: f64) {
        self.pbr = pbr;
    }

    pub fn market_capitalization(&self) -> i64 {
        self.market_capitalization
    }

    pub fn set_market_capitalization(&mut self, value: i64) {
        self.market_capitalization = value;
    }

    pub fn yearly_financial(&self) -> &BTreeMap<Session, Finance> {
        &self.yearly_financial
    }

    pub fn quarterly_financial(&self) -> &BTreeMap<Session, Finance> {
        &self.quarterly_financial
    }

    fn financials(&self, session: Session) -> &BTreeMap<Session, Finance> {
        if is_quarterly(session) {
            &self.quarterly_financial
        } else {
            &self.yearly_financial
        }
    }

    fn financials_mut(&mut self, session: Session) -> &mut BTreeMap<Session, Finance> {
        if is_quarterly(session) {
            &mut self.quarterly_financial
        } else {
            &mut self.yearly_financial
        }
    }

    pub fn has_account(&self, title: &str, session: Session) -> bool {
        self.financials(session)
            .get(&session)
            .is_some_and(|finance| finance.has_account(title))
    }

    pub fn get_account(&self, title: &str, session: Session) -> Result<&AccountValue, LedgerError> {
        self.financials(session)
            .get(&session)
            .and_then(|finance| finance.account(title))
            .ok_or_else(|| LedgerError::NotFound {
                title: title.to_string(),
                session,
            })
    }

    pub fn get_account_or(&self, title: &str, session: Session, default: AccountValue) -> AccountValue {
        self.get_account(title, session).cloned().unwrap_or(default)
    }

    /// Writes `value` into the yearly or quarterly ledger selected by `session`.
    ///
    /// An absent value is a no-op; an empty string is rejected and leaves the
    /// ledger unchanged.
    pub fn set_account(
        &mut self,
        title: &str,
        session: Session,
        value: Option<AccountValue>,
    ) -> Result<(), LedgerError> {
        let Some(value) = value else {
            return Ok(());
        };
        if value.is_empty_text() {
            return Err(LedgerError::InvalidValue {
                title: title.to_string(),
            });
        }

        self.financials_mut(session)
            .entry(session)
            .or_default()
            .set_account(title, value);
        Ok(())
    }

    pub fn set_quarterly_account(
        &mut self,
        title: &str,
        year: u32,
        month: u32,
        value: Option<AccountValue>,
    ) -> Result<(), LedgerError> {
        self.set_account(title, quarter_key(year, month), value)
    }

    /// Writes using a textual period as found in sheet headers: `YYYY` goes to
    /// the yearly ledger, `YYYYMM` to the quarterly one. Any other text,
    /// including a period with a leading zero, is ignored. Returns the session written, if any.
    pub fn set_account_by_period(
        &mut self,
        title: &str,
        period: &str,
        value: Option<AccountValue>,
    ) -> Result<Option<Session>, LedgerError> {
        if value.is_none() {
            return Ok(None);
        }
        if !period.bytes().all(|b| b.is_ascii_digit()) || period.starts_with('0') {
            return Ok(None);
        }

        let session = match period.len() {
            4 | 6 => period.parse::<Session>().ok(),
            _ => None,
        };
        let Some(session) = session else {
            return Ok(None);
        };

        self.set_account(title, session, value)?;
        Ok(Some(session))
    }

    pub fn get_finance(&self, year: u32, month: u32) -> Result<&Finance, LedgerError> {
        self.get_finance_by_key(quarter_key(year, month))
    }

    pub fn get_finance_by_key(&self, key: Session) -> Result<&Finance, LedgerError> {
        self.quarterly_financial
            .get(&key)
            .ok_or(LedgerError::FinanceNotFound(key))
    }

    /// Years of the yearly ledger plus years implied by quarterly keys, ascending.
    pub fn years(&self) -> BTreeSet<u32> {
        self.yearly_financial
            .keys()
            .copied()
            .chain(self.quarterly_financial.keys().map(|q| q / 100))
            .collect()
    }

    pub fn quarterlies(&self) -> BTreeSet<Session> {
        self.quarterly_financial.keys().copied().collect()
    }

    pub fn quarterly_items(&self, item: &str) -> BTreeMap<Session, &AccountValue> {
        self.quarterly_financial
            .iter()
            .filter_map(|(quarter, finance)| finance.account(item).map(|v| (*quarter, v)))
            .collect()
    }

    /// Quarterly values of `item` between `a` and `b` inclusive, in either order.
    pub fn values(&self, item: &str, a: Session, b: Session) -> BTreeMap<Session, &AccountValue> {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        self.quarterly_financial
            .range(low..=high)
            .filter_map(|(quarter, finance)| finance.account(item).map(|v| (*quarter, v)))
            .collect()
    }

    pub fn first_quarterly(&self) -> Result<Session, LedgerError> {
        self.quarterly_financial
            .keys()
            .next()
            .copied()
            .ok_or_else(|| LedgerError::NoQuarterlyData(self.code.clone()))
    }

    pub fn last_quarterly(&self) -> Result<Session, LedgerError> {
        self.quarterly_financial
            .keys()
            .next_back()
            .copied()
            .ok_or_else(|| LedgerError::NoQuarterlyData(self.code.clone()))
    }

    pub fn to_json(&self) -> Value {
        json!({
            "기본정보": {
                "시장": self.market,
                "종목코드": self.code,
                "이름": self.name,
                "산업코드": self.industry_code,
                "업종": self.categories,
                "설명": self.comment,
                "PBR": self.pbr,
                "시총": self.market_capitalization,
            },
            "회기재무": sessions_to_json(&self.yearly_financial),
            "분기재무": sessions_to_json(&self.quarterly_financial),
        })
    }
}

fn sessions_to_json(financials: &BTreeMap<Session, Finance>) -> Value {
    let mut out = Map::new();
    for (session, finance) in financials {
        let accounts = finance
            .iter()
            .map(|(title, value)| (title.clone(), json!(value)))
            .collect::<Map<String, Value>>();
        out.insert(session.to_string(), Value::Object(accounts));
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company() -> Company {
        Company::new(CompanyIdentity {
            code: "A005930".to_string(),
            market: "KS".to_string(),
            name: "Samsung Electronics".to_string(),
            industry_code: "032604".to_string(),
            categories: "Semiconductors".to_string(),
            comment: String::new(),
        })
    }

    #[test]
    fn test_set_then_get_finance_for_every_quarter() {
        let mut c = company();
        for year in [2019u32, 2020, 2021] {
            for month in [3u32, 6, 9, 12] {
                let v = AccountValue::Integer((year * 10 + month) as i64);
                c.set_quarterly_account("SALES", year, month, Some(v.clone()))
                    .unwrap();

                let finance = c.get_finance(year, month).unwrap();
                assert_eq!(finance.account("SALES"), Some(&v));
                assert_eq!(c.get_account("SALES", year * 100 + month).unwrap(), &v);
            }
        }
        assert_eq!(c.quarterlies().len(), 12);
    }

    #[test]
    fn test_empty_string_is_rejected_and_ledger_unchanged() {
        let mut c = company();
        let before = c.clone();

        let err = c.set_account("RATING", 202103, Some(AccountValue::from("")));
        assert!(matches!(err, Err(LedgerError::InvalidValue { .. })));
        assert_eq!(c, before);
    }

    #[test]
    fn test_absent_value_is_noop() {
        let mut c = company();
        let before = c.clone();

        assert!(c.set_account("SALES", 2021, None).is_ok());
        assert!(c.set_account("SALES", 202103, None).is_ok());
        assert_eq!(c, before);
        assert!(c.yearly_financial().is_empty());
    }

    #[test]
    fn test_session_magnitude_dispatch() {
        let mut c = company();
        c.set_account("ROE", 2019, Some(AccountValue::Float(0.1)))
            .unwrap();
        c.set_account("ROE", 201912, Some(AccountValue::Float(0.02)))
            .unwrap();

        assert_eq!(c.yearly_financial().len(), 1);
        assert_eq!(c.quarterly_financial().len(), 1);
        assert_eq!(c.get_account("ROE", 2019).unwrap(), &AccountValue::Float(0.1));
        assert_eq!(
            c.get_account("ROE", 201912).unwrap(),
            &AccountValue::Float(0.02)
        );
        assert!(!c.has_account("ROE", 2020));
    }

    #[test]
    fn test_get_account_not_found_and_default() {
        let mut c = company();
        c.set_account("SALES", 202103, Some(AccountValue::Integer(1)))
            .unwrap();

        assert_eq!(
            c.get_account("INCOME", 202103),
            Err(LedgerError::NotFound {
                title: "INCOME".to_string(),
                session: 202103
            })
        );
        assert!(matches!(
            c.get_account("SALES", 202106),
            Err(LedgerError::NotFound { .. })
        ));
        assert_eq!(
            c.get_account_or("INCOME", 202103, AccountValue::Integer(0)),
            AccountValue::Integer(0)
        );
    }

    #[test]
    fn test_set_account_by_period() {
        let mut c = company();
        assert_eq!(
            c.set_account_by_period("SALES", "2020", Some(AccountValue::Integer(5))),
            Ok(Some(2020))
        );
        assert_eq!(
            c.set_account_by_period("SALES", "202106", Some(AccountValue::Integer(6))),
            Ok(Some(202106))
        );
        assert_eq!(
            c.set_account_by_period("SALES", "2021/06", Some(AccountValue::Integer(7))),
            Ok(None)
        );
        assert_eq!(
            c.set_account_by_period("SALES", "20211", Some(AccountValue::Integer(8))),
            Ok(None)
        );
        assert_eq!(c.get_account("SALES", 2020).unwrap(), &AccountValue::Integer(5));
        assert_eq!(
            c.get_account("SALES", 202106).unwrap(),
            &AccountValue::Integer(6)
        );
    }

    #[test]
    fn test_period_with_leading_zero_is_ignored() {
        let mut c = company();
        assert_eq!(
            c.set_account_by_period("SALES", "0000", Some(AccountValue::Integer(1))),
            Ok(None)
        );
        assert_eq!(
            c.set_account_by_period("SALES", "020106", Some(AccountValue::Integer(1))),
            Ok(None)
        );
        assert!(c.years().is_empty());
        assert!(c.quarterlies().is_empty());
    }

    #[test]
    fn test_years_merge_yearly_and_quarterly() {
        let mut c = company();
        c.set_account("ROE", 2018, Some(AccountValue::Float(0.1)))
            .unwrap();
        c.set_account("SALES", 202112, Some(AccountValue::Integer(1)))
            .unwrap();
        c.set_account("SALES", 201903, Some(AccountValue::Integer(1)))
            .unwrap();

        let years: Vec<u32> = c.years().into_iter().collect();
        assert_eq!(years, vec![2018, 2019, 2021]);
    }

    #[test]
    fn test_values_range_is_symmetric() {
        let mut c = company();
        for key in [202012u32, 202103, 202106, 202109, 202112, 202203] {
            c.set_account("SALES", key, Some(AccountValue::Integer(key as i64)))
                .unwrap();
        }

        let forward = c.values("SALES", 202103, 202112);
        let backward = c.values("SALES", 202112, 202103);
        assert_eq!(forward, backward);
        assert_eq!(
            forward.keys().copied().collect::<Vec<_>>(),
            vec![202103, 202106, 202109, 202112]
        );
    }

    #[test]
    fn test_first_and_last_quarterly() {
        let mut c = company();
        assert_eq!(
            c.first_quarterly(),
            Err(LedgerError::NoQuarterlyData("A005930".to_string()))
        );
        assert!(c.last_quarterly().is_err());

        c.set_account("SALES", 202106, Some(AccountValue::Integer(1)))
            .unwrap();
        c.set_account("SALES", 202003, Some(AccountValue::Integer(1)))
            .unwrap();
        c.set_account("SALES", 2022, Some(AccountValue::Integer(1)))
            .unwrap();

        assert_eq!(c.first_quarterly(), Ok(202003));
        assert_eq!(c.last_quarterly(), Ok(202106));
    }

    #[test]
    fn test_quarterly_items_skips_missing() {
        let mut c = company();
        c.set_account("RATING", 202103, Some(AccountValue::from("A")))
            .unwrap();
        c.set_account("SALES", 202106, Some(AccountValue::Integer(3)))
            .unwrap();

        let ratings = c.quarterly_items("RATING");
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings.get(&202103), Some(&&AccountValue::from("A")));
    }

    #[test]
    fn test_to_json_shape() {
        let mut c = company();
        c.set_account("SALES", 2021, Some(AccountValue::Integer(10)))
            .unwrap();
        c.set_account("QUARTERLY_ROE", 202103, Some(AccountValue::Float(0.5)))
            .unwrap();

        let json = c.to_json();
        assert_eq!(json["기본정보"]["종목코드"], "A005930");
        assert_eq!(json["기본정보"]["시장"], "KS");
        assert_eq!(json["회기재무"]["2021"]["SALES"], 10);
        assert_eq!(json["분기재무"]["202103"]["QUARTERLY_ROE"], 0.5);
    }
}
