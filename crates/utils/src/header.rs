//! Canonical field keys produced from spreadsheet header rows.

use crate::workbook::Sheet;
use std::collections::BTreeMap;
use std::fmt;

/// A resolved column: a canonical account, optionally bound to a period
/// (`ACCOUNT` or `ACCOUNT-PERIOD` in text form).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldKey {
    pub account: String,
    pub period: Option<String>,
}

impl FieldKey {
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            period: None,
        }
    }

    /// An empty period leaves the key period-less.
    pub fn with_period(account: impl Into<String>, period: impl Into<String>) -> Self {
        let period = period.into();
        Self {
            account: account.into(),
            period: (!period.is_empty()).then_some(period),
        }
    }

    pub fn parse(text: &str) -> Self {
        match text.split_once('-') {
            Some((account, period)) => Self::with_period(account, period),
            None => Self::new(text),
        }
    }

    pub fn period_str(&self) -> &str {
        self.period.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.period {
            Some(period) => write!(f, "{}-{}", self.account, period),
            None => write!(f, "{}", self.account),
        }
    }
}

/// Column index to field key, ascending by column.
pub type HeaderMap = BTreeMap<usize, FieldKey>;

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedHeader {
    /// Last physical row belonging to the header.
    pub row: usize,
    pub fields: HeaderMap,
}

impl ResolvedHeader {
    pub fn column_of(&self, account: &str) -> Option<usize> {
        self.fields
            .iter()
            .find(|(_, key)| key.account == account)
            .map(|(col, _)| *col)
    }
}

/// One implementation per source family. `None` means the sheet carries no
/// recognizable header.
pub trait HeaderResolver {
    fn resolve(&self, sheet: &Sheet<'_>) -> Option<ResolvedHeader>;
}

/// Replaces cells selected by `should_inherit` with the resolved value of the
/// preceding column. The first column never inherits.
pub fn carry_forward<F>(cells: &[String], mut should_inherit: F) -> Vec<String>
where
    F: FnMut(usize, &str) -> bool,
{
    let mut out: Vec<String> = Vec::with_capacity(cells.len());
    for (idx, cell) in cells.iter().enumerate() {
        let value = match out.last() {
            Some(prev) if should_inherit(idx, cell) => prev.clone(),
            _ => cell.clone(),
        };
        out.push(value);
    }
    out
}

/// Single-character fragments are zero padded (`"3"` -> `"03"`).
pub fn pad_period_fragment(fragment: &str) -> String {
    if fragment.chars().count() == 1 {
        format!("0{}", fragment)
    } else {
        fragment.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_field_key_parse_and_display() {
        let key = FieldKey::parse("SALES-202106");
        assert_eq!(key.account, "SALES");
        assert_eq!(key.period.as_deref(), Some("202106"));
        assert_eq!(key.to_string(), "SALES-202106");

        let bare = FieldKey::parse("PBR");
        assert_eq!(bare.period, None);
        assert_eq!(bare.period_str(), "");
        assert_eq!(FieldKey::with_period("PBR", ""), bare);
    }

    #[test]
    fn test_carry_forward_blank_and_zero() {
        let row = strings(&["등급", "", "0", "ROE", ""]);
        let out = carry_forward(&row, |_, c| c.is_empty() || c == "0");
        assert_eq!(out, strings(&["등급", "등급", "등급", "ROE", "ROE"]));
    }

    #[test]
    fn test_carry_forward_first_column_stays() {
        let row = strings(&["", "x"]);
        let out = carry_forward(&row, |_, c| c.is_empty());
        assert_eq!(out, strings(&["", "x"]));
    }

    #[test]
    fn test_pad_period_fragment() {
        assert_eq!(pad_period_fragment("3"), "03");
        assert_eq!(pad_period_fragment("12"), "12");
        assert_eq!(pad_period_fragment(""), "");
    }

    #[test]
    fn test_column_of() {
        let mut fields = HeaderMap::new();
        fields.insert(2, FieldKey::new("CODE"));
        fields.insert(7, FieldKey::new("MARKET_CAPITALIZATION"));
        let header = ResolvedHeader { row: 1, fields };
        assert_eq!(header.column_of("MARKET_CAPITALIZATION"), Some(7));
        assert_eq!(header.column_of("PBR"), None);
    }
}
