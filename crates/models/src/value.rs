use serde::{Deserialize, Serialize};
use std::fmt;

/// One account entry of a [`crate::Finance`].
///
/// Statement line items are integers in the ledger's default unit, ratios
/// (ROE, PBR) are floats and ratings are text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl AccountValue {
    /// Numeric view of the value; text is never coerced.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AccountValue::Integer(v) => Some(*v as f64),
            AccountValue::Float(v) => Some(*v),
            AccountValue::Text(_) => None,
        }
    }

    pub fn is_empty_text(&self) -> bool {
        matches!(self, AccountValue::Text(s) if s.is_empty())
    }

    /// `self - other`, staying integral when both sides are integers.
    /// Returns `None` for text operands or on integer overflow.
    pub fn checked_sub(&self, other: &AccountValue) -> Option<AccountValue> {
        match (self, other) {
            (AccountValue::Integer(a), AccountValue::Integer(b)) => {
                a.checked_sub(*b).map(AccountValue::Integer)
            }
            _ => {
                let a = self.as_f64()?;
                let b = other.as_f64()?;
                Some(AccountValue::Float(a - b))
            }
        }
    }
}

impl From<i64> for AccountValue {
    fn from(v: i64) -> Self {
        AccountValue::Integer(v)
    }
}

impl From<f64> for AccountValue {
    fn from(v: f64) -> Self {
        AccountValue::Float(v)
    }
}

impl From<String> for AccountValue {
    fn from(v: String) -> Self {
        AccountValue::Text(v)
    }
}

impl From<&str> for AccountValue {
    fn from(v: &str) -> Self {
        AccountValue::Text(v.to_string())
    }
}

impl fmt::Display for AccountValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountValue::Integer(v) => write!(f, "{}", v),
            AccountValue::Float(v) => write!(f, "{}", v),
            AccountValue::Text(s) => write!(f, "{}", s),
        }
    }
}
