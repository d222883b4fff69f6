use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::value::AccountValue;

/// Accounts of one company for one yearly or quarterly session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Finance {
    values: BTreeMap<String, AccountValue>,
}

impl Finance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(&self, title: &str) -> Option<&AccountValue> {
        self.values.get(title)
    }

    pub fn has_account(&self, title: &str) -> bool {
        self.values.contains_key(title)
    }

    /// Unconditional write. Validation lives in [`crate::Company::set_account`].
    pub fn set_account(&mut self, title: impl Into<String>, value: AccountValue) {
        self.values.insert(title.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AccountValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
