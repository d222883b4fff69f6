use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::company::{Company, CompanyIdentity};

/// The three spreadsheet families that write into the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Full catalog: authoritative identity, pre-derived columns, ratings.
    Catalog,
    /// Financial statements: raw cumulative line items.
    Statement,
    /// Market data: capitalization and PBR overrides.
    Market,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Catalog => "catalog",
            SourceKind::Statement => "statement",
            SourceKind::Market => "market",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Created,
    Updated,
    Unchanged,
}

/// Statistics about identity merges of one ingestion run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeStats {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
}

impl MergeStats {
    pub fn record(&mut self, outcome: Option<MergeOutcome>) {
        match outcome {
            Some(MergeOutcome::Created) => self.created += 1,
            Some(MergeOutcome::Updated) => self.updated += 1,
            Some(MergeOutcome::Unchanged) => self.unchanged += 1,
            None => self.skipped += 1,
        }
    }

    pub fn absorb(&mut self, other: &MergeStats) {
        self.created += other.created;
        self.updated += other.updated;
        self.unchanged += other.unchanged;
        self.skipped += other.skipped;
    }
}

/// Registry of every company seen during a batch run, keyed by code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    companies: BTreeMap<String, Company>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.companies.contains_key(code)
    }

    pub fn get(&self, code: &str) -> Option<&Company> {
        self.companies.get(code)
    }

    pub fn get_mut(&mut self, code: &str) -> Option<&mut Company> {
        self.companies.get_mut(code)
    }

    pub fn companies(&self) -> impl Iterator<Item = &Company> {
        self.companies.values()
    }

    pub fn companies_mut(&mut self) -> impl Iterator<Item = &mut Company> {
        self.companies.values_mut()
    }

    /// Companies ordered by the numeric part of their code.
    pub fn sorted_companies(&self) -> Vec<&Company> {
        let mut out: Vec<&Company> = self.companies.values().collect();
        out.sort_by(|a, b| code_order(a.code()).cmp(&code_order(b.code())));
        out
    }

    /// Applies the cross-source identity policy for one source row and
    /// returns the company the row's accounts should be written to.
    ///
    /// - Catalog rows create missing companies; on existing ones they replace
    ///   a differing name and always replace the comment.
    /// - Statement rows create missing companies and never touch the identity
    ///   of existing ones.
    /// - Market rows never create companies; unknown codes yield `None`.
    pub fn merge_identity(
        &mut self,
        source: SourceKind,
        identity: CompanyIdentity,
    ) -> Option<(&mut Company, MergeOutcome)> {
        if !self.companies.contains_key(&identity.code) {
            if source == SourceKind::Market {
                return None;
            }
            let code = identity.code.clone();
            let company = self
                .companies
                .entry(code)
                .or_insert_with(|| Company::new(identity));
            return Some((company, MergeOutcome::Created));
        }

        let company = self.companies.get_mut(&identity.code)?;
        let outcome = match source {
            SourceKind::Catalog => {
                let mut changed = false;
                if company.name() != identity.name {
                    company.set_name(identity.name);
                    changed = true;
                }
                if company.comment() != identity.comment {
                    changed = true;
                }
                company.set_comment(identity.comment);
                if changed {
                    MergeOutcome::Updated
                } else {
                    MergeOutcome::Unchanged
                }
            }
            SourceKind::Statement | SourceKind::Market => MergeOutcome::Unchanged,
        };
        Some((company, outcome))
    }

    /// Structured export: one entry per company code, ordered by numeric code.
    pub fn to_json(&self) -> Value {
        let mut root = Map::new();
        for company in self.sorted_companies() {
            root.insert(company.code().to_string(), company.to_json());
        }
        Value::Object(root)
    }
}

fn code_order(code: &str) -> (u64, &str) {
    let numeric = code
        .get(1..)
        .and_then(|digits| digits.parse::<u64>().ok())
        .unwrap_or(u64::MAX);
    (numeric, code)
}
