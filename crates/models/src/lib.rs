pub mod accounts;
pub mod company;
pub mod error;
pub mod finance;
pub mod ledger;
pub mod settings;
pub mod value;

// Re-export commonly used items
pub use crate::company::{is_quarterly, quarter_key, Company, CompanyIdentity, Session};
pub use crate::error::LedgerError;
pub use crate::finance::Finance;
pub use crate::ledger::{Ledger, MergeOutcome, MergeStats, SourceKind};
pub use crate::settings::Settings;
pub use crate::value::AccountValue;
