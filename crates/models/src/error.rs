use thiserror::Error;

use crate::company::Session;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("{title} of {session} does not exist")]
    NotFound { title: String, session: Session },

    #[error("finance for session {0} does not exist")]
    FinanceNotFound(Session),

    #[error("company {0} has no quarterly data")]
    NoQuarterlyData(String),

    #[error("invalid value for {title}: empty string")]
    InvalidValue { title: String },
}
