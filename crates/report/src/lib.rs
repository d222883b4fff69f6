//! Flat per-company report over a derived ledger.
//!
//! Columns: identity block, quarterly ratings, yearly ROE, PBR, yearly sales,
//! quarterly ROE, quarterly sales, market capitalization, then raw sales,
//! income and capital for every quarter seen in the ledger. Periods run from
//! the latest to the earliest.

pub mod layout;
pub mod row;
pub mod writer;

pub use layout::ReportLayout;
pub use row::{company_row, quarter_finance, yearly_roe, yearly_sales, ReportCell};
pub use writer::{write_report, ReportSummary};
