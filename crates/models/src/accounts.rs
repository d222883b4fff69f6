//! Canonical account identifiers shared by every source family.

pub const ASSETS: &str = "ASSETS";
pub const CAPITAL: &str = "CAPITAL";
pub const COMMENT: &str = "COMMENT";
pub const INCOME: &str = "INCOME";
pub const LIABILITIES: &str = "LIABILITIES";
pub const MARKET_CAPITALIZATION: &str = "MARKET_CAPITALIZATION";
pub const PBR: &str = "PBR";
pub const QUARTERLY_ROE: &str = "QUARTERLY_ROE";
pub const QUARTERLY_SALES: &str = "QUARTERLY_SALES";
pub const QUARTERLY_INCOME: &str = "QUARTERLY_INCOME";
pub const RATING: &str = "RATING";
pub const ROE: &str = "ROE";
pub const SALES: &str = "SALES";
pub const STOCK: &str = "STOCK";

// Statement line items
pub const CURRENT_ASSETS: &str = "CURRENT_ASSETS";
pub const NON_CURRENT_ASSETS: &str = "NON_CURRENT_ASSETS";
pub const CURRENT_LIABILITIES: &str = "CURRENT_LIABILITIES";
pub const NON_CURRENT_LIABILITIES: &str = "NON_CURRENT_LIABILITIES";
pub const FINANCIAL_COST: &str = "FINANCIAL_COST";
pub const OWNERS_OF_PARENT_EQUITY: &str = "OWNERS_OF_PARENT_EQUITY";
pub const OWNERS_OF_NON_PARENT_EQUITY: &str = "OWNERS_OF_NON_PARENT_EQUITY";
pub const CONST_OF_SALES: &str = "CONST_OF_SALES";
pub const GROSS_PROFIT_ON_SALES: &str = "GROSS_PROFIT_ON_SALES";
pub const BUSINESS_PROFIT: &str = "BUSINESS_PROFIT";

// Identity columns of the market export
pub const CODE: &str = "CODE";
pub const NAME: &str = "NAME";
pub const MARKET: &str = "MARKET";
