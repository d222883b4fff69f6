//! Display title to canonical account tables, one per source template.

use models::accounts::*;

/// Titles shared by every statement template.
const STATEMENT_TITLE_SALES: &str = "매출액";
const STATEMENT_TITLE_ASSETS: &str = "자산총계";
const STATEMENT_TITLE_PROFIT: &str = "당기순이익";
const CONSOLIDATED_TITLE_PROFIT: &str = "(당기순이익귀속)\n지배기업주주지분";

const MAIN_STATEMENT: &[(&str, &str)] = &[
    ("유동부채", CURRENT_LIABILITIES),
    (STATEMENT_TITLE_ASSETS, ASSETS),
    (STATEMENT_TITLE_PROFIT, INCOME),
    ("금융비용", FINANCIAL_COST),
    ("지배기업주주지분", OWNERS_OF_PARENT_EQUITY),
    ("비지배기업주주지분", OWNERS_OF_NON_PARENT_EQUITY),
    ("매출원가", CONST_OF_SALES),
    ("매출총이익", GROSS_PROFIT_ON_SALES),
    ("영업이익", BUSINESS_PROFIT),
    ("유동자산", CURRENT_ASSETS),
    ("비유동자산", NON_CURRENT_ASSETS),
    ("비유동부채", NON_CURRENT_LIABILITIES),
    ("부채총계", LIABILITIES),
    ("자본총계", CAPITAL),
    (STATEMENT_TITLE_SALES, SALES),
    ("분기매출액", QUARTERLY_SALES),
];

const MANUFACTURING_CONSOLIDATED: &[(&str, &str)] = &[
    ("유동부채", CURRENT_LIABILITIES),
    (STATEMENT_TITLE_ASSETS, ASSETS),
    (STATEMENT_TITLE_PROFIT, INCOME),
    (CONSOLIDATED_TITLE_PROFIT, INCOME),
    ("금융비용", FINANCIAL_COST),
    ("지배기업주주지분", OWNERS_OF_PARENT_EQUITY),
    ("비지배기업주주지분", OWNERS_OF_NON_PARENT_EQUITY),
    ("매출원가", CONST_OF_SALES),
    ("매출총이익", GROSS_PROFIT_ON_SALES),
    ("영업이익", BUSINESS_PROFIT),
    ("유동자산", CURRENT_ASSETS),
    ("비유동자산", NON_CURRENT_ASSETS),
    ("비유동부채", NON_CURRENT_LIABILITIES),
    ("부채총계", LIABILITIES),
    ("자본총계", CAPITAL),
    (STATEMENT_TITLE_SALES, SALES),
    ("분기매출액", QUARTERLY_SALES),
];

// Banks report no sales line; total assets stand in for it.
const FINANCIAL_INSTITUTION: &[(&str, &str)] = &[
    ("유동부채", CURRENT_LIABILITIES),
    (STATEMENT_TITLE_ASSETS, SALES),
    (STATEMENT_TITLE_PROFIT, INCOME),
    ("금융비용", FINANCIAL_COST),
    ("지배기업주주지분", OWNERS_OF_PARENT_EQUITY),
    ("비지배기업주주지분", OWNERS_OF_NON_PARENT_EQUITY),
    ("매출원가", CONST_OF_SALES),
    ("매출총이익", GROSS_PROFIT_ON_SALES),
    ("영업이익", BUSINESS_PROFIT),
    ("유동자산", CURRENT_ASSETS),
    ("비유동자산", NON_CURRENT_ASSETS),
    ("비유동부채", NON_CURRENT_LIABILITIES),
    ("부채총계", LIABILITIES),
    ("자본총계", CAPITAL),
];

const FINANCIAL_INSTITUTION_CONSOLIDATED: &[(&str, &str)] = &[
    ("유동부채", CURRENT_LIABILITIES),
    (CONSOLIDATED_TITLE_PROFIT, INCOME),
    ("금융비용", FINANCIAL_COST),
    ("지배기업주주지분", OWNERS_OF_PARENT_EQUITY),
    ("비지배기업주주지분", OWNERS_OF_NON_PARENT_EQUITY),
    ("매출원가", CONST_OF_SALES),
    ("매출총이익", GROSS_PROFIT_ON_SALES),
    ("영업이익", BUSINESS_PROFIT),
    ("유동자산", CURRENT_ASSETS),
    ("비유동자산", NON_CURRENT_ASSETS),
    ("비유동부채", NON_CURRENT_LIABILITIES),
    ("부채총계", LIABILITIES),
    ("자본총계", CAPITAL),
    (STATEMENT_TITLE_ASSETS, SALES),
];

const CATALOG: &[(&str, &str)] = &[
    ("자산", ASSETS),
    ("자본", CAPITAL),
    ("설명", COMMENT),
    ("순익", INCOME),
    ("부채", LIABILITIES),
    ("시총", MARKET_CAPITALIZATION),
    ("PBR", PBR),
    ("ROE/4", QUARTERLY_ROE),
    ("SALES/4", QUARTERLY_SALES),
    ("등급", RATING),
    ("ROE", ROE),
    ("SALES", SALES),
    ("매출", SALES),
    ("발행주식수", STOCK),
];

const MARKET_DATA: &[(&str, &str)] = &[
    ("종목코드", CODE),
    ("코드", CODE),
    ("종목명", NAME),
    ("이름", NAME),
    ("시장", MARKET),
    ("시가총액", MARKET_CAPITALIZATION),
    ("시총", MARKET_CAPITALIZATION),
    ("PBR", PBR),
    ("등급", RATING),
];

/// Source schema whose dictionary resolves a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    MainStatement,
    Manufacturing,
    ManufacturingConsolidated,
    FinancialInstitution,
    FinancialInstitutionConsolidated,
    Catalog,
    Market,
}

impl Template {
    /// Statement templates by sheet or title name. Both spellings of the
    /// financial-institution templates are accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "주재무제표" => Some(Template::MainStatement),
            "제조" => Some(Template::Manufacturing),
            "제조(연결)" => Some(Template::ManufacturingConsolidated),
            "금용" | "금융" => Some(Template::FinancialInstitution),
            "금용(연결)" | "금융(연결)" => Some(Template::FinancialInstitutionConsolidated),
            _ => None,
        }
    }

    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Template::MainStatement | Template::Manufacturing => MAIN_STATEMENT,
            Template::ManufacturingConsolidated => MANUFACTURING_CONSOLIDATED,
            Template::FinancialInstitution => FINANCIAL_INSTITUTION,
            Template::FinancialInstitutionConsolidated => FINANCIAL_INSTITUTION_CONSOLIDATED,
            Template::Catalog => CATALOG,
            Template::Market => MARKET_DATA,
        }
    }

    pub fn lookup(&self, title: &str) -> Option<&'static str> {
        self.entries()
            .iter()
            .find(|(display, _)| *display == title)
            .map(|(_, account)| *account)
    }
}
