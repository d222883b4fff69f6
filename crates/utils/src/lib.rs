pub mod cells;
pub mod dictionaries;
pub mod export;
pub mod header;
pub mod workbook;

// Re-export commonly used items
pub use crate::cells::{cell_str, header_text, is_all_digits, is_numeric, to_double, to_long, to_percent};
pub use crate::dictionaries::Template;
pub use crate::export::write_export;
pub use crate::header::{carry_forward, pad_period_fragment, FieldKey, HeaderMap, HeaderResolver, ResolvedHeader};
pub use crate::workbook::{for_each_sheet, IngestStats, Sheet, SheetRow, SourceParser};
