//! Conversions from raw `calamine` cells into ledger values.

use calamine::Data;

const NOT_AVAILABLE: &str = "N/A";

/// Text rendering of a cell. Whole floats render without a fractional part,
/// so a period header stored as `2021.0` reads `"2021"`.
pub fn cell_str(cell: Option<&Data>) -> Option<String> {
    let c = cell?;
    match c {
        Data::String(s) => Some(s.clone()),
        Data::Float(f) => Some(float_str(*f)),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::Empty => None,
        _ => Some(c.to_string()),
    }
}

/// Header cells: numeric cells render as their integer value, everything is
/// trimmed and a missing cell is the empty string.
pub fn header_text(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::Float(f)) => (f.trunc() as i64).to_string(),
        other => cell_str(other).unwrap_or_default().trim().to_string(),
    }
}

fn float_str(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        (f as i64).to_string()
    } else {
        f.to_string()
    }
}

/// Text of a cell after trimming; `None` for blanks and `N/A`.
fn present_text(s: &str) -> Option<&str> {
    let t = s.trim();
    if t.is_empty() || t == NOT_AVAILABLE {
        None
    } else {
        Some(t)
    }
}

/// Integer view of a cell. Numeric cells are truncated, text cells may carry
/// `,` thousands separators.
pub fn to_long(cell: &Data) -> Option<i64> {
    match cell {
        Data::Int(i) => Some(*i),
        Data::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        Data::String(s) => {
            let text = present_text(s)?.replace(',', "");
            let parsed = text.parse::<f64>().ok()?;
            parsed.is_finite().then(|| parsed.trunc() as i64)
        }
        _ => None,
    }
}

pub fn to_double(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) => Some(*f),
        Data::String(s) => present_text(s)?.replace(',', "").parse::<f64>().ok(),
        _ => None,
    }
}

/// Ratio cells such as ROE: text may end with `%`, which is dropped without
/// rescaling the number.
pub fn to_percent(cell: &Data) -> Option<f64> {
    match cell {
        Data::String(s) => present_text(s)?.replace('%', "").trim().parse::<f64>().ok(),
        other => to_double(other),
    }
}

pub fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_numeric(cell: &Data) -> bool {
    matches!(cell, Data::Int(_) | Data::Float(_))
}
