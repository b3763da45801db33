//! Common types for spreadsheet cells.

/// Types of data that can be stored in a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty cell
    Empty,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point number
    Float(f64),
    /// String value
    String(String),
    /// Date/time value (stored as serial number)
    DateTime(f64),
    /// Error value
    Error(String),
}

impl CellValue {
    /// Numeric value as a chart would plot it.
    ///
    /// Text, booleans, errors, and empty cells have no numeric value.
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) | CellValue::DateTime(f) if f.is_finite() => Some(*f),
            _ => None,
        }
    }

    /// Display text of the cell, `None` for empty cells.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
            CellValue::Int(i) => Some(itoa::Buffer::new().format(*i).to_string()),
            CellValue::Float(f) | CellValue::DateTime(f) => Some(format_number(*f)),
            CellValue::String(s) | CellValue::Error(s) => Some(s.clone()),
        }
    }
}

impl From<f64> for CellValue {
    #[inline]
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<i64> for CellValue {
    #[inline]
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<&str> for CellValue {
    #[inline]
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    #[inline]
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

/// Format a number the way a label shows it: integral values without a
/// fractional part, everything else in shortest round-trip form.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        itoa::Buffer::new().format(value as i64).to_string()
    } else {
        ryu::Buffer::new().format(value).to_string()
    }
}
