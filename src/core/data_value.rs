//! Dynamic cell values decoded from database rows.
//!
//! A query result arrives untyped; each cell is decoded into a `DataValue`
//! before whole columns are narrowed to typed Series.

use std::fmt;

use chrono::NaiveDateTime;

/// A single decoded cell from a query result.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// SQL NULL
    Null,
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Text value
    Str(String),
    /// Timestamp value (timezone already discarded by the decoder)
    DateTime(NaiveDateTime),
}

impl DataValue {
    /// True if this cell is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// Numeric view of the cell, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Int(v) => Some(*v as f64),
            DataValue::Float(v) => Some(*v),
            DataValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            DataValue::Str(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Null => write!(f, "null"),
            DataValue::Int(v) => write!(f, "{}", v),
            DataValue::Float(v) => write!(f, "{}", v),
            DataValue::Bool(v) => write!(f, "{}", v),
            DataValue::Str(v) => write!(f, "{}", v),
            DataValue::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_f64() {
        assert_eq!(DataValue::Int(5).as_f64(), Some(5.0));
        assert_eq!(DataValue::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(DataValue::Str(" 10.5 ".to_string()).as_f64(), Some(10.5));
        assert_eq!(DataValue::Str("abc".to_string()).as_f64(), None);
        assert_eq!(DataValue::Null.as_f64(), None);
    }

    #[test]
    fn test_display_null() {
        assert_eq!(DataValue::Null.to_string(), "null");
    }
}
