//! Row values returned by a data source

use std::fmt;

use serde::Serialize;

/// A scalar column value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Numeric view of the value; text and blobs are not numbers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// True for a number strictly greater than zero
    pub fn is_positive_number(&self) -> bool {
        self.as_f64().map(|n| n > 0.0).unwrap_or(false)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => write!(f, "{}", s),
            Value::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<rusqlite::types::Value> for Value {
    fn from(v: rusqlite::types::Value) -> Self {
        match v {
            rusqlite::types::Value::Null => Value::Null,
            rusqlite::types::Value::Integer(i) => Value::Integer(i),
            rusqlite::types::Value::Real(r) => Value::Real(r),
            rusqlite::types::Value::Text(s) => Value::Text(s),
            rusqlite::types::Value::Blob(b) => Value::Blob(b),
        }
    }
}

/// One ordered row of values
pub type Row = Vec<Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_number() {
        assert!(Value::Integer(3).is_positive_number());
        assert!(Value::Real(0.5).is_positive_number());
        assert!(!Value::Integer(0).is_positive_number());
        assert!(!Value::Real(-1.0).is_positive_number());
        assert!(!Value::Text("5".into()).is_positive_number());
        assert!(!Value::Null.is_positive_number());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Text("abc".into()).to_string(), "abc");
        assert_eq!(Value::Blob(vec![1, 2, 3]).to_string(), "<3 bytes>");
    }

    #[test]
    fn test_from_sqlite_value() {
        let v: Value = rusqlite::types::Value::Integer(7).into();
        assert_eq!(v, Value::Integer(7));
        let v: Value = rusqlite::types::Value::Text("x".into()).into();
        assert_eq!(v, Value::Text("x".into()));
    }
}
