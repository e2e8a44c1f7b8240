//! Dynamic parameter/column values
//!
//! [`Value`] is what crosses the boundary with the connection collaborator:
//! bound parameters go out as values and result columns come back as values.
//! [`FieldValue`] converts typed record fields to and from it.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// A single positional parameter or result column
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Name of the variant, used in conversion errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Blob(_) => "blob",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

/// A value could not be converted into a field's type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("cannot convert {found} into {expected}")]
    Incompatible {
        expected: &'static str,
        found: &'static str,
    },

    #[error("cannot convert {value:?} into {expected}: {reason}")]
    Invalid {
        expected: &'static str,
        value: String,
        reason: String,
    },

    #[error("NULL cannot be stored in a non-optional {expected}")]
    UnexpectedNull { expected: &'static str },
}

impl ValueError {
    fn incompatible(expected: &'static str, found: &Value) -> Self {
        match found {
            Value::Null => ValueError::UnexpectedNull { expected },
            other => ValueError::Incompatible {
                expected,
                found: other.type_name(),
            },
        }
    }

    fn invalid(expected: &'static str, value: impl Into<String>, reason: impl ToString) -> Self {
        ValueError::Invalid {
            expected,
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

/// Conversion between a typed record field and a [`Value`]
pub trait FieldValue: Sized {
    fn to_value(&self) -> Value;

    /// # Errors
    ///
    /// Returns [`ValueError`] when the value has no sensible representation in `Self`.
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

impl FieldValue for i64 {
    fn to_value(&self) -> Value {
        Value::Integer(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Integer(v) => Ok(v),
            Value::Bool(b) => Ok(i64::from(b)),
            // Drivers commonly hand integers back as decimal text
            Value::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|e| ValueError::invalid("i64", s, e)),
            other => Err(ValueError::incompatible("i64", &other)),
        }
    }
}

impl FieldValue for i32 {
    fn to_value(&self) -> Value {
        Value::Integer(i64::from(*self))
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        let wide = i64::from_value(value).map_err(|e| retarget(e, "i32"))?;
        i32::try_from(wide).map_err(|e| ValueError::invalid("i32", wide.to_string(), e))
    }
}

impl FieldValue for u32 {
    fn to_value(&self) -> Value {
        Value::Integer(i64::from(*self))
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        let wide = i64::from_value(value).map_err(|e| retarget(e, "u32"))?;
        u32::try_from(wide).map_err(|e| ValueError::invalid("u32", wide.to_string(), e))
    }
}

impl FieldValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(b) => Ok(b),
            Value::Integer(0) => Ok(false),
            Value::Integer(1) => Ok(true),
            Value::Integer(v) => Err(ValueError::invalid("bool", v.to_string(), "not 0 or 1")),
            other => Err(ValueError::incompatible("bool", &other)),
        }
    }
}

impl FieldValue for f64 {
    fn to_value(&self) -> Value {
        Value::Real(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Real(v) => Ok(v),
            Value::Integer(v) => Ok(v as f64),
            Value::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| ValueError::invalid("f64", s, e)),
            other => Err(ValueError::incompatible("f64", &other)),
        }
    }
}

impl FieldValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Text(s) => Ok(s),
            Value::Integer(v) => Ok(v.to_string()),
            Value::Real(v) => Ok(v.to_string()),
            Value::Blob(bytes) => {
                String::from_utf8(bytes).map_err(|e| ValueError::invalid("String", "<blob>", e))
            }
            other => Err(ValueError::incompatible("String", &other)),
        }
    }
}

impl FieldValue for Vec<u8> {
    fn to_value(&self) -> Value {
        Value::Blob(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Blob(bytes) => Ok(bytes),
            Value::Text(s) => Ok(s.into_bytes()),
            other => Err(ValueError::incompatible("Vec<u8>", &other)),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Stored as RFC 3339 text; unix seconds are accepted on the way back
impl FieldValue for DateTime<Utc> {
    fn to_value(&self) -> Value {
        Value::Text(self.to_rfc3339())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Text(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| ValueError::invalid("DateTime<Utc>", s, e)),
            Value::Integer(secs) => DateTime::from_timestamp(secs, 0).ok_or_else(|| {
                ValueError::invalid("DateTime<Utc>", secs.to_string(), "timestamp out of range")
            }),
            other => Err(ValueError::incompatible("DateTime<Utc>", &other)),
        }
    }
}

impl FieldValue for Uuid {
    fn to_value(&self) -> Value {
        Value::Text(self.hyphenated().to_string())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Text(s) => Uuid::parse_str(&s).map_err(|e| ValueError::invalid("Uuid", s, e)),
            Value::Blob(bytes) => {
                Uuid::from_slice(&bytes).map_err(|e| ValueError::invalid("Uuid", "<blob>", e))
            }
            other => Err(ValueError::incompatible("Uuid", &other)),
        }
    }
}

/// Stored as JSON text
impl FieldValue for serde_json::Value {
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(serde_json::Value::Null),
            Value::Text(s) => {
                serde_json::from_str(&s).map_err(|e| ValueError::invalid("JSON", s, e))
            }
            other => Err(ValueError::incompatible("JSON", &other)),
        }
    }
}

fn retarget(err: ValueError, expected: &'static str) -> ValueError {
    match err {
        ValueError::Incompatible { found, .. } => ValueError::Incompatible { expected, found },
        ValueError::Invalid { value, reason, .. } => ValueError::Invalid {
            expected,
            value,
            reason,
        },
        ValueError::UnexpectedNull { .. } => ValueError::UnexpectedNull { expected },
    }
}
