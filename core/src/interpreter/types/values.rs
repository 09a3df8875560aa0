//! Runtime value types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A variable scope: stream name to value
pub type Scope = HashMap<String, Value>;

/// Runtime value type
///
/// Every expression evaluates to one of these. Serialized untagged so a run
/// report reads as plain JSON numbers and strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Text(String),
}

impl Value {
    /// Check if value is truthy (for waterfall and loop conditions)
    ///
    /// Zero and the empty text are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Integer(n) => *n != 0,
            Value::Text(s) => !s.is_empty(),
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    /// Integer(1) for true, Integer(0) for false
    pub fn from_bool(b: bool) -> Self {
        Value::Integer(i64::from(b))
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Integer(0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}
