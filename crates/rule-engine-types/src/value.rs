//! Runtime values of rule expressions

use crate::{format_date, format_number, RuleValueType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The result of evaluating any expression.
///
/// Variables arrive as text and are coerced through their declared
/// [`RuleValueType`]; operators and functions produce the other kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Boolean(bool),
    /// Every number is a double
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

impl Value {
    /// Stand-in for a numeric argument whose text is not a number
    pub const DEFAULT_NUMBER: Value = Value::Number(0.0);

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    pub fn value_type(&self) -> RuleValueType {
        match self {
            Self::Boolean(_) => RuleValueType::Boolean,
            Self::Number(_) => RuleValueType::Numeric,
            Self::Text(_) => RuleValueType::Text,
            Self::Date(_) => RuleValueType::Date,
        }
    }

    /// Empty text is the only empty value
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// External text form: `true`/`false`, minimal numbers, `yyyy-MM-dd` dates
    pub fn as_text(&self) -> String {
        match self {
            Self::Boolean(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::Text(s) => s.clone(),
            Self::Date(d) => format_date(*d),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            other => f.write_str(&other.as_text()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}
