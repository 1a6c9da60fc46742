//! Declared types of rule variables

use crate::{parse_date, parse_number, CoercionError, CoercionResult, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The type a rule variable declares for its values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleValueType {
    #[default]
    Text,
    Numeric,
    Boolean,
    Date,
}

impl RuleValueType {
    /// Value used when a declared variable has no data
    pub fn default_value(&self) -> Value {
        match self {
            Self::Text | Self::Date => Value::Text(String::new()),
            Self::Numeric => Value::Number(0.0),
            Self::Boolean => Value::Boolean(false),
        }
    }

    /// Turn stored text into a value of this type.
    ///
    /// Empty text yields [`RuleValueType::default_value`].
    pub fn coerce(&self, text: &str) -> CoercionResult<Value> {
        if text.is_empty() {
            return Ok(self.default_value());
        }
        match self {
            Self::Text => Ok(Value::Text(text.to_string())),
            Self::Numeric => parse_number(text)
                .map(Value::Number)
                .ok_or_else(|| CoercionError::mismatch(text, *self)),
            Self::Boolean => Value::Text(text.to_string()).to_boolean().map(Value::Boolean),
            Self::Date => parse_date(text).map(Value::Date),
        }
    }

    /// Best guess at the type of untyped text: number, boolean, date, then text
    pub fn infer(text: &str) -> Self {
        if parse_number(text).is_some() {
            Self::Numeric
        } else if text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("false") {
            Self::Boolean
        } else if parse_date(text).is_ok() {
            Self::Date
        } else {
            Self::Text
        }
    }
}

impl fmt::Display for RuleValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "TEXT"),
            Self::Numeric => write!(f, "NUMERIC"),
            Self::Boolean => write!(f, "BOOLEAN"),
            Self::Date => write!(f, "DATE"),
        }
    }
}
