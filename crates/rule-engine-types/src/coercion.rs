//! Conversion rules between value kinds

use crate::{RuleValueType, Value, DATE_FORMAT};
use chrono::NaiveDate;
use thiserror::Error;

/// Coercion errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    /// Text (or a value's text form) is not a valid instance of the target type
    #[error("Cannot convert '{value}' to {target}")]
    TypeMismatch { value: String, target: RuleValueType },

    /// Text is not a `yyyy-MM-dd` date
    #[error("Invalid date '{value}', expected yyyy-MM-dd")]
    InvalidDate { value: String },
}

impl CoercionError {
    pub fn mismatch(value: impl Into<String>, target: RuleValueType) -> Self {
        Self::TypeMismatch {
            value: value.into(),
            target,
        }
    }

    /// The type the conversion was aiming for
    pub fn target(&self) -> RuleValueType {
        match self {
            Self::TypeMismatch { target, .. } => *target,
            Self::InvalidDate { .. } => RuleValueType::Date,
        }
    }
}

pub type CoercionResult<T> = Result<T, CoercionError>;

/// Parse a finite number; surrounding whitespace is ignored
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse `yyyy-MM-dd`, or the date part of an ISO date-time
pub fn parse_date(text: &str) -> CoercionResult<NaiveDate> {
    let text = text.trim();
    let date_part = match text.get(..10) {
        Some(head) if text.len() > 10 && text[10..].starts_with(['T', ' ']) => head,
        _ => text,
    };
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).map_err(|_| CoercionError::InvalidDate {
        value: text.to_string(),
    })
}

impl Value {
    /// Numeric view. Booleans count as 1/0; dates never convert.
    pub fn to_number(&self) -> CoercionResult<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Self::Text(s) => {
                parse_number(s).ok_or_else(|| CoercionError::mismatch(s.as_str(), RuleValueType::Numeric))
            }
            Self::Date(_) => Err(CoercionError::mismatch(self.as_text(), RuleValueType::Numeric)),
        }
    }

    /// Boolean view. Only `true`/`false` text (any case) converts.
    pub fn to_boolean(&self) -> CoercionResult<bool> {
        match self {
            Self::Boolean(b) => Ok(*b),
            Self::Text(s) if s.eq_ignore_ascii_case("true") => Ok(true),
            Self::Text(s) if s.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(CoercionError::mismatch(self.as_text(), RuleValueType::Boolean)),
        }
    }

    /// Date view. Text must be a `yyyy-MM-dd` date.
    pub fn to_date(&self) -> CoercionResult<NaiveDate> {
        match self {
            Self::Date(d) => Ok(*d),
            Self::Text(s) => parse_date(s),
            _ => Err(CoercionError::InvalidDate {
                value: self.as_text(),
            }),
        }
    }

    /// Date view where empty text means "no date"
    pub fn to_optional_date(&self) -> CoercionResult<Option<NaiveDate>> {
        if self.is_empty() {
            Ok(None)
        } else {
            self.to_date().map(Some)
        }
    }

    /// Convert to the given declared type
    pub fn coerce_to(&self, target: RuleValueType) -> CoercionResult<Value> {
        match target {
            RuleValueType::Text => Ok(Value::Text(self.as_text())),
            RuleValueType::Numeric => self.to_number().map(Value::Number),
            RuleValueType::Boolean => self.to_boolean().map(Value::Boolean),
            RuleValueType::Date => self.to_date().map(Value::Date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    #[rstest]
    #[case(Value::Number(2.5), 2.5)]
    #[case(Value::text("7"), 7.0)]
    #[case(Value::text(" -9.3 "), -9.3)]
    #[case(Value::Boolean(true), 1.0)]
    fn test_to_number(#[case] value: Value, #[case] expected: f64) {
        assert_eq!(value.to_number(), Ok(expected));
    }

    #[rstest]
    #[case(Value::text("abc"))]
    #[case(Value::text(""))]
    #[case(Value::text("NaN"))]
    #[case(Value::text("inf"))]
    #[case(Value::Date(date(2020, 1, 1)))]
    fn test_to_number_failures(#[case] value: Value) {
        assert!(matches!(
            value.to_number(),
            Err(CoercionError::TypeMismatch {
                target: RuleValueType::Numeric,
                ..
            })
        ));
    }

    #[test]
    fn test_to_boolean() {
        assert_eq!(Value::text("TRUE").to_boolean(), Ok(true));
        assert_eq!(Value::text("false").to_boolean(), Ok(false));
        assert_eq!(
            Value::Number(1.0).to_boolean(),
            Err(CoercionError::mismatch("1", RuleValueType::Boolean))
        );
    }

    #[rstest]
    #[case("2017-01-01", date(2017, 1, 1))]
    #[case("2017-01-01T10:15:00", date(2017, 1, 1))]
    #[case("2017-01-01 10:15:00.000", date(2017, 1, 1))]
    fn test_parse_date(#[case] text: &str, #[case] expected: NaiveDate) {
        assert_eq!(parse_date(text), Ok(expected));
    }

    #[rstest]
    #[case("2017-13-01")]
    #[case("2017-01-01X")]
    #[case("01-01-2017")]
    #[case("")]
    fn test_parse_date_failures(#[case] text: &str) {
        assert_eq!(
            parse_date(text),
            Err(CoercionError::InvalidDate {
                value: text.to_string()
            })
        );
    }

    #[test]
    fn test_optional_date() {
        assert_eq!(Value::text("").to_optional_date(), Ok(None));
        assert_eq!(
            Value::text("2020-02-29").to_optional_date(),
            Ok(Some(date(2020, 2, 29)))
        );
    }

    #[test]
    fn test_coerce_to_text_formats() {
        assert_eq!(
            Value::Number(3.0).coerce_to(RuleValueType::Text),
            Ok(Value::text("3"))
        );
        assert_eq!(
            Value::Date(date(2020, 5, 1)).coerce_to(RuleValueType::Text),
            Ok(Value::text("2020-05-01"))
        );
    }
}
