//! Evaluation errors for the expression engine

use rule_engine_diagnostics::{
    ErrorCode, RuleError, RULE0200, RULE0201, RULE0202, RULE0203, RULE0204, RULE0205, RULE0206,
    RULE0207,
};
use rule_engine_types::{CoercionError, RuleValueType};
use thiserror::Error;

/// Result type for evaluation operations
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors that can occur while evaluating an expression
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    /// A value cannot be converted to the kind an operator or function needs
    #[error("Cannot convert '{value}' to {expected}")]
    TypeCoercion {
        value: String,
        expected: RuleValueType,
    },

    /// Unknown or unavailable variable, constant or environment variable
    #[error("Undefined {kind} '{name}'")]
    UndefinedReference { kind: String, name: String },

    /// Unparseable date text
    #[error("Invalid date '{value}', expected yyyy-MM-dd")]
    DateParse { value: String },

    /// Function name with no registered implementation
    #[error("Unknown function: {name}")]
    UnknownFunction { name: String },

    /// Wrong number of call-site arguments
    #[error("{function} expects {expected} argument(s), found {found}")]
    ArgumentCount {
        function: String,
        expected: String,
        found: usize,
    },

    /// Pattern that does not compile
    #[error("Invalid regex pattern '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    /// Division or modulus by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Argument outside the domain of a function
    #[error("Invalid argument for {function}: {message}")]
    InvalidArgument { function: String, message: String },
}

impl EvalError {
    /// Create a type coercion error
    pub fn type_coercion(value: impl Into<String>, expected: RuleValueType) -> Self {
        Self::TypeCoercion {
            value: value.into(),
            expected,
        }
    }

    /// Create an undefined reference error
    pub fn undefined_reference(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UndefinedReference {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create a date parse error
    pub fn date_parse(value: impl Into<String>) -> Self {
        Self::DateParse {
            value: value.into(),
        }
    }

    /// Create an unknown function error
    pub fn unknown_function(name: impl Into<String>) -> Self {
        Self::UnknownFunction { name: name.into() }
    }

    /// Create an argument count error
    pub fn argument_count(
        function: impl Into<String>,
        expected: impl Into<String>,
        found: usize,
    ) -> Self {
        Self::ArgumentCount {
            function: function.into(),
            expected: expected.into(),
            found,
        }
    }

    /// Create an invalid regex error
    pub fn invalid_regex(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRegex {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            function: function.into(),
            message: message.into(),
        }
    }

    /// Diagnostic code of this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::TypeCoercion { .. } => RULE0200,
            Self::UndefinedReference { .. } => RULE0201,
            Self::DateParse { .. } => RULE0202,
            Self::UnknownFunction { .. } => RULE0203,
            Self::ArgumentCount { .. } => RULE0204,
            Self::InvalidRegex { .. } => RULE0205,
            Self::DivisionByZero => RULE0206,
            Self::InvalidArgument { .. } => RULE0207,
        }
    }

    pub fn is_undefined_reference(&self) -> bool {
        matches!(self, Self::UndefinedReference { .. })
    }
}

impl From<CoercionError> for EvalError {
    fn from(err: CoercionError) -> Self {
        match err {
            CoercionError::TypeMismatch { value, target } => Self::type_coercion(value, target),
            CoercionError::InvalidDate { value } => Self::date_parse(value),
        }
    }
}

impl From<EvalError> for RuleError {
    fn from(err: EvalError) -> Self {
        RuleError::evaluation(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_coercion_errors_keep_dates_distinct() {
        let mismatch: EvalError = CoercionError::mismatch("abc", RuleValueType::Numeric).into();
        assert_eq!(mismatch.code(), RULE0200);

        let date: EvalError = CoercionError::InvalidDate {
            value: "2020-13-01".to_string(),
        }
        .into();
        assert_eq!(date, EvalError::date_parse("2020-13-01"));
        assert_eq!(date.code(), RULE0202);
    }

    #[test]
    fn test_into_rule_error() {
        let err: RuleError = EvalError::unknown_function("d2:nope").into();
        assert_eq!(err.code(), RULE0203);
        assert!(err.to_string().contains("d2:nope"));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            EvalError::undefined_reference("constant", "PI").to_string(),
            "Undefined constant 'PI'"
        );
        assert_eq!(
            EvalError::argument_count("d2:left", "2", 1).to_string(),
            "d2:left expects 2 argument(s), found 1"
        );
    }
}
