//! Rule engine error codes
//!
//! Error code ranges:
//! - RULE0001-RULE0099: Parse errors (expression syntax)
//! - RULE0100-RULE0199: Construction errors (rules, actions, variables, context documents)
//! - RULE0200-RULE0299: Evaluation errors (runtime)
//! - RULE0400-RULE0499: System errors (I/O, input formats)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric error code, displayed as `RULE` plus four digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    pub const fn code(&self) -> u16 {
        self.0
    }

    pub const fn info(&self) -> ErrorInfo {
        lookup(self.0)
    }

    pub const fn is_parse_error(&self) -> bool {
        matches!(self.0, 1..=99)
    }

    pub const fn is_construction_error(&self) -> bool {
        matches!(self.0, 100..=199)
    }

    pub const fn is_evaluation_error(&self) -> bool {
        matches!(self.0, 200..=299)
    }

    pub const fn is_system_error(&self) -> bool {
        matches!(self.0, 400..=499)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RULE{:04}", self.0)
    }
}

/// Description and optional help text attached to an error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorInfo {
    pub description: &'static str,
    pub help: Option<&'static str>,
}

const fn info(description: &'static str, help: Option<&'static str>) -> ErrorInfo {
    ErrorInfo { description, help }
}

const fn lookup(code: u16) -> ErrorInfo {
    match code {
        1 => info("Unexpected token", None),
        2 => info("Unexpected end of expression", None),
        3 => info("Unterminated string literal", None),
        4 => info(
            "Unterminated variable placeholder",
            Some("Placeholders take the form #{name}, A{name}, V{name} or C{name}"),
        ),
        5 => info("Invalid number format", None),

        100 => info("Invalid rule", Some("A rule needs a non-empty condition")),
        101 => info("Invalid rule action", None),
        102 => info(
            "Invalid rule variable",
            Some("A variable needs a name and a source data element or attribute"),
        ),
        103 => info(
            "Missing context document",
            Some("Rules, variables, constants and supplementary data must all be supplied"),
        ),
        104 => info("Invalid tracker record", None),

        200 => info("Type coercion failed", None),
        201 => info(
            "Undefined reference",
            Some("Check that the variable, constant or environment variable is declared"),
        ),
        202 => info("Invalid date", Some("Dates use the yyyy-MM-dd format")),
        203 => info("Unknown function", None),
        204 => info("Wrong number of arguments", None),
        205 => info("Invalid regular expression", None),
        206 => info("Division by zero", None),
        207 => info("Invalid function argument", None),

        400 => info("Internal error", None),
        401 => info("I/O error", None),
        402 => info("Invalid input format", None),

        _ => info("Unknown error", None),
    }
}

// Parse errors
pub const RULE0001: ErrorCode = ErrorCode::new(1);
pub const RULE0002: ErrorCode = ErrorCode::new(2);
pub const RULE0003: ErrorCode = ErrorCode::new(3);
pub const RULE0004: ErrorCode = ErrorCode::new(4);
pub const RULE0005: ErrorCode = ErrorCode::new(5);

// Construction errors
pub const RULE0100: ErrorCode = ErrorCode::new(100);
pub const RULE0101: ErrorCode = ErrorCode::new(101);
pub const RULE0102: ErrorCode = ErrorCode::new(102);
pub const RULE0103: ErrorCode = ErrorCode::new(103);
pub const RULE0104: ErrorCode = ErrorCode::new(104);

// Evaluation errors
pub const RULE0200: ErrorCode = ErrorCode::new(200);
pub const RULE0201: ErrorCode = ErrorCode::new(201);
pub const RULE0202: ErrorCode = ErrorCode::new(202);
pub const RULE0203: ErrorCode = ErrorCode::new(203);
pub const RULE0204: ErrorCode = ErrorCode::new(204);
pub const RULE0205: ErrorCode = ErrorCode::new(205);
pub const RULE0206: ErrorCode = ErrorCode::new(206);
pub const RULE0207: ErrorCode = ErrorCode::new(207);

// System errors
pub const RULE0400: ErrorCode = ErrorCode::new(400);
pub const RULE0401: ErrorCode = ErrorCode::new(401);
pub const RULE0402: ErrorCode = ErrorCode::new(402);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(RULE0001.to_string(), "RULE0001");
        assert_eq!(RULE0103.to_string(), "RULE0103");
    }

    #[test]
    fn test_error_categories() {
        assert!(RULE0001.is_parse_error());
        assert!(!RULE0001.is_construction_error());

        assert!(RULE0100.is_construction_error());
        assert!(!RULE0100.is_parse_error());

        assert!(RULE0200.is_evaluation_error());
        assert!(RULE0400.is_system_error());
    }

    #[test]
    fn test_error_info() {
        assert_eq!(RULE0001.info().description, "Unexpected token");
        assert!(RULE0103.info().help.is_some());
        assert_eq!(ErrorCode::new(999).info().description, "Unknown error");
    }
}
