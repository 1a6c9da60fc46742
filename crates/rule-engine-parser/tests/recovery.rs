//! Tests for parse failures and their reported locations
//!
//! Covers:
//! - Error codes per failure kind
//! - Line/column of the failure
//! - Malformed input

use pretty_assertions::assert_eq;
use rstest::rstest;
use rule_engine_diagnostics::{ErrorCode, RULE0001, RULE0002, RULE0003, RULE0004};
use rule_engine_parser::parse_expression;

fn failure(input: &str) -> (ErrorCode, usize, usize) {
    let err = parse_expression(input)
        .err()
        .unwrap_or_else(|| panic!("Expected '{}' to fail", input));
    let loc = err.location().cloned().unwrap_or_default();
    (err.code(), loc.line, loc.column)
}

#[rstest]
#[case("", RULE0002, 1, 1)]
#[case("1 +", RULE0002, 1, 4)]
#[case("(1 + 2", RULE0002, 1, 7)]
#[case("'unclosed string", RULE0003, 1, 1)]
#[case("1 == \"open", RULE0003, 1, 6)]
#[case("#{open > 1", RULE0004, 1, 1)]
#[case("1 + )", RULE0001, 1, 5)]
#[case("1 2", RULE0001, 1, 3)]
#[case("foo > 1", RULE0001, 1, 1)]
#[case("d2:(1)", RULE0001, 1, 1)]
#[case("#{a} > 3 &&\n  * 2", RULE0001, 2, 3)]
#[case("1 === 1", RULE0001, 1, 5)]
fn test_failure_location(
    #[case] input: &str,
    #[case] code: ErrorCode,
    #[case] line: usize,
    #[case] column: usize,
) {
    assert_eq!(failure(input), (code, line, column));
}

#[test]
fn test_error_keeps_expression_text() {
    match parse_expression("d2:count(") {
        Err(rule_engine_diagnostics::RuleError::Parse { expression, .. }) => {
            assert_eq!(expression, "d2:count(");
        }
        other => panic!("Expected parse error, got: {:?}", other),
    }
}

#[test]
fn test_unknown_function_still_parses() {
    // Unknown names are an evaluation concern
    assert!(parse_expression("d2:doesNotExist(1)").is_ok());
}
