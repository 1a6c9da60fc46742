//! String Function Tests
//!
//! Tests for: length, substring, left, right, split, concatenate, validatePattern

use crate::{eval, eval_text};
use pretty_assertions::assert_eq;
use rstest::rstest;
use rule_engine_eval::EvalError;

#[rstest]
#[case("d2:length('testString')", "10")]
#[case("d2:length('')", "0")]
#[case("d2:length('abc')", "3")]
#[case("d2:length(12.5)", "4")]
fn test_length(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(eval_text(source), expected);
}

#[rstest]
#[case("d2:substring('ABCD', 1, 3)", "BC")]
#[case("d2:substring('ABCD', 0, 4)", "ABCD")]
#[case("d2:substring('ABCD', -1, 2)", "AB")]
#[case("d2:substring('ABCD', 2, 10)", "CD")]
#[case("d2:substring('ABCD', 3, 1)", "")]
fn test_substring(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(eval_text(source), expected);
}

#[rstest]
#[case("d2:left('yyyy-mm-dd', 4)", "yyyy")]
#[case("d2:right('yyyy-mm-dd', 2)", "dd")]
#[case("d2:left('abc', 10)", "abc")]
#[case("d2:right('abc', 10)", "abc")]
#[case("d2:left('abc', -1)", "")]
#[case("d2:right('abc', 0)", "")]
fn test_left_and_right(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(eval_text(source), expected);
}

#[rstest]
#[case("d2:split('test-String-for-split', '-', 2)", "for")]
#[case("d2:split('test-String-for-split', '-', 0)", "test")]
#[case("d2:split('test-String-for-split', '-', 4)", "")]
#[case("d2:split('test-String-for-split', '-', -1)", "")]
#[case("d2:split('a,,b', ',', 1)", "")]
#[case("d2:split('abc', '', 0)", "abc")]
fn test_split(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(eval_text(source), expected);
}

#[rstest]
#[case("d2:concatenate('weeks', '+days')", "weeks+days")]
#[case("d2:concatenate('a', 1, true)", "a1true")]
#[case("d2:concatenate()", "")]
fn test_concatenate(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(eval_text(source), expected);
}

#[rstest]
#[case("d2:validatePattern('44455545454', '.*555.*')", "true")]
#[case("d2:validatePattern('444887777', '.*555.*')", "false")]
#[case("d2:validatePattern('1234', '[0-9]{3}')", "false")]
#[case("d2:validatePattern(1234, '[0-9]{4}')", "true")]
fn test_validate_pattern(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(eval_text(source), expected);
}

#[test]
fn test_invalid_pattern() {
    let err = eval("d2:validatePattern('abc', '(')").unwrap_err();
    assert!(matches!(err, EvalError::InvalidRegex { ref pattern, .. } if pattern == "("));
}
