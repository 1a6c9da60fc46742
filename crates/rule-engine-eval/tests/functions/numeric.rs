//! Numeric Function Tests
//!
//! Tests for: round, modulus, floor, ceil, greatest, least

use crate::{eval, eval_text};
use pretty_assertions::assert_eq;
use rstest::rstest;
use rule_engine_eval::EvalError;

#[rstest]
#[case("4.1", "4")]
#[case("0.8", "0")]
#[case("5.1", "5")]
#[case("1.0", "1")]
#[case("-9.3", "-10")]
#[case("-5.9", "-6")]
#[case("not a number", "0")]
fn test_floor(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(eval_text(&format!("d2:floor('{input}')")), expected);
}

#[rstest]
#[case("d2:ceil('4.1')", "5")]
#[case("d2:ceil(-4.9)", "-4")]
#[case("d2:round('2.6')", "3")]
#[case("d2:round(2.5)", "3")]
#[case("d2:round(2.4)", "2")]
#[case("d2:round(-2.5)", "-2")]
#[case("d2:round(0.49999999999999994)", "0")]
#[case("d2:modulus('2.6', '2')", "0.6")]
#[case("d2:modulus(7, 3)", "1")]
#[case("d2:modulus(-7, 3)", "-1")]
fn test_rounding_and_modulus(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(eval_text(source), expected);
}

#[test]
fn test_modulus_by_zero() {
    assert_eq!(eval("d2:modulus(1, 0)"), Err(EvalError::DivisionByZero));
}

#[rstest]
#[case("greatest(1, 5, 3)", "5")]
#[case("greatest(-1)", "-1")]
#[case("least(1, 5, -3)", "-3")]
#[case("least('7', 8)", "7")]
fn test_greatest_and_least(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(eval_text(source), expected);
}
