//! Growth Indicator Tests
//!
//! Tests for: zScoreWFA, zScoreHFA, zScoreWFH, zpvc, zing, oizp

use crate::{eval, eval_text};
use pretty_assertions::assert_eq;
use rstest::rstest;
use rule_engine_eval::EvalError;

#[rstest]
#[case("d2:zScoreWFA(1, 4.5, 'male')", "0")]
#[case("d2:zScoreWFA(0, 1.5, 'M')", "-3")]
#[case("d2:zScoreHFA(12, 66.3, 'female')", "-3")]
#[case("d2:zScoreHFA(10, 68.7, 'male')", "-2")]
#[case("d2:zScoreWFH(81.5, 12.5, 'female')", "2")]
#[case("d2:zScoreWFH(52, 3, 'male') < 2", "true")]
fn test_z_scores(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(eval_text(source), expected);
}

#[rstest]
#[case("d2:zScoreWFA(36, 14.3, 'male')", "0")]
#[case("d2:zScoreWFA(36, 13.9, 'female')", "0")]
#[case("d2:zScoreWFA(48, 16.3, 'male')", "0")]
#[case("d2:zScoreWFA(48, 21.2, 'male')", "2")]
#[case("d2:zScoreWFA(60, 18.3, 'male')", "0")]
#[case("d2:zScoreWFA(60, 12.0, 'female')", "-3")]
#[case("d2:zScoreHFA(30, 91.9, 'male')", "0")]
#[case("d2:zScoreHFA(48, 94.1, 'female')", "-2")]
#[case("d2:zScoreHFA(60, 110, 'male')", "0")]
fn test_z_scores_beyond_two_years(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(eval_text(source), expected);
}

#[rstest]
#[case("d2:zScoreWFH(100, 15.4, 'male')", "0")]
#[case("d2:zScoreWFH(100.5, 18.4, 'male')", "2")]
#[case("d2:zScoreWFH(100.5, 17, 'male')", "1")]
#[case("d2:zScoreWFH(100.5, 15.4, 'female')", "0")]
#[case("d2:zScoreWFH(110, 17, 'male')", "-1")]
#[case("d2:zScoreWFH(110, 14, 'female')", "-3")]
#[case("d2:zScoreWFH(120, 29.9, 'male')", "3")]
fn test_z_scores_by_height(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(eval_text(source), expected);
}

#[rstest]
#[case("d2:zScoreWFA(61, 18, 'male')")]
#[case("d2:zScoreHFA(-1, 50, 'female')")]
#[case("d2:zScoreHFA(72, 115, 'female')")]
#[case("d2:zScoreWFH(44.5, 2, 'male')")]
#[case("d2:zScoreWFH(120.5, 22, 'female')")]
fn test_out_of_range_keys(#[case] source: &str) {
    assert!(matches!(eval(source), Err(EvalError::InvalidArgument { .. })));
}

#[rstest]
#[case("d2:zpvc('1', '0', '-1')", "2")]
#[case("d2:zpvc(2, 'x', 3)", "2")]
#[case("d2:zing('-1')", "0")]
#[case("d2:zing(4)", "4")]
#[case("d2:oizp('0')", "1")]
#[case("d2:oizp(-2)", "0")]
fn test_z_score_helpers(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(eval_text(source), expected);
}
