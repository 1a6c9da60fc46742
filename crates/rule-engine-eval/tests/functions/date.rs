//! Date Function Tests
//!
//! Tests for: daysBetween, weeksBetween, monthsBetween, yearsBetween, addDays

use crate::{eval, eval_text, event, Fixture};
use pretty_assertions::assert_eq;
use rstest::rstest;
use rule_engine_eval::EvalError;

#[rstest]
#[case("2017-01-01", "2017-02-01", "31")]
#[case("2017-02-01", "2017-01-01", "-31")]
#[case("2020-02-28", "2020-03-01", "2")]
#[case("2017-01-01", "2017-01-01T23:59:00", "0")]
fn test_days_between(#[case] start: &str, #[case] end: &str, #[case] expected: &str) {
    assert_eq!(
        eval_text(&format!("d2:daysBetween('{start}', '{end}')")),
        expected
    );
}

#[rstest]
#[case("2010-10-15", "2010-10-22", "1")]
#[case("2010-09-30", "2010-10-15", "2")]
#[case("2016-01-01", "2016-01-31", "4")]
#[case("2010-12-31", "2011-01-01", "0")]
#[case("2010-10-22", "2010-10-15", "-1")]
#[case("2010-10-15", "2010-10-10", "0")]
fn test_weeks_between(#[case] start: &str, #[case] end: &str, #[case] expected: &str) {
    assert_eq!(
        eval_text(&format!("d2:weeksBetween('{start}', '{end}')")),
        expected
    );
}

#[rstest]
#[case("2010-10-15", "2010-10-22", "0")]
#[case("2010-09-30", "2010-10-31", "1")]
#[case("2013-01-31", "2013-02-01", "0")]
#[case("2016-01-01", "2016-07-31", "6")]
#[case("2015-01-01", "2016-06-30", "17")]
#[case("2016-06-30", "2015-01-01", "-17")]
fn test_months_between(#[case] start: &str, #[case] end: &str, #[case] expected: &str) {
    assert_eq!(
        eval_text(&format!("d2:monthsBetween('{start}', '{end}')")),
        expected
    );
}

#[rstest]
#[case("2016-01-01", "2018-09-01", "2")]
#[case("2016-01-02", "2017-01-01", "0")]
#[case("2018-09-01", "2016-01-01", "-2")]
fn test_years_between(#[case] start: &str, #[case] end: &str, #[case] expected: &str) {
    assert_eq!(
        eval_text(&format!("d2:yearsBetween('{start}', '{end}')")),
        expected
    );
}

#[rstest]
#[case("d2:addDays('2017-01-01', 2)", "2017-01-03")]
#[case("d2:addDays('2017-01-01', -1)", "2016-12-31")]
#[case("d2:addDays('2020-02-28', '1')", "2020-02-29")]
#[case("d2:addDays('', 2)", "")]
fn test_add_days(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(eval_text(source), expected);
}

#[rstest]
#[case("d2:daysBetween('', '2017-01-01')")]
#[case("d2:weeksBetween('2017-01-01', '')")]
#[case("d2:monthsBetween('', '')")]
#[case("d2:yearsBetween('', '2017-01-01')")]
fn test_missing_dates_give_zero(#[case] source: &str) {
    assert_eq!(eval_text(source), "0");
}

#[test]
fn test_invalid_date_is_a_date_parse_error() {
    assert_eq!(
        eval("d2:daysBetween('2017-13-01', '2017-01-01')"),
        Err(EvalError::date_parse("2017-13-01"))
    );
}

#[test]
fn test_environment_dates() {
    // 2020 is a leap year: Jan 31 + Feb 29 + Mar 31 + Apr 30 + May 31
    assert_eq!(
        eval_text("d2:daysBetween(V{enrollment_date}, V{current_date})"),
        "152"
    );

    let fixture = Fixture::new().target(event("ev", "2019-12-31", &[]));
    assert_eq!(
        fixture.text("d2:daysBetween(V{enrollment_date}, V{event_date})"),
        "-1"
    );
}
