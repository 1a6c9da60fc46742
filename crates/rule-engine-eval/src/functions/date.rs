//! Date arithmetic
//!
//! Only calendar dates are compared. A missing or empty date makes the
//! difference functions return `0` and `d2:addDays` return empty text.

use super::define;
use super::helpers::{date_arg, number_arg};
use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::registry::{Argument, FunctionParameter, FunctionRegistry, ParamKind};
use chrono::{Datelike, Months, NaiveDate, TimeDelta};
use rule_engine_types::Value;

pub fn register(registry: &mut FunctionRegistry) {
    let between = || {
        vec![
            FunctionParameter::required("start", ParamKind::Date),
            FunctionParameter::required("end", ParamKind::Date),
        ]
    };

    registry.register(define("d2:daysBetween", between(), days_between));
    registry.register(define("d2:weeksBetween", between(), weeks_between));
    registry.register(define("d2:monthsBetween", between(), months_between));
    registry.register(define("d2:yearsBetween", between(), years_between));
    registry.register(define(
        "d2:addDays",
        vec![
            FunctionParameter::required("date", ParamKind::Date),
            FunctionParameter::required("days", ParamKind::Number),
        ],
        add_days,
    ));
}

fn date_pair(args: &[Argument]) -> Option<(NaiveDate, NaiveDate)> {
    Some((date_arg(args, 0)?, date_arg(args, 1)?))
}

fn between(args: &[Argument], diff: impl Fn(NaiveDate, NaiveDate) -> i64) -> Value {
    let result = date_pair(args).map_or(0, |(start, end)| diff(start, end));
    Value::Number(result as f64)
}

fn days_between(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    Ok(between(args, |start, end| (end - start).num_days()))
}

fn weeks_between(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    Ok(between(args, |start, end| (end - start).num_days() / 7))
}

fn months_between(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    Ok(between(args, whole_months))
}

fn years_between(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    Ok(between(args, |start, end| whole_months(start, end) / 12))
}

/// Whole calendar months from `start` to `end`, negative when reversed
pub fn whole_months(start: NaiveDate, end: NaiveDate) -> i64 {
    if end < start {
        return -whole_months(end, start);
    }
    let months = i64::from(end.year() - start.year()) * 12 + i64::from(end.month())
        - i64::from(start.month());
    let overshoots = u32::try_from(months)
        .ok()
        .and_then(|m| start.checked_add_months(Months::new(m)))
        .is_some_and(|candidate| candidate > end);
    if overshoots { months - 1 } else { months }
}

fn add_days(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    let Some(date) = date_arg(args, 0) else {
        return Ok(Value::empty());
    };
    let days = number_arg(args, 1).trunc() as i64;
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .map(Value::Date)
        .ok_or_else(|| {
            EvalError::invalid_argument("d2:addDays", format!("{days} days from {date} is out of range"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn date(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
    }

    #[rstest]
    #[case("2010-10-15", "2010-10-22", 0)]
    #[case("2010-09-30", "2010-10-31", 1)]
    #[case("2013-01-31", "2013-02-01", 0)]
    #[case("2016-01-01", "2016-07-31", 6)]
    #[case("2015-01-01", "2016-06-30", 17)]
    #[case("2016-07-31", "2016-01-01", -6)]
    fn test_whole_months(#[case] start: &str, #[case] end: &str, #[case] expected: i64) {
        assert_eq!(whole_months(date(start), date(end)), expected);
    }
}
