//! Aggregation over the occurrences of a variable
//!
//! Each function takes a variable reference (or, deprecated, a string literal
//! naming one) and scans the values its source holds across the run's events.

use super::define;
use super::helpers::{count_value, text_arg, variable_arg};
use crate::context::EvaluationContext;
use crate::error::EvalResult;
use crate::registry::{Argument, FunctionParameter, FunctionRegistry, ParamKind};
use crate::resolver::ResolvedVariable;
use rule_engine_types::{parse_number, Value};

pub fn register(registry: &mut FunctionRegistry) {
    let variable = || FunctionParameter::required("variable", ParamKind::Variable);

    registry.register(define("d2:count", vec![variable()], count));
    registry.register(define(
        "d2:countIfValue",
        vec![
            variable(),
            FunctionParameter::required("value", ParamKind::Text),
        ],
        count_if_value,
    ));
    registry.register(define("d2:countIfZeroPos", vec![variable()], count_if_zero_pos));
    registry.register(define("d2:maxValue", vec![variable()], max_value));
    registry.register(define("d2:minValue", vec![variable()], min_value));
    registry.register(define("d2:lastEventDate", vec![variable()], last_event_date));
}

fn occurrences_of(
    function: &str,
    args: &[Argument],
    ctx: &EvaluationContext<'_>,
) -> EvalResult<ResolvedVariable> {
    match args.first() {
        Some(arg) => variable_arg(function, arg, ctx),
        None => Ok(ResolvedVariable::default()),
    }
}

fn count(args: &[Argument], ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    let variable = occurrences_of("d2:count", args, ctx)?;
    Ok(count_value(variable.occurrences.len()))
}

fn count_if_value(args: &[Argument], ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    let variable = occurrences_of("d2:countIfValue", args, ctx)?;
    let expected = text_arg(args, 1);
    Ok(count_value(
        variable.occurrence_values().filter(|v| *v == expected).count(),
    ))
}

fn count_if_zero_pos(args: &[Argument], ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    let variable = occurrences_of("d2:countIfZeroPos", args, ctx)?;
    let count = variable
        .occurrence_values()
        .filter_map(parse_number)
        .filter(|n| *n >= 0.0)
        .count();
    Ok(count_value(count))
}

fn numeric_extremum(variable: &ResolvedVariable, pick: fn(f64, f64) -> f64) -> Value {
    variable
        .occurrence_values()
        .filter_map(parse_number)
        .reduce(pick)
        .map_or_else(Value::empty, Value::Number)
}

fn max_value(args: &[Argument], ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    let variable = occurrences_of("d2:maxValue", args, ctx)?;
    Ok(numeric_extremum(&variable, f64::max))
}

fn min_value(args: &[Argument], ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    let variable = occurrences_of("d2:minValue", args, ctx)?;
    Ok(numeric_extremum(&variable, f64::min))
}

/// Newest occurrence date, strictly before the target event's date when the
/// target is an event
fn last_event_date(args: &[Argument], ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    let variable = occurrences_of("d2:lastEventDate", args, ctx)?;
    let before = ctx.target_event().map(|event| event.event_date);
    let last = variable
        .occurrences
        .iter()
        .filter_map(|o| o.event_date)
        .filter(|date| before.is_none_or(|limit| *date < limit))
        .max();
    Ok(last.map_or_else(Value::empty, Value::Date))
}
