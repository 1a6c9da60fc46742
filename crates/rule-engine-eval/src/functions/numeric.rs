//! Numeric functions
//!
//! Arguments are lenient: empty or non-numeric text counts as `0`.

use super::define;
use super::helpers::number_arg;
use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::registry::{Argument, FunctionDefinition, FunctionParameter, FunctionRegistry, ParamKind};
use rule_engine_types::Value;
use std::sync::Arc;

pub fn register(registry: &mut FunctionRegistry) {
    let number = |name: &str| FunctionParameter::required(name, ParamKind::Number);

    registry.register(define("d2:round", vec![number("value")], round));
    registry.register(define(
        "d2:modulus",
        vec![number("dividend"), number("divisor")],
        modulus,
    ));
    registry.register(define("d2:floor", vec![number("value")], floor));
    registry.register(define("d2:ceil", vec![number("value")], ceil));

    for (name, implementation) in [
        ("greatest", greatest as super::Implementation),
        ("least", least),
    ] {
        registry.register(
            FunctionDefinition::new(name, vec![number("first")])
                .variadic(ParamKind::Number)
                .with_implementation(Arc::new(implementation)),
        );
    }
}

/// Half-up rounding: `2.5` becomes `3`, `-2.5` becomes `-2`
pub fn round_half_up(value: f64) -> f64 {
    // `value + 0.5` would itself round for values just under a half
    let floor = value.floor();
    if value - floor >= 0.5 { floor + 1.0 } else { floor }
}

fn round(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    Ok(Value::Number(round_half_up(number_arg(args, 0))))
}

fn modulus(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    let divisor = number_arg(args, 1);
    if divisor == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(Value::Number(number_arg(args, 0) % divisor))
}

fn floor(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    Ok(Value::Number(number_arg(args, 0).floor()))
}

fn ceil(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    Ok(Value::Number(number_arg(args, 0).ceil()))
}

fn numbers(args: &[Argument]) -> impl Iterator<Item = f64> + '_ {
    (0..args.len()).map(|i| number_arg(args, i))
}

fn greatest(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    Ok(Value::Number(numbers(args).fold(f64::NEG_INFINITY, f64::max)))
}

fn least(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    Ok(Value::Number(numbers(args).fold(f64::INFINITY, f64::min)))
}
