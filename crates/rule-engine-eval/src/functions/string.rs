//! String functions
//!
//! Positions and lengths count characters, not bytes. Indices outside the text
//! are clipped instead of failing.

use super::define;
use super::helpers::{number_arg, text_arg};
use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::registry::{Argument, FunctionDefinition, FunctionParameter, FunctionRegistry, ParamKind};
use regex::Regex;
use rule_engine_types::Value;
use std::sync::Arc;

pub fn register(registry: &mut FunctionRegistry) {
    let text = || FunctionParameter::required("text", ParamKind::Text);
    let number = |name: &str| FunctionParameter::required(name, ParamKind::Number);

    registry.register(define("d2:length", vec![text()], length));
    registry.register(define(
        "d2:substring",
        vec![text(), number("start"), number("end")],
        substring,
    ));
    registry.register(define("d2:left", vec![text(), number("count")], left));
    registry.register(define("d2:right", vec![text(), number("count")], right));
    registry.register(define(
        "d2:split",
        vec![
            text(),
            FunctionParameter::required("delimiter", ParamKind::Text),
            number("index"),
        ],
        split,
    ));
    registry.register(
        FunctionDefinition::new("d2:concatenate", vec![])
            .variadic(ParamKind::Text)
            .with_implementation(Arc::new(concatenate)),
    );
    registry.register(define(
        "d2:validatePattern",
        vec![text(), FunctionParameter::required("pattern", ParamKind::Text)],
        validate_pattern,
    ));
}

/// Clamp a numeric position into `0..=len`
fn clip(position: f64, len: usize) -> usize {
    if position <= 0.0 {
        0
    } else {
        (position as usize).min(len)
    }
}

fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end.saturating_sub(start)).collect()
}

fn length(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    Ok(Value::Number(text_arg(args, 0).chars().count() as f64))
}

fn substring(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    let text = text_arg(args, 0);
    let len = text.chars().count();
    let start = clip(number_arg(args, 1), len);
    let end = clip(number_arg(args, 2), len);
    Ok(Value::Text(char_slice(text, start, end)))
}

fn left(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    let text = text_arg(args, 0);
    let count = clip(number_arg(args, 1), text.chars().count());
    Ok(Value::Text(char_slice(text, 0, count)))
}

fn right(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    let text = text_arg(args, 0);
    let len = text.chars().count();
    let count = clip(number_arg(args, 1), len);
    Ok(Value::Text(char_slice(text, len - count, len)))
}

fn split(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    let text = text_arg(args, 0);
    let delimiter = text_arg(args, 1);
    let index = number_arg(args, 2);
    if index < 0.0 {
        return Ok(Value::empty());
    }

    let index = index as usize;
    let part = if delimiter.is_empty() {
        (index == 0).then_some(text)
    } else {
        text.split(delimiter).nth(index)
    };
    Ok(Value::text(part.unwrap_or_default()))
}

fn concatenate(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    let joined: String = args
        .iter()
        .filter_map(Argument::value)
        .map(Value::as_text)
        .collect();
    Ok(Value::Text(joined))
}

fn validate_pattern(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    let text = text_arg(args, 0);
    let pattern = text_arg(args, 1);
    let regex = Regex::new(&format!("^(?:{pattern})$"))
        .map_err(|err| EvalError::invalid_regex(pattern, err.to_string()))?;
    Ok(Value::Boolean(regex.is_match(text)))
}
