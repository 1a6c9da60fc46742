//! Accessors for materialized call-site arguments
//!
//! The evaluator has already coerced every argument to its declared kind, so a
//! missing or differently shaped argument falls back to the kind's neutral value.

use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::registry::Argument;
use crate::resolver::ResolvedVariable;
use chrono::NaiveDate;
use rule_engine_ast::{VariableKind, VariableRef};
use rule_engine_types::Value;

pub fn value_arg(args: &[Argument], index: usize) -> Option<&Value> {
    args.get(index).and_then(Argument::value)
}

pub fn text_arg(args: &[Argument], index: usize) -> &str {
    value_arg(args, index).and_then(Value::as_str).unwrap_or("")
}

pub fn number_arg(args: &[Argument], index: usize) -> f64 {
    match value_arg(args, index) {
        Some(Value::Number(n)) => *n,
        _ => 0.0,
    }
}

pub fn date_arg(args: &[Argument], index: usize) -> Option<NaiveDate> {
    match value_arg(args, index) {
        Some(Value::Date(d)) => Some(*d),
        _ => None,
    }
}

pub fn bool_arg(args: &[Argument], index: usize) -> bool {
    matches!(value_arg(args, index), Some(Value::Boolean(true)))
}

/// Resolve a variable-parameter argument.
///
/// A string literal is the deprecated way of naming a program rule variable
/// and resolves exactly like `#{name}`.
pub fn variable_arg(
    function: &str,
    arg: &Argument,
    ctx: &EvaluationContext<'_>,
) -> EvalResult<ResolvedVariable> {
    match arg {
        Argument::Variable(reference) => ctx.resolve_variable(reference),
        Argument::Literal(name) => {
            log::debug!("{function}: deprecated variable name literal '{name}', use #{{{name}}}");
            ctx.resolve_variable(&VariableRef::new(VariableKind::ProgramRule, name.as_str()))
        }
        Argument::Value(value) => Err(EvalError::invalid_argument(
            function,
            format!("expected a variable reference, found '{value}'"),
        )),
    }
}

/// Integral value as a number result; used by functions returning counts
pub fn count_value(count: usize) -> Value {
    Value::Number(count as f64)
}
