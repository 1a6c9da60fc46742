//! Presence checks, membership tests and conditionals

use super::define;
use super::helpers::{bool_arg, text_arg, value_arg};
use crate::context::{EvaluationContext, USER_ROLES_KEY};
use crate::error::EvalResult;
use crate::registry::{Argument, FunctionDefinition, FunctionParameter, FunctionRegistry, ParamKind};
use rule_engine_ast::{VariableKind, VariableRef};
use rule_engine_types::Value;
use std::sync::Arc;

pub fn register(registry: &mut FunctionRegistry) {
    let variable = || FunctionParameter::required("variable", ParamKind::Variable);

    registry.register(define("d2:hasValue", vec![variable()], has_value));
    registry.register(define("isNull", vec![variable()], is_null));
    registry.register(define("isNotNull", vec![variable()], is_not_null));
    registry.register(
        FunctionDefinition::new("firstNonNull", vec![variable()])
            .variadic(ParamKind::Variable)
            .with_implementation(Arc::new(first_non_null)),
    );
    registry.register(define(
        "d2:inOrgUnitGroup",
        vec![FunctionParameter::required("group", ParamKind::Text)],
        in_org_unit_group,
    ));
    registry.register(define(
        "d2:hasUserRole",
        vec![FunctionParameter::required("role", ParamKind::Text)],
        has_user_role,
    ));
    registry.register(define(
        "if",
        vec![
            FunctionParameter::required("condition", ParamKind::Boolean),
            FunctionParameter::required("when_true", ParamKind::Any),
            FunctionParameter::required("when_false", ParamKind::Any),
        ],
        if_then_else,
    ));
}

/// Presence of a variable argument; never fails
fn present(arg: &Argument, ctx: &EvaluationContext<'_>) -> bool {
    match arg {
        Argument::Variable(reference) => ctx.has_value(reference),
        Argument::Literal(name) => {
            log::debug!("d2:hasValue: deprecated variable name literal '{name}', use #{{{name}}}");
            ctx.has_value(&VariableRef::new(VariableKind::ProgramRule, name.as_str()))
        }
        Argument::Value(value) => !value.is_empty(),
    }
}

fn has_value(args: &[Argument], ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    Ok(Value::Boolean(args.first().is_some_and(|arg| present(arg, ctx))))
}

fn is_null(args: &[Argument], ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    Ok(Value::Boolean(!args.first().is_some_and(|arg| present(arg, ctx))))
}

fn is_not_null(args: &[Argument], ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    has_value(args, ctx)
}

/// First argument with a value. String literals here are values, not names.
fn first_non_null(args: &[Argument], ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    for arg in args {
        match arg {
            Argument::Variable(reference) if ctx.has_value(reference) => {
                return ctx.resolve(reference);
            }
            Argument::Literal(text) if !text.is_empty() => return Ok(Value::text(text)),
            Argument::Value(value) if !value.is_empty() => return Ok(value.clone()),
            _ => {}
        }
    }
    Ok(Value::empty())
}

fn in_org_unit_group(args: &[Argument], ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    let group = text_arg(args, 0);
    let org_unit = ctx.organisation_unit();
    let member = !org_unit.is_empty() && ctx.supplementary(group).iter().any(|ou| ou == org_unit);
    Ok(Value::Boolean(member))
}

fn has_user_role(args: &[Argument], ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    let role = text_arg(args, 0);
    let member = ctx.supplementary(USER_ROLES_KEY).iter().any(|r| r == role);
    Ok(Value::Boolean(member))
}

fn if_then_else(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    let branch = if bool_arg(args, 0) { 1 } else { 2 };
    Ok(value_arg(args, branch).cloned().unwrap_or_else(Value::empty))
}
