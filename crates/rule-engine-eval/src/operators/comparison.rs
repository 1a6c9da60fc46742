//! Comparison Operators
//!
//! Implements: Equal, NotEqual, Less, LessOrEqual, Greater, GreaterOrEqual.
//!
//! Equality reconciles a typed value with text that parses as the same kind and
//! otherwise compares text forms. Ordering needs operands of one kind (text
//! that parses as the other operand's kind counts) and fails otherwise.

use crate::context::EvaluationContext;
use crate::engine::ExpressionEngine;
use crate::error::{EvalError, EvalResult};
use rule_engine_ast::{BinaryOp, BinaryOpExpr};
use rule_engine_types::{parse_date, parse_number, RuleValueType, Value};
use std::cmp::Ordering;

impl ExpressionEngine {
    /// Evaluate `==`
    pub fn eval_equal(&self, expr: &BinaryOpExpr, ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
        let (left, right) = self.eval_binary_operands(expr, ctx)?;
        Ok(Value::Boolean(values_equal(&left, &right)))
    }

    /// Evaluate `!=`
    pub fn eval_not_equal(
        &self,
        expr: &BinaryOpExpr,
        ctx: &EvaluationContext<'_>,
    ) -> EvalResult<Value> {
        let (left, right) = self.eval_binary_operands(expr, ctx)?;
        Ok(Value::Boolean(!values_equal(&left, &right)))
    }

    /// Evaluate `<`, `<=`, `>` and `>=`
    pub fn eval_ordering(
        &self,
        expr: &BinaryOpExpr,
        ctx: &EvaluationContext<'_>,
    ) -> EvalResult<Value> {
        let (left, right) = self.eval_binary_operands(expr, ctx)?;
        let ordering = compare_values(&left, &right)?;

        let result = match expr.op {
            BinaryOp::Less => ordering.is_lt(),
            BinaryOp::LessOrEqual => ordering.is_le(),
            BinaryOp::Greater => ordering.is_gt(),
            BinaryOp::GreaterOrEqual => ordering.is_ge(),
            op => {
                return Err(EvalError::invalid_argument(
                    op.symbol(),
                    "not an ordering operator",
                ));
            }
        };
        Ok(Value::Boolean(result))
    }
}

/// Equality used by `==` and `!=`
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Number(n), Value::Text(t)) | (Value::Text(t), Value::Number(n)) => {
            match parse_number(t) {
                Some(parsed) => parsed == *n,
                None => left.as_text() == right.as_text(),
            }
        }
        (Value::Boolean(b), Value::Text(t)) | (Value::Text(t), Value::Boolean(b)) => {
            t.eq_ignore_ascii_case(if *b { "true" } else { "false" })
        }
        (Value::Date(d), Value::Text(t)) | (Value::Text(t), Value::Date(d)) => {
            parse_date(t).is_ok_and(|parsed| parsed == *d)
        }
        _ => left.as_text() == right.as_text(),
    }
}

/// Ordering used by `<`, `<=`, `>` and `>=`
pub fn compare_values(left: &Value, right: &Value) -> EvalResult<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(compare_numbers(*a, *b)),
        (Value::Number(a), Value::Text(t)) => Ok(compare_numbers(*a, text_number(t)?)),
        (Value::Text(t), Value::Number(b)) => Ok(compare_numbers(text_number(t)?, *b)),
        (Value::Text(a), Value::Text(b)) => Ok(a.cmp(b)),
        (Value::Date(a), Value::Date(b)) => Ok(a.cmp(b)),
        (Value::Date(a), Value::Text(t)) => Ok(a.cmp(&parse_date(t)?)),
        (Value::Text(t), Value::Date(b)) => Ok(parse_date(t)?.cmp(b)),
        (Value::Boolean(a), Value::Boolean(b)) => Ok(a.cmp(b)),
        _ => Err(EvalError::type_coercion(
            right.as_text(),
            left.value_type(),
        )),
    }
}

fn compare_numbers(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn text_number(text: &str) -> EvalResult<f64> {
    parse_number(text).ok_or_else(|| EvalError::type_coercion(text, RuleValueType::Numeric))
}
