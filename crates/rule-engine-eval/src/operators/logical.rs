//! Logical Operators
//!
//! Implements: And, Or, Not. Operands must be booleans or `true`/`false` text.
//! `&&` and `||` stop once the left operand decides the result.

use crate::context::EvaluationContext;
use crate::engine::ExpressionEngine;
use crate::error::EvalResult;
use rule_engine_ast::{BinaryOpExpr, UnaryOpExpr};
use rule_engine_types::Value;

impl ExpressionEngine {
    /// Evaluate `&&`
    pub fn eval_and(&self, expr: &BinaryOpExpr, ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
        if !self.evaluate(&expr.left, ctx)?.to_boolean()? {
            return Ok(Value::Boolean(false));
        }
        let right = self.evaluate(&expr.right, ctx)?.to_boolean()?;
        Ok(Value::Boolean(right))
    }

    /// Evaluate `||`
    pub fn eval_or(&self, expr: &BinaryOpExpr, ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
        if self.evaluate(&expr.left, ctx)?.to_boolean()? {
            return Ok(Value::Boolean(true));
        }
        let right = self.evaluate(&expr.right, ctx)?.to_boolean()?;
        Ok(Value::Boolean(right))
    }

    /// Evaluate `!`
    pub fn eval_not(&self, expr: &UnaryOpExpr, ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
        let operand = self.evaluate(&expr.operand, ctx)?.to_boolean()?;
        Ok(Value::Boolean(!operand))
    }
}
