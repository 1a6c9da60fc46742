//! Arithmetic Operators
//!
//! Implements: Add, Subtract, Multiply, Divide, Modulo, Power, Negate, Plus.
//! Operands must be numeric: numbers, numeric text or booleans (1/0).

use crate::context::EvaluationContext;
use crate::engine::ExpressionEngine;
use crate::error::{EvalError, EvalResult};
use rule_engine_ast::{BinaryOp, BinaryOpExpr, UnaryOpExpr};
use rule_engine_types::Value;

impl ExpressionEngine {
    // =========================================================================
    // Binary Arithmetic
    // =========================================================================

    /// Evaluate a binary arithmetic operator
    pub fn eval_arithmetic(
        &self,
        expr: &BinaryOpExpr,
        ctx: &EvaluationContext<'_>,
    ) -> EvalResult<Value> {
        let (left, right) = self.eval_binary_operands(expr, ctx)?;
        let (a, b) = (left.to_number()?, right.to_number()?);

        let result = match expr.op {
            BinaryOp::Add => a + b,
            BinaryOp::Subtract => a - b,
            BinaryOp::Multiply => a * b,
            BinaryOp::Divide if b == 0.0 => return Err(EvalError::DivisionByZero),
            BinaryOp::Divide => a / b,
            BinaryOp::Modulo if b == 0.0 => return Err(EvalError::DivisionByZero),
            BinaryOp::Modulo => a % b,
            BinaryOp::Power => a.powf(b),
            op => {
                return Err(EvalError::invalid_argument(
                    op.symbol(),
                    "not an arithmetic operator",
                ));
            }
        };
        Ok(Value::Number(result))
    }

    // =========================================================================
    // Unary Arithmetic
    // =========================================================================

    /// Evaluate unary minus
    pub fn eval_negate(&self, expr: &UnaryOpExpr, ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
        let operand = self.evaluate(&expr.operand, ctx)?;
        Ok(Value::Number(-operand.to_number()?))
    }

    /// Evaluate unary plus: a numeric check that returns the operand as a number
    pub fn eval_plus(&self, expr: &UnaryOpExpr, ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
        let operand = self.evaluate(&expr.operand, ctx)?;
        Ok(Value::Number(operand.to_number()?))
    }
}
