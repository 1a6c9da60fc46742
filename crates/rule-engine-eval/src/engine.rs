//! Expression evaluator
//!
//! [`ExpressionEngine`] walks a parsed [`Expression`] against an
//! [`EvaluationContext`]. Operators live in [`crate::operators`]; function
//! calls go through the [`FunctionRegistry`].

use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::registry::{Argument, FunctionRegistry, ParamKind};
use rule_engine_ast::{BinaryOp, BinaryOpExpr, Expression, FunctionCall, Literal, UnaryOp, UnaryOpExpr};
use rule_engine_types::{RuleValueType, Value};

/// The rule expression evaluator
#[derive(Debug, Clone)]
pub struct ExpressionEngine {
    /// Function registry
    registry: FunctionRegistry,
}

impl Default for ExpressionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionEngine {
    /// Create a new engine with the builtin function library
    pub fn new() -> Self {
        Self {
            registry: FunctionRegistry::with_standard_functions(),
        }
    }

    /// Create an engine with a custom registry
    pub fn with_registry(registry: FunctionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Get a mutable reference to the registry
    pub fn registry_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.registry
    }

    /// Evaluate an expression
    pub fn evaluate(&self, expr: &Expression, ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
        match expr {
            Expression::Literal(lit) => Ok(eval_literal(lit)),
            Expression::Variable(reference) => ctx.resolve(reference),
            Expression::FunctionCall(call) => self.eval_function_call(call, ctx),
            Expression::BinaryOp(bin) => self.eval_binary(bin, ctx),
            Expression::UnaryOp(un) => self.eval_unary(un, ctx),
        }
    }

    /// Evaluate an expression to its external text form
    pub fn evaluate_to_string(
        &self,
        expr: &Expression,
        ctx: &EvaluationContext<'_>,
    ) -> EvalResult<String> {
        self.evaluate(expr, ctx).map(|value| value.as_text())
    }

    /// Evaluate a rule condition; anything but a boolean is a coercion error
    pub fn evaluate_condition(
        &self,
        expr: &Expression,
        ctx: &EvaluationContext<'_>,
    ) -> EvalResult<bool> {
        match self.evaluate(expr, ctx)? {
            Value::Boolean(b) => Ok(b),
            other => Err(EvalError::type_coercion(other.as_text(), RuleValueType::Boolean)),
        }
    }

    fn eval_binary(&self, expr: &BinaryOpExpr, ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
        match expr.op {
            // === Logical ===
            BinaryOp::Or => self.eval_or(expr, ctx),
            BinaryOp::And => self.eval_and(expr, ctx),

            // === Comparison ===
            BinaryOp::Equal => self.eval_equal(expr, ctx),
            BinaryOp::NotEqual => self.eval_not_equal(expr, ctx),
            BinaryOp::Less
            | BinaryOp::LessOrEqual
            | BinaryOp::Greater
            | BinaryOp::GreaterOrEqual => self.eval_ordering(expr, ctx),

            // === Arithmetic ===
            BinaryOp::Add
            | BinaryOp::Subtract
            | BinaryOp::Multiply
            | BinaryOp::Divide
            | BinaryOp::Modulo
            | BinaryOp::Power => self.eval_arithmetic(expr, ctx),
        }
    }

    fn eval_unary(&self, expr: &UnaryOpExpr, ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
        match expr.op {
            UnaryOp::Not => self.eval_not(expr, ctx),
            UnaryOp::Negate => self.eval_negate(expr, ctx),
            UnaryOp::Plus => self.eval_plus(expr, ctx),
        }
    }

    /// Evaluate both operands of a binary expression, left first
    pub(crate) fn eval_binary_operands(
        &self,
        expr: &BinaryOpExpr,
        ctx: &EvaluationContext<'_>,
    ) -> EvalResult<(Value, Value)> {
        let left = self.evaluate(&expr.left, ctx)?;
        let right = self.evaluate(&expr.right, ctx)?;
        Ok((left, right))
    }

    fn eval_function_call(
        &self,
        call: &FunctionCall,
        ctx: &EvaluationContext<'_>,
    ) -> EvalResult<Value> {
        let name = call.name.qualified();
        let def = self
            .registry
            .get(&name)
            .ok_or_else(|| EvalError::unknown_function(&name))?;
        def.check_arity(call.arguments.len())?;

        let args = call
            .arguments
            .iter()
            .enumerate()
            .map(|(i, arg)| self.materialize(def.parameter_kind(i), arg, ctx))
            .collect::<EvalResult<Vec<_>>>()?;

        log::debug!("calling {name} with {} argument(s)", args.len());
        match &def.implementation {
            Some(implementation) => implementation(&args, ctx),
            None => Err(EvalError::unknown_function(&name)),
        }
    }

    /// Turn a call-site argument into what the declared parameter kind expects
    fn materialize(
        &self,
        kind: ParamKind,
        expr: &Expression,
        ctx: &EvaluationContext<'_>,
    ) -> EvalResult<Argument> {
        if kind == ParamKind::Variable {
            return Ok(match expr {
                Expression::Variable(reference) => Argument::Variable(reference.clone()),
                Expression::Literal(Literal::String(name)) => Argument::Literal(name.clone()),
                other => Argument::Value(self.evaluate(other, ctx)?),
            });
        }

        let value = self.evaluate(expr, ctx)?;
        let value = match kind {
            ParamKind::Text => Value::Text(value.as_text()),
            ParamKind::Number => value.to_number().map_or(Value::DEFAULT_NUMBER, Value::Number),
            ParamKind::Date => value
                .to_optional_date()?
                .map_or_else(Value::empty, Value::Date),
            ParamKind::Boolean => Value::Boolean(value.to_boolean()?),
            ParamKind::Any | ParamKind::Variable => value,
        };
        Ok(Argument::Value(value))
    }
}

fn eval_literal(lit: &Literal) -> Value {
    match lit {
        Literal::Number(n) => Value::Number(*n),
        Literal::String(s) => Value::Text(s.clone()),
        Literal::Boolean(b) => Value::Boolean(*b),
    }
}
