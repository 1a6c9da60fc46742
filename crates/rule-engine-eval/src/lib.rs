//! Rule Expression Evaluation
//!
//! This crate evaluates parsed rule expressions against one tracker record:
//!
//! - **Operators**: arithmetic, comparison and short-circuiting logic
//! - **Variable Resolution**: `#{..}`, `A{..}`, `V{..}` and `C{..}` placeholders
//!   against the target record, the run's events and the calculated-value cache
//! - **Function Library**: date arithmetic, string, numeric, aggregation, lookup and
//!   anthropometric functions, registered by qualified name
//!
//! # Example
//!
//! ```ignore
//! use rule_engine_eval::{CalculatedValues, EvaluationContext, ExpressionEngine, RuleData, Target};
//! use rule_engine_parser::parse_expression;
//!
//! let engine = ExpressionEngine::new();
//! let data = RuleData::new(today).with_enrollment(enrollment.clone());
//! let calculated = CalculatedValues::new();
//! let ctx = EvaluationContext::new(&data, &calculated, Target::Enrollment(&enrollment));
//!
//! let expr = parse_expression("d2:daysBetween(V{enrollment_date}, V{current_date})")?;
//! let days = engine.evaluate_to_string(&expr, &ctx)?;
//! ```
//!
//! # Architecture
//!
//! - `ExpressionEngine`: walks the expression tree and dispatches operators and calls
//! - `EvaluationContext`: the read-only run data, the cache and the target record
//! - `FunctionRegistry`: function definitions with declared parameter kinds
//! - `resolver`: placeholder lookup rules

pub mod context;
pub mod engine;
pub mod error;
mod functions;
pub mod operators;
pub mod registry;
pub mod resolver;

pub use context::{CalculatedValues, EvaluationContext, RuleData, Target, USER_ROLES_KEY};
pub use engine::ExpressionEngine;
pub use error::{EvalError, EvalResult};
pub use functions::{GrowthIndicator, Sex, z_score};
pub use registry::{Argument, FunctionDefinition, FunctionFn, FunctionParameter, FunctionRegistry, ParamKind};
pub use resolver::{ENVIRONMENT_VARIABLES, Occurrence, ResolvedVariable};
