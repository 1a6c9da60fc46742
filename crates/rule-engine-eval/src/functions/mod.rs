//! Builtin function library
//!
//! - Date arithmetic: `d2:daysBetween`, `d2:weeksBetween`, `d2:monthsBetween`,
//!   `d2:yearsBetween`, `d2:addDays`
//! - String: `d2:length`, `d2:substring`, `d2:left`, `d2:right`, `d2:split`,
//!   `d2:concatenate`, `d2:validatePattern`
//! - Numeric: `d2:round`, `d2:modulus`, `d2:floor`, `d2:ceil`, `greatest`, `least`
//! - Aggregation: `d2:count`, `d2:countIfValue`, `d2:countIfZeroPos`,
//!   `d2:maxValue`, `d2:minValue`, `d2:lastEventDate`
//! - Lookup: `d2:hasValue`, `d2:inOrgUnitGroup`, `d2:hasUserRole`, `if`,
//!   `isNull`, `isNotNull`, `firstNonNull`
//! - Anthropometric: `d2:zScoreWFA`, `d2:zScoreHFA`, `d2:zScoreWFH`, `d2:zpvc`,
//!   `d2:zing`, `d2:oizp`

mod aggregate;
mod date;
mod helpers;
mod lookup;
mod numeric;
mod string;
mod zscore;

use crate::context::EvaluationContext;
use crate::error::EvalResult;
use crate::registry::{Argument, FunctionDefinition, FunctionParameter, FunctionRegistry};
use rule_engine_types::Value;
use std::sync::Arc;

pub use zscore::{GrowthIndicator, Sex, z_score};

type Implementation = fn(&[Argument], &EvaluationContext<'_>) -> EvalResult<Value>;

/// Register every builtin function
pub fn register_standard_functions(registry: &mut FunctionRegistry) {
    date::register(registry);
    string::register(registry);
    numeric::register(registry);
    aggregate::register(registry);
    lookup::register(registry);
    zscore::register(registry);
}

fn define(
    name: &str,
    parameters: Vec<FunctionParameter>,
    implementation: Implementation,
) -> FunctionDefinition {
    FunctionDefinition::new(name, parameters).with_implementation(Arc::new(implementation))
}
