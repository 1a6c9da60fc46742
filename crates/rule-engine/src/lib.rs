//! Program rule engine for tracker data
//!
//! This crate ties the workspace together:
//! - Parsing rule expressions into trees once per context
//! - Evaluating conditions and action data against enrollments and events
//! - Collecting rule effects per record, with a per-run calculated-value cache
//!
//! # Example
//!
//! ```ignore
//! use rule_engine::{Rule, RuleAction, RuleEngineContext};
//!
//! let rule = Rule::new(
//!     "#{weight} > 100",
//!     vec![RuleAction::show_warning(Some("Weight looks wrong"), None, Some("w8"))?],
//! )?;
//!
//! let engine = RuleEngineContext::builder()
//!     .rules(vec![rule])
//!     .variables(variables)
//!     .constants(HashMap::new())
//!     .supplementary_data(HashMap::new())
//!     .build()?
//!     .to_engine_builder()
//!     .enrollment(enrollment)
//!     .events(events)
//!     .build()?;
//!
//! for group in engine.evaluate_all()? {
//!     println!("{}: {} effects", group.tracker_object_uid, group.effects.len());
//! }
//! ```

mod context;
mod document;
mod engine;

// Re-export all public APIs from internal crates
pub use rule_engine_ast as ast;
pub use rule_engine_diagnostics as diagnostics;
pub use rule_engine_eval as eval;
pub use rule_engine_model as model;
pub use rule_engine_parser as parser;
pub use rule_engine_types as types;

// Convenience re-exports
pub use context::{
    CompiledAction, CompiledExpression, CompiledRule, RuleEngineContext, RuleEngineContextBuilder,
};
pub use document::ContextDocument;
pub use engine::{RuleEngine, RuleEngineBuilder};
pub use rule_engine_diagnostics::{Result, RuleError};
pub use rule_engine_model::{
    Rule, RuleAction, RuleEffect, RuleEffects, RuleEnrollment, RuleEvent, RuleVariable,
    TriggerEnvironment,
};
pub use rule_engine_parser::parse_expression;

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
