//! Data carriers for the tracker rule engine
//!
//! Everything here is a plain record with validated construction:
//! - [`Rule`] and its [`RuleAction`]s
//! - [`RuleVariable`] declarations referenced as `#{name}` / `A{name}`
//! - [`RuleEvent`] and [`RuleEnrollment`], the tracker records being evaluated
//! - [`RuleEffect`] / [`RuleEffects`], the evaluation output
//!
//! All types serialize with camelCase field names so host documents can be loaded
//! with serde. Deserialized values bypass the constructors, so callers must run
//! `validate()` (the engine context does this when it is built).

mod action;
mod effect;
mod record;
mod rule;
mod variable;

pub use action::*;
pub use effect::*;
pub use record::*;
pub use rule::*;
pub use variable::*;

pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
