//! Value model for tracker program rule expressions
//!
//! This crate defines:
//! - [`Value`], the runtime result of every expression (boolean, number, text, date)
//! - [`RuleValueType`], the declared type of a rule variable
//! - Conversion rules between value kinds and their text forms

mod coercion;
mod format;
mod value;
mod value_type;

pub use coercion::*;
pub use format::*;
pub use value::*;
pub use value_type::*;
