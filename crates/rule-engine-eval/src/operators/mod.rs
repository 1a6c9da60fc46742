//! Operator implementations
//!
//! - Arithmetic operators (`+`, `-`, `*`, `/`, `%`, `^`, unary `-`/`+`)
//! - Comparison operators (`==`, `!=`, `<`, `<=`, `>`, `>=`)
//! - Logical operators (`&&`, `||`, `!`)

pub mod arithmetic;
pub mod comparison;
pub mod logical;

pub use comparison::{compare_values, values_equal};
