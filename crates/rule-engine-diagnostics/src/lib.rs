//! Rule engine diagnostics and error handling
//!
//! This crate provides the error infrastructure shared by the rule engine crates:
//! structured error codes, source locations inside expression text, and
//! diagnostics suitable for reporting back to rule authors.

mod error;
mod error_code;
mod span;

pub use error::*;
pub use error_code::*;
pub use span::*;

/// Result type for rule engine operations
pub type Result<T> = std::result::Result<T, RuleError>;
