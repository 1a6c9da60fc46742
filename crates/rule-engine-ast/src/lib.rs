//! Expression tree for tracker program rule expressions
//!
//! The tree mirrors the rule expression grammar: literals, variable placeholders
//! (`#{..}`, `A{..}`, `V{..}`, `C{..}`), function calls such as `d2:daysBetween(..)`,
//! and unary/binary operators.

mod expression;
mod literal;
mod operator;

pub use expression::*;
pub use literal::*;
pub use operator::*;

/// Type alias for boxed expressions
pub type BoxExpr = Box<Expression>;
