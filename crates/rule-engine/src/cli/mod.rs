//! CLI functionality for the rule engine tool
//!
//! This module contains all CLI-related functionality including:
//! - Evaluating a context document
//! - Checking rule expressions
//! - Evaluating a single expression
//! - Output formatting

pub mod check;
pub mod evaluate;
pub mod expr;
pub mod output;
