//! Expr command implementation

use crate::RuleEngineContext;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use rule_engine_model::{EnrollmentStatus, RuleEnrollment};
use std::collections::HashMap;

/// Configuration for expr command
pub struct ExprConfig {
    pub expression: String,
    /// Constants (name=value)
    pub constants: Vec<String>,
    /// Calculated values (name=value)
    pub values: Vec<String>,
    /// Supplementary data (key=v1,v2)
    pub supplementary: Vec<String>,
    pub current_date: Option<NaiveDate>,
}

/// Evaluate the expression against an empty enrollment
pub fn evaluate_expression(config: &ExprConfig) -> Result<String> {
    let constants = parse_pairs(&config.constants)?;
    let values = parse_pairs(&config.values)?;
    let supplementary = parse_pairs(&config.supplementary)?
        .into_iter()
        .map(|(key, list)| {
            let items = list
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect();
            (key, items)
        })
        .collect();

    let today = config
        .current_date
        .unwrap_or_else(|| Local::now().date_naive());
    let enrollment = RuleEnrollment::new("cli", today, today, EnrollmentStatus::Active, vec![])?;

    let engine = RuleEngineContext::builder()
        .rules(vec![])
        .variables(vec![])
        .constants(constants)
        .supplementary_data(supplementary)
        .calculated_values(values)
        .build()?
        .to_engine_builder()
        .enrollment(enrollment)
        .current_date(today)
        .build()?;

    engine
        .evaluate_expression(&config.expression)
        .with_context(|| format!("Failed to evaluate `{}`", config.expression))
}

/// Evaluate a single expression and print its value
pub fn expr(config: &ExprConfig) -> Result<()> {
    println!("{}", evaluate_expression(config)?);
    Ok(())
}

/// Parse `name=value` arguments into a map
fn parse_pairs(args: &[String]) -> Result<HashMap<String, String>> {
    args.iter()
        .map(|arg| {
            let (name, value) = arg
                .split_once('=')
                .with_context(|| format!("Invalid argument '{arg}'. Expected 'name=value'"))?;
            let name = name.trim();
            if name.is_empty() {
                anyhow::bail!("Invalid argument '{arg}'. The name is empty");
            }
            Ok((name.to_string(), value.trim().to_string()))
        })
        .collect()
}
