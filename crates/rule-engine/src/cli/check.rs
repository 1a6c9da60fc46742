//! Check command implementation

use super::evaluate::load_document;
use super::output;
use crate::CompiledRule;
use anyhow::{Context, Result};
use colored::Colorize;
use rule_engine_model::Rule;
use std::path::PathBuf;

/// Configuration for check command
pub struct CheckConfig {
    pub file: PathBuf,
}

/// One problem found in a rule
pub struct Finding {
    pub rule: String,
    pub report: String,
}

/// Validate each rule and parse every condition and action data expression
pub fn check_rules(rules: &[Rule]) -> Vec<Finding> {
    let mut findings = Vec::new();
    for rule in rules {
        let name = rule.display_name();
        if let Err(e) = rule.validate() {
            findings.push(Finding {
                rule: name,
                report: e.to_diagnostic().render(""),
            });
            continue;
        }
        let compiled = CompiledRule::compile(rule.clone());
        findings.extend(compiled.failures().map(|(source, error)| Finding {
            rule: name.clone(),
            report: error.to_diagnostic().render(source),
        }));
    }
    findings
}

/// Check the rules of a context document; fails when any rule has a problem
pub fn check(config: &CheckConfig) -> Result<()> {
    let document = load_document(&config.file)?;
    let rules = document
        .rules
        .as_deref()
        .with_context(|| format!("{} has no rules document", config.file.display()))?;

    let findings = check_rules(rules);
    for finding in &findings {
        println!("{} {}", "rule".bold(), finding.rule.cyan());
        println!("{}\n", finding.report);
    }

    if findings.is_empty() {
        println!(
            "{}",
            output::format_success(&format!("All {} rule(s) parsed", rules.len()))
        );
        Ok(())
    } else {
        anyhow::bail!(
            "{} problem(s) found in {}",
            findings.len(),
            config.file.display()
        )
    }
}
