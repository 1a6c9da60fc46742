//! Output formatting utilities

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use rule_engine_model::{RuleEffect, RuleEffects};
use std::fs;
use std::io::IsTerminal;
use std::path::Path;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    #[default]
    Pretty,
    /// One row per effect
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Set up color output based on user preference
pub fn setup_colors(mode: ColorMode) {
    let enabled = match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stdout().is_terminal(),
    };
    colored::control::set_override(enabled);
}

/// Format an error for display
pub fn format_error(error: &anyhow::Error) -> String {
    format!("{} {error:#}", "Error:".red().bold())
}

/// Format a success message for display
pub fn format_success(message: &str) -> String {
    format!("{} {message}", "Success:".green().bold())
}

/// Write output to a file or stdout
pub fn write_output(content: &str, output_file: Option<&Path>) -> Result<()> {
    match output_file {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            eprintln!(
                "{}",
                format_success(&format!("Output written to {}", path.display()))
            );
        }
        None => println!("{content}"),
    }
    Ok(())
}

#[derive(Tabled)]
struct EffectRow {
    #[tabled(rename = "Record")]
    record: String,
    #[tabled(rename = "Rule")]
    rule: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Content")]
    content: String,
    #[tabled(rename = "Data")]
    data: String,
}

impl EffectRow {
    fn new(record: &str, effect: &RuleEffect) -> Self {
        Self {
            record: record.to_string(),
            rule: effect.rule_uid.clone().unwrap_or_default(),
            action: effect.action.kind().to_string(),
            field: effect.action.field().to_string(),
            content: effect.action.content().to_string(),
            data: effect.data.clone(),
        }
    }
}

fn table(rows: Vec<EffectRow>) -> String {
    if rows.is_empty() {
        return "(no effects)".to_string();
    }
    Table::new(rows).with(Style::modern()).to_string()
}

fn json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    text.context("Failed to serialize effects")
}

/// Render the effects of a single-record run
pub fn format_effects(record: &str, effects: &[RuleEffect], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json(&effects, false),
        OutputFormat::Pretty => json(&effects, true),
        OutputFormat::Table => Ok(table(
            effects.iter().map(|e| EffectRow::new(record, e)).collect(),
        )),
    }
}

/// Render the grouped effects of a multi-record run
pub fn format_groups(groups: &[RuleEffects], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json(&groups, false),
        OutputFormat::Pretty => json(&groups, true),
        OutputFormat::Table => Ok(table(
            groups
                .iter()
                .flat_map(|group| {
                    group
                        .effects
                        .iter()
                        .map(|e| EffectRow::new(&group.tracker_object_uid, e))
                })
                .collect(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rule_engine_model::RuleAction;

    fn effect() -> RuleEffect {
        let action = RuleAction::show_warning(Some("Too heavy"), None, Some("weight")).unwrap();
        RuleEffect::new(Some("r1".into()), action, "12")
    }

    #[test]
    fn test_table_lists_each_effect() {
        let groups = vec![
            RuleEffects::enrollment("enr", vec![]),
            RuleEffects::event("ev1", vec![effect()]),
        ];
        let table = format_groups(&groups, OutputFormat::Table).unwrap();
        assert!(table.contains("SHOW_WARNING"));
        assert!(table.contains("ev1"));
        assert!(!table.contains("enr"));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(
            format_effects("ev", &[], OutputFormat::Table).unwrap(),
            "(no effects)"
        );
    }

    #[test]
    fn test_compact_json() {
        let text = format_effects("ev", &[effect()], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["data"], "12");
        assert_eq!(value[0]["action"]["type"], "SHOW_WARNING");
    }
}
