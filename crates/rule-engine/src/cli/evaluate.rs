//! Evaluate command implementation

use super::output::{self, OutputFormat};
use crate::ContextDocument;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for evaluate command
pub struct EvaluateConfig {
    pub file: PathBuf,
    /// Event to evaluate alone; overrides the document's own target
    pub target: Option<String>,
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

/// Load a JSON context document
pub fn load_document(path: &Path) -> Result<ContextDocument> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read context document: {}", path.display()))?;
    ContextDocument::from_json(&text)
        .with_context(|| format!("Failed to parse context document: {}", path.display()))
}

/// Run the document's rules and render the effects
pub fn render(config: &EvaluateConfig) -> Result<String> {
    let document = load_document(&config.file)?;
    let engine = document
        .engine()
        .with_context(|| format!("Failed to build rule engine from {}", config.file.display()))?;

    match config.target.as_deref().or(document.target.as_deref()) {
        Some(uid) => {
            let event = document
                .target_event(Some(uid))
                .with_context(|| format!("No event with uid '{uid}' in {}", config.file.display()))?;
            log::info!("evaluating event {uid}");
            let effects = engine.evaluate_event(event)?;
            output::format_effects(uid, &effects, config.format)
        }
        None => {
            log::info!(
                "evaluating enrollment with {} events",
                document.events.len()
            );
            let groups = engine.evaluate_all()?;
            output::format_groups(&groups, config.format)
        }
    }
}

/// Evaluate a context document
pub fn evaluate(config: &EvaluateConfig) -> Result<()> {
    let content = render(config)?;
    output::write_output(&content, config.output_file.as_deref())
}
