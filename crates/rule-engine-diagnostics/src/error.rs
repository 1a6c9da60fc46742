//! Rule engine error types

use crate::{ErrorCode, SourceLocation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Rule cannot be evaluated
    Error,
    /// Rule can be evaluated but will probably misbehave
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A diagnostic message with location and help
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: ErrorCode,
    pub message: String,
    pub location: Option<SourceLocation>,
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            location: None,
            help: None,
        }
    }

    /// Create a new warning diagnostic
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            location: None,
            help: None,
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render the diagnostic with the offending expression line and a caret marker
    pub fn render(&self, source: &str) -> String {
        let mut out = format!("{}: {} {}", self.severity_label(), self.code, self.message);

        if let Some(loc) = &self.location {
            if let Some(line) = source.lines().nth(loc.line.saturating_sub(1)) {
                let width = loc.length.max(1);
                out.push_str(&format!("\n  --> {loc}\n   | {line}\n   | "));
                out.push_str(&" ".repeat(loc.column.saturating_sub(1)));
                out.push_str(&"^".repeat(width));
            }
        }

        let help = self.help.as_deref().or(self.code.info().help);
        if let Some(help) = help {
            out.push_str(&format!("\n   = help: {help}"));
        }
        out
    }

    #[cfg(feature = "colored")]
    fn severity_label(&self) -> String {
        use colored::Colorize;
        match self.severity {
            Severity::Error => "error".red().bold().to_string(),
            Severity::Warning => "warning".yellow().bold().to_string(),
            Severity::Info => "info".blue().bold().to_string(),
        }
    }

    #[cfg(not(feature = "colored"))]
    fn severity_label(&self) -> String {
        self.severity.to_string()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " at {}", loc)?;
        }
        Ok(())
    }
}

/// Main rule engine error type
#[derive(Debug, Clone, Error)]
pub enum RuleError {
    /// Invalid rule, action, variable or context document
    #[error("{code}: {message}")]
    Construction { code: ErrorCode, message: String },

    /// Malformed expression text
    #[error("{code}: {message}")]
    Parse {
        code: ErrorCode,
        message: String,
        expression: String,
        location: Option<SourceLocation>,
    },

    /// Failure while evaluating an expression
    #[error("{code}: {message}")]
    Evaluation {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },

    #[error("{code}: {message}")]
    System { code: ErrorCode, message: String },
}

impl RuleError {
    /// Create a construction error
    pub fn construction(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Construction {
            code,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(code: ErrorCode, message: impl Into<String>, expression: impl Into<String>) -> Self {
        Self::Parse {
            code,
            message: message.into(),
            expression: expression.into(),
            location: None,
        }
    }

    /// Create a parse error with location
    pub fn parse_at(
        code: ErrorCode,
        message: impl Into<String>,
        expression: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self::Parse {
            code,
            message: message.into(),
            expression: expression.into(),
            location: Some(location),
        }
    }

    /// Create an evaluation error
    pub fn evaluation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Evaluation {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Attach the expression being evaluated to an evaluation error
    pub fn with_context(self, ctx: impl Into<String>) -> Self {
        match self {
            Self::Evaluation { code, message, .. } => Self::Evaluation {
                code,
                message,
                context: Some(ctx.into()),
            },
            other => other,
        }
    }

    /// Create a system error
    pub fn system(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::System {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Construction { code, .. }
            | Self::Parse { code, .. }
            | Self::Evaluation { code, .. }
            | Self::System { code, .. } => *code,
        }
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::Parse { location, .. } => location.as_ref(),
            _ => None,
        }
    }

    pub fn is_construction(&self) -> bool {
        matches!(self, Self::Construction { .. })
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Parse {
                code,
                message,
                location,
                ..
            } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(loc) = location {
                    diag = diag.with_location(loc.clone());
                }
                diag
            }
            Self::Evaluation {
                code,
                message,
                context,
            } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(ctx) = context {
                    diag = diag.with_help(format!("while evaluating `{ctx}`"));
                }
                diag
            }
            Self::Construction { code, message } | Self::System { code, message } => {
                Diagnostic::error(*code, message.clone())
            }
        }
    }
}
