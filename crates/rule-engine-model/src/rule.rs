//! Program rules

use crate::{is_blank, RuleAction};
use rule_engine_diagnostics::{Result, RuleError, RULE0100};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A condition plus the actions to take when it holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default)]
    uid: Option<String>,
    #[serde(default)]
    priority: Option<i32>,
    condition: String,
    #[serde(default)]
    actions: Vec<RuleAction>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    program_stage: Option<String>,
}

impl Rule {
    pub fn new(condition: &str, actions: Vec<RuleAction>) -> Result<Self> {
        let rule = Self {
            uid: None,
            priority: None,
            condition: condition.to_string(),
            actions,
            name: None,
            program_stage: None,
        };
        rule.validate()?;
        Ok(rule)
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Human-readable description
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Restrict the rule to events of one program stage
    pub fn with_program_stage(mut self, program_stage: impl Into<String>) -> Self {
        self.program_stage = Some(program_stage.into());
        self
    }

    /// Check the condition and every action
    pub fn validate(&self) -> Result<()> {
        if is_blank(&self.condition) {
            return Err(RuleError::construction(
                RULE0100,
                format!("Rule {} has an empty condition", self.display_name()),
            ));
        }
        self.actions.iter().try_for_each(RuleAction::validate)
    }

    pub fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    pub fn priority(&self) -> Option<i32> {
        self.priority
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn actions(&self) -> &[RuleAction] {
        &self.actions
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn program_stage(&self) -> Option<&str> {
        self.program_stage.as_deref()
    }

    /// Name, uid or condition, whichever identifies the rule best in messages
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .or(self.uid.as_deref())
            .map_or_else(|| format!("`{}`", self.condition), |s| format!("'{s}'"))
    }

    /// Evaluation order: ascending priority, rules without one last.
    ///
    /// Used with a stable sort, so equal priorities keep their input order.
    pub fn priority_order(a: &Rule, b: &Rule) -> Ordering {
        match (a.priority, b.priority) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}
