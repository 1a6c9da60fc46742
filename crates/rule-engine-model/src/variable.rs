//! Rule variable declarations

use crate::is_blank;
use rule_engine_diagnostics::{Result, RuleError, RULE0102};
use rule_engine_types::RuleValueType;
use serde::{Deserialize, Serialize};

/// A named variable that expressions reference as `#{name}` or `A{name}`.
///
/// The name is matched verbatim, so dotted and wildcard names such as
/// `Babcde12345.*` are ordinary keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum RuleVariable {
    /// Value of the data element in the event being evaluated
    CurrentEvent {
        name: String,
        data_element: String,
        #[serde(default)]
        value_type: RuleValueType,
    },
    /// Value from the most recent event carrying the data element
    NewestEvent {
        name: String,
        data_element: String,
        #[serde(default)]
        value_type: RuleValueType,
    },
    /// Like `NewestEvent`, restricted to one program stage
    NewestEventInStage {
        name: String,
        data_element: String,
        program_stage: String,
        #[serde(default)]
        value_type: RuleValueType,
    },
    /// Value from the most recent event dated before the one being evaluated
    PreviousEvent {
        name: String,
        data_element: String,
        #[serde(default)]
        value_type: RuleValueType,
    },
    /// Value only ever produced by ASSIGN actions
    CalculatedValue {
        name: String,
        #[serde(default)]
        value_type: RuleValueType,
    },
    /// Tracked entity attribute of the enrollment
    Attribute {
        name: String,
        attribute: String,
        #[serde(default)]
        value_type: RuleValueType,
    },
}

impl RuleVariable {
    pub fn current_event(name: &str, data_element: &str, value_type: RuleValueType) -> Result<Self> {
        Self::CurrentEvent {
            name: name.to_string(),
            data_element: data_element.to_string(),
            value_type,
        }
        .validated()
    }

    pub fn newest_event(name: &str, data_element: &str, value_type: RuleValueType) -> Result<Self> {
        Self::NewestEvent {
            name: name.to_string(),
            data_element: data_element.to_string(),
            value_type,
        }
        .validated()
    }

    pub fn newest_event_in_stage(
        name: &str,
        data_element: &str,
        program_stage: &str,
        value_type: RuleValueType,
    ) -> Result<Self> {
        Self::NewestEventInStage {
            name: name.to_string(),
            data_element: data_element.to_string(),
            program_stage: program_stage.to_string(),
            value_type,
        }
        .validated()
    }

    pub fn previous_event(name: &str, data_element: &str, value_type: RuleValueType) -> Result<Self> {
        Self::PreviousEvent {
            name: name.to_string(),
            data_element: data_element.to_string(),
            value_type,
        }
        .validated()
    }

    pub fn calculated_value(name: &str, value_type: RuleValueType) -> Result<Self> {
        Self::CalculatedValue {
            name: name.to_string(),
            value_type,
        }
        .validated()
    }

    pub fn attribute(name: &str, attribute: &str, value_type: RuleValueType) -> Result<Self> {
        Self::Attribute {
            name: name.to_string(),
            attribute: attribute.to_string(),
            value_type,
        }
        .validated()
    }

    fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if is_blank(self.name()) {
            return Err(RuleError::construction(
                RULE0102,
                "Rule variable name must not be empty",
            ));
        }
        if let Some(source) = self.source() {
            if is_blank(source) {
                return Err(RuleError::construction(
                    RULE0102,
                    format!("Rule variable '{}' needs a source", self.name()),
                ));
            }
        }
        if let Self::NewestEventInStage { program_stage, .. } = self {
            if is_blank(program_stage) {
                return Err(RuleError::construction(
                    RULE0102,
                    format!("Rule variable '{}' needs a program stage", self.name()),
                ));
            }
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        match self {
            Self::CurrentEvent { name, .. }
            | Self::NewestEvent { name, .. }
            | Self::NewestEventInStage { name, .. }
            | Self::PreviousEvent { name, .. }
            | Self::CalculatedValue { name, .. }
            | Self::Attribute { name, .. } => name,
        }
    }

    /// Data element or attribute the variable reads; calculated values have none
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::CurrentEvent { data_element, .. }
            | Self::NewestEvent { data_element, .. }
            | Self::NewestEventInStage { data_element, .. }
            | Self::PreviousEvent { data_element, .. } => Some(data_element),
            Self::Attribute { attribute, .. } => Some(attribute),
            Self::CalculatedValue { .. } => None,
        }
    }

    pub fn value_type(&self) -> RuleValueType {
        match self {
            Self::CurrentEvent { value_type, .. }
            | Self::NewestEvent { value_type, .. }
            | Self::NewestEventInStage { value_type, .. }
            | Self::PreviousEvent { value_type, .. }
            | Self::CalculatedValue { value_type, .. }
            | Self::Attribute { value_type, .. } => *value_type,
        }
    }

    /// Whether the variable reads event data elements
    pub fn is_data_element(&self) -> bool {
        matches!(
            self,
            Self::CurrentEvent { .. }
                | Self::NewestEvent { .. }
                | Self::NewestEventInStage { .. }
                | Self::PreviousEvent { .. }
        )
    }
}
