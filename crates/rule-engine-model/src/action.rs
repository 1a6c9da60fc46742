//! Rule actions

use crate::is_blank;
use rule_engine_diagnostics::{Result, RuleError, RULE0101};
use serde::{Deserialize, Serialize};

/// Where display actions render their text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisplayLocation {
    #[default]
    Feedback,
    Indicators,
}

/// What kind of field a mandatory-field action targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeType {
    DataElement,
    TrackedEntityAttribute,
    #[default]
    Unknown,
}

/// Something a rule does when its condition holds.
///
/// `data` is an expression evaluated when the rule fires; its result becomes
/// the effect's data. `content` is static text shown to the user or, for
/// [`RuleAction::Assign`], the `#{variable}` receiving the value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum RuleAction {
    Assign {
        #[serde(default)]
        content: String,
        #[serde(default)]
        data: String,
        #[serde(default)]
        field: String,
    },
    ShowError {
        #[serde(default)]
        content: String,
        #[serde(default)]
        data: String,
        #[serde(default)]
        field: String,
    },
    ShowWarning {
        #[serde(default)]
        content: String,
        #[serde(default)]
        data: String,
        #[serde(default)]
        field: String,
    },
    WarningOnCompletion {
        #[serde(default)]
        content: String,
        #[serde(default)]
        data: String,
        #[serde(default)]
        field: String,
    },
    ErrorOnCompletion {
        #[serde(default)]
        content: String,
        #[serde(default)]
        data: String,
        #[serde(default)]
        field: String,
    },
    DisplayText {
        #[serde(default)]
        content: String,
        #[serde(default)]
        data: String,
        #[serde(default)]
        location: DisplayLocation,
    },
    DisplayKeyValuePair {
        #[serde(default)]
        content: String,
        #[serde(default)]
        data: String,
        #[serde(default)]
        location: DisplayLocation,
    },
    HideField {
        #[serde(default)]
        content: String,
        field: String,
    },
    HideSection {
        section: String,
    },
    HideProgramStage {
        program_stage: String,
    },
    HideOption {
        #[serde(default)]
        content: String,
        field: String,
        option: String,
    },
    HideOptionGroup {
        #[serde(default)]
        content: String,
        field: String,
        option_group: String,
    },
    ShowOptionGroup {
        #[serde(default)]
        content: String,
        field: String,
        option_group: String,
    },
    CreateEvent {
        #[serde(default)]
        content: String,
        #[serde(default)]
        data: String,
        program_stage: String,
    },
    SetMandatoryField {
        field: String,
        #[serde(default)]
        attribute_type: AttributeType,
    },
    ScheduleMessage {
        notification: String,
        #[serde(default)]
        data: String,
    },
    SendMessage {
        notification: String,
        #[serde(default)]
        data: String,
    },
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn invalid(message: impl Into<String>) -> RuleError {
    RuleError::construction(RULE0101, message)
}

impl RuleAction {
    /// Assign the result of `data` to a field and/or a `#{variable}` named by `content`
    pub fn assign(content: Option<&str>, data: &str, field: Option<&str>) -> Result<Self> {
        Self::Assign {
            content: text(content),
            data: data.to_string(),
            field: text(field),
        }
        .validated()
    }

    pub fn show_error(content: Option<&str>, data: Option<&str>, field: Option<&str>) -> Result<Self> {
        Self::ShowError {
            content: text(content),
            data: text(data),
            field: text(field),
        }
        .validated()
    }

    pub fn show_warning(content: Option<&str>, data: Option<&str>, field: Option<&str>) -> Result<Self> {
        Self::ShowWarning {
            content: text(content),
            data: text(data),
            field: text(field),
        }
        .validated()
    }

    pub fn warning_on_completion(
        content: Option<&str>,
        data: Option<&str>,
        field: Option<&str>,
    ) -> Result<Self> {
        Self::WarningOnCompletion {
            content: text(content),
            data: text(data),
            field: text(field),
        }
        .validated()
    }

    pub fn error_on_completion(
        content: Option<&str>,
        data: Option<&str>,
        field: Option<&str>,
    ) -> Result<Self> {
        Self::ErrorOnCompletion {
            content: text(content),
            data: text(data),
            field: text(field),
        }
        .validated()
    }

    pub fn display_text(
        content: Option<&str>,
        data: Option<&str>,
        location: DisplayLocation,
    ) -> Result<Self> {
        Self::DisplayText {
            content: text(content),
            data: text(data),
            location,
        }
        .validated()
    }

    pub fn display_key_value_pair(
        content: Option<&str>,
        data: Option<&str>,
        location: DisplayLocation,
    ) -> Result<Self> {
        Self::DisplayKeyValuePair {
            content: text(content),
            data: text(data),
            location,
        }
        .validated()
    }

    pub fn hide_field(field: &str, content: Option<&str>) -> Result<Self> {
        Self::HideField {
            content: text(content),
            field: field.to_string(),
        }
        .validated()
    }

    pub fn hide_section(section: &str) -> Result<Self> {
        Self::HideSection {
            section: section.to_string(),
        }
        .validated()
    }

    pub fn hide_program_stage(program_stage: &str) -> Result<Self> {
        Self::HideProgramStage {
            program_stage: program_stage.to_string(),
        }
        .validated()
    }

    pub fn hide_option(field: &str, option: &str, content: Option<&str>) -> Result<Self> {
        Self::HideOption {
            content: text(content),
            field: field.to_string(),
            option: option.to_string(),
        }
        .validated()
    }

    pub fn hide_option_group(field: &str, option_group: &str, content: Option<&str>) -> Result<Self> {
        Self::HideOptionGroup {
            content: text(content),
            field: field.to_string(),
            option_group: option_group.to_string(),
        }
        .validated()
    }

    pub fn show_option_group(field: &str, option_group: &str, content: Option<&str>) -> Result<Self> {
        Self::ShowOptionGroup {
            content: text(content),
            field: field.to_string(),
            option_group: option_group.to_string(),
        }
        .validated()
    }

    pub fn create_event(content: Option<&str>, data: Option<&str>, program_stage: &str) -> Result<Self> {
        Self::CreateEvent {
            content: text(content),
            data: text(data),
            program_stage: program_stage.to_string(),
        }
        .validated()
    }

    pub fn set_mandatory_field(field: &str, attribute_type: AttributeType) -> Result<Self> {
        Self::SetMandatoryField {
            field: field.to_string(),
            attribute_type,
        }
        .validated()
    }

    pub fn schedule_message(notification: &str, data: Option<&str>) -> Result<Self> {
        Self::ScheduleMessage {
            notification: notification.to_string(),
            data: text(data),
        }
        .validated()
    }

    pub fn send_message(notification: &str, data: Option<&str>) -> Result<Self> {
        Self::SendMessage {
            notification: notification.to_string(),
            data: text(data),
        }
        .validated()
    }

    fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Check the invariants of this action kind
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Assign { content, field, .. } => {
                if is_blank(content) && is_blank(field) {
                    return Err(invalid("Either content or field must be set for ASSIGN"));
                }
            }
            Self::ShowError { content, data, .. }
            | Self::ShowWarning { content, data, .. }
            | Self::WarningOnCompletion { content, data, .. }
            | Self::ErrorOnCompletion { content, data, .. }
            | Self::DisplayText { content, data, .. }
            | Self::DisplayKeyValuePair { content, data, .. } => {
                if is_blank(content) && is_blank(data) {
                    return Err(invalid(format!(
                        "Either content or data must be set for {}",
                        self.kind()
                    )));
                }
            }
            Self::HideField { field, .. } | Self::SetMandatoryField { field, .. } => {
                require(field, "field", self.kind())?;
            }
            Self::HideSection { section } => require(section, "section", self.kind())?,
            Self::HideProgramStage { program_stage } | Self::CreateEvent { program_stage, .. } => {
                require(program_stage, "programStage", self.kind())?;
            }
            Self::HideOption { field, option, .. } => {
                require(field, "field", self.kind())?;
                require(option, "option", self.kind())?;
            }
            Self::HideOptionGroup {
                field, option_group, ..
            }
            | Self::ShowOptionGroup {
                field, option_group, ..
            } => {
                require(field, "field", self.kind())?;
                require(option_group, "optionGroup", self.kind())?;
            }
            Self::ScheduleMessage { notification, .. } | Self::SendMessage { notification, .. } => {
                require(notification, "notification", self.kind())?;
            }
        }
        Ok(())
    }

    /// Serialized tag of the action kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Assign { .. } => "ASSIGN",
            Self::ShowError { .. } => "SHOW_ERROR",
            Self::ShowWarning { .. } => "SHOW_WARNING",
            Self::WarningOnCompletion { .. } => "WARNING_ON_COMPLETION",
            Self::ErrorOnCompletion { .. } => "ERROR_ON_COMPLETION",
            Self::DisplayText { .. } => "DISPLAY_TEXT",
            Self::DisplayKeyValuePair { .. } => "DISPLAY_KEY_VALUE_PAIR",
            Self::HideField { .. } => "HIDE_FIELD",
            Self::HideSection { .. } => "HIDE_SECTION",
            Self::HideProgramStage { .. } => "HIDE_PROGRAM_STAGE",
            Self::HideOption { .. } => "HIDE_OPTION",
            Self::HideOptionGroup { .. } => "HIDE_OPTION_GROUP",
            Self::ShowOptionGroup { .. } => "SHOW_OPTION_GROUP",
            Self::CreateEvent { .. } => "CREATE_EVENT",
            Self::SetMandatoryField { .. } => "SET_MANDATORY_FIELD",
            Self::ScheduleMessage { .. } => "SCHEDULE_MESSAGE",
            Self::SendMessage { .. } => "SEND_MESSAGE",
        }
    }

    /// Data expression; empty for kinds that carry none
    pub fn data(&self) -> &str {
        match self {
            Self::Assign { data, .. }
            | Self::ShowError { data, .. }
            | Self::ShowWarning { data, .. }
            | Self::WarningOnCompletion { data, .. }
            | Self::ErrorOnCompletion { data, .. }
            | Self::DisplayText { data, .. }
            | Self::DisplayKeyValuePair { data, .. }
            | Self::CreateEvent { data, .. }
            | Self::ScheduleMessage { data, .. }
            | Self::SendMessage { data, .. } => data,
            Self::HideField { .. }
            | Self::HideSection { .. }
            | Self::HideProgramStage { .. }
            | Self::HideOption { .. }
            | Self::HideOptionGroup { .. }
            | Self::ShowOptionGroup { .. }
            | Self::SetMandatoryField { .. } => "",
        }
    }

    /// Static content; empty for kinds that carry none
    pub fn content(&self) -> &str {
        match self {
            Self::Assign { content, .. }
            | Self::ShowError { content, .. }
            | Self::ShowWarning { content, .. }
            | Self::WarningOnCompletion { content, .. }
            | Self::ErrorOnCompletion { content, .. }
            | Self::DisplayText { content, .. }
            | Self::DisplayKeyValuePair { content, .. }
            | Self::HideField { content, .. }
            | Self::HideOption { content, .. }
            | Self::HideOptionGroup { content, .. }
            | Self::ShowOptionGroup { content, .. }
            | Self::CreateEvent { content, .. } => content,
            Self::HideSection { .. }
            | Self::HideProgramStage { .. }
            | Self::SetMandatoryField { .. }
            | Self::ScheduleMessage { .. }
            | Self::SendMessage { .. } => "",
        }
    }

    /// Target field; empty for kinds that carry none
    pub fn field(&self) -> &str {
        match self {
            Self::Assign { field, .. }
            | Self::ShowError { field, .. }
            | Self::ShowWarning { field, .. }
            | Self::WarningOnCompletion { field, .. }
            | Self::ErrorOnCompletion { field, .. }
            | Self::HideField { field, .. }
            | Self::HideOption { field, .. }
            | Self::HideOptionGroup { field, .. }
            | Self::ShowOptionGroup { field, .. }
            | Self::SetMandatoryField { field, .. } => field,
            Self::DisplayText { .. }
            | Self::DisplayKeyValuePair { .. }
            | Self::HideSection { .. }
            | Self::HideProgramStage { .. }
            | Self::CreateEvent { .. }
            | Self::ScheduleMessage { .. }
            | Self::SendMessage { .. } => "",
        }
    }

    pub fn is_assign(&self) -> bool {
        matches!(self, Self::Assign { .. })
    }
}

fn require(value: &str, name: &str, kind: &str) -> Result<()> {
    if is_blank(value) {
        return Err(invalid(format!("{kind} requires a non-empty {name}")));
    }
    Ok(())
}
