//! Tracker records evaluated by rules

use crate::is_blank;
use chrono::{NaiveDate, NaiveDateTime};
use rule_engine_diagnostics::{Result, RuleError, RULE0104};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    #[default]
    Active,
    Completed,
    Visited,
    Schedule,
    Overdue,
    Skipped,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::Visited => "VISITED",
            Self::Schedule => "SCHEDULE",
            Self::Overdue => "OVERDUE",
            Self::Skipped => "SKIPPED",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// One data element value captured in an event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDataValue {
    pub data_element: String,
    pub value: String,
}

impl RuleDataValue {
    pub fn new(data_element: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            data_element: data_element.into(),
            value: value.into(),
        }
    }
}

/// An event in a program stage.
///
/// Its data values share the event's date and last-updated timestamp, which is
/// what ordering across events uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEvent {
    pub event: String,
    pub program_stage: String,
    #[serde(default)]
    pub program_stage_name: String,
    #[serde(default)]
    pub status: EventStatus,
    pub event_date: NaiveDate,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed_date: Option<NaiveDate>,
    #[serde(default)]
    pub last_updated: Option<NaiveDateTime>,
    #[serde(default)]
    pub organisation_unit: String,
    #[serde(default)]
    pub organisation_unit_code: String,
    #[serde(default)]
    pub data_values: Vec<RuleDataValue>,
}

impl RuleEvent {
    pub fn new(
        event: &str,
        program_stage: &str,
        status: EventStatus,
        event_date: NaiveDate,
        data_values: Vec<RuleDataValue>,
    ) -> Result<Self> {
        let event = Self {
            event: event.to_string(),
            program_stage: program_stage.to_string(),
            program_stage_name: String::new(),
            status,
            event_date,
            due_date: None,
            completed_date: None,
            last_updated: None,
            organisation_unit: String::new(),
            organisation_unit_code: String::new(),
            data_values,
        };
        event.validate()?;
        Ok(event)
    }

    pub fn with_program_stage_name(mut self, name: impl Into<String>) -> Self {
        self.program_stage_name = name.into();
        self
    }

    pub fn with_due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn with_completed_date(mut self, date: NaiveDate) -> Self {
        self.completed_date = Some(date);
        self
    }

    pub fn with_last_updated(mut self, timestamp: NaiveDateTime) -> Self {
        self.last_updated = Some(timestamp);
        self
    }

    pub fn with_organisation_unit(mut self, uid: impl Into<String>, code: impl Into<String>) -> Self {
        self.organisation_unit = uid.into();
        self.organisation_unit_code = code.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if is_blank(&self.event) {
            return Err(RuleError::construction(RULE0104, "Event uid must not be empty"));
        }
        if is_blank(&self.program_stage) {
            return Err(RuleError::construction(
                RULE0104,
                format!("Event '{}' needs a program stage", self.event),
            ));
        }
        Ok(())
    }

    /// Stored value of a data element, if the event has one
    pub fn value_of(&self, data_element: &str) -> Option<&str> {
        self.data_values
            .iter()
            .find(|dv| dv.data_element == data_element)
            .map(|dv| dv.value.as_str())
    }
}

/// One tracked entity attribute value of an enrollment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleAttributeValue {
    pub tracked_entity_attribute: String,
    pub value: String,
}

impl RuleAttributeValue {
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tracked_entity_attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// An enrollment of a tracked entity in a program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEnrollment {
    pub enrollment: String,
    #[serde(default)]
    pub program_name: String,
    pub incident_date: NaiveDate,
    pub enrollment_date: NaiveDate,
    #[serde(default)]
    pub status: EnrollmentStatus,
    #[serde(default)]
    pub organisation_unit: String,
    #[serde(default)]
    pub organisation_unit_code: String,
    #[serde(default)]
    pub attribute_values: Vec<RuleAttributeValue>,
}

impl RuleEnrollment {
    pub fn new(
        enrollment: &str,
        incident_date: NaiveDate,
        enrollment_date: NaiveDate,
        status: EnrollmentStatus,
        attribute_values: Vec<RuleAttributeValue>,
    ) -> Result<Self> {
        let enrollment = Self {
            enrollment: enrollment.to_string(),
            program_name: String::new(),
            incident_date,
            enrollment_date,
            status,
            organisation_unit: String::new(),
            organisation_unit_code: String::new(),
            attribute_values,
        };
        enrollment.validate()?;
        Ok(enrollment)
    }

    pub fn with_program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = name.into();
        self
    }

    pub fn with_organisation_unit(mut self, uid: impl Into<String>, code: impl Into<String>) -> Self {
        self.organisation_unit = uid.into();
        self.organisation_unit_code = code.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if is_blank(&self.enrollment) {
            return Err(RuleError::construction(
                RULE0104,
                "Enrollment uid must not be empty",
            ));
        }
        Ok(())
    }

    pub fn value_of(&self, attribute: &str) -> Option<&str> {
        self.attribute_values
            .iter()
            .find(|av| av.tracked_entity_attribute == attribute)
            .map(|av| av.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    #[test]
    fn test_event_round_trip() {
        let event = RuleEvent::new(
            "ev1",
            "stage",
            EventStatus::Completed,
            date(2020, 1, 2),
            vec![RuleDataValue::new("de", "3")],
        )
        .unwrap_or_else(|e| panic!("{e}"))
        .with_organisation_unit("ou", "OU_CODE")
        .with_due_date(date(2020, 1, 5));

        assert_eq!(event.event, "ev1");
        assert_eq!(event.value_of("de"), Some("3"));
        assert_eq!(event.value_of("other"), None);
        assert_eq!(event.due_date, Some(date(2020, 1, 5)));
        assert_eq!(event.organisation_unit_code, "OU_CODE");
        assert_eq!(event.status.to_string(), "COMPLETED");
    }

    #[test]
    fn test_invalid_records() {
        assert!(RuleEvent::new("", "stage", EventStatus::Active, date(2020, 1, 1), vec![]).is_err());
        assert!(RuleEvent::new("ev", " ", EventStatus::Active, date(2020, 1, 1), vec![]).is_err());
        assert!(RuleEnrollment::new(
            "",
            date(2020, 1, 1),
            date(2020, 1, 1),
            EnrollmentStatus::Active,
            vec![]
        )
        .is_err());
    }

    #[test]
    fn test_deserialize_event_defaults() {
        let event: RuleEvent = serde_json::from_str(
            r#"{"event":"e","programStage":"s","eventDate":"2020-03-01",
                "dataValues":[{"dataElement":"de","value":"x"}]}"#,
        )
        .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(event.status, EventStatus::Active);
        assert_eq!(event.last_updated, None);
        assert_eq!(event.value_of("de"), Some("x"));
    }

    #[test]
    fn test_enrollment_attributes() {
        let enrollment = RuleEnrollment::new(
            "enr",
            date(2020, 1, 1),
            date(2020, 1, 2),
            EnrollmentStatus::Active,
            vec![RuleAttributeValue::new("age", "12")],
        )
        .unwrap_or_else(|e| panic!("{e}"))
        .with_program_name("Child programme");

        assert_eq!(enrollment.value_of("age"), Some("12"));
        assert_eq!(enrollment.program_name, "Child programme");
    }
}
