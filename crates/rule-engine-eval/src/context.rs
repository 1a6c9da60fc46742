//! Evaluation context for rule expressions
//!
//! [`RuleData`] holds the read-only inputs of one run, [`CalculatedValues`] the
//! values assigned by rules so far, and [`EvaluationContext`] ties both to the
//! record currently being evaluated.

use chrono::NaiveDate;
use indexmap::IndexMap;
use rule_engine_model::{RuleEnrollment, RuleEvent, RuleVariable, TriggerEnvironment};
use std::collections::HashMap;

/// Supplementary data key listing the roles of the current user
pub const USER_ROLES_KEY: &str = "USER";

/// Read-only inputs shared by every record of a run
#[derive(Debug, Clone)]
pub struct RuleData {
    pub variables: IndexMap<String, RuleVariable>,
    pub constants: HashMap<String, String>,
    pub supplementary_data: HashMap<String, Vec<String>>,
    pub enrollment: Option<RuleEnrollment>,
    /// Every event known to the run
    pub events: Vec<RuleEvent>,
    pub environment: TriggerEnvironment,
    pub current_date: NaiveDate,
}

impl RuleData {
    pub fn new(current_date: NaiveDate) -> Self {
        Self {
            variables: IndexMap::new(),
            constants: HashMap::new(),
            supplementary_data: HashMap::new(),
            enrollment: None,
            events: Vec::new(),
            environment: TriggerEnvironment::default(),
            current_date,
        }
    }

    pub fn with_variables(mut self, variables: impl IntoIterator<Item = RuleVariable>) -> Self {
        self.variables = variables
            .into_iter()
            .map(|variable| (variable.name().to_string(), variable))
            .collect();
        self
    }

    pub fn with_constants(mut self, constants: HashMap<String, String>) -> Self {
        self.constants = constants;
        self
    }

    pub fn with_supplementary_data(mut self, data: HashMap<String, Vec<String>>) -> Self {
        self.supplementary_data = data;
        self
    }

    pub fn with_enrollment(mut self, enrollment: RuleEnrollment) -> Self {
        self.enrollment = Some(enrollment);
        self
    }

    pub fn with_events(mut self, events: Vec<RuleEvent>) -> Self {
        self.events = events;
        self
    }

    pub fn with_environment(mut self, environment: TriggerEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn variable(&self, name: &str) -> Option<&RuleVariable> {
        self.variables.get(name)
    }

    /// Declared variables reading the given data element or attribute
    pub fn variables_with_source<'a>(
        &'a self,
        source: &'a str,
    ) -> impl Iterator<Item = &'a RuleVariable> + 'a {
        self.variables
            .values()
            .filter(move |variable| variable.source() == Some(source))
    }
}

/// Values assigned by rules during one run, keyed by record uid then variable name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculatedValues {
    records: HashMap<String, IndexMap<String, String>>,
}

impl CalculatedValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, record: &str, name: &str) -> Option<&str> {
        self.records
            .get(record)
            .and_then(|values| values.get(name))
            .map(String::as_str)
    }

    pub fn insert(
        &mut self,
        record: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.records
            .entry(record.into())
            .or_default()
            .insert(name.into(), value.into());
    }

    /// Record a whole map of values against one record
    pub fn seed(&mut self, record: &str, values: &HashMap<String, String>) {
        for (name, value) in values {
            self.insert(record, name.as_str(), value.as_str());
        }
    }

    pub fn record(&self, record: &str) -> Option<&IndexMap<String, String>> {
        self.records.get(record)
    }

    pub fn is_empty(&self) -> bool {
        self.records.values().all(IndexMap::is_empty)
    }
}

/// The record a rule is evaluated against
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Enrollment(&'a RuleEnrollment),
    Event(&'a RuleEvent),
}

impl<'a> Target<'a> {
    pub fn uid(&self) -> &'a str {
        match *self {
            Self::Enrollment(enrollment) => &enrollment.enrollment,
            Self::Event(event) => &event.event,
        }
    }

    pub fn event(&self) -> Option<&'a RuleEvent> {
        match *self {
            Self::Event(event) => Some(event),
            Self::Enrollment(_) => None,
        }
    }

    pub fn is_enrollment(&self) -> bool {
        matches!(self, Self::Enrollment(_))
    }
}

/// Everything an expression can observe while evaluated against one record
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    data: &'a RuleData,
    calculated: &'a CalculatedValues,
    target: Target<'a>,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(data: &'a RuleData, calculated: &'a CalculatedValues, target: Target<'a>) -> Self {
        Self {
            data,
            calculated,
            target,
        }
    }

    pub fn data(&self) -> &'a RuleData {
        self.data
    }

    pub fn calculated(&self) -> &'a CalculatedValues {
        self.calculated
    }

    pub fn target(&self) -> Target<'a> {
        self.target
    }

    pub fn target_event(&self) -> Option<&'a RuleEvent> {
        self.target.event()
    }

    pub fn enrollment(&self) -> Option<&'a RuleEnrollment> {
        self.data.enrollment.as_ref()
    }

    /// Events visible to this record: the run's events with the target event
    /// standing in for any stale copy carrying the same uid
    pub fn events(&self) -> Vec<&'a RuleEvent> {
        match self.target {
            Target::Event(target) => self
                .data
                .events
                .iter()
                .filter(|event| event.event != target.event)
                .chain(std::iter::once(target))
                .collect(),
            Target::Enrollment(_) => self.data.events.iter().collect(),
        }
    }

    /// Organisation unit of the target event, falling back to the enrollment's
    pub fn organisation_unit(&self) -> &'a str {
        match self.target {
            Target::Event(event) if !event.organisation_unit.is_empty() => &event.organisation_unit,
            Target::Event(_) => self
                .enrollment()
                .map_or("", |enrollment| enrollment.organisation_unit.as_str()),
            Target::Enrollment(enrollment) => &enrollment.organisation_unit,
        }
    }

    pub fn organisation_unit_code(&self) -> &'a str {
        match self.target {
            Target::Event(event) if !event.organisation_unit_code.is_empty() => {
                &event.organisation_unit_code
            }
            Target::Event(_) => self
                .enrollment()
                .map_or("", |enrollment| enrollment.organisation_unit_code.as_str()),
            Target::Enrollment(enrollment) => &enrollment.organisation_unit_code,
        }
    }

    pub fn supplementary(&self, key: &str) -> &'a [String] {
        self.data
            .supplementary_data
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Value assigned earlier in the run, looked up against the target record
    /// first and the enrollment second
    pub fn calculated_value(&self, name: &str) -> Option<&'a str> {
        let own = self.calculated.get(self.target.uid(), name);
        if own.is_some() || self.target.is_enrollment() {
            return own;
        }
        self.enrollment()
            .and_then(|enrollment| self.calculated.get(&enrollment.enrollment, name))
    }
}
