//! Function library integration tests
//!
//! Expressions are parsed from text and evaluated against small in-memory
//! enrollments and events.

mod aggregate;
mod date;
mod lookup;
mod numeric;
mod string;
mod zscore;

use chrono::NaiveDate;
use rule_engine_eval::{
    CalculatedValues, EvalResult, EvaluationContext, ExpressionEngine, RuleData, Target,
};
use rule_engine_model::{
    EnrollmentStatus, EventStatus, RuleAttributeValue, RuleDataValue, RuleEnrollment, RuleEvent,
    RuleVariable,
};
use rule_engine_parser::parse_expression;
use rule_engine_types::Value;
use std::collections::HashMap;

// ============================================================================
// Test Helpers
// ============================================================================

pub const ENROLLMENT_UID: &str = "enrollment";

pub fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
}

pub fn event(uid: &str, on: &str, values: &[(&str, &str)]) -> RuleEvent {
    RuleEvent::new(
        uid,
        "stage",
        EventStatus::Active,
        date(on),
        values
            .iter()
            .map(|(de, value)| RuleDataValue::new(*de, *value))
            .collect(),
    )
    .unwrap()
}

pub fn enrollment(attributes: &[(&str, &str)]) -> RuleEnrollment {
    RuleEnrollment::new(
        ENROLLMENT_UID,
        date("2020-01-01"),
        date("2020-01-01"),
        EnrollmentStatus::Active,
        attributes
            .iter()
            .map(|(attr, value)| RuleAttributeValue::new(*attr, *value))
            .collect(),
    )
    .unwrap()
}

/// Run data plus an optional target event; without one the enrollment is the target
pub struct Fixture {
    pub data: RuleData,
    pub calculated: CalculatedValues,
    pub target: Option<RuleEvent>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            data: RuleData::new(date("2020-06-01")).with_enrollment(enrollment(&[])),
            calculated: CalculatedValues::new(),
            target: None,
        }
    }

    pub fn enrollment(mut self, enrollment: RuleEnrollment) -> Self {
        self.data.enrollment = Some(enrollment);
        self
    }

    pub fn variables(mut self, variables: Vec<RuleVariable>) -> Self {
        self.data = self.data.with_variables(variables);
        self
    }

    pub fn events(mut self, events: Vec<RuleEvent>) -> Self {
        self.data.events = events;
        self
    }

    pub fn target(mut self, event: RuleEvent) -> Self {
        self.target = Some(event);
        self
    }

    pub fn supplementary(mut self, key: &str, values: &[&str]) -> Self {
        self.data
            .supplementary_data
            .insert(key.to_string(), values.iter().map(ToString::to_string).collect());
        self
    }

    pub fn constants(mut self, constants: &[(&str, &str)]) -> Self {
        let constants: HashMap<String, String> = constants
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.data = self.data.with_constants(constants);
        self
    }

    pub fn eval(&self, source: &str) -> EvalResult<Value> {
        let expr = parse_expression(source).unwrap();
        let target = match &self.target {
            Some(event) => Target::Event(event),
            None => Target::Enrollment(self.data.enrollment.as_ref().unwrap()),
        };
        let ctx = EvaluationContext::new(&self.data, &self.calculated, target);
        ExpressionEngine::new().evaluate(&expr, &ctx)
    }

    pub fn text(&self, source: &str) -> String {
        self.eval(source).unwrap().as_text()
    }
}

pub fn eval(source: &str) -> EvalResult<Value> {
    Fixture::new().eval(source)
}

pub fn eval_text(source: &str) -> String {
    Fixture::new().text(source)
}
