//! Variable resolution
//!
//! Placeholders resolve against the record being evaluated:
//!
//! - `#{name}` / `A{name}`: the calculated-value cache of the target record, then
//!   the cache of the enrollment, then the declared variable, then (for `A{}`
//!   only) an enrollment attribute with that uid
//! - `V{name}`: a fixed set of fields of the target event and the enrollment
//! - `C{name}`: the constants map
//!
//! Names are matched verbatim; composite (`A.B`) and wildcard (`A.*`) names are
//! only ever compared as text.

use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use chrono::{NaiveDate, NaiveDateTime};
use rule_engine_ast::{VariableKind, VariableRef};
use rule_engine_model::{RuleEvent, RuleVariable};
use rule_engine_types::{parse_number, RuleValueType, Value};
use smallvec::SmallVec;

/// Names accepted inside `V{...}`
pub const ENVIRONMENT_VARIABLES: &[&str] = &[
    "current_date",
    "event_date",
    "due_date",
    "completed_date",
    "enrollment_date",
    "incident_date",
    "event_count",
    "event_id",
    "event_status",
    "program_stage_id",
    "program_stage_name",
    "enrollment_id",
    "enrollment_status",
    "program_name",
    "org_unit",
    "org_unit_code",
    "environment",
];

/// One stored value of a variable's source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub value: String,
    /// Date of the event holding the value; `None` outside events
    pub event_date: Option<NaiveDate>,
}

/// A variable resolved against the target record.
///
/// `current` is the value expressions see; `occurrences` are all values the
/// aggregation functions scan, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedVariable {
    pub name: String,
    pub value_type: RuleValueType,
    pub current: Option<String>,
    pub occurrences: SmallVec<[Occurrence; 4]>,
}

impl ResolvedVariable {
    fn single(
        name: &str,
        value_type: RuleValueType,
        value: Option<String>,
        event_date: Option<NaiveDate>,
    ) -> Self {
        let occurrences = value
            .iter()
            .filter(|v| !v.is_empty())
            .map(|v| Occurrence {
                value: v.clone(),
                event_date,
            })
            .collect();
        Self {
            name: name.to_string(),
            value_type,
            current: value,
            occurrences,
        }
    }

    pub fn has_value(&self) -> bool {
        self.current.as_deref().is_some_and(|v| !v.is_empty())
    }

    /// Typed value; a variable without data yields its type's default
    pub fn value(&self) -> EvalResult<Value> {
        match self.current.as_deref() {
            Some(text) if !text.is_empty() => Ok(self.value_type.coerce(text)?),
            _ => Ok(self.value_type.default_value()),
        }
    }

    pub fn occurrence_values(&self) -> impl Iterator<Item = &str> {
        self.occurrences.iter().map(|o| o.value.as_str())
    }
}

impl EvaluationContext<'_> {
    /// Resolve a placeholder to the value an expression sees
    pub fn resolve(&self, reference: &VariableRef) -> EvalResult<Value> {
        log::trace!("resolving {reference} for record {}", self.target().uid());
        match reference.kind {
            VariableKind::ProgramRule | VariableKind::Attribute => {
                self.resolve_variable(reference)?.value()
            }
            VariableKind::Environment => self
                .environment_value(&reference.name)?
                .ok_or_else(|| EvalError::undefined_reference("environment variable", &reference.name)),
            VariableKind::Constant => self.constant_value(&reference.name),
        }
    }

    /// Resolve a placeholder together with every occurrence of its source
    pub fn resolve_variable(&self, reference: &VariableRef) -> EvalResult<ResolvedVariable> {
        let name = reference.name.as_str();
        match reference.kind {
            VariableKind::ProgramRule => self.resolve_named(name, false),
            VariableKind::Attribute => self.resolve_named(name, true),
            VariableKind::Environment => {
                let value = self.environment_value(name)?;
                Ok(ResolvedVariable::single(
                    name,
                    value.as_ref().map_or(RuleValueType::Text, Value::value_type),
                    value.map(|v| v.as_text()),
                    None,
                ))
            }
            VariableKind::Constant => {
                let value = self.constant_value(name)?;
                Ok(ResolvedVariable::single(
                    name,
                    value.value_type(),
                    Some(value.as_text()),
                    None,
                ))
            }
        }
    }

    /// Whether the placeholder has a non-empty value; never fails
    pub fn has_value(&self, reference: &VariableRef) -> bool {
        match reference.kind {
            VariableKind::Environment => matches!(
                self.environment_value(&reference.name),
                Ok(Some(value)) if !value.is_empty()
            ),
            _ => self
                .resolve_variable(reference)
                .is_ok_and(|variable| variable.has_value()),
        }
    }

    fn resolve_named(&self, name: &str, attribute: bool) -> EvalResult<ResolvedVariable> {
        let declared = self.data().variable(name);

        if let Some(text) = self.calculated_value(name) {
            let value_type =
                declared.map_or_else(|| RuleValueType::infer(text), RuleVariable::value_type);
            return Ok(ResolvedVariable::single(
                name,
                value_type,
                Some(text.to_string()),
                self.target_event().map(|e| e.event_date),
            ));
        }

        if let Some(variable) = declared {
            return Ok(self.resolve_declared(variable));
        }

        if attribute {
            if let Some(text) = self.enrollment().and_then(|e| e.value_of(name)) {
                return Ok(ResolvedVariable::single(
                    name,
                    RuleValueType::infer(text),
                    Some(text.to_string()),
                    None,
                ));
            }
        }

        let kind = if attribute { "attribute" } else { "variable" };
        Err(EvalError::undefined_reference(kind, name))
    }

    fn resolve_declared(&self, variable: &RuleVariable) -> ResolvedVariable {
        let name = variable.name();
        let value_type = variable.value_type();
        let target_date = self.target_event().map(|e| e.event_date);

        let (current, occurrences) = match variable {
            RuleVariable::CurrentEvent { data_element, .. } => {
                let current = self
                    .target_event()
                    .and_then(|e| e.value_of(data_element))
                    .map(str::to_string);
                (current, self.occurrences(data_element, |_| true))
            }
            RuleVariable::NewestEvent { data_element, .. } => {
                let occurrences = self.occurrences(data_element, |_| true);
                (newest(&occurrences), occurrences)
            }
            RuleVariable::NewestEventInStage {
                data_element,
                program_stage,
                ..
            } => {
                let occurrences =
                    self.occurrences(data_element, |e| &e.program_stage == program_stage);
                (newest(&occurrences), occurrences)
            }
            RuleVariable::PreviousEvent { data_element, .. } => {
                let occurrences = self.occurrences(data_element, |e| {
                    target_date.is_none_or(|date| e.event_date < date)
                });
                (newest(&occurrences), occurrences)
            }
            RuleVariable::CalculatedValue { .. } => (None, SmallVec::new()),
            RuleVariable::Attribute { attribute, .. } => {
                let current = self
                    .enrollment()
                    .and_then(|e| e.value_of(attribute))
                    .map(str::to_string);
                return ResolvedVariable::single(name, value_type, current, None);
            }
        };

        ResolvedVariable {
            name: name.to_string(),
            value_type,
            current,
            occurrences,
        }
    }

    /// Non-empty values of a data element across the visible events, newest first
    fn occurrences(
        &self,
        data_element: &str,
        include: impl Fn(&RuleEvent) -> bool,
    ) -> SmallVec<[Occurrence; 4]> {
        let mut found: Vec<(NaiveDate, Option<NaiveDateTime>, &str)> = self
            .events()
            .into_iter()
            .filter(|event| include(event))
            .filter_map(|event| {
                event
                    .value_of(data_element)
                    .filter(|value| !value.is_empty())
                    .map(|value| (event.event_date, event.last_updated, value))
            })
            .collect();

        found.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));

        found
            .into_iter()
            .map(|(event_date, _, value)| Occurrence {
                value: value.to_string(),
                event_date: Some(event_date),
            })
            .collect()
    }

    /// Value of `V{name}`; `Ok(None)` when the name is known but has no value
    /// for the target record
    pub fn environment_value(&self, name: &str) -> EvalResult<Option<Value>> {
        let event = self.target_event();
        let enrollment = self.enrollment();

        let value = match name {
            "current_date" => Some(Value::Date(self.data().current_date)),
            "event_date" => event.map(|e| Value::Date(e.event_date)),
            "due_date" => event.and_then(|e| e.due_date).map(Value::Date),
            "completed_date" => event.and_then(|e| e.completed_date).map(Value::Date),
            "enrollment_date" => enrollment.map(|e| Value::Date(e.enrollment_date)),
            "incident_date" => enrollment.map(|e| Value::Date(e.incident_date)),
            "event_count" => Some(Value::Number(self.events().len() as f64)),
            "event_id" => event.map(|e| Value::text(&e.event)),
            "event_status" => event.map(|e| Value::text(e.status.to_string())),
            "program_stage_id" => event.map(|e| Value::text(&e.program_stage)),
            "program_stage_name" => event.map(|e| Value::text(&e.program_stage_name)),
            "enrollment_id" => enrollment.map(|e| Value::text(&e.enrollment)),
            "enrollment_status" => enrollment.map(|e| Value::text(e.status.to_string())),
            "program_name" => enrollment.map(|e| Value::text(&e.program_name)),
            "org_unit" => Some(Value::text(self.organisation_unit())),
            "org_unit_code" => Some(Value::text(self.organisation_unit_code())),
            "environment" => Some(Value::text(self.data().environment.to_string())),
            _ => return Err(EvalError::undefined_reference("environment variable", name)),
        };
        Ok(value)
    }

    /// Value of `C{name}`: numeric when the text parses as a number
    pub fn constant_value(&self, name: &str) -> EvalResult<Value> {
        let text = self
            .data()
            .constants
            .get(name)
            .ok_or_else(|| EvalError::undefined_reference("constant", name))?;
        Ok(parse_number(text).map_or_else(|| Value::text(text), Value::Number))
    }
}

fn newest(occurrences: &[Occurrence]) -> Option<String> {
    occurrences.first().map(|o| o.value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{CalculatedValues, RuleData, Target};
    use pretty_assertions::assert_eq;
    use rule_engine_model::{EnrollmentStatus, EventStatus, RuleAttributeValue, RuleDataValue, RuleEnrollment};
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(uid: &str, stage: &str, on: NaiveDate, value: &str) -> RuleEvent {
        RuleEvent::new(
            uid,
            stage,
            EventStatus::Active,
            on,
            vec![RuleDataValue::new("weight", value)],
        )
        .unwrap()
    }

    fn reference(name: &str) -> VariableRef {
        VariableRef::new(VariableKind::ProgramRule, name)
    }

    fn data() -> RuleData {
        let enrollment = RuleEnrollment::new(
            "enr",
            date(2020, 1, 1),
            date(2020, 1, 2),
            EnrollmentStatus::Active,
            vec![RuleAttributeValue::new("gender_attr", "female")],
        )
        .unwrap();
        RuleData::new(date(2020, 6, 1))
            .with_enrollment(enrollment)
            .with_variables([
                RuleVariable::current_event("current", "weight", RuleValueType::Numeric).unwrap(),
                RuleVariable::newest_event("newest", "weight", RuleValueType::Numeric).unwrap(),
                RuleVariable::newest_event_in_stage("in_stage", "weight", "stage_a", RuleValueType::Numeric)
                    .unwrap(),
                RuleVariable::previous_event("previous", "weight", RuleValueType::Numeric).unwrap(),
                RuleVariable::calculated_value("calc", RuleValueType::Numeric).unwrap(),
                RuleVariable::attribute("gender", "gender_attr", RuleValueType::Text).unwrap(),
            ])
            .with_events(vec![
                event("e1", "stage_a", date(2020, 1, 10), "3"),
                event("e2", "stage_b", date(2020, 3, 10), "5"),
                event("e3", "stage_a", date(2020, 2, 10), "4"),
            ])
    }

    #[rstest]
    #[case("current", "4.5")]
    #[case("newest", "4.5")]
    #[case("in_stage", "4")]
    #[case("previous", "5")]
    #[case("gender", "female")]
    fn test_declared_variables(#[case] name: &str, #[case] expected: &str) {
        let data = data();
        let calculated = CalculatedValues::new();
        let target = event("target", "stage_c", date(2020, 4, 1), "4.5");
        let ctx = EvaluationContext::new(&data, &calculated, Target::Event(&target));

        let resolved = ctx.resolve_variable(&reference(name)).unwrap();
        assert_eq!(resolved.current.as_deref(), Some(expected));
    }

    #[test]
    fn test_occurrences_newest_first() {
        let data = data();
        let calculated = CalculatedValues::new();
        let target = event("target", "stage_c", date(2020, 4, 1), "4.5");
        let ctx = EvaluationContext::new(&data, &calculated, Target::Event(&target));

        let resolved = ctx.resolve_variable(&reference("newest")).unwrap();
        let values: Vec<_> = resolved.occurrence_values().collect();
        assert_eq!(values, vec!["4.5", "5", "4", "3"]);
    }

    #[test]
    fn test_last_updated_breaks_ties() {
        let stamp = |h| NaiveDateTime::new(date(2020, 1, 1), chrono::NaiveTime::from_hms_opt(h, 0, 0).unwrap());
        let data = RuleData::new(date(2020, 6, 1))
            .with_variables([RuleVariable::newest_event("newest", "weight", RuleValueType::Text).unwrap()])
            .with_events(vec![
                event("early", "s", date(2020, 1, 1), "early").with_last_updated(stamp(8)),
                event("late", "s", date(2020, 1, 1), "late").with_last_updated(stamp(9)),
            ]);
        let calculated = CalculatedValues::new();
        let enrollment = RuleEnrollment::new("enr", date(2020, 1, 1), date(2020, 1, 1), EnrollmentStatus::Active, vec![])
            .unwrap();
        let ctx = EvaluationContext::new(&data, &calculated, Target::Enrollment(&enrollment));

        assert_eq!(ctx.resolve(&reference("newest")), Ok(Value::text("late")));
    }

    #[test]
    fn test_missing_value_yields_type_default() {
        let data = data();
        let calculated = CalculatedValues::new();
        let target = RuleEvent::new("target", "stage_c", EventStatus::Active, date(2020, 4, 1), vec![]).unwrap();
        let ctx = EvaluationContext::new(&data, &calculated, Target::Event(&target));

        assert_eq!(ctx.resolve(&reference("current")), Ok(Value::Number(0.0)));
        assert!(!ctx.has_value(&reference("current")));
        assert_eq!(ctx.resolve(&reference("calc")), Ok(Value::Number(0.0)));
    }

    #[test]
    fn test_cache_takes_precedence_and_infers_type() {
        let data = data();
        let mut calculated = CalculatedValues::new();
        calculated.insert("target", "current", "9");
        calculated.insert("target", "fresh", "2020-01-01");
        let target = event("target", "stage_c", date(2020, 4, 1), "4.5");
        let ctx = EvaluationContext::new(&data, &calculated, Target::Event(&target));

        assert_eq!(ctx.resolve(&reference("current")), Ok(Value::Number(9.0)));
        assert_eq!(
            ctx.resolve(&reference("fresh")),
            Ok(Value::Date(date(2020, 1, 1)))
        );
    }

    #[test]
    fn test_attribute_fallback_and_unknown_names() {
        let data = data();
        let calculated = CalculatedValues::new();
        let target = event("target", "stage_c", date(2020, 4, 1), "4.5");
        let ctx = EvaluationContext::new(&data, &calculated, Target::Event(&target));

        let attribute = VariableRef::new(VariableKind::Attribute, "gender_attr");
        assert_eq!(ctx.resolve(&attribute), Ok(Value::text("female")));

        let unknown = ctx.resolve(&reference("gender_attr"));
        assert_eq!(unknown, Err(EvalError::undefined_reference("variable", "gender_attr")));
    }

    #[test]
    fn test_environment_variables() {
        let data = data();
        let calculated = CalculatedValues::new();
        let target = event("target", "stage_c", date(2020, 4, 1), "4.5");
        let ctx = EvaluationContext::new(&data, &calculated, Target::Event(&target));

        assert_eq!(ctx.environment_value("event_date"), Ok(Some(Value::Date(date(2020, 4, 1)))));
        assert_eq!(ctx.environment_value("event_count"), Ok(Some(Value::Number(4.0))));
        assert_eq!(ctx.environment_value("due_date"), Ok(None));
        assert_eq!(ctx.environment_value("environment"), Ok(Some(Value::text("SERVER"))));
        assert!(ctx.environment_value("nope").is_err());

        for name in ENVIRONMENT_VARIABLES {
            assert!(ctx.environment_value(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_event_fields_unavailable_for_enrollment() {
        let data = data();
        let calculated = CalculatedValues::new();
        let enrollment = data.enrollment.clone().unwrap();
        let ctx = EvaluationContext::new(&data, &calculated, Target::Enrollment(&enrollment));

        let event_date = VariableRef::new(VariableKind::Environment, "event_date");
        assert!(ctx.resolve(&event_date).is_err());
        assert!(!ctx.has_value(&event_date));
        assert!(ctx.has_value(&VariableRef::new(VariableKind::Environment, "current_date")));
    }

    #[test]
    fn test_constants() {
        let mut constants = std::collections::HashMap::new();
        constants.insert("pi".to_string(), "3.14".to_string());
        constants.insert("label".to_string(), "abc".to_string());
        let data = RuleData::new(date(2020, 1, 1)).with_constants(constants);
        let calculated = CalculatedValues::new();
        let target = event("target", "s", date(2020, 4, 1), "1");
        let ctx = EvaluationContext::new(&data, &calculated, Target::Event(&target));

        assert_eq!(ctx.constant_value("pi"), Ok(Value::Number(3.14)));
        assert_eq!(ctx.constant_value("label"), Ok(Value::text("abc")));
        assert_eq!(
            ctx.constant_value("missing"),
            Err(EvalError::undefined_reference("constant", "missing"))
        );
    }
}
