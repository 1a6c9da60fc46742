//! Rule orchestration
//!
//! [`RuleEngine`] runs the rules of a [`RuleEngineContext`] against one record
//! or against an enrollment together with its events. Each call is a separate
//! run with its own calculated-value cache:
//!
//! 1. Rules are visited in priority order.
//! 2. A condition that fails to parse or evaluate skips its rule.
//! 3. When a condition holds, every action's data expression is evaluated and an
//!    effect is emitted. ASSIGN actions also write into the cache so later rules
//!    observe the value.

use crate::context::{CompiledExpression, CompiledRule, RuleEngineContext};
use chrono::{Local, NaiveDate};
use rule_engine_diagnostics::{Result, RuleError, RULE0103};
use rule_engine_eval::{CalculatedValues, EvaluationContext, ExpressionEngine, RuleData, Target};
use rule_engine_model::{
    RuleAction, RuleEffect, RuleEffects, RuleEnrollment, RuleEvent, TriggerEnvironment,
};
use rule_engine_parser::parse_expression;
use std::sync::Arc;

/// Builder for [`RuleEngine`], obtained from [`RuleEngineContext::to_engine_builder`]
#[derive(Debug)]
pub struct RuleEngineBuilder {
    context: Arc<RuleEngineContext>,
    enrollment: Option<RuleEnrollment>,
    events: Vec<RuleEvent>,
    environment: TriggerEnvironment,
    current_date: Option<NaiveDate>,
}

impl RuleEngineBuilder {
    pub fn new(context: Arc<RuleEngineContext>) -> Self {
        Self {
            context,
            enrollment: None,
            events: Vec::new(),
            environment: TriggerEnvironment::default(),
            current_date: None,
        }
    }

    pub fn enrollment(mut self, enrollment: RuleEnrollment) -> Self {
        self.enrollment = Some(enrollment);
        self
    }

    /// Events of the enrollment, in the order results should be reported
    pub fn events(mut self, events: Vec<RuleEvent>) -> Self {
        self.events = events;
        self
    }

    pub fn trigger_environment(mut self, environment: TriggerEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Date seen as `V{current_date}`; defaults to today
    pub fn current_date(mut self, date: NaiveDate) -> Self {
        self.current_date = Some(date);
        self
    }

    pub fn build(self) -> Result<RuleEngine> {
        if let Some(enrollment) = &self.enrollment {
            enrollment.validate()?;
        }
        self.events.iter().try_for_each(RuleEvent::validate)?;

        let context = self.context;
        let current_date = self
            .current_date
            .unwrap_or_else(|| Local::now().date_naive());

        let mut data = RuleData::new(current_date)
            .with_variables(context.variables().iter().cloned())
            .with_constants(context.constants().clone())
            .with_supplementary_data(context.supplementary_data().clone())
            .with_events(self.events)
            .with_environment(self.environment);
        data.enrollment = self.enrollment;

        Ok(RuleEngine {
            context,
            data,
            expressions: ExpressionEngine::new(),
        })
    }
}

/// Evaluates the rules of a context against tracker records
#[derive(Debug, Clone)]
pub struct RuleEngine {
    context: Arc<RuleEngineContext>,
    data: RuleData,
    expressions: ExpressionEngine,
}

impl RuleEngine {
    pub fn context(&self) -> &RuleEngineContext {
        &self.context
    }

    pub fn enrollment(&self) -> Option<&RuleEnrollment> {
        self.data.enrollment.as_ref()
    }

    pub fn events(&self) -> &[RuleEvent] {
        &self.data.events
    }

    /// Run every rule against one event.
    ///
    /// The event need not be among the engine's events; a stale copy with the
    /// same uid is replaced by this one for the duration of the run.
    pub fn evaluate_event(&self, event: &RuleEvent) -> Result<Vec<RuleEffect>> {
        event.validate()?;
        let mut calculated = CalculatedValues::new();
        Ok(self.run(Target::Event(event), &mut calculated))
    }

    /// Run every rule against the enrollment
    pub fn evaluate_enrollment(&self) -> Result<Vec<RuleEffect>> {
        let enrollment = self.require_enrollment()?;
        let mut calculated = CalculatedValues::new();
        Ok(self.run(Target::Enrollment(enrollment), &mut calculated))
    }

    /// Run every rule against the enrollment and then each event.
    ///
    /// One group is returned per record, enrollment first, events in input
    /// order. Values assigned on the enrollment are visible to the events;
    /// values assigned on one event are not visible to another.
    pub fn evaluate_all(&self) -> Result<Vec<RuleEffects>> {
        let mut calculated = CalculatedValues::new();
        let mut groups = Vec::with_capacity(self.data.events.len() + 1);

        if let Some(enrollment) = &self.data.enrollment {
            let effects = self.run(Target::Enrollment(enrollment), &mut calculated);
            groups.push(RuleEffects::enrollment(&enrollment.enrollment, effects));
        }
        for event in &self.data.events {
            let effects = self.run(Target::Event(event), &mut calculated);
            groups.push(RuleEffects::event(&event.event, effects));
        }
        Ok(groups)
    }

    /// Evaluate a standalone expression against the enrollment and return its
    /// text form
    pub fn evaluate_expression(&self, source: &str) -> Result<String> {
        let enrollment = self.require_enrollment()?;
        let expression = parse_expression(source)?;

        let mut calculated = CalculatedValues::new();
        calculated.seed(&enrollment.enrollment, self.context.calculated_values());
        let ctx = EvaluationContext::new(&self.data, &calculated, Target::Enrollment(enrollment));

        self.expressions
            .evaluate_to_string(&expression, &ctx)
            .map_err(|e| RuleError::from(e).with_context(source))
    }

    fn require_enrollment(&self) -> Result<&RuleEnrollment> {
        self.data.enrollment.as_ref().ok_or_else(|| {
            RuleError::construction(RULE0103, "No enrollment was supplied to the engine")
        })
    }

    fn run(&self, target: Target<'_>, calculated: &mut CalculatedValues) -> Vec<RuleEffect> {
        calculated.seed(target.uid(), self.context.calculated_values());

        let mut effects = Vec::new();
        for rule in self.context.rules() {
            if !applies_to(rule, target) {
                continue;
            }
            if !self.condition_holds(rule, target, calculated) {
                continue;
            }
            log::debug!("rule {} fired for {}", rule.rule.display_name(), target.uid());

            for compiled in &rule.actions {
                let data = {
                    let ctx = EvaluationContext::new(&self.data, calculated, target);
                    match self.action_data(&compiled.data, &ctx) {
                        Ok(data) => data,
                        Err(e) => {
                            log::warn!(
                                "Omitting {} effect of rule {} for {}: {e}",
                                compiled.action.kind(),
                                rule.rule.display_name(),
                                target.uid()
                            );
                            continue;
                        }
                    }
                };

                let action = &compiled.action;
                if action.is_assign() {
                    self.record_assignment(action, &data, target, calculated);
                    if action.field().trim().is_empty() {
                        continue;
                    }
                }
                log::debug!("emitting {} with data '{data}'", action.kind());
                effects.push(RuleEffect::new(
                    rule.rule.uid().map(str::to_string),
                    action.clone(),
                    data,
                ));
            }
        }
        effects
    }

    fn condition_holds(
        &self,
        rule: &CompiledRule,
        target: Target<'_>,
        calculated: &CalculatedValues,
    ) -> bool {
        let outcome = match &rule.condition {
            CompiledExpression::Parsed { expression, .. } => {
                let ctx = EvaluationContext::new(&self.data, calculated, target);
                self.expressions
                    .evaluate_condition(expression, &ctx)
                    .map_err(RuleError::from)
            }
            CompiledExpression::Failed { error, .. } => Err(error.clone()),
            CompiledExpression::Empty => Ok(false),
        };

        outcome.unwrap_or_else(|e| {
            log::warn!(
                "Skipping rule {} for {}: {e}",
                rule.rule.display_name(),
                target.uid()
            );
            false
        })
    }

    fn action_data(
        &self,
        data: &CompiledExpression,
        ctx: &EvaluationContext<'_>,
    ) -> Result<String> {
        match data {
            CompiledExpression::Empty => Ok(String::new()),
            CompiledExpression::Parsed { source, expression } => self
                .expressions
                .evaluate_to_string(expression, ctx)
                .map_err(|e| RuleError::from(e).with_context(source.as_str())),
            CompiledExpression::Failed { error, .. } => Err(error.clone()),
        }
    }

    /// Write an assigned value under the content variable, the field, and every
    /// variable reading the field
    fn record_assignment(
        &self,
        action: &RuleAction,
        value: &str,
        target: Target<'_>,
        calculated: &mut CalculatedValues,
    ) {
        let record = target.uid();
        let content = unwrap_placeholder(action.content());
        if !content.is_empty() {
            calculated.insert(record, content, value);
        }

        let field = unwrap_placeholder(action.field());
        if !field.is_empty() {
            calculated.insert(record, field, value);
            for variable in self.data.variables_with_source(field) {
                calculated.insert(record, variable.name(), value);
            }
        }
        log::trace!("assigned '{value}' on {record}");
    }
}

/// A rule bound to a program stage only runs for events of that stage
fn applies_to(rule: &CompiledRule, target: Target<'_>) -> bool {
    match (rule.rule.program_stage(), target) {
        (None, _) => true,
        (Some(stage), Target::Event(event)) => event.program_stage == stage,
        (Some(_), Target::Enrollment(_)) => false,
    }
}

/// `#{name}` and `A{name}` become `name`; anything else is returned trimmed
fn unwrap_placeholder(text: &str) -> &str {
    let text = text.trim();
    ["#{", "A{"]
        .iter()
        .find_map(|open| text.strip_prefix(open)?.strip_suffix('}'))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("#{bmi}", "bmi")]
    #[case("A{age}", "age")]
    #[case("  plain ", "plain")]
    #[case("#{unterminated", "#{unterminated")]
    #[case("", "")]
    fn test_unwrap_placeholder(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(unwrap_placeholder(text), expected);
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleEngine>();
    }
}
