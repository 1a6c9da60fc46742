//! JSON context documents
//!
//! A host can describe a whole run in one camelCase JSON document:
//!
//! ```json
//! {
//!   "rules": [{ "uid": "r1", "condition": "#{weight} > 10", "actions": [...] }],
//!   "variables": [{ "type": "CURRENT_EVENT", "name": "weight", "dataElement": "w" }],
//!   "constants": {},
//!   "supplementaryData": {},
//!   "enrollment": { ... },
//!   "events": [ ... ]
//! }
//! ```
//!
//! The four rule documents may be empty but must be present.

use crate::context::RuleEngineContext;
use crate::engine::RuleEngine;
use chrono::NaiveDate;
use rule_engine_diagnostics::{Result, RuleError, RULE0402};
use rule_engine_model::{Rule, RuleEnrollment, RuleEvent, RuleVariable, TriggerEnvironment};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextDocument {
    pub rules: Option<Vec<Rule>>,
    pub variables: Option<Vec<RuleVariable>>,
    pub constants: Option<HashMap<String, String>>,
    pub supplementary_data: Option<HashMap<String, Vec<String>>>,
    #[serde(default)]
    pub calculated_values: HashMap<String, String>,
    #[serde(default)]
    pub environment: TriggerEnvironment,
    #[serde(default)]
    pub current_date: Option<NaiveDate>,
    #[serde(default)]
    pub enrollment: Option<RuleEnrollment>,
    #[serde(default)]
    pub events: Vec<RuleEvent>,
    /// Uid of the event to evaluate on its own
    #[serde(default)]
    pub target: Option<String>,
}

impl ContextDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| {
            RuleError::system(RULE0402, format!("Invalid context document: {e}"))
        })
    }

    /// Build the rule context; missing rule documents are construction errors
    pub fn context(&self) -> Result<RuleEngineContext> {
        let mut builder =
            RuleEngineContext::builder().calculated_values(self.calculated_values.clone());
        if let Some(rules) = &self.rules {
            builder = builder.rules(rules.clone());
        }
        if let Some(variables) = &self.variables {
            builder = builder.variables(variables.clone());
        }
        if let Some(constants) = &self.constants {
            builder = builder.constants(constants.clone());
        }
        if let Some(data) = &self.supplementary_data {
            builder = builder.supplementary_data(data.clone());
        }
        builder.build()
    }

    pub fn engine(&self) -> Result<RuleEngine> {
        let mut builder = self
            .context()?
            .to_engine_builder()
            .events(self.events.clone())
            .trigger_environment(self.environment);
        if let Some(enrollment) = &self.enrollment {
            builder = builder.enrollment(enrollment.clone());
        }
        if let Some(date) = self.current_date {
            builder = builder.current_date(date);
        }
        builder.build()
    }

    /// The event named by `uid`, or by the document's own target
    pub fn target_event(&self, uid: Option<&str>) -> Option<&RuleEvent> {
        let uid = uid.or(self.target.as_deref())?;
        self.events.iter().find(|event| event.event == uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rule_engine_diagnostics::RULE0103;

    const DOCUMENT: &str = r##"{
        "rules": [{
            "uid": "r1",
            "condition": "#{weight} > 10",
            "actions": [{ "type": "SHOW_WARNING", "content": "Heavy", "field": "w" }]
        }],
        "variables": [{ "type": "CURRENT_EVENT", "name": "weight", "dataElement": "w", "valueType": "NUMERIC" }],
        "constants": {},
        "supplementaryData": { "USER": ["admin"] },
        "currentDate": "2020-06-01",
        "events": [{
            "event": "e1",
            "programStage": "stage",
            "eventDate": "2020-05-01",
            "dataValues": [{ "dataElement": "w", "value": "12" }]
        }],
        "target": "e1"
    }"##;

    #[test]
    fn test_parse_document() {
        let document = ContextDocument::from_json(DOCUMENT).unwrap();
        assert_eq!(document.rules.as_ref().map(Vec::len), Some(1));
        assert_eq!(
            document.rules.as_ref().and_then(|rules| rules.first()).map(Rule::condition),
            Some("#{weight} > 10")
        );
        assert_eq!(document.environment, TriggerEnvironment::Server);
        assert_eq!(document.target_event(None).map(|e| e.event.as_str()), Some("e1"));
        assert!(document.target_event(Some("missing")).is_none());
    }

    #[test]
    fn test_document_runs() {
        let document = ContextDocument::from_json(DOCUMENT).unwrap();
        let engine = document.engine().unwrap();
        let event = document.target_event(None).unwrap();

        let effects = engine.evaluate_event(event).unwrap();
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].rule_uid.as_deref(), Some("r1"));
    }

    #[test]
    fn test_missing_constants_document() {
        let mut document = ContextDocument::from_json(DOCUMENT).unwrap();
        document.constants = None;
        assert_eq!(document.context().unwrap_err().code(), RULE0103);
    }

    #[test]
    fn test_invalid_json() {
        assert_eq!(ContextDocument::from_json("{").unwrap_err().code(), RULE0402);
    }
}
