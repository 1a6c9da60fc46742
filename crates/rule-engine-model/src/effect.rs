//! Evaluation output

use crate::RuleAction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fired action together with the text its data expression produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEffect {
    #[serde(default)]
    pub rule_uid: Option<String>,
    pub action: RuleAction,
    pub data: String,
}

impl RuleEffect {
    pub fn new(rule_uid: Option<String>, action: RuleAction, data: impl Into<String>) -> Self {
        Self {
            rule_uid,
            action,
            data: data.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackerObjectType {
    Enrollment,
    Event,
}

/// Effects produced for one record of a multi-record run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEffects {
    pub tracker_object_type: TrackerObjectType,
    pub tracker_object_uid: String,
    pub effects: Vec<RuleEffect>,
}

impl RuleEffects {
    pub fn enrollment(uid: impl Into<String>, effects: Vec<RuleEffect>) -> Self {
        Self {
            tracker_object_type: TrackerObjectType::Enrollment,
            tracker_object_uid: uid.into(),
            effects,
        }
    }

    pub fn event(uid: impl Into<String>, effects: Vec<RuleEffect>) -> Self {
        Self {
            tracker_object_type: TrackerObjectType::Event,
            tracker_object_uid: uid.into(),
            effects,
        }
    }

    pub fn is_event(&self) -> bool {
        self.tracker_object_type == TrackerObjectType::Event
    }
}

/// Who is running the rules; exposed to expressions as `V{environment}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerEnvironment {
    #[default]
    Server,
    AndroidClient,
    WebClient,
}

impl fmt::Display for TriggerEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Server => "SERVER",
            Self::AndroidClient => "ANDROID_CLIENT",
            Self::WebClient => "WEB_CLIENT",
        };
        f.write_str(s)
    }
}
