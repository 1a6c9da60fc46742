//! Rule engine context
//!
//! A [`RuleEngineContext`] holds the inputs every record of a run shares: the
//! rule set, variable declarations, constants, supplementary data and any
//! pre-seeded calculated values. Building one validates every document and
//! parses each condition and action data expression exactly once.

use crate::engine::RuleEngineBuilder;
use rule_engine_ast::Expression;
use rule_engine_diagnostics::{Result, RuleError, RULE0103};
use rule_engine_model::{Rule, RuleAction, RuleVariable};
use rule_engine_parser::parse_expression;
use std::collections::HashMap;
use std::sync::Arc;

/// An expression parsed ahead of evaluation
#[derive(Debug, Clone)]
pub enum CompiledExpression {
    /// No expression text; evaluates to `""`
    Empty,
    Parsed {
        source: String,
        expression: Expression,
    },
    /// Kept so the failure surfaces when the owning rule runs
    Failed { source: String, error: RuleError },
}

impl CompiledExpression {
    pub fn compile(source: &str) -> Self {
        if source.trim().is_empty() {
            return Self::Empty;
        }
        match parse_expression(source) {
            Ok(expression) => Self::Parsed {
                source: source.to_string(),
                expression,
            },
            Err(error) => {
                log::debug!("failed to parse `{source}`: {error}");
                Self::Failed {
                    source: source.to_string(),
                    error,
                }
            }
        }
    }

    pub fn source(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Parsed { source, .. } | Self::Failed { source, .. } => source,
        }
    }

    pub fn error(&self) -> Option<&RuleError> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompiledAction {
    pub action: RuleAction,
    pub data: CompiledExpression,
}

/// A rule with its condition and action data already parsed
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: Rule,
    pub condition: CompiledExpression,
    pub actions: Vec<CompiledAction>,
}

impl CompiledRule {
    pub fn compile(rule: Rule) -> Self {
        let condition = CompiledExpression::compile(rule.condition());
        let actions = rule
            .actions()
            .iter()
            .map(|action| CompiledAction {
                action: action.clone(),
                data: CompiledExpression::compile(action.data()),
            })
            .collect();
        log::debug!("compiled rule {}", rule.display_name());
        Self {
            rule,
            condition,
            actions,
        }
    }

    /// Every expression of this rule that failed to parse
    pub fn failures(&self) -> impl Iterator<Item = (&str, &RuleError)> {
        std::iter::once(&self.condition)
            .chain(self.actions.iter().map(|a| &a.data))
            .filter_map(|compiled| compiled.error().map(|e| (compiled.source(), e)))
    }
}

/// Immutable inputs shared by every record of an evaluation run
#[derive(Debug, Clone)]
pub struct RuleEngineContext {
    rules: Vec<CompiledRule>,
    variables: Vec<RuleVariable>,
    constants: HashMap<String, String>,
    supplementary_data: HashMap<String, Vec<String>>,
    calculated_values: HashMap<String, String>,
}

impl RuleEngineContext {
    pub fn builder() -> RuleEngineContextBuilder {
        RuleEngineContextBuilder::default()
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn variables(&self) -> &[RuleVariable] {
        &self.variables
    }

    pub fn constants(&self) -> &HashMap<String, String> {
        &self.constants
    }

    pub fn supplementary_data(&self) -> &HashMap<String, Vec<String>> {
        &self.supplementary_data
    }

    /// Values seeded into the cache of every record before its first rule
    pub fn calculated_values(&self) -> &HashMap<String, String> {
        &self.calculated_values
    }

    /// Start configuring an engine over this context
    pub fn to_engine_builder(self) -> RuleEngineBuilder {
        RuleEngineBuilder::new(Arc::new(self))
    }
}

/// Builder for [`RuleEngineContext`]
///
/// Rules, variables, constants and supplementary data are required; empty
/// collections are fine, missing ones are not.
#[derive(Debug, Default)]
pub struct RuleEngineContextBuilder {
    rules: Option<Vec<Rule>>,
    variables: Option<Vec<RuleVariable>>,
    constants: Option<HashMap<String, String>>,
    supplementary_data: Option<HashMap<String, Vec<String>>>,
    calculated_values: HashMap<String, String>,
}

impl RuleEngineContextBuilder {
    pub fn rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn variables(mut self, variables: Vec<RuleVariable>) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn constants(mut self, constants: HashMap<String, String>) -> Self {
        self.constants = Some(constants);
        self
    }

    pub fn supplementary_data(mut self, data: HashMap<String, Vec<String>>) -> Self {
        self.supplementary_data = Some(data);
        self
    }

    pub fn calculated_values(mut self, values: HashMap<String, String>) -> Self {
        self.calculated_values = values;
        self
    }

    pub fn build(self) -> Result<RuleEngineContext> {
        let rules = required(self.rules, "rules")?;
        let variables = required(self.variables, "variables")?;
        let constants = required(self.constants, "constants")?;
        let supplementary_data = required(self.supplementary_data, "supplementary data")?;

        rules.iter().try_for_each(Rule::validate)?;
        variables.iter().try_for_each(RuleVariable::validate)?;

        let mut rules = rules;
        rules.sort_by(Rule::priority_order);

        Ok(RuleEngineContext {
            rules: rules.into_iter().map(CompiledRule::compile).collect(),
            variables,
            constants,
            supplementary_data,
            calculated_values: self.calculated_values,
        })
    }
}

fn required<T>(value: Option<T>, what: &str) -> Result<T> {
    value.ok_or_else(|| {
        RuleError::construction(RULE0103, format!("The {what} document must be supplied"))
    })
}
