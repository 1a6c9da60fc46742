//! Function registry
//!
//! Maps qualified function names (`d2:daysBetween`, `if`) to their declared
//! parameters and implementation. The evaluator checks arity and materializes
//! every argument according to its declared [`ParamKind`] before calling the
//! implementation, so implementations only ever see already-coerced values.

use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use rule_engine_ast::VariableRef;
use rule_engine_types::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Function implementation
pub type FunctionFn =
    Arc<dyn Fn(&[Argument], &EvaluationContext<'_>) -> EvalResult<Value> + Send + Sync>;

/// Expected kind of a call-site argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Evaluated value, passed through unchanged
    Any,
    Text,
    /// Lenient: empty or unparseable text becomes `0`
    Number,
    /// Empty text means "no date"
    Date,
    Boolean,
    /// Unevaluated variable reference
    Variable,
}

/// A materialized call-site argument
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Evaluated and coerced to the declared parameter kind
    Value(Value),
    /// `#{name}`, `A{name}`, `V{name}` or `C{name}` passed to a variable parameter
    Variable(VariableRef),
    /// Deprecated: a string literal naming a variable, passed to a variable parameter
    Literal(String),
}

impl Argument {
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// Function parameter definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionParameter {
    pub name: String,
    pub kind: ParamKind,
    pub optional: bool,
}

impl FunctionParameter {
    /// Create a required parameter
    pub fn required(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            optional: false,
        }
    }

    /// Create an optional parameter
    pub fn optional(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            optional: true,
        }
    }
}

/// Builtin function definition
#[derive(Clone)]
pub struct FunctionDefinition {
    /// Qualified name, e.g. `d2:daysBetween`
    pub name: String,
    pub parameters: Vec<FunctionParameter>,
    /// Kind of any number of trailing arguments
    pub variadic: Option<ParamKind>,
    pub implementation: Option<FunctionFn>,
}

impl fmt::Debug for FunctionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDefinition")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("variadic", &self.variadic)
            .finish_non_exhaustive()
    }
}

impl FunctionDefinition {
    /// Create a new function definition
    pub fn new(name: impl Into<String>, parameters: Vec<FunctionParameter>) -> Self {
        Self {
            name: name.into(),
            parameters,
            variadic: None,
            implementation: None,
        }
    }

    /// Accept any number of trailing arguments of the given kind
    pub fn variadic(mut self, kind: ParamKind) -> Self {
        self.variadic = Some(kind);
        self
    }

    /// Set implementation
    pub fn with_implementation(mut self, implementation: FunctionFn) -> Self {
        self.implementation = Some(implementation);
        self
    }

    fn required_count(&self) -> usize {
        self.parameters.iter().filter(|p| !p.optional).count()
    }

    /// Check if this function accepts the given number of arguments
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.required_count()
            && (self.variadic.is_some() || count <= self.parameters.len())
    }

    /// Fail with an argument count error unless `count` arguments are accepted
    pub fn check_arity(&self, count: usize) -> EvalResult<()> {
        if self.accepts(count) {
            return Ok(());
        }
        let required = self.required_count();
        let expected = match (self.variadic, required == self.parameters.len()) {
            (Some(_), _) => format!("at least {required}"),
            (None, true) => required.to_string(),
            (None, false) => format!("{required} to {}", self.parameters.len()),
        };
        Err(EvalError::argument_count(&self.name, expected, count))
    }

    /// Declared kind of the argument at `index`
    pub fn parameter_kind(&self, index: usize) -> ParamKind {
        self.parameters
            .get(index)
            .map(|p| p.kind)
            .or(self.variadic)
            .unwrap_or(ParamKind::Any)
    }
}

/// Registry for function definitions
#[derive(Default, Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDefinition>,
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.names();
        names.sort_unstable();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}

impl FunctionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the builtin function library registered
    pub fn with_standard_functions() -> Self {
        let mut registry = Self::new();
        registry.register_standard_functions();
        registry
    }

    /// Register every builtin function
    pub fn register_standard_functions(&mut self) {
        crate::functions::register_standard_functions(self);
    }

    /// Register a function, replacing any previous definition with the same name
    pub fn register(&mut self, definition: FunctionDefinition) {
        self.functions.insert(definition.name.clone(), definition);
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDefinition> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.functions.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
