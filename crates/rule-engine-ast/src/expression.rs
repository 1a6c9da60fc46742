//! Expression nodes

use crate::{BinaryOp, BoxExpr, Literal, UnaryOp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// All expression kinds of the rule language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Literal value (number, string, boolean)
    Literal(Literal),
    /// Variable placeholder (`#{..}`, `A{..}`, `V{..}`, `C{..}`)
    Variable(VariableRef),
    /// Function invocation, namespaced (`d2:count(..)`) or not (`if(..)`)
    FunctionCall(FunctionCall),
    BinaryOp(BinaryOpExpr),
    UnaryOp(UnaryOpExpr),
}

impl Expression {
    pub fn literal(value: impl Into<Literal>) -> Self {
        Self::Literal(value.into())
    }

    pub fn variable(kind: VariableKind, name: impl Into<String>) -> Self {
        Self::Variable(VariableRef::new(kind, name))
    }

    pub fn binary(left: Expression, op: BinaryOp, right: Expression) -> Self {
        Self::BinaryOp(BinaryOpExpr {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    pub fn unary(op: UnaryOp, operand: Expression) -> Self {
        Self::UnaryOp(UnaryOpExpr {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn call(name: FunctionName, arguments: Vec<Expression>) -> Self {
        Self::FunctionCall(FunctionCall { name, arguments })
    }

    /// Collect every variable placeholder in evaluation order
    pub fn variables(&self) -> Vec<&VariableRef> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a VariableRef>) {
        match self {
            Self::Literal(_) => {}
            Self::Variable(var) => out.push(var),
            Self::FunctionCall(call) => {
                for arg in &call.arguments {
                    arg.collect_variables(out);
                }
            }
            Self::BinaryOp(bin) => {
                bin.left.collect_variables(out);
                bin.right.collect_variables(out);
            }
            Self::UnaryOp(un) => un.operand.collect_variables(out),
        }
    }
}

/// Placeholder sigil: which namespace a variable name is looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableKind {
    /// `#{name}`: a declared program rule variable
    ProgramRule,
    /// `A{name}`: a tracked entity attribute variable
    Attribute,
    /// `V{name}`: an environment variable such as `current_date`
    Environment,
    /// `C{uid}`: a constant
    Constant,
}

impl VariableKind {
    pub const fn sigil(&self) -> char {
        match self {
            Self::ProgramRule => '#',
            Self::Attribute => 'A',
            Self::Environment => 'V',
            Self::Constant => 'C',
        }
    }

    pub const fn from_sigil(c: char) -> Option<Self> {
        match c {
            '#' => Some(Self::ProgramRule),
            'A' => Some(Self::Attribute),
            'V' => Some(Self::Environment),
            'C' => Some(Self::Constant),
            _ => None,
        }
    }
}

/// Variable placeholder.
///
/// The name is kept verbatim: dotted composites such as `Cabcde12345.Dabcde12345`
/// and wildcard names such as `Babcde12345.*` are plain text here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableRef {
    pub kind: VariableKind,
    pub name: String,
}

impl VariableRef {
    pub fn new(kind: VariableKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl fmt::Display for VariableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{{}}}", self.kind.sigil(), self.name)
    }
}

/// Function name with optional namespace prefix
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionName {
    pub namespace: Option<String>,
    pub name: String,
}

impl FunctionName {
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }

    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }

    /// Name as registered in the function registry, e.g. `d2:hasValue`
    pub fn qualified(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}:{}", self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: FunctionName,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryOpExpr {
    pub left: BoxExpr,
    pub op: BinaryOp,
    pub right: BoxExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryOpExpr {
    pub op: UnaryOp,
    pub operand: BoxExpr,
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(lit) => write!(f, "{lit}"),
            Self::Variable(var) => write!(f, "{var}"),
            Self::FunctionCall(call) => {
                write!(f, "{}(", call.name)?;
                for (i, arg) in call.arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Self::BinaryOp(bin) => write!(f, "({} {} {})", bin.left, bin.op.symbol(), bin.right),
            Self::UnaryOp(un) => write!(f, "{}{}", un.op.symbol(), un.operand),
        }
    }
}
