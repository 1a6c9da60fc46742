//! Operators with precedence information

use serde::{Deserialize, Serialize};

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Precedence 1 (lowest)
    /// `||` / `or`
    Or,

    // Precedence 2
    /// `&&` / `and`
    And,

    // Precedence 3
    Equal,
    NotEqual,

    // Precedence 4
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,

    // Precedence 5
    Add,
    Subtract,

    // Precedence 6
    Multiply,
    Divide,
    Modulo,

    // Precedence 7 (highest for binary), right-associative
    Power,
}

impl BinaryOp {
    /// Get the precedence level (1-7, higher binds tighter)
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Equal | Self::NotEqual => 3,
            Self::Less | Self::LessOrEqual | Self::Greater | Self::GreaterOrEqual => 4,
            Self::Add | Self::Subtract => 5,
            Self::Multiply | Self::Divide | Self::Modulo => 6,
            Self::Power => 7,
        }
    }

    pub const fn is_right_associative(&self) -> bool {
        matches!(self, Self::Power)
    }

    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::Less
                | Self::LessOrEqual
                | Self::Greater
                | Self::GreaterOrEqual
        )
    }

    pub const fn is_logical(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    pub const fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide | Self::Modulo | Self::Power
        )
    }

    /// Canonical symbol used when printing expressions
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Power => "^",
        }
    }
}

/// Unary operators (bind tighter than every binary operator)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// `!` / `not`
    Not,
    Plus,
    Negate,
}

impl UnaryOp {
    pub const fn precedence(&self) -> u8 {
        8
    }

    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Plus => "+",
            Self::Negate => "-",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_order() {
        assert!(BinaryOp::Power.precedence() > BinaryOp::Multiply.precedence());
        assert!(BinaryOp::Multiply.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::Add.precedence() > BinaryOp::Less.precedence());
        assert!(BinaryOp::Less.precedence() > BinaryOp::Equal.precedence());
        assert!(BinaryOp::Equal.precedence() > BinaryOp::And.precedence());
        assert!(BinaryOp::And.precedence() > BinaryOp::Or.precedence());
        assert!(UnaryOp::Not.precedence() > BinaryOp::Power.precedence());
    }

    #[test]
    fn test_categories() {
        assert!(BinaryOp::Power.is_right_associative());
        assert!(!BinaryOp::Subtract.is_right_associative());
        assert!(BinaryOp::GreaterOrEqual.is_comparison());
        assert!(BinaryOp::Or.is_logical());
        assert!(BinaryOp::Modulo.is_arithmetic());
        assert!(!BinaryOp::Equal.is_arithmetic());
    }
}
