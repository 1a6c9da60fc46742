//! Tests for operator parsing and precedence
//!
//! Covers:
//! - Arithmetic operators (+, -, *, /, %, ^)
//! - Comparison operators (==, !=, <, >, <=, >=)
//! - Logical operators (&&, ||, !, and, or, not)
//! - Operator precedence and associativity

use pretty_assertions::assert_eq;
use rstest::rstest;
use rule_engine_ast::{BinaryOp, Expression, UnaryOp};
use rule_engine_parser::parse_expression;

fn parse_expr(input: &str) -> Expression {
    parse_expression(input).unwrap_or_else(|e| panic!("Failed to parse '{}': {:?}", input, e))
}

fn assert_binary_op(expr: &Expression) -> (&Expression, BinaryOp, &Expression) {
    match expr {
        Expression::BinaryOp(bin) => (bin.left.as_ref(), bin.op, bin.right.as_ref()),
        _ => panic!("Expected BinaryOp, got: {:?}", expr),
    }
}

fn assert_unary_op(expr: &Expression) -> (UnaryOp, &Expression) {
    match expr {
        Expression::UnaryOp(un) => (un.op, un.operand.as_ref()),
        _ => panic!("Expected UnaryOp, got: {:?}", expr),
    }
}

// === Single operators ===

#[rstest]
#[case("1 + 2", BinaryOp::Add)]
#[case("5 - 3", BinaryOp::Subtract)]
#[case("4 * 3", BinaryOp::Multiply)]
#[case("8 / 2", BinaryOp::Divide)]
#[case("7 % 2", BinaryOp::Modulo)]
#[case("2 ^ 3", BinaryOp::Power)]
#[case("1 == 1", BinaryOp::Equal)]
#[case("1 != 2", BinaryOp::NotEqual)]
#[case("1 < 2", BinaryOp::Less)]
#[case("1 <= 2", BinaryOp::LessOrEqual)]
#[case("2 > 1", BinaryOp::Greater)]
#[case("2 >= 1", BinaryOp::GreaterOrEqual)]
#[case("true && false", BinaryOp::And)]
#[case("true and false", BinaryOp::And)]
#[case("true || false", BinaryOp::Or)]
#[case("true or false", BinaryOp::Or)]
#[case("1<=2", BinaryOp::LessOrEqual)]
fn test_binary_operators(#[case] input: &str, #[case] expected: BinaryOp) {
    let expr = parse_expr(input);
    let (_, op, _) = assert_binary_op(&expr);
    assert_eq!(op, expected);
}

#[rstest]
#[case("!true", UnaryOp::Not)]
#[case("not true", UnaryOp::Not)]
#[case("-5", UnaryOp::Negate)]
#[case("+5", UnaryOp::Plus)]
fn test_unary_operators(#[case] input: &str, #[case] expected: UnaryOp) {
    let expr = parse_expr(input);
    let (op, _) = assert_unary_op(&expr);
    assert_eq!(op, expected);
}

// === Precedence ===

#[rstest]
#[case("1 + 2 * 3", "(1 + (2 * 3))")]
#[case("(1 + 2) * 3", "((1 + 2) * 3)")]
#[case("10 - 4 - 3", "((10 - 4) - 3)")]
#[case("2 ^ 3 ^ 2", "(2 ^ (3 ^ 2))")]
#[case("-2 ^ 2", "(-2 ^ 2)")]
#[case("1 + 1 > 1 == true", "(((1 + 1) > 1) == true)")]
#[case("true || false && false", "(true || (false && false))")]
#[case("!true && false", "(!true && false)")]
#[case("#{a} > 3 && #{b} < 2 || C{c} == 1", "(((#{a} > 3) && (#{b} < 2)) || (C{c} == 1))")]
fn test_precedence(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(parse_expr(input).to_string(), expected);
}

#[test]
fn test_keyword_operator_needs_boundary() {
    // `orange(..)` is a function call, not `or ange(..)`
    let expr = parse_expr("true || orange(1)");
    let (_, op, right) = assert_binary_op(&expr);
    assert_eq!(op, BinaryOp::Or);
    assert!(matches!(right, Expression::FunctionCall(_)));
}

#[test]
fn test_multiline_expression() {
    let expr = parse_expr("#{a} > 3\n  &&\n  #{b} < 2");
    let (_, op, _) = assert_binary_op(&expr);
    assert_eq!(op, BinaryOp::And);
}
