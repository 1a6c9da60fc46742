//! Expression parser using recursive descent with precedence climbing
//!
//! Every level leaves the input where parsing stopped, so a failure can be
//! reported at the exact offset where the expression stopped making sense.

use crate::combinators::{
    identifier, keyword, lit, number, padded_keyword, placeholder_name, string_literal, ws, Input,
    PResult,
};
use rule_engine_ast::{BinaryOp, Expression, FunctionName, Literal, UnaryOp, VariableKind};
use winnow::error::ContextError;
use winnow::prelude::*;

/// Parse a full expression (entry point)
pub fn expression_parser(input: &mut Input<'_>) -> PResult<Expression> {
    ws.parse_next(input)?;
    or_expression(input)
}

/// Parse `||` / `or`
fn or_expression(input: &mut Input<'_>) -> PResult<Expression> {
    let mut left = and_expression(input)?;

    loop {
        ws.parse_next(input)?;
        if lit("||").parse_next(input).is_ok() || padded_keyword("or").parse_next(input).is_ok() {
            let right = and_expression(input)?;
            left = Expression::binary(left, BinaryOp::Or, right);
        } else {
            break;
        }
    }

    Ok(left)
}

/// Parse `&&` / `and`
fn and_expression(input: &mut Input<'_>) -> PResult<Expression> {
    let mut left = equality_expression(input)?;

    loop {
        ws.parse_next(input)?;
        if lit("&&").parse_next(input).is_ok() || padded_keyword("and").parse_next(input).is_ok() {
            let right = equality_expression(input)?;
            left = Expression::binary(left, BinaryOp::And, right);
        } else {
            break;
        }
    }

    Ok(left)
}

/// Parse `==`, `!=`
fn equality_expression(input: &mut Input<'_>) -> PResult<Expression> {
    let mut left = relational_expression(input)?;

    loop {
        ws.parse_next(input)?;

        let op = if lit("==").parse_next(input).is_ok() {
            Some(BinaryOp::Equal)
        } else if lit("!=").parse_next(input).is_ok() {
            Some(BinaryOp::NotEqual)
        } else {
            None
        };

        match op {
            Some(op) => {
                let right = relational_expression(input)?;
                left = Expression::binary(left, op, right);
            }
            None => break,
        }
    }

    Ok(left)
}

/// Parse `<`, `<=`, `>`, `>=`
fn relational_expression(input: &mut Input<'_>) -> PResult<Expression> {
    let mut left = additive_expression(input)?;

    loop {
        ws.parse_next(input)?;

        let op = if lit("<=").parse_next(input).is_ok() {
            Some(BinaryOp::LessOrEqual)
        } else if lit(">=").parse_next(input).is_ok() {
            Some(BinaryOp::GreaterOrEqual)
        } else if lit("<").parse_next(input).is_ok() {
            Some(BinaryOp::Less)
        } else if lit(">").parse_next(input).is_ok() {
            Some(BinaryOp::Greater)
        } else {
            None
        };

        match op {
            Some(op) => {
                let right = additive_expression(input)?;
                left = Expression::binary(left, op, right);
            }
            None => break,
        }
    }

    Ok(left)
}

/// Parse `+`, `-`
fn additive_expression(input: &mut Input<'_>) -> PResult<Expression> {
    let mut left = multiplicative_expression(input)?;

    loop {
        ws.parse_next(input)?;

        let op = if lit("+").parse_next(input).is_ok() {
            Some(BinaryOp::Add)
        } else if lit("-").parse_next(input).is_ok() {
            Some(BinaryOp::Subtract)
        } else {
            None
        };

        match op {
            Some(op) => {
                let right = multiplicative_expression(input)?;
                left = Expression::binary(left, op, right);
            }
            None => break,
        }
    }

    Ok(left)
}

/// Parse `*`, `/`, `%`
fn multiplicative_expression(input: &mut Input<'_>) -> PResult<Expression> {
    let mut left = power_expression(input)?;

    loop {
        ws.parse_next(input)?;

        let op = if lit("*").parse_next(input).is_ok() {
            Some(BinaryOp::Multiply)
        } else if lit("/").parse_next(input).is_ok() {
            Some(BinaryOp::Divide)
        } else if lit("%").parse_next(input).is_ok() {
            Some(BinaryOp::Modulo)
        } else {
            None
        };

        match op {
            Some(op) => {
                let right = power_expression(input)?;
                left = Expression::binary(left, op, right);
            }
            None => break,
        }
    }

    Ok(left)
}

/// Parse `^` (right-associative)
fn power_expression(input: &mut Input<'_>) -> PResult<Expression> {
    let left = unary_expression(input)?;

    ws.parse_next(input)?;
    if lit("^").parse_next(input).is_ok() {
        let right = power_expression(input)?;
        Ok(Expression::binary(left, BinaryOp::Power, right))
    } else {
        Ok(left)
    }
}

/// Parse `!`, `not`, unary `-` and `+`
fn unary_expression(input: &mut Input<'_>) -> PResult<Expression> {
    ws.parse_next(input)?;

    // `!=` never starts an operand, so a leading `!` is always negation
    let op = if lit("!").parse_next(input).is_ok() || keyword("not").parse_next(input).is_ok() {
        Some(UnaryOp::Not)
    } else if lit("-").parse_next(input).is_ok() {
        Some(UnaryOp::Negate)
    } else if lit("+").parse_next(input).is_ok() {
        Some(UnaryOp::Plus)
    } else {
        None
    };

    match op {
        Some(op) => {
            let operand = unary_expression(input)?;
            Ok(Expression::unary(op, operand))
        }
        None => primary(input),
    }
}

fn primary(input: &mut Input<'_>) -> PResult<Expression> {
    ws.parse_next(input)?;

    if lit("(").parse_next(input).is_ok() {
        let expr = expression_parser(input)?;
        ws.parse_next(input)?;
        lit(")").parse_next(input)?;
        return Ok(expr);
    }

    if input.starts_with(['\'', '"']) {
        return string_literal(input).map(|s| Expression::Literal(Literal::String(s)));
    }

    if input.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        let checkpoint = *input;
        let text = number(input)?;
        return text
            .parse::<f64>()
            .map(Expression::literal)
            .map_err(|_| {
                *input = checkpoint;
                ContextError::new()
            });
    }

    if let Some(kind) = placeholder_kind(input) {
        let checkpoint = *input;
        *input = &input[2..];
        return placeholder_name(input)
            .map(|name| Expression::variable(kind, name))
            .map_err(|e| {
                *input = checkpoint;
                e
            });
    }

    if keyword("true").parse_next(input).is_ok() {
        return Ok(Expression::literal(true));
    }
    if keyword("false").parse_next(input).is_ok() {
        return Ok(Expression::literal(false));
    }

    function_call(input)
}

/// `#{`, `A{`, `V{` or `C{` at the head of the input
fn placeholder_kind(input: &Input<'_>) -> Option<VariableKind> {
    let mut chars = input.chars();
    let kind = chars.next().and_then(VariableKind::from_sigil)?;
    (chars.next() == Some('{')).then_some(kind)
}

/// `name(args)` or `ns:name(args)`
fn function_call(input: &mut Input<'_>) -> PResult<Expression> {
    let checkpoint = *input;
    let first = identifier(input)?;

    let name = if lit(":").parse_next(input).is_ok() {
        match identifier(input) {
            Ok(second) => FunctionName::namespaced(first, second),
            Err(e) => {
                *input = checkpoint;
                return Err(e);
            }
        }
    } else {
        FunctionName::simple(first)
    };

    ws.parse_next(input)?;
    if lit("(").parse_next(input).is_err() {
        // A bare identifier is not an operand
        *input = checkpoint;
        return Err(ContextError::new());
    }

    let arguments = argument_list(input)?;
    Ok(Expression::call(name, arguments))
}

/// Comma separated arguments up to and including the closing parenthesis
fn argument_list(input: &mut Input<'_>) -> PResult<Vec<Expression>> {
    let mut arguments = Vec::new();

    ws.parse_next(input)?;
    if lit(")").parse_next(input).is_ok() {
        return Ok(arguments);
    }

    loop {
        arguments.push(expression_parser(input)?);
        ws.parse_next(input)?;
        if lit(",").parse_next(input).is_ok() {
            continue;
        }
        lit(")").parse_next(input)?;
        return Ok(arguments);
    }
}
