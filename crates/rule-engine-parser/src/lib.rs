//! Parser for tracker program rule expressions
//!
//! Turns expression text such as `d2:hasValue(#{weight}) && #{weight} > 3` into a
//! [`rule_engine_ast::Expression`] tree. The parser is a hand-written recursive
//! descent over winnow primitives, with one function per precedence level.

mod combinators;
mod expression;

use combinators::{is_ident_char, ws};
use expression::expression_parser;
use rule_engine_ast::Expression;
use rule_engine_diagnostics::{
    RuleError, Result, SourceLocation, Span, RULE0001, RULE0002, RULE0003, RULE0004,
};
use winnow::prelude::*;

/// Parse a single rule expression
pub fn parse_expression(source: &str) -> Result<Expression> {
    let mut input: &str = source;

    let parsed = expression_parser(&mut input);
    // Trailing whitespace is fine; anything else is an error at its position
    let _ = ws.parse_next(&mut input);

    match parsed {
        Ok(expr) if input.is_empty() => {
            log::trace!("parsed `{source}` as {expr}");
            Ok(expr)
        }
        _ => Err(failure_at(source, input)),
    }
}

/// Build a located parse error from the text that could not be consumed
fn failure_at(source: &str, remaining: &str) -> RuleError {
    let offset = source.len() - remaining.len();

    let (code, message, length) = if remaining.is_empty() {
        (RULE0002, "Unexpected end of expression".to_string(), 0)
    } else if remaining.starts_with(['\'', '"']) {
        (RULE0003, "Unterminated string literal".to_string(), remaining.len())
    } else if is_placeholder_start(remaining) {
        (
            RULE0004,
            format!("Unterminated variable placeholder '{}'", token_at(remaining)),
            remaining.len(),
        )
    } else {
        let token = token_at(remaining);
        (RULE0001, format!("Unexpected '{token}'"), token.len())
    };

    let location = SourceLocation::from_span(Span::new(offset, offset + length), source);
    RuleError::parse_at(code, message, source, location)
}

fn is_placeholder_start(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some('#' | 'A' | 'V' | 'C')) && chars.next() == Some('{')
}

/// The identifier or single character at the head of the text
fn token_at(text: &str) -> &str {
    let ident_len: usize = text
        .chars()
        .take_while(|c| is_ident_char(*c))
        .map(char::len_utf8)
        .sum();
    if ident_len > 0 {
        return &text[..ident_len];
    }
    if is_placeholder_start(text) {
        return text.split_whitespace().next().unwrap_or(text);
    }
    text.chars()
        .next()
        .map_or(text, |c| &text[..c.len_utf8()])
}
