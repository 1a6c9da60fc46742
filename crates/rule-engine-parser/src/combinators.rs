//! Shared winnow building blocks for the expression parser

use winnow::ascii::multispace0;
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::{literal, take_till, take_while};

pub type Input<'a> = &'a str;
pub type PResult<T> = Result<T, ContextError>;

/// Exact literal text, with the error type pinned for `?` and `.is_ok()` call sites
pub fn lit<'a>(expected: &'static str) -> impl Parser<Input<'a>, &'a str, ContextError> {
    literal(expected)
}

/// Optional whitespace
pub fn ws(input: &mut Input<'_>) -> PResult<()> {
    multispace0.void().parse_next(input)
}

pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A keyword that is not the prefix of a longer identifier (`and` but not `android`)
pub fn keyword<'a>(kw: &'static str) -> impl FnMut(&mut Input<'a>) -> PResult<&'a str> {
    move |input: &mut Input<'a>| {
        let checkpoint = *input;
        let matched = lit(kw).parse_next(input)?;
        if input.starts_with(is_ident_char) {
            *input = checkpoint;
            return Err(ContextError::new());
        }
        Ok(matched)
    }
}

/// Keyword surrounded by optional whitespace; restores the input when it does not match
pub fn padded_keyword<'a>(kw: &'static str) -> impl FnMut(&mut Input<'a>) -> PResult<&'a str> {
    let mut kw_parser = keyword(kw);
    move |input: &mut Input<'a>| {
        let checkpoint = *input;
        ws.parse_next(input)?;
        match kw_parser(input) {
            Ok(matched) => {
                ws.parse_next(input)?;
                Ok(matched)
            }
            Err(e) => {
                *input = checkpoint;
                Err(e)
            }
        }
    }
}

/// Identifier: `[A-Za-z_][A-Za-z0-9_]*`
pub fn identifier<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    if !input.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return Err(ContextError::new());
    }
    take_while(1.., is_ident_char).parse_next(input)
}

/// Digits with an optional fraction: `12`, `12.5`, `12.`, `.5`
pub fn number<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    let start = *input;
    let int_part = digits(input)?;
    let mut frac_len = 0;
    if lit(".").parse_next(input).is_ok() {
        frac_len = digits(input)?.len() + 1;
    }
    if int_part.is_empty() && frac_len <= 1 {
        *input = start;
        return Err(ContextError::new());
    }
    Ok(&start[..int_part.len() + frac_len])
}

fn digits<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    take_while(0.., |c: char| c.is_ascii_digit()).parse_next(input)
}

/// Quoted string with backslash escapes. On failure the input is left at the opening quote.
pub fn string_literal(input: &mut Input<'_>) -> PResult<String> {
    let checkpoint = *input;
    let quote = match input.chars().next() {
        Some(q @ ('\'' | '"')) => q,
        _ => return Err(ContextError::new()),
    };
    let body = &input[1..];
    let mut out = String::new();
    let mut chars = body.char_indices();

    while let Some((i, c)) = chars.next() {
        if c == quote {
            *input = &body[i + c.len_utf8()..];
            return Ok(out);
        }
        if c == '\\' {
            match chars.next() {
                Some((_, escaped)) => out.push(unescape(escaped)),
                None => break,
            }
        } else {
            out.push(c);
        }
    }

    *input = checkpoint;
    Err(ContextError::new())
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        other => other,
    }
}

/// Placeholder body up to the closing brace, which is consumed but not returned
pub fn placeholder_name<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    let checkpoint = *input;
    let name = placeholder_body(input)?;
    if lit("}").parse_next(input).is_err() {
        *input = checkpoint;
        return Err(ContextError::new());
    }
    Ok(name)
}

fn placeholder_body<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    take_till(1.., '}').parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_boundary() {
        let mut input = "android";
        assert!(keyword("and")(&mut input).is_err());
        assert_eq!(input, "android");

        let mut input = "and #{x}";
        assert_eq!(keyword("and")(&mut input).ok(), Some("and"));
        assert_eq!(input, " #{x}");
    }

    #[test]
    fn test_number_forms() {
        for (src, expected, rest) in [("12", "12", ""), ("12.5+1", "12.5", "+1"), (".5", ".5", "")] {
            let mut input = src;
            assert_eq!(number(&mut input).ok(), Some(expected));
            assert_eq!(input, rest);
        }
        let mut input = ".";
        assert!(number(&mut input).is_err());
        assert_eq!(input, ".");
    }

    #[test]
    fn test_string_escapes() {
        let mut input = r"'it\'s' rest";
        assert_eq!(string_literal(&mut input).ok().as_deref(), Some("it's"));
        assert_eq!(input, " rest");

        let mut input = r#""a\"b""#;
        assert_eq!(string_literal(&mut input).ok().as_deref(), Some("a\"b"));
    }

    #[test]
    fn test_unterminated_string_keeps_position() {
        let mut input = "'open";
        assert!(string_literal(&mut input).is_err());
        assert_eq!(input, "'open");
    }

    #[test]
    fn test_placeholder_name() {
        let mut input = "Babcde12345.*} > 1";
        assert_eq!(placeholder_name(&mut input).ok(), Some("Babcde12345.*"));
        assert_eq!(input, " > 1");

        let mut input = "open";
        assert!(placeholder_name(&mut input).is_err());
    }
}
