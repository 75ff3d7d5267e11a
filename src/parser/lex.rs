use crate::attribute::{Dimension, DimensionUnit, Glue};

use super::{Argument, ErrorKind, Grouping, InnerResult, Token};

/// Parse the right-hand side of a definition (TeXBook p. 271).
///
/// In this case, a definition is any of `def`, `edef`, `gdef`, or `xdef`.
///
/// Returns the control sequence, the parameter text, and the replacement text.
pub fn definition<'a>(input: &mut &'a str) -> InnerResult<(&'a str, &'a str, &'a str)> {
    *input = input.trim_start();
    let control_sequence = control_sequence(input)?;
    let (parameter_text, rest) = input.split_once('{').ok_or(ErrorKind::EndOfInput)?;
    *input = rest;
    let replacement_text = group_content(input, "{", "}")?;

    Ok((control_sequence, parameter_text, replacement_text))
}

/// Parse an argument to a control sequence, and return it.
pub fn argument<'a>(input: &mut &'a str) -> InnerResult<Argument<'a>> {
    *input = input.trim_start();

    if input.starts_with('{') {
        *input = &input[1..];
        let content = group_content(input, "{", "}")?;
        Ok(Argument::Group(content))
    } else {
        Ok(Argument::Token(token(input)?))
    }
}

/// Parse an optional argument delimited by `[` and `]`.
///
/// If the input does not start with `[` (after whitespace), the input is left untouched and
/// `None` is returned. Brackets inside of braces do not end the argument.
pub fn optional_argument<'a>(input: &mut &'a str) -> InnerResult<Option<&'a str>> {
    let Some(content) = input.trim_start().strip_prefix('[') else {
        return Ok(None);
    };

    let mut depth = 0usize;
    let mut chars = content.char_indices();
    while let Some((index, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '{' => depth += 1,
            '}' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| ErrorKind::ExtraCloseLooking("']'".to_string()))?;
            }
            ']' if depth == 0 => {
                *input = &content[index + 1..];
                return Ok(Some(&content[..index]));
            }
            _ => {}
        }
    }
    Err(ErrorKind::MissingCloseBracket(String::new()))
}

/// Parses the inside of a group, when the first `start` delimiter is already parsed.
///
/// The output is the content within the group without the surrounding delimiters. This content
/// is guaranteed to be balanced. Reaching the end of the input leaves the group open, which is
/// a fatal [`ErrorKind::UnclosedGroup`].
pub fn group_content<'a>(input: &mut &'a str, start: &str, end: &str) -> InnerResult<&'a str> {
    let mut escaped = false;
    let mut index = 0;
    let mut depth = 0u32;
    let bytes = input.as_bytes();
    loop {
        if index + end.len() > input.len() {
            return Err(ErrorKind::UnclosedGroup(Grouping::Brace));
        }
        if !escaped && depth == 0 && bytes[index..].starts_with(end.as_bytes()) {
            break;
        }
        if !escaped && bytes[index..].starts_with(start.as_bytes()) {
            depth += 1;
            index += start.len();
            continue;
        }
        if !escaped && bytes[index..].starts_with(end.as_bytes()) {
            if depth.checked_sub(1).is_none() {
                break;
            }
            depth -= 1;
            index += end.len();
            continue;
        }
        match bytes[index] {
            b'\\' => escaped = !escaped,
            b'%' if !escaped => {
                let rest_pos = bytes[index..]
                    .iter()
                    .position(|&c| c == b'\n')
                    .unwrap_or(bytes.len() - index);
                index += rest_pos;
            }
            _ => escaped = false,
        }
        index += 1;
    }
    let (argument, rest) = input.split_at(index);
    *input = &rest[end.len()..];
    Ok(argument)
}

/// Parses the content up to the `close` delimiter matching an already parsed `open` delimiter.
///
/// Braced groups are skipped over, and nested `open`/`close` pairs are balanced unless both
/// delimiters are the same character.
pub fn delimited_content<'a>(input: &mut &'a str, open: char, close: char) -> InnerResult<&'a str> {
    let mut braces = 0usize;
    let mut nested = 0usize;
    let mut chars = input.char_indices();
    while let Some((index, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '{' => braces += 1,
            '}' => braces = braces.checked_sub(1).ok_or(ErrorKind::ExtraCloseMissingOpen)?,
            _ if braces > 0 => {}
            c if c == close && nested == 0 => {
                let content = &input[..index];
                *input = &input[index + c.len_utf8()..];
                return Ok(content);
            }
            c if c == close => nested -= 1,
            c if c == open => nested += 1,
            _ => {}
        }
    }
    Err(ErrorKind::MissingCloseDelimiter {
        delimiter: close,
        name: String::new(),
    })
}

/// Parses the content up to `suffix`, which must appear outside of any braced group.
pub fn content_with_suffix<'a>(input: &mut &'a str, suffix: &str) -> InnerResult<&'a str> {
    let mut depth = 0usize;
    let mut chars = input.char_indices();
    while let Some((index, c)) = chars.next() {
        if depth == 0 && input[index..].starts_with(suffix) {
            let content = &input[..index];
            *input = &input[index + suffix.len()..];
            return Ok(content);
        }
        match c {
            '\\' => {
                chars.next();
            }
            '{' => depth += 1,
            '}' => depth = depth.checked_sub(1).ok_or(ErrorKind::ExtraCloseMissingOpen)?,
            _ => {}
        }
    }
    Err(ErrorKind::EndOfInput)
}

/// Parse the right-hand side of a `let` assignment (TeXBook p. 273).
///
/// Returns the control sequence and the value it is assigned to.
pub fn let_assignment<'a>(input: &mut &'a str) -> InnerResult<(&'a str, Token<'a>)> {
    *input = input.trim_start();
    let control_sequence = control_sequence(input)?;

    *input = input.trim_start();
    if let Some(s) = input.strip_prefix('=') {
        *input = s;
        one_optional_space(input);
    }

    let token = token(input)?;
    Ok((control_sequence, token))
}

/// Parse a control_sequence, including the leading `\`.
pub fn control_sequence<'a>(input: &mut &'a str) -> InnerResult<&'a str> {
    if input.starts_with('\\') {
        *input = &input[1..];
        rhs_control_sequence(input)
    } else {
        input
            .chars()
            .next()
            .map_or(Err(ErrorKind::EndOfInput), |_| {
                Err(ErrorKind::ExpectedControlSequence(String::new()))
            })
    }
}

/// Parse the right side of a control sequence (`\` already being parsed).
///
/// A control sequence can be of the form `\controlsequence`, or `\#` (control symbol).
pub fn rhs_control_sequence<'a>(input: &mut &'a str) -> InnerResult<&'a str> {
    let Some(first) = input.chars().next() else {
        return Err(ErrorKind::EmptyControlSequence);
    };

    let len = if first.is_ascii_alphabetic() {
        input
            .bytes()
            .take_while(|c| c.is_ascii_alphabetic())
            .count()
    } else {
        first.len_utf8()
    };

    let (control_sequence, rest) = input.split_at(len);
    *input = if first.is_ascii_alphabetic() {
        rest.trim_start()
    } else {
        rest
    };
    Ok(control_sequence)
}

/// Parse a glue (TeXBook p. 267).
pub fn glue(input: &mut &str) -> InnerResult<Glue> {
    let mut dimen = (dimension(input)?, None, None);
    if let Some(s) = input.trim_start().strip_prefix("plus") {
        *input = s;
        dimen.1 = Some(dimension(input)?);
    }
    if let Some(s) = input.trim_start().strip_prefix("minus") {
        *input = s;
        dimen.2 = Some(dimension(input)?);
    }
    Ok(dimen)
}

/// Parse a glue that can only be specified in math units (mu)
pub fn math_glue(input: &mut &str) -> InnerResult<Glue> {
    let mut dimen = (math_dimension(input)?, None, None);
    if let Some(s) = input.trim_start().strip_prefix("plus") {
        *input = s;
        dimen.1 = Some(math_dimension(input)?);
    }
    if let Some(s) = input.trim_start().strip_prefix("minus") {
        *input = s;
        dimen.2 = Some(math_dimension(input)?);
    }
    Ok(dimen)
}

/// Parse a dimension (TeXBook p. 266).
pub fn dimension(input: &mut &str) -> InnerResult<Dimension> {
    let number = floating_point(input)?;
    let unit = dimension_unit(input)?;
    Ok((number, unit))
}

/// Parse a dimension that can only be specified in math units (mu)
pub fn math_dimension(input: &mut &str) -> InnerResult<Dimension> {
    let number = floating_point(input)?;
    *input = input.trim_start();
    *input = input.strip_prefix("mu").ok_or(ErrorKind::MathUnit)?;
    one_optional_space(input);
    Ok((number, DimensionUnit::Mu))
}

/// Parse a dimension unit (TeXBook p. 266).
pub fn dimension_unit(input: &mut &str) -> InnerResult<DimensionUnit> {
    *input = input.trim_start();
    if input.len() < 2 {
        return Err(ErrorKind::DimensionUnit);
    }

    let unit = input.get(0..2).ok_or(ErrorKind::DimensionUnit)?;
    let unit = match unit {
        "em" => DimensionUnit::Em,
        "ex" => DimensionUnit::Ex,
        "pt" => DimensionUnit::Pt,
        "pc" => DimensionUnit::Pc,
        "in" => DimensionUnit::In,
        "bp" => DimensionUnit::Bp,
        "cm" => DimensionUnit::Cm,
        "mm" => DimensionUnit::Mm,
        "dd" => DimensionUnit::Dd,
        "cc" => DimensionUnit::Cc,
        "sp" => DimensionUnit::Sp,
        "mu" => DimensionUnit::Mu,
        _ => return Err(ErrorKind::DimensionUnit),
    };

    *input = &input[2..];
    one_optional_space(input);

    Ok(unit)
}

/// Parse the signs in front of a number, returning the signum.
pub fn signs(input: &mut &str) -> InnerResult<isize> {
    let signs = input.trim_start();
    let mut minus_count = 0;
    *input = signs
        .trim_start_matches(|c: char| {
            if c == '-' {
                minus_count += 1;
                true
            } else {
                c == '+' || c.is_whitespace()
            }
        })
        .trim_start();
    Ok(if minus_count % 2 == 0 { 1 } else { -1 })
}

/// Parse a floating point number (named `factor` in TeXBook p. 266).
pub fn floating_point(input: &mut &str) -> InnerResult<f32> {
    let signum = signs(input)?;

    let mut digits = 0usize;
    let mut number = 0.;
    *input = input.trim_start_matches(|c: char| {
        if c.is_ascii_digit() {
            number = number * 10. + (c as u8 - b'0') as f32;
            digits += 1;
            true
        } else {
            false
        }
    });

    if let Some(stripped_decimal_point) = input.strip_prefix(|c| c == '.' || c == ',') {
        let mut decimal = 0.;
        let mut decimal_divisor = 1.;
        *input = stripped_decimal_point.trim_start_matches(|c: char| {
            if c.is_ascii_digit() {
                decimal = decimal * 10. + (c as u8 - b'0') as f32;
                decimal_divisor *= 10.;
                digits += 1;
                true
            } else {
                false
            }
        });
        number += decimal / decimal_divisor;
    };

    if digits == 0 {
        return Err(ErrorKind::DimensionUnit);
    }
    Ok(signum as f32 * number)
}

/// Parse an optional space.
pub fn one_optional_space(input: &mut &str) -> bool {
    let mut chars = input.chars();
    match chars.next() {
        Some(c) if c.is_whitespace() => {
            *input = chars.as_str();
            true
        }
        _ => false,
    }
}

/// Return the next token in the input.
///
/// A token will never be whitespace, and will never be inside of a comment.
pub fn token<'a>(input: &mut &'a str) -> InnerResult<Token<'a>> {
    *input = input.trim_start();
    match input.chars().next() {
        Some('\\') => {
            *input = &input[1..];
            Ok(Token::ControlSequence(rhs_control_sequence(input)?))
        }
        Some('%') => {
            let (_, rest) = input.split_once('\n').ok_or(ErrorKind::EndOfInput)?;
            *input = rest;
            token(input)
        }
        Some(c) => {
            *input = &input[c.len_utf8()..];
            Ok(Token::Character(c))
        }
        None => Err(ErrorKind::EndOfInput),
    }
}

/// Return the source text of the next token, including the `\` of a control sequence.
pub fn token_source<'a>(input: &mut &'a str) -> InnerResult<&'a str> {
    *input = input.trim_start();
    while input.starts_with('%') {
        let (_, rest) = input.split_once('\n').ok_or(ErrorKind::EndOfInput)?;
        *input = rest.trim_start();
    }
    let start = *input;
    token(input)?;
    Ok(start[..start.len() - input.len()].trim_end())
}
