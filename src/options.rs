//! Parsing of `key=value` option lists, as found in the optional arguments of commands like
//! `\mmlToken`.
//!
//! A list is split on the commas that are not inside braces. Each entry is either `key=value`,
//! or a bare `key`, which is read as `key=true`. Outer braces around a value are removed, which
//! makes it possible to use commas and `=` inside of values: `ab={c,d}` sets `ab` to `c,d`.

use indexmap::IndexMap;

use crate::parser::{lex, ErrorKind, InnerResult};

/// The type an option value is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    Bool,
    Int,
    Number,
    String,
    /// One of the listed strings.
    OneOf(&'static [&'static str]),
    /// A TeX dimension with its unit, such as `1.5em`.
    Dimension,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Number(f64),
    String(String),
}

impl OptionValue {
    /// The value as it is written in an attribute.
    pub fn to_attribute(&self) -> String {
        match self {
            OptionValue::Bool(b) => b.to_string(),
            OptionValue::Int(i) => i.to_string(),
            OptionValue::Number(n) => n.to_string(),
            OptionValue::String(s) => s.clone(),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::String(value.to_string())
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

pub type Options = IndexMap<String, OptionValue>;

/// Parse an option list.
///
/// Without `allowed`, every key is accepted; values are strings, except for `true` and `false`
/// which are booleans. With `allowed`, values are coerced to the declared type of their key.
/// Unknown keys and values of the wrong type are then dropped, or reported as an error when
/// `strict` is set.
///
/// Every redundant layer of braces around a value is removed.
///
/// ```
/// use latex_mathtree::options::{parse_options, OptionValue};
///
/// let options = parse_options("ab=1,cd", None, false).unwrap();
/// assert_eq!(options["ab"], OptionValue::String("1".into()));
/// assert_eq!(options["cd"], OptionValue::Bool(true));
/// ```
pub fn parse_options(
    text: &str,
    allowed: Option<&[(&str, OptionType)]>,
    strict: bool,
) -> InnerResult<Options> {
    coerce(read_keyval(text, false)?, allowed, strict)
}

/// Parse an option list like [`parse_options`], but remove at most one layer of braces around
/// values. This keeps the braces of values that are parsed again later.
pub fn parse_options_preserving(
    text: &str,
    allowed: Option<&[(&str, OptionType)]>,
    strict: bool,
) -> InnerResult<Options> {
    coerce(read_keyval(text, true)?, allowed, strict)
}

fn read_keyval(text: &str, preserve_braces: bool) -> InnerResult<Vec<(String, Raw)>> {
    let mut entries = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let (key, end, after) = read_value(rest, &['=', ','], preserve_braces)?;
        rest = after;
        if end == Some('=') {
            let (value, _, after) = read_value(rest, &[','], preserve_braces)?;
            rest = after;
            entries.push((key, Raw::Value(value)));
        } else if !key.is_empty() {
            entries.push((key, Raw::Flag));
        }
    }
    Ok(entries)
}

enum Raw {
    Flag,
    Value(String),
}

/// Read up to one of the `ends` characters at brace depth 0.
///
/// Returns the value with its outer braces removed, the end character found (`None` at the end
/// of the text), and the text after it.
fn read_value<'t>(
    text: &'t str,
    ends: &[char],
    preserve_braces: bool,
) -> InnerResult<(String, Option<char>, &'t str)> {
    let mut braces = 0usize;
    // Number of braces opened before any other character, that may be stripped.
    let mut start = 0usize;
    let mut count_braces = true;
    let mut value = String::new();
    let mut chars = text.char_indices();

    while let Some((index, c)) = chars.next() {
        match c {
            '\\' => {
                value.push(c);
                if let Some((_, escaped)) = chars.next() {
                    value.push(escaped);
                }
                count_braces = false;
                continue;
            }
            c if c.is_whitespace() => {}
            '{' => {
                if count_braces {
                    start += 1;
                }
                braces += 1;
            }
            '}' => {
                braces = braces
                    .checked_sub(1)
                    .ok_or(ErrorKind::ExtraCloseMissingOpen)?;
                count_braces = false;
            }
            c => {
                if braces == 0 && ends.contains(&c) {
                    let strip = if preserve_braces { start.min(1) } else { start };
                    return Ok((
                        remove_braces(&value, strip),
                        Some(c),
                        &text[index + c.len_utf8()..],
                    ));
                }
                start = start.min(braces);
                count_braces = false;
            }
        }
        value.push(c);
    }

    if braces > 0 {
        return Err(ErrorKind::ExtraOpenMissingClose);
    }
    let strip = if preserve_braces { start.min(1) } else { start };
    Ok((remove_braces(&value, strip), None, ""))
}

fn remove_braces(text: &str, count: usize) -> String {
    let mut text = text.trim();
    for _ in 0..count {
        match enclosed(text) {
            Some(inner) => text = inner.trim(),
            None => break,
        }
    }
    text.to_string()
}

/// The content of `text` if it is a single brace group, i.e. its first `{` is closed by its
/// last character.
fn enclosed(text: &str) -> Option<&str> {
    let inner = text.strip_prefix('{')?;
    let mut depth = 1usize;
    let mut chars = inner.char_indices();
    while let Some((index, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return (index + 1 == inner.len()).then(|| &inner[..index]);
                }
            }
            _ => {}
        }
    }
    None
}

fn coerce(
    entries: Vec<(String, Raw)>,
    allowed: Option<&[(&str, OptionType)]>,
    strict: bool,
) -> InnerResult<Options> {
    let mut options = Options::with_capacity(entries.len());
    for (key, raw) in entries {
        let Some(allowed) = allowed else {
            let value = match raw {
                Raw::Flag => OptionValue::Bool(true),
                Raw::Value(value) => match value.as_str() {
                    "true" => OptionValue::Bool(true),
                    "false" => OptionValue::Bool(false),
                    _ => OptionValue::String(value),
                },
            };
            options.insert(key, value);
            continue;
        };

        let Some((_, ty)) = allowed.iter().find(|(name, _)| *name == key) else {
            if strict {
                return Err(ErrorKind::InvalidOption(key));
            }
            continue;
        };
        match coerce_value(raw, *ty) {
            Some(value) => {
                options.insert(key, value);
            }
            None if strict => return Err(ErrorKind::InvalidValue(key)),
            None => {}
        }
    }
    Ok(options)
}

fn coerce_value(raw: Raw, ty: OptionType) -> Option<OptionValue> {
    let value = match raw {
        Raw::Flag => return (ty == OptionType::Bool).then_some(OptionValue::Bool(true)),
        Raw::Value(value) => value,
    };
    Some(match ty {
        OptionType::Bool => match value.as_str() {
            "true" => OptionValue::Bool(true),
            "false" => OptionValue::Bool(false),
            _ => return None,
        },
        OptionType::Int => OptionValue::Int(value.parse().ok()?),
        OptionType::Number => OptionValue::Number(value.parse().ok()?),
        OptionType::String => OptionValue::String(value),
        OptionType::OneOf(choices) => {
            if !choices.contains(&value.as_str()) {
                return None;
            }
            OptionValue::String(value)
        }
        OptionType::Dimension => {
            let mut rest = value.as_str();
            lex::dimension(&mut rest).ok()?;
            if !rest.trim().is_empty() {
                return None;
            }
            OptionValue::String(value)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_options, parse_options_preserving, OptionType, OptionValue};
    use crate::parser::ErrorKind;

    #[test]
    fn keys_and_flags() {
        let options = parse_options("ab=1,cd", None, false).unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options["ab"], OptionValue::from("1"));
        assert_eq!(options["cd"], OptionValue::Bool(true));
        assert_eq!(
            parse_options(" x = false , , y=true", None, false).unwrap(),
            [
                ("x".to_string(), OptionValue::Bool(false)),
                ("y".to_string(), OptionValue::Bool(true))
            ]
            .into_iter()
            .collect::<super::Options>()
        );
    }

    #[test]
    fn outer_braces_are_removed() {
        let options = parse_options("ab={{{cd} ef}}", None, false).unwrap();
        assert_eq!(options["ab"], OptionValue::from("{cd} ef"));
        let options = parse_options("list={a,b},eq={=}", None, false).unwrap();
        assert_eq!(options["list"], OptionValue::from("a,b"));
        assert_eq!(options["eq"], OptionValue::from("="));
    }

    #[test]
    fn adjacent_groups_keep_their_braces() {
        let options = parse_options("ab={a}{b},cd={{x}}{y}", None, false).unwrap();
        assert_eq!(options["ab"], OptionValue::from("{a}{b}"));
        assert_eq!(options["cd"], OptionValue::from("{{x}}{y}"));
        let options = parse_options_preserving("ab={a}{b}", None, false).unwrap();
        assert_eq!(options["ab"], OptionValue::from("{a}{b}"));
        let options = parse_options("ab={\\}}", None, false).unwrap();
        assert_eq!(options["ab"], OptionValue::from("\\}"));
    }

    #[test]
    fn preserving_mode_keeps_inner_braces() {
        let options = parse_options_preserving("ab={{{cd} ef}}", None, false).unwrap();
        assert_eq!(options["ab"], OptionValue::from("{{cd} ef}"));
    }

    #[test]
    fn unbalanced_braces() {
        assert_eq!(
            parse_options("ab={c{d}", None, false),
            Err(ErrorKind::ExtraOpenMissingClose)
        );
        assert_eq!(
            parse_options("ab=c{d}}", None, false),
            Err(ErrorKind::ExtraCloseMissingOpen)
        );
    }

    #[test]
    fn escaped_characters() {
        let options = parse_options(r"a=\{,b=\,", None, false).unwrap();
        assert_eq!(options["a"], OptionValue::from(r"\{"));
        assert_eq!(options["b"], OptionValue::from(r"\,"));
    }

    const ALLOWED: &[(&str, OptionType)] = &[
        ("stretchy", OptionType::Bool),
        ("count", OptionType::Int),
        ("scale", OptionType::Number),
        ("form", OptionType::OneOf(&["prefix", "infix", "postfix"])),
        ("lspace", OptionType::Dimension),
    ];

    #[test]
    fn typed_values() {
        let options = parse_options(
            "stretchy,count=3,scale=1.5,form=prefix,lspace=2em",
            Some(ALLOWED),
            true,
        )
        .unwrap();
        assert_eq!(options["stretchy"], OptionValue::Bool(true));
        assert_eq!(options["count"], OptionValue::Int(3));
        assert_eq!(options["scale"], OptionValue::Number(1.5));
        assert_eq!(options["form"], OptionValue::from("prefix"));
        assert_eq!(options["lspace"], OptionValue::from("2em"));
    }

    #[test]
    fn invalid_entries() {
        let options = parse_options("form=sideways,color=red,count=x", Some(ALLOWED), false).unwrap();
        assert!(options.is_empty());

        assert_eq!(
            parse_options("color=red", Some(ALLOWED), true),
            Err(ErrorKind::InvalidOption("color".into()))
        );
        assert_eq!(
            parse_options("lspace=2", Some(ALLOWED), true),
            Err(ErrorKind::InvalidValue("lspace".into()))
        );
    }
}
