//! Column specifications of tabular environments, such as the `{r|c@{,}l}` of
//! `\begin{array}{r|c@{,}l}`.
use super::{lex, Argument, ErrorKind, InnerResult, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    /// The value used in the `columnalign` attribute.
    pub const fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlignment {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleStyle {
    Solid,
    Dashed,
}

impl RuleStyle {
    pub const fn as_str(self) -> &'static str {
        match self {
            RuleStyle::Solid => "solid",
            RuleStyle::Dashed => "dashed",
        }
    }
}

/// One entry of a column specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column<'a> {
    /// A column holding the cells of the table.
    Align {
        align: Alignment,
        /// Width of the column, for `p{}`, `m{}`, `b{}`, `w{}{}` and `W{}{}` columns.
        width: Option<&'a str>,
        vertical: Option<VerticalAlignment>,
        /// Material inserted before every cell of the column (`>{...}`).
        before: Option<&'a str>,
        /// Material inserted after every cell of the column (`<{...}`).
        after: Option<&'a str>,
    },
    /// Material replacing the space between two columns (`@{...}`), or added to it (`!{...}`).
    Separator { content: &'a str, keep_space: bool },
    /// A vertical rule (`|` or `:`).
    Rule(RuleStyle),
}

/// Parse a column specification.
///
/// Whitespace is ignored. `*{n}{spec}` is expanded in place. A character that does not start a
/// column declaration is reported with its position in `spec`, counted in characters.
///
/// At most `max_columns` entries (columns, separators and rules) are produced.
pub fn parse_columns(spec: &str, max_columns: usize) -> InnerResult<Vec<Column<'_>>> {
    let mut columns = Vec::new();
    let mut pending_before = None;
    parse_into(spec, spec, max_columns, &mut columns, &mut pending_before)?;
    if pending_before.is_some() {
        return Err(ErrorKind::MissingColumnArgument('>'));
    }
    Ok(columns)
}

fn parse_into<'a>(
    full: &str,
    spec: &'a str,
    max_columns: usize,
    columns: &mut Vec<Column<'a>>,
    pending_before: &mut Option<&'a str>,
) -> InnerResult<()> {
    let mut rest = spec;
    while let Some(c) = rest.chars().next() {
        // `rest` always points into `full`, even inside of a `*{n}{...}` repetition.
        let offset = rest.as_ptr() as usize - full.as_ptr() as usize;
        let position = full[..offset].chars().count();
        rest = &rest[c.len_utf8()..];
        match c {
            c if c.is_whitespace() => {}
            'l' | 'c' | 'r' => {
                let align = match c {
                    'l' => Alignment::Left,
                    'c' => Alignment::Center,
                    _ => Alignment::Right,
                };
                push_aligned(columns, pending_before, align, None, None);
            }
            'p' | 'm' | 'b' => {
                let width = column_argument(&mut rest, c)?;
                let vertical = match c {
                    'p' => VerticalAlignment::Top,
                    'm' => VerticalAlignment::Middle,
                    _ => VerticalAlignment::Bottom,
                };
                push_aligned(columns, pending_before, Alignment::Left, Some(width), Some(vertical));
            }
            'w' | 'W' => {
                let align = match column_argument(&mut rest, c)?.trim() {
                    "l" => Alignment::Left,
                    "c" => Alignment::Center,
                    "r" => Alignment::Right,
                    _ => {
                        return Err(ErrorKind::BadPreambleToken { token: c, position });
                    }
                };
                let width = column_argument(&mut rest, c)?;
                push_aligned(columns, pending_before, align, Some(width), None);
            }
            '|' => columns.push(Column::Rule(RuleStyle::Solid)),
            ':' => columns.push(Column::Rule(RuleStyle::Dashed)),
            '@' | '!' => {
                let content = column_argument(&mut rest, c)?;
                columns.push(Column::Separator {
                    content,
                    keep_space: c == '!',
                });
            }
            '>' => {
                let content = column_argument(&mut rest, c)?;
                *pending_before = Some(content);
            }
            '<' => {
                let content = column_argument(&mut rest, c)?;
                match columns.iter_mut().rev().find(|c| matches!(c, Column::Align { .. })) {
                    Some(Column::Align { after, .. }) if after.is_none() => *after = Some(content),
                    _ => return Err(ErrorKind::BadPreambleToken { token: c, position }),
                }
            }
            '*' => {
                let count = column_argument(&mut rest, c)?;
                let repeated = column_argument(&mut rest, c)?;
                let count = count
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| ErrorKind::InvalidColumnCount(count.trim().to_string()))?;
                for _ in 0..count {
                    let before = columns.len();
                    parse_into(full, repeated, max_columns, columns, pending_before)?;
                    if columns.len() == before {
                        // Repeating nothing changes nothing.
                        break;
                    }
                }
            }
            token => return Err(ErrorKind::BadPreambleToken { token, position }),
        }
        if columns.len() > max_columns {
            return Err(ErrorKind::TooManyColumns(max_columns));
        }
    }
    Ok(())
}

fn push_aligned<'a>(
    columns: &mut Vec<Column<'a>>,
    pending_before: &mut Option<&'a str>,
    align: Alignment,
    width: Option<&'a str>,
    vertical: Option<VerticalAlignment>,
) {
    columns.push(Column::Align {
        align,
        width,
        vertical,
        before: pending_before.take(),
        after: None,
    });
}

fn column_argument<'a>(rest: &mut &'a str, column: char) -> InnerResult<&'a str> {
    if rest.trim().is_empty() {
        return Err(ErrorKind::MissingColumnArgument(column));
    }
    let before = *rest;
    match lex::argument(rest).map_err(|_| ErrorKind::MissingColumnArgument(column))? {
        Argument::Group(content) => Ok(content),
        Argument::Token(Token::Character(_) | Token::ControlSequence(_)) => {
            let consumed = &before[..before.len() - rest.len()];
            Ok(consumed.trim())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_columns, Alignment, Column, RuleStyle};
    use crate::parser::ErrorKind;

    const MAX: usize = 100;

    fn aligns(columns: &[Column]) -> Vec<Alignment> {
        columns
            .iter()
            .filter_map(|c| match c {
                Column::Align { align, .. } => Some(*align),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn simple() {
        let columns = parse_columns("l c | r", MAX).unwrap();
        assert_eq!(columns.len(), 4);
        assert_eq!(
            aligns(&columns),
            [Alignment::Left, Alignment::Center, Alignment::Right]
        );
        assert_eq!(columns[2], Column::Rule(RuleStyle::Solid));
    }

    #[test]
    fn arguments() {
        let columns = parse_columns("p{2cm}@{,}w{r}{1em}:", MAX).unwrap();
        assert!(matches!(columns[0], Column::Align { width: Some("2cm"), .. }));
        assert_eq!(
            columns[1],
            Column::Separator {
                content: ",",
                keep_space: false
            }
        );
        assert!(matches!(
            columns[2],
            Column::Align {
                align: Alignment::Right,
                width: Some("1em"),
                ..
            }
        ));
        assert_eq!(columns[3], Column::Rule(RuleStyle::Dashed));
    }

    #[test]
    fn templates() {
        let columns = parse_columns(">{+}c<{-}l", MAX).unwrap();
        assert!(matches!(
            columns[0],
            Column::Align {
                before: Some("+"),
                after: Some("-"),
                ..
            }
        ));
        assert!(matches!(columns[1], Column::Align { before: None, after: None, .. }));
    }

    #[test]
    fn repeat() {
        let columns = parse_columns("*{3}{c|}l", MAX).unwrap();
        assert_eq!(columns.len(), 7);
        assert_eq!(aligns(&columns).len(), 4);
    }

    #[test]
    fn errors() {
        assert_eq!(
            parse_columns("cx", MAX),
            Err(ErrorKind::BadPreambleToken {
                token: 'x',
                position: 1
            })
        );
        assert_eq!(parse_columns("cp", MAX), Err(ErrorKind::MissingColumnArgument('p')));
        assert_eq!(
            parse_columns("*{two}{c}", MAX),
            Err(ErrorKind::InvalidColumnCount("two".into()))
        );
        assert_eq!(parse_columns("<{a}c", MAX), Err(ErrorKind::BadPreambleToken { token: '<', position: 0 }));
        assert_eq!(parse_columns("c>{a}", MAX), Err(ErrorKind::MissingColumnArgument('>')));
    }

    #[test]
    fn repetition_is_bounded() {
        assert_eq!(parse_columns("*{1000}{c}", MAX), Err(ErrorKind::TooManyColumns(MAX)));
        assert_eq!(
            parse_columns("*{99999999999}{*{99999999999}{c|}}", MAX),
            Err(ErrorKind::TooManyColumns(MAX))
        );
        assert_eq!(parse_columns("*{99999999999}{}c", MAX).map(|c| c.len()), Ok(1));
        assert_eq!(parse_columns("*{100}{c}", MAX).map(|c| c.len()), Ok(100));
    }
}
