//! The `physics` module: automatic brackets, evaluation bars, and matrix shorthands.
//!
//! The matrix commands build their tables through the `matrix` environments of the `base`
//! module, which must be loaded alongside.
use crate::{
    config::ParserKind,
    extension::ExtensionModule,
    node::Node,
    parser::{
        delimiters::{self, Role},
        lex, ErrorKind, InnerResult, Parser,
    },
    registry::{Handler, HandlerMap, Invocation, Param, SymbolClass},
};

use super::{command, command_with, environments::matrix_of, starred};

pub(super) fn module() -> ExtensionModule {
    ExtensionModule::new()
        .with_handlers([HandlerMap::new(
            "physics-macros",
            SymbolClass::Macro,
            MACROS.iter().copied(),
        )])
        .for_parser(ParserKind::Tex)
}

#[rustfmt::skip]
const MACROS: &[(&str, Handler)] = &[
    ("quantity", starred(quantity, &[])),
    ("qty", starred(quantity, &[])),
    ("pqty", starred(bracketed, &[Param::Str("("), Param::Str(")")])),
    ("bqty", starred(bracketed, &[Param::Str("["), Param::Str("]")])),
    ("Bqty", starred(bracketed, &[Param::Str("{"), Param::Str("}")])),
    ("vqty", starred(bracketed, &[Param::Str("|"), Param::Str("|")])),
    ("abs", starred(bracketed, &[Param::Str("|"), Param::Str("|")])),
    ("absolutevalue", starred(bracketed, &[Param::Str("|"), Param::Str("|")])),
    ("norm", starred(bracketed, &[Param::Str("‖"), Param::Str("‖")])),
    ("eval", command(evaluated)),
    ("evaluated", command(evaluated)),

    ("mqty", command_with(matrix_quantity, &[Param::Bool(false)])),
    ("matrixquantity", command_with(matrix_quantity, &[Param::Bool(false)])),
    ("pmqty", command_with(matrix_quantity, &[Param::Bool(false), Param::Str("("), Param::Str(")")])),
    ("bmqty", command_with(matrix_quantity, &[Param::Bool(false), Param::Str("["), Param::Str("]")])),
    ("vmqty", command_with(matrix_quantity, &[Param::Bool(false), Param::Str("|"), Param::Str("|")])),
    ("smqty", command_with(matrix_quantity, &[Param::Bool(true)])),
    ("smallmatrixquantity", command_with(matrix_quantity, &[Param::Bool(true)])),
    ("spmqty", command_with(matrix_quantity, &[Param::Bool(true), Param::Str("("), Param::Str(")")])),
    ("sbmqty", command_with(matrix_quantity, &[Param::Bool(true), Param::Str("["), Param::Str("]")])),
    ("svmqty", command_with(matrix_quantity, &[Param::Bool(true), Param::Str("|"), Param::Str("|")])),

    ("pmat", command(pauli_matrix)),
    ("paulimatrix", command(pauli_matrix)),
    ("dmat", command_with(diagonal_matrix, &[Param::Bool(false)])),
    ("diagonalmatrix", command_with(diagonal_matrix, &[Param::Bool(false)])),
    ("admat", command_with(diagonal_matrix, &[Param::Bool(true)])),
    ("antidiagonalmatrix", command_with(diagonal_matrix, &[Param::Bool(true)])),
    ("imat", command(identity_matrix)),
    ("identitymatrix", command(identity_matrix)),
    ("zmat", command(zero_matrix)),
    ("zeromatrix", command(zero_matrix)),
    ("xmat", starred(x_matrix, &[])),
    ("xmatrix", starred(x_matrix, &[])),
];

const PARENTHESES: Option<(&str, &str)> = Some(("(", ")"));

/// Read a `\big`-class size command in front of the body, if there is one.
fn size_prefix<'a>(parser: &mut Parser<'a>) -> Option<(f32, &'a str)> {
    let mut rest = parser.rest();
    let source = lex::token_source(&mut rest).ok()?;
    if !source.starts_with('\\') {
        return None;
    }
    let size = delimiters::size(source)?;
    parser.set_rest(rest);
    Some((size, source))
}

/// Read a body in `()`, `[]`, `{}` or `||`, returning its fence glyphs and its content.
fn fenced_body<'a>(
    parser: &mut Parser<'a>,
    name: &str,
) -> InnerResult<Option<(&'static str, &'a str, &'static str)>> {
    let rest = parser.rest().trim_start();
    let (open, close, glyphs) = match rest.chars().next() {
        Some('(') => ('(', ')', ("(", ")")),
        Some('[') => ('[', ']', ("[", "]")),
        Some('{') => ('{', '}', ("{", "}")),
        Some('|') => ('|', '|', ("|", "|")),
        _ => return Ok(None),
    };
    let mut input = &rest[1..];
    let content = match open {
        '{' => lex::group_content(&mut input, "{", "}")?,
        _ => lex::delimited_content(&mut input, open, close).map_err(|_| {
            ErrorKind::MissingCloseDelimiter {
                delimiter: close,
                name: name.to_string(),
            }
        })?,
    };
    parser.set_rest(input);
    Ok(Some((glyphs.0, content, glyphs.1)))
}

/// Put `body` between fences. A size fixes the fences at that height, a star keeps them at
/// their natural size, and otherwise they grow with the body.
fn fence_body(
    open: &str,
    body: Node,
    close: &str,
    size: Option<f32>,
    star: bool,
) -> InnerResult<Node> {
    Ok(match size {
        Some(size) => Node::row(vec![
            delimiters::sized(open, size, Role::Open),
            body,
            delimiters::sized(close, size, Role::Close),
        ]),
        None if star => Node::row(vec![
            delimiters::fence(open, Role::Open, false),
            body,
            delimiters::fence(close, Role::Close, false),
        ]),
        None => delimiters::fenced(open, vec![body], close)?,
    })
}

/// `\qty(x)`, `\qty\big[x]`, `\qty*{x}`...
fn quantity<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let name = invocation.control_sequence();
    let size = size_prefix(parser);
    let Some((open, content, close)) = fenced_body(parser, &name)? else {
        return Err(match size {
            Some((_, size_command)) => {
                // The token that is not a delimiter belongs to the failed quantity.
                parser.next_token_source().ok();
                ErrorKind::MissingOrUnrecognizedDelim(size_command.to_string())
            }
            None => ErrorKind::MissingArgument(name),
        });
    };
    let body = parser.sub_parse(content)?;
    let node = fence_body(open, body, close, size.map(|(size, _)| size), invocation.star)?;
    parser.push_node(node);
    Ok(())
}

/// `\pqty`, `\abs`, `\norm`... Registered with their fence glyphs.
fn bracketed<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let name = invocation.control_sequence();
    let open = invocation.str(0).unwrap_or("(");
    let close = invocation.str(1).unwrap_or(open);
    let size = size_prefix(parser);
    let body = parser.parse_argument(&name)?;
    let node = fence_body(open, body, close, size.map(|(size, _)| size), invocation.star)?;
    parser.push_node(node);
    Ok(())
}

/// `\eval{x}`, `\eval(x|` or `\eval[x|`, followed by the evaluation bounds as scripts.
fn evaluated<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let name = invocation.control_sequence();
    let rest = parser.rest().trim_start();
    let mut input = rest.get(1..).unwrap_or_default();
    let (open, content) = match rest.chars().next() {
        Some('{') => (
            "",
            lex::group_content(&mut input, "{", "}")?,
        ),
        Some(c @ ('(' | '[')) => (
            if c == '(' { "(" } else { "[" },
            lex::content_with_suffix(&mut input, "|").map_err(|_| {
                ErrorKind::MissingCloseDelimiter {
                    delimiter: '|',
                    name: name.clone(),
                }
            })?,
        ),
        _ => return Err(ErrorKind::MissingArgument(name)),
    };
    parser.set_rest(input);
    let body = parser.sub_parse(content)?;
    parser.push_node(delimiters::fenced(open, vec![body], "|")?);
    Ok(())
}

/// `\mqty(a & b \\ c & d)`: a matrix with the fences of its body. A braced body has none.
fn matrix_quantity<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let name = invocation.control_sequence();
    let environment = match invocation.bool(0) {
        Some(true) => "smallmatrix",
        _ => "matrix",
    };
    let (fences, content) = match invocation.str(1) {
        Some(open) => {
            let content = parser.group(&name)?;
            (Some((open, invocation.str(2).unwrap_or(open))), content)
        }
        None => match fenced_body(parser, &name)? {
            Some(("{", content, _)) => (None, content),
            Some((open, content, close)) => (Some((open, close)), content),
            None => return Err(ErrorKind::MissingArgument(name)),
        },
    };
    let source = parser.concat(&[
        "\\begin{",
        environment,
        "}",
        content,
        "\\end{",
        environment,
        "}",
    ]);
    let table = parser.sub_parse(source)?;
    let node = match fences {
        Some((open, close)) => delimiters::fenced(open, vec![table], close)?,
        None => table,
    };
    parser.push_node(node);
    Ok(())
}

/// `\pmat{0}` to `\pmat{3}`, also written `\pmat{x}`, `\pmat{y}` and `\pmat{z}`.
fn pauli_matrix<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let name = invocation.control_sequence();
    let argument = parser.argument(&name)?.trim();
    let entries: [&str; 4] = match argument {
        "0" => ["1", "0", "0", "1"],
        "1" | "x" => ["0", "1", "1", "0"],
        "2" | "y" => ["0", "-i", "i", "0"],
        "3" | "z" => ["1", "0", "0", "-1"],
        _ => {
            return Err(ErrorKind::InvalidMatrixArgument {
                name,
                argument: argument.to_string(),
            })
        }
    };
    let mut rows = Vec::with_capacity(2);
    for row in entries.chunks(2) {
        let mut cells = Vec::with_capacity(2);
        for entry in row {
            cells.push(parser.sub_parse(entry)?);
        }
        rows.push(cells);
    }
    parser.push_node(matrix_of(invocation.name, rows, PARENTHESES)?);
    Ok(())
}

/// Split a list of entries on the commas that are outside of braces.
fn split_entries(list: &str) -> Vec<&str> {
    if list.trim().is_empty() {
        return Vec::new();
    }
    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut chars = list.char_indices();
    while let Some((index, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                entries.push(list[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    entries.push(list[start..].trim());
    entries
}

/// `\dmat[filler]{a,b,c}` and `\admat[filler]{a,b,c}`. Entries are parsed on their own, so
/// they can hold other matrices.
fn diagonal_matrix<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let name = invocation.control_sequence();
    let anti = invocation.bool(0).unwrap_or(false);
    let filler = parser.optional_argument(&name)?;
    let group = parser.group(&name)?;
    let entries = split_entries(group);
    if entries.len() > parser.config().max_matrix_size {
        return Err(ErrorKind::InvalidMatrixArgument {
            name,
            argument: group.to_string(),
        });
    }
    let filler = filler.map(|filler| parser.sub_parse(filler)).transpose()?;

    let size = entries.len();
    let mut rows = Vec::with_capacity(size);
    for (i, entry) in entries.into_iter().enumerate() {
        let column = if anti { size - 1 - i } else { i };
        let mut cells = Vec::with_capacity(size);
        for j in 0..size {
            if j == column {
                cells.push(parser.sub_parse(entry)?);
            } else {
                cells.push(filler.clone().unwrap_or_else(|| Node::row(Vec::new())));
            }
        }
        rows.push(cells);
    }
    parser.push_node(matrix_of(invocation.name, rows, PARENTHESES)?);
    Ok(())
}

/// A row or column count between 1 and `max_matrix_size`.
fn dimension_argument(parser: &mut Parser<'_>, name: &str) -> InnerResult<usize> {
    let max = parser.config().max_matrix_size;
    let argument = parser.argument(name)?.trim();
    argument
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=max).contains(n))
        .ok_or_else(|| ErrorKind::InvalidMatrixArgument {
            name: name.to_string(),
            argument: argument.to_string(),
        })
}

fn identity_matrix<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let size = dimension_argument(parser, &invocation.control_sequence())?;
    let rows = (0..size)
        .map(|i| {
            (0..size)
                .map(|j| Node::number(if i == j { "1" } else { "0" }))
                .collect()
        })
        .collect();
    parser.push_node(matrix_of(invocation.name, rows, PARENTHESES)?);
    Ok(())
}

fn zero_matrix<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let name = invocation.control_sequence();
    let rows = dimension_argument(parser, &name)?;
    let columns = dimension_argument(parser, &name)?;
    let rows = vec![vec![Node::number("0"); columns]; rows];
    parser.push_node(matrix_of(invocation.name, rows, PARENTHESES)?);
    Ok(())
}

/// `\xmat{x}{m}{n}`, an `m` by `n` matrix of `x`. With a star, entries are indexed: `x_{ij}`,
/// or `x_{i}` for a single row or column.
fn x_matrix<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let name = invocation.control_sequence();
    let entry = parser.argument(&name)?;
    let rows = dimension_argument(parser, &name)?;
    let columns = dimension_argument(parser, &name)?;

    let mut table = Vec::with_capacity(rows);
    for i in 1..=rows {
        let mut cells = Vec::with_capacity(columns);
        for j in 1..=columns {
            let source = if invocation.star {
                let index = match (rows, columns) {
                    (1, _) => j.to_string(),
                    (_, 1) => i.to_string(),
                    _ => format!("{i}{j}"),
                };
                parser.concat(&["{", entry, "}_{", index.as_str(), "}"])
            } else {
                entry
            };
            cells.push(parser.sub_parse(source)?);
        }
        table.push(cells);
    }
    parser.push_node(matrix_of(invocation.name, table, PARENTHESES)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::split_entries;
    use crate::{node::NodeKind, parse};

    const MODULES: &[(&str, i32)] = &[("base", 0), ("physics", 0)];

    #[test]
    fn entries_split_outside_braces() {
        assert_eq!(split_entries("a, {b,c} ,\\,d"), ["a", "{b,c}", "\\,d"]);
        assert!(split_entries("  ").is_empty());
    }

    #[test]
    fn quantity_shapes() {
        let output = parse("\\qty(x)", MODULES);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        assert_eq!(output.root.kind(), NodeKind::Choice);

        let output = parse("\\qty\\Big[x]", MODULES);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        assert_eq!(output.root.kind(), NodeKind::Row);
        assert_eq!(output.root.children()[0].attribute("minsize"), Some("1.623em"));

        let output = parse("\\qty*{x}", MODULES);
        assert_eq!(output.root.children()[0].attribute("stretchy"), Some("false"));
        assert_eq!(output.root.children()[0].text_content(), Some("{"));
    }

    #[test]
    fn evaluated_bar() {
        let output = parse("\\eval{x^2}_0^1", MODULES);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        assert_eq!(output.root.kind(), NodeKind::SubSup);
        let choice = &output.root.children()[0];
        let display = &choice.children()[0];
        assert_eq!(display.children().len(), 2);
        assert_eq!(display.children()[1].text_content(), Some("|"));

        let output = parse("\\eval(x|", MODULES);
        let display = &output.root.children()[0];
        assert_eq!(display.children()[0].text_content(), Some("("));
    }

    #[test]
    fn matrix_quantities() {
        let output = parse("\\mqty{a & b \\\\ c & d}", MODULES);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        assert_eq!(output.root.kind(), NodeKind::Table);
        assert_eq!(output.root.children().len(), 2);

        let output = parse("\\pmqty{a & b}", MODULES);
        assert_eq!(output.root.kind(), NodeKind::Choice);

        let output = parse("\\smqty(a)", MODULES);
        let display = &output.root.children()[0];
        assert_eq!(display.children()[1].kind(), NodeKind::Style);
    }

    #[test]
    fn generated_matrices() {
        let output = parse("\\imat{3}", MODULES);
        let table = &output.root.children()[1];
        assert_eq!(table.children().len(), 3);
        assert_eq!(table.children()[1].children()[1].children()[0].text_content(), Some("1"));

        let output = parse("\\zmat{2}{3}", MODULES);
        let table = &output.root.children()[1];
        assert_eq!(table.children()[0].children().len(), 3);

        let output = parse("\\xmat*{a}{2}{2}", MODULES);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        let cell = &output.root.children()[1].children()[1].children()[0];
        assert_eq!(cell.children()[0].kind(), NodeKind::Sub);

        let output = parse("\\imat{0}", MODULES);
        assert_eq!(output.diagnostics[0].kind, "InvalidMatrixArgument");
    }

    #[test]
    fn anti_diagonal_filler() {
        let output = parse("\\admat[0]{a,b}", MODULES);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        let rows = output.root.children()[1].children();
        assert_eq!(rows[0].children()[0].children()[0].text_content(), Some("0"));
        assert_eq!(rows[0].children()[1].children()[0].text_content(), Some("a"));
    }
}
