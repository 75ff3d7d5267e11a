//! `\begin`, `\end`, and the tabular environments of the `base` module.
use crate::{
    attribute::Length,
    node::Node,
    parser::{
        columns::{parse_columns, Alignment, Column},
        lex,
        stack::{ArrayState, ItemKind, LayoutColumn},
        ErrorKind, InnerResult, Parser,
    },
    registry::{Handler, Invocation, Param, SymbolClass},
};

use super::environment;

#[rustfmt::skip]
pub(super) const ENVIRONMENTS: &[(&str, Handler)] = &[
    ("array", environment(array, &[])),
    ("matrix", environment(matrix, &[])),
    ("pmatrix", environment(matrix, &[Param::Str("("), Param::Str(")")])),
    ("bmatrix", environment(matrix, &[Param::Str("["), Param::Str("]")])),
    ("Bmatrix", environment(matrix, &[Param::Str("{"), Param::Str("}")])),
    ("vmatrix", environment(matrix, &[Param::Str("|"), Param::Str("|")])),
    ("Vmatrix", environment(matrix, &[Param::Str("‖"), Param::Str("‖")])),
    ("smallmatrix", environment(small_matrix, &[])),
    ("cases", environment(cases, &[])),
    ("aligned", environment(aligned, &[])),
    ("gathered", environment(gathered, &[])),
];

const LEFT_LEFT: &[Alignment] = &[Alignment::Left, Alignment::Left];
const RIGHT_LEFT: &[Alignment] = &[Alignment::Right, Alignment::Left];

pub(super) fn begin<'a>(parser: &mut Parser<'a>, _: Invocation<'a>) -> InnerResult<()> {
    let name = parser.group("\\begin")?.trim();
    let registry = parser.configuration().registry();
    if let Some(Handler::Environment(command)) = registry.lookup(SymbolClass::Environment, name) {
        return parser.invoke(name, *command);
    }

    // The body of an unknown environment is skipped along with it.
    let end = parser.concat(&["\\end{", name, "}"]);
    let mut rest = parser.rest();
    if lex::content_with_suffix(&mut rest, end).is_ok() {
        parser.set_rest(rest);
    }
    Err(ErrorKind::UnknownEnvironment(name.to_string()))
}

pub(super) fn end<'a>(parser: &mut Parser<'a>, _: Invocation<'a>) -> InnerResult<()> {
    let name = parser.group("\\end")?.trim();
    parser.close_environment(name)
}

fn begin_name(invocation: &Invocation<'_>) -> String {
    format!("\\begin{{{}}}", invocation.name)
}

/// `\begin{array}[t]{r|c@{,}l}`
///
/// An invalid column specification is reported, and the array is laid out with centered
/// columns instead.
fn array<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let name = begin_name(&invocation);
    let position = parser.optional_argument(&name)?;
    let spec = parser.group(&name)?;

    let mut state = ArrayState::new(invocation.name);
    match position.map(str::trim) {
        Some("t") => state.attributes.push(("align", "baseline 1".to_string())),
        Some("b") => state.attributes.push(("align", "baseline -1".to_string())),
        _ => {}
    }
    match parse_columns(spec, parser.config().max_matrix_size) {
        Ok(columns) => state.layout = layout(parser, columns)?,
        Err(error) => parser.report(error),
    }
    parser.begin(ItemKind::Array(Box::new(state)));
    Ok(())
}

fn layout<'a>(parser: &mut Parser<'a>, columns: Vec<Column<'a>>) -> InnerResult<Vec<LayoutColumn>> {
    let mut layout = Vec::with_capacity(columns.len());
    for column in columns {
        layout.push(match column {
            Column::Align {
                align,
                width,
                before,
                after,
                ..
            } => LayoutColumn::Cell {
                align,
                width: width.map(column_width),
                before: before.map(|before| parser.sub_parse(before)).transpose()?,
                after: after.map(|after| parser.sub_parse(after)).transpose()?,
            },
            Column::Separator { content, .. } => LayoutColumn::Separator(parser.sub_parse(content)?),
            Column::Rule(style) => LayoutColumn::Rule(style.as_str()),
        });
    }
    Ok(layout)
}

fn column_width(text: &str) -> String {
    let mut rest = text.trim();
    match lex::dimension(&mut rest) {
        Ok(dimension) if rest.trim().is_empty() => Length(dimension).to_string(),
        _ => text.trim().to_string(),
    }
}

/// `matrix` and its fenced variants, registered with their opening and closing fences.
fn matrix<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let mut state = ArrayState::new(invocation.name);
    state.fences = invocation.str(0).zip(invocation.str(1));
    parser.begin(ItemKind::Array(Box::new(state)));
    Ok(())
}

fn small_matrix<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let mut state = ArrayState::new(invocation.name);
    state.attributes = vec![
        ("columnspacing", "0.333em".to_string()),
        ("rowspacing", "0.2em".to_string()),
    ];
    state.style = vec![
        ("scriptlevel", "1".to_string()),
        ("displaystyle", "false".to_string()),
    ];
    parser.begin(ItemKind::Array(Box::new(state)));
    Ok(())
}

fn cases<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let mut state = ArrayState::new(invocation.name);
    state.fences = Some(("{", ""));
    state.align_cycle = LEFT_LEFT;
    state.attributes.push(("columnspacing", "1em".to_string()));
    parser.begin(ItemKind::Array(Box::new(state)));
    Ok(())
}

fn aligned<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let mut state = ArrayState::new(invocation.name);
    state.align_cycle = RIGHT_LEFT;
    state.attributes.push(("columnspacing", "0em 2em".to_string()));
    state.style.push(("displaystyle", "true".to_string()));
    parser.begin(ItemKind::Array(Box::new(state)));
    Ok(())
}

fn gathered<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let mut state = ArrayState::new(invocation.name);
    state.style.push(("displaystyle", "true".to_string()));
    parser.begin(ItemKind::Array(Box::new(state)));
    Ok(())
}

/// Build the table of a matrix whose cells are already parsed, as done by commands that take
/// their entries as arguments instead of an environment body.
pub(super) fn matrix_of(
    name: &str,
    rows: Vec<Vec<Node>>,
    fences: Option<(&'static str, &'static str)>,
) -> InnerResult<Node> {
    let mut state = ArrayState::new(name);
    state.fences = fences;
    for row in rows {
        for cell in row {
            state.end_cell(vec![cell]);
        }
        state.end_row();
    }
    state.finish()
}

#[cfg(test)]
mod tests {
    use crate::{node::NodeKind, parse, parser::Severity};

    const BASE: &[(&str, i32)] = &[("base", 0)];

    #[test]
    fn fenced_matrix() {
        let output = parse("\\begin{pmatrix} a & b \\\\ c & d \\end{pmatrix}", BASE);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        let children = output.root.children();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].text_content(), Some("("));
        assert_eq!(children[1].kind(), NodeKind::Table);
        assert_eq!(children[1].children().len(), 2);
        assert_eq!(children[1].children()[1].children().len(), 2);
        assert_eq!(children[2].text_content(), Some(")"));
    }

    #[test]
    fn array_layout() {
        let output = parse("\\begin{array}{r|c} 1 & 2 \\\\ \\hline 3 & 4 \\end{array}", BASE);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        assert_eq!(output.root.kind(), NodeKind::Table);
        assert_eq!(output.root.attribute("columnalign"), Some("right center"));
        assert_eq!(output.root.attribute("columnlines"), Some("solid"));
        assert_eq!(output.root.attribute("rowlines"), Some("solid"));
    }

    #[test]
    fn bad_column_spec_is_local() {
        let output = parse("\\begin{array}{cx} a & b \\end{array}", BASE);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].kind, "BadPreamToken");
        let children = output.root.children();
        assert!(children[0].is_error());
        assert_eq!(children[1].kind(), NodeKind::Table);
        assert_eq!(children[1].attribute("columnalign"), Some("center center"));
    }

    #[test]
    fn unknown_environment_is_skipped() {
        let output = parse("\\begin{foo} x & y \\end{foo} z", BASE);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].kind, "UnknownEnv");
        let children = output.root.children();
        assert_eq!(children.len(), 2);
        assert!(children[0].is_error());
        assert_eq!(children[1].text_content(), Some("z"));
    }

    #[test]
    fn mismatched_end_is_fatal() {
        let output = parse("\\begin{matrix} a \\end{pmatrix}", BASE);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].kind, "EnvBadEnd");
        assert_eq!(output.diagnostics[0].severity, Severity::Fatal);
        assert!(output.root.is_error());
    }

    #[test]
    fn cases_and_aligned() {
        let output = parse("\\begin{cases} 1 & x > 0 \\\\ 0 & x \\leq 0 \\end{cases}", BASE);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        let children = output.root.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].text_content(), Some("{"));
        assert_eq!(children[1].attribute("columnalign"), Some("left left"));

        let output = parse("\\begin{aligned} a &= b \\end{aligned}", BASE);
        assert_eq!(output.root.kind(), NodeKind::Style);
        let table = &output.root.children()[0];
        assert_eq!(table.attribute("columnalign"), Some("right left"));
    }
}
