//! The `tags` module: numbered equations, `\tag`, `\label` and references.
use crate::{
    extension::ExtensionModule,
    message,
    node::{Node, NodeKind},
    parser::{stack::ItemKind, ErrorKind, InnerResult, Parser},
    references::{Reference, PLACEHOLDER},
    registry::{Handler, HandlerMap, Invocation, SymbolClass},
};

use super::{command, environment};

pub(super) fn module() -> ExtensionModule {
    ExtensionModule::new()
        .with_handlers([
            HandlerMap::new("tags-macros", SymbolClass::Macro, MACROS.iter().copied()),
            HandlerMap::new(
                "tags-environments",
                SymbolClass::Environment,
                ENVIRONMENTS.iter().copied(),
            ),
        ])
        .with_init(|configuration| configuration.set_tag_format("(%1)"))
}

const MACROS: &[(&str, Handler)] = &[
    ("tag", command(tag)),
    ("label", command(label)),
    ("notag", command(notag)),
    ("nonumber", command(notag)),
    ("ref", command(reference)),
    ("eqref", command(reference)),
];

const ENVIRONMENTS: &[(&str, Handler)] = &[
    ("equation", environment(equation, &[])),
    ("equation*", environment(equation, &[])),
];

fn equation<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    parser.references().start_equation();
    parser.begin(ItemKind::Environment {
        name: invocation.name,
        star: invocation.name.ends_with('*'),
        finish: finish_equation,
    });
    Ok(())
}

/// Build an equation. A numbered or tagged equation becomes a one row table whose label cell
/// holds the formatted tag.
fn finish_equation(parser: &mut Parser<'_>, star: bool, nodes: Vec<Node>) -> InnerResult<Node> {
    let body = Node::wrap(nodes);
    let Some(tag) = parser.references().finish_equation(!star) else {
        return Ok(body);
    };
    let label = Node::text(message::format(parser.tag_format(), &[tag]));
    let row = Node::new(
        NodeKind::LabeledRow,
        vec![
            Node::new(NodeKind::TableCell, vec![label])?,
            Node::new(NodeKind::TableCell, vec![body])?,
        ],
    )?;
    Ok(Node::new(NodeKind::Table, vec![row])?.with_attribute("side", "right"))
}

fn tag<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let tag = parser.group(&invocation.control_sequence())?.trim();
    parser.references().tag(tag)
}

fn label<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let label = parser.group(&invocation.control_sequence())?.trim();
    parser.references().define(label).map(|_| ())
}

/// `\notag` and `\nonumber`, turning off the number of the enclosing equation, even from
/// inside an argument.
fn notag<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    parser
        .references()
        .suppress_number()
        .map_err(|_| ErrorKind::Misplaced(invocation.control_sequence()))
}

/// `\ref` shows the bare tag, `\eqref` formats it like the equation label.
fn reference<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let label = parser.group(&invocation.control_sequence())?.trim();
    let tag = match parser.references().resolve(label) {
        Reference::Resolved(tag) => tag,
        Reference::Pending => PLACEHOLDER.to_string(),
    };
    let text = match invocation.name {
        "eqref" => message::format(parser.tag_format(), &[tag]),
        _ => tag,
    };
    parser.push_node(Node::text(text));
    Ok(())
}
