//! Delimiters: the `\big` family, `\left ... \middle ... \right` pairs, and the fences built by
//! other commands.
use crate::{
    attribute::Length,
    node::{Node, NodeKind},
    registry::Invocation,
};

use super::{
    stack::{Item, ItemKind},
    ErrorKind, InnerResult, Parser,
};

/// Heights of the `\big` family, in em.
pub const SIZES: [(&str, f32); 4] = [("big", 1.2), ("Big", 1.623), ("bigg", 2.047), ("Bigg", 2.470)];

/// The size of a `\big` family command, with or without its `\` and its `l`, `r` or `m` suffix.
///
/// ```
/// use latex_mathtree::parser::delimiters::size;
///
/// assert_eq!(size("\\Bigl"), Some(1.623));
/// assert_eq!(size("bigg"), Some(2.047));
/// assert_eq!(size("\\left"), None);
/// ```
pub fn size(name: &str) -> Option<f32> {
    let name = name.strip_prefix('\\').unwrap_or(name);
    let find = |name: &str| {
        SIZES
            .iter()
            .find_map(|(n, size)| (*n == name).then_some(*size))
    };
    find(name).or_else(|| find(name.strip_suffix(['l', 'r', 'm'])?))
}

/// The role a delimiter plays in its expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Open,
    Close,
    Ordinary,
}

impl Role {
    /// The value of the `form` attribute of a delimiter with this role.
    pub const fn form(self) -> &'static str {
        match self {
            Role::Open => "prefix",
            Role::Close => "postfix",
            Role::Ordinary => "infix",
        }
    }
}

/// A delimiter with a fixed size, as produced by `\big(`.
pub fn sized(glyph: &str, size: f32, role: Role) -> Node {
    let size = Length::em(size).to_string();
    Node::operator(glyph)
        .with_attribute("minsize", size.clone())
        .with_attribute("maxsize", size)
        .with_attribute("stretchy", "true")
        .with_attribute("symmetric", "true")
        .with_attribute("form", role.form())
}

/// A fence, growing with its content if `stretchy` is set.
pub fn fence(glyph: &str, role: Role, stretchy: bool) -> Node {
    Node::operator(glyph)
        .with_attribute("fence", "true")
        .with_attribute("stretchy", if stretchy { "true" } else { "false" })
        .with_attribute("form", role.form())
}

/// Surround `content` with a pair of fences.
///
/// The result is a choice between a display, a text, and a script rendering. In the script
/// rendering, the fences (including the `\middle` ones found directly in `content`) keep their
/// natural size. An empty glyph is the null delimiter and is omitted.
pub fn fenced(open: &str, content: Vec<Node>, close: &str) -> InnerResult<Node> {
    let mut children = Vec::with_capacity(content.len() + 2);
    if !open.is_empty() {
        children.push(fence(open, Role::Open, true));
    }
    children.extend(content);
    if !close.is_empty() {
        children.push(fence(close, Role::Close, true));
    }

    let script = children
        .iter()
        .cloned()
        .map(|mut child| {
            if child.kind() == NodeKind::Operator && child.attribute("fence") == Some("true") {
                child.set_attribute("stretchy", "false");
            }
            child
        })
        .collect();
    let display = Node::row(children);
    Node::new(
        NodeKind::Choice,
        vec![display.clone(), display, Node::row(script)],
    )
}

/// Read a delimiter token and resolve its glyph through the registry.
pub fn read_delimiter(parser: &mut Parser<'_>, name: &str) -> InnerResult<&'static str> {
    let missing = || ErrorKind::MissingOrUnrecognizedDelim(name.to_string());
    let source = parser.next_token_source().map_err(|_| missing())?;
    parser
        .configuration()
        .registry()
        .delimiter(source)
        .ok_or_else(missing)
}

/// `\big`, `\Bigl`, `\biggr`... Registered with the size and the role (`l`, `r`, or `m`).
pub(crate) fn big<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let size = invocation
        .float(0)
        .or_else(|| size(invocation.name))
        .unwrap_or(1.2);
    let role = match invocation.char(1) {
        Some('l') => Role::Open,
        Some('r') => Role::Close,
        _ => Role::Ordinary,
    };
    let glyph = read_delimiter(parser, &invocation.control_sequence())?;
    parser.push_node(sized(glyph, size, role));
    Ok(())
}

pub(crate) fn left<'a>(parser: &mut Parser<'a>, _: Invocation<'a>) -> InnerResult<()> {
    let open = read_delimiter(parser, "\\left")?;
    parser.begin(ItemKind::Left { open });
    Ok(())
}

pub(crate) fn middle<'a>(parser: &mut Parser<'a>, _: Invocation<'a>) -> InnerResult<()> {
    let glyph = read_delimiter(parser, "\\middle")?;
    parser.close_styles();
    if !matches!(parser.stack.top().kind, ItemKind::Left { .. }) {
        return Err(ErrorKind::Extra("\\middle".to_string()));
    }
    parser.push_node(fence(glyph, Role::Ordinary, true));
    Ok(())
}

pub(crate) fn right<'a>(parser: &mut Parser<'a>, _: Invocation<'a>) -> InnerResult<()> {
    let close = read_delimiter(parser, "\\right")?;
    parser.close_styles();
    match parser.stack.pop() {
        Some(Item {
            kind: ItemKind::Left { open },
            row,
            start,
            font,
        }) => {
            parser.set_font(font);
            let content = parser.finish_row(row);
            let mut node = fenced(open, content, close)?;
            if let Some(source) = start.zip(parser.offset(parser.rest())) {
                node = node.with_source(source.0..source.1);
            }
            parser.push_node(node);
            Ok(())
        }
        Some(item) => {
            parser.stack.push(item);
            Err(ErrorKind::Extra("\\right".to_string()))
        }
        None => Err(ErrorKind::Extra("\\right".to_string())),
    }
}
