//! The output tree.
//!
//! A [`Node`] maps one-to-one onto a MathML element. Nodes are built by the parser through the
//! constructors in this module, which check that the children of each node have the shape MathML
//! expects, and are never modified once they are part of a finished tree.

use std::{collections::BTreeMap, ops::Range};

use crate::parser::{ErrorKind, InnerResult};

/// The kind of an output node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Row,
    Identifier,
    Number,
    Operator,
    Text,
    Space,
    Fraction,
    Sqrt,
    Root,
    Sub,
    Sup,
    SubSup,
    Under,
    Over,
    UnderOver,
    Table,
    TableRow,
    /// A table row whose first cell is the equation label.
    LabeledRow,
    TableCell,
    Phantom,
    Padded,
    Style,
    Error,
    /// Alternative renderings for display, text, and script styles, in that order.
    Choice,
}

impl NodeKind {
    /// The MathML element name.
    pub const fn tag(self) -> &'static str {
        match self {
            NodeKind::Row => "mrow",
            NodeKind::Identifier => "mi",
            NodeKind::Number => "mn",
            NodeKind::Operator => "mo",
            NodeKind::Text => "mtext",
            NodeKind::Space => "mspace",
            NodeKind::Fraction => "mfrac",
            NodeKind::Sqrt => "msqrt",
            NodeKind::Root => "mroot",
            NodeKind::Sub => "msub",
            NodeKind::Sup => "msup",
            NodeKind::SubSup => "msubsup",
            NodeKind::Under => "munder",
            NodeKind::Over => "mover",
            NodeKind::UnderOver => "munderover",
            NodeKind::Table => "mtable",
            NodeKind::TableRow => "mtr",
            NodeKind::LabeledRow => "mlabeledtr",
            NodeKind::TableCell => "mtd",
            NodeKind::Phantom => "mphantom",
            NodeKind::Padded => "mpadded",
            NodeKind::Style => "mstyle",
            NodeKind::Error => "merror",
            NodeKind::Choice => "mathchoice",
        }
    }

    /// Whether the node holds text instead of children.
    pub const fn is_token(self) -> bool {
        matches!(
            self,
            NodeKind::Identifier
                | NodeKind::Number
                | NodeKind::Operator
                | NodeKind::Text
                | NodeKind::Space
                | NodeKind::Error
        )
    }

    /// Whether the node is built by attaching scripts to a base.
    pub const fn is_scripted(self) -> bool {
        matches!(
            self,
            NodeKind::Sub
                | NodeKind::Sup
                | NodeKind::SubSup
                | NodeKind::Under
                | NodeKind::Over
                | NodeKind::UnderOver
        )
    }

    fn arity(self) -> Option<usize> {
        match self {
            NodeKind::Fraction
            | NodeKind::Root
            | NodeKind::Sub
            | NodeKind::Sup
            | NodeKind::Under
            | NodeKind::Over => Some(2),
            NodeKind::SubSup | NodeKind::UnderOver | NodeKind::Choice => Some(3),
            _ if self.is_token() => Some(0),
            _ => None,
        }
    }
}

/// A finished node of the output tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    kind: NodeKind,
    text: Option<String>,
    attributes: BTreeMap<&'static str, String>,
    children: Vec<Node>,
    source: Option<Range<usize>>,
}

impl Node {
    /// Create a node with children, checking that the children fit the node kind.
    pub fn new(kind: NodeKind, children: Vec<Node>) -> InnerResult<Self> {
        if let Some(arity) = kind.arity() {
            if children.len() != arity {
                return Err(ErrorKind::InvalidChildren {
                    element: kind.tag(),
                    expected: arity,
                    found: children.len(),
                });
            }
        }
        let allowed: &[NodeKind] = match kind {
            NodeKind::Table => &[NodeKind::TableRow, NodeKind::LabeledRow],
            NodeKind::TableRow | NodeKind::LabeledRow => &[NodeKind::TableCell],
            _ => &[],
        };
        if !allowed.is_empty() {
            if let Some(child) = children.iter().find(|child| !allowed.contains(&child.kind)) {
                return Err(ErrorKind::MisplacedChild {
                    element: kind.tag(),
                    child: child.kind.tag(),
                });
            }
        }

        Ok(Self {
            kind,
            text: None,
            attributes: BTreeMap::new(),
            children,
            source: None,
        })
    }

    /// Create a token node (`mi`, `mn`, `mo`, `mtext`) holding `text`.
    pub fn token(kind: NodeKind, text: impl Into<String>) -> Self {
        debug_assert!(kind.is_token());
        Self {
            kind,
            text: Some(text.into()),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            source: None,
        }
    }

    pub fn identifier(text: impl Into<String>) -> Self {
        Self::token(NodeKind::Identifier, text)
    }

    pub fn number(text: impl Into<String>) -> Self {
        Self::token(NodeKind::Number, text)
    }

    pub fn operator(text: impl Into<String>) -> Self {
        Self::token(NodeKind::Operator, text)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::token(NodeKind::Text, text)
    }

    /// An error marker displaying `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Self::token(NodeKind::Error, message)
    }

    /// An `mspace` of the given width.
    pub fn space(width: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Space,
            text: None,
            attributes: BTreeMap::from([("width", width.into())]),
            children: Vec::new(),
            source: None,
        }
    }

    /// A row of nodes. A row never fails to build.
    pub fn row(children: Vec<Node>) -> Self {
        Self {
            kind: NodeKind::Row,
            text: None,
            attributes: BTreeMap::new(),
            children,
            source: None,
        }
    }

    /// Collapse a list of nodes into a single node, wrapping them in a row unless there is
    /// exactly one.
    pub fn wrap(mut children: Vec<Node>) -> Self {
        if children.len() == 1 {
            if let Some(node) = children.pop() {
                return node;
            }
        }
        Self::row(children)
    }

    pub fn with_attribute(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.insert(name, value.into());
        self
    }

    pub fn with_source(mut self, source: Range<usize>) -> Self {
        self.source = Some(source);
        self
    }

    pub(crate) fn set_source_if_missing(&mut self, source: Range<usize>) {
        if self.source.is_none() {
            self.source = Some(source);
        }
    }

    pub(crate) fn set_attribute(&mut self, name: &'static str, value: impl Into<String>) {
        self.attributes.insert(name, value.into());
    }

    pub(crate) fn into_children(self) -> Vec<Node> {
        self.children
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The text content of a token node.
    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Attributes, in a stable order.
    pub fn attributes(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.attributes.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Byte range of the top-level source this node was parsed from, if any.
    pub fn source(&self) -> Option<Range<usize>> {
        self.source.clone()
    }

    pub fn is_error(&self) -> bool {
        self.kind == NodeKind::Error
    }

    /// Visit this node and all of its descendants in document order.
    pub fn walk<'n>(&'n self, visit: &mut impl FnMut(&'n Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Collect every error node in the tree.
    pub fn errors(&self) -> Vec<&Node> {
        let mut errors = Vec::new();
        self.walk(&mut |node| {
            if node.is_error() {
                errors.push(node);
            }
        });
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::{Node, NodeKind};
    use crate::parser::ErrorKind;

    #[test]
    fn fraction_needs_two_children() {
        let err = Node::new(NodeKind::Fraction, vec![Node::number("1")]).unwrap_err();
        assert!(matches!(
            err,
            ErrorKind::InvalidChildren {
                element: "mfrac",
                expected: 2,
                found: 1
            }
        ));
        Node::new(
            NodeKind::Fraction,
            vec![Node::number("1"), Node::number("2")],
        )
        .unwrap();
    }

    #[test]
    fn table_rows_only() {
        let err = Node::new(NodeKind::Table, vec![Node::identifier("x")]).unwrap_err();
        assert!(matches!(err, ErrorKind::MisplacedChild { element: "mtable", child: "mi" }));

        let cell = Node::new(NodeKind::TableCell, vec![Node::identifier("x")]).unwrap();
        let row = Node::new(NodeKind::TableRow, vec![cell]).unwrap();
        let table = Node::new(NodeKind::Table, vec![row]).unwrap();
        assert_eq!(table.children()[0].children()[0].kind(), NodeKind::TableCell);
    }

    #[test]
    fn wrap_single_child() {
        let node = Node::wrap(vec![Node::identifier("x")]);
        assert_eq!(node.kind(), NodeKind::Identifier);
        let node = Node::wrap(vec![Node::identifier("x"), Node::identifier("y")]);
        assert_eq!(node.kind(), NodeKind::Row);
        assert_eq!(Node::wrap(Vec::new()).children().len(), 0);
    }

    #[test]
    fn collect_errors() {
        let tree = Node::row(vec![
            Node::identifier("x"),
            Node::row(vec![Node::error("bad")]),
        ]);
        let errors = tree.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].text_content(), Some("bad"));
    }
}
