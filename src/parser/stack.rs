//! The parse stack.
//!
//! Every construct that is still open (a brace group, a `\left ... \right` pair, an environment,
//! a style switch) is an [`Item`] on the stack. Each item collects the nodes parsed inside of it
//! in a [`Row`], which also keeps track of a base waiting for its sub- and superscripts. The
//! bottom of the stack is the top-level row of the expression, which is never popped.
use crate::{
    attribute::Font,
    node::{Node, NodeKind},
};

use super::{columns::Alignment, ErrorKind, InnerResult, Parser};

/// Where the scripts of a base are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptPosition {
    /// To the right of the base (`msub`, `msup`).
    Right,
    /// Above and below the base (`munder`, `mover`), forced with `\limits`.
    AboveBelow,
    /// Above and below in display style, to the right otherwise. Used for operators with
    /// movable limits, such as `\sum`.
    Movable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Sub,
    Sup,
}

const PRIMES: [&str; 4] = ["′", "″", "‴", "⁗"];

/// A base and the scripts attached to it so far.
#[derive(Debug)]
struct Scripts {
    base: Node,
    sub: Option<Node>,
    sup: Option<Node>,
    primes: usize,
    position: ScriptPosition,
    /// The script whose argument is expected next.
    awaiting: Option<Slot>,
}

impl Scripts {
    fn new(base: Node, position: ScriptPosition) -> Self {
        Self {
            base,
            sub: None,
            sup: None,
            primes: 0,
            position,
            awaiting: None,
        }
    }

    fn is_set(&self, slot: Slot) -> bool {
        match slot {
            Slot::Sub => self.sub.is_some(),
            Slot::Sup => self.sup.is_some() || self.primes > 0,
        }
    }

    fn fill(&mut self, slot: Slot, node: Node) {
        match slot {
            Slot::Sub => self.sub = Some(node),
            Slot::Sup => self.sup = Some(node),
        }
    }

    fn into_node(self) -> Node {
        let Scripts {
            mut base,
            sub,
            sup,
            primes,
            position,
            ..
        } = self;

        let sup = match (primes, sup) {
            (0, sup) => sup,
            (n, sup) => {
                let prime = Node::operator(PRIMES[n.min(PRIMES.len()) - 1]);
                Some(match sup {
                    Some(sup) => Node::row(vec![prime, sup]),
                    None => prime,
                })
            }
        };

        let source = [Some(&base), sub.as_ref(), sup.as_ref()]
            .into_iter()
            .flatten()
            .filter_map(Node::source)
            .reduce(|a, b| a.start.min(b.start)..a.end.max(b.end));

        let over_under = match position {
            ScriptPosition::Right => false,
            ScriptPosition::Movable => true,
            ScriptPosition::AboveBelow => {
                if base.kind() == NodeKind::Operator {
                    base.set_attribute("movablelimits", "false");
                }
                true
            }
        };
        let (kind, children) = match (sub, sup) {
            (Some(sub), Some(sup)) => (
                if over_under {
                    NodeKind::UnderOver
                } else {
                    NodeKind::SubSup
                },
                vec![base, sub, sup],
            ),
            (Some(sub), None) => (
                if over_under {
                    NodeKind::Under
                } else {
                    NodeKind::Sub
                },
                vec![base, sub],
            ),
            (None, Some(sup)) => (
                if over_under {
                    NodeKind::Over
                } else {
                    NodeKind::Sup
                },
                vec![base, sup],
            ),
            (None, None) => return base,
        };
        let node = Node::new(kind, children).unwrap_or_else(|e| Node::error(e.to_string()));
        match source {
            Some(source) => node.with_source(source),
            None => node,
        }
    }
}

/// The nodes of an open construct.
#[derive(Debug, Default)]
pub(crate) struct Row {
    nodes: Vec<Node>,
    scripts: Option<Scripts>,
    /// Script position requested by `\limits` or `\nolimits` for the last node.
    limits: Option<ScriptPosition>,
}

impl Row {
    pub fn push(&mut self, node: Node) {
        if let Some(scripts) = &mut self.scripts {
            if let Some(slot) = scripts.awaiting.take() {
                scripts.fill(slot, node);
                return;
            }
        }
        self.flush();
        self.limits = None;
        self.nodes.push(node);
    }

    fn flush(&mut self) {
        if let Some(scripts) = self.scripts.take() {
            self.nodes.push(scripts.into_node());
        }
    }

    /// Whether a `^` or `_` is still waiting for its argument.
    pub fn awaiting_script(&self) -> bool {
        self.scripts
            .as_ref()
            .is_some_and(|scripts| scripts.awaiting.is_some())
    }

    /// The base that scripts would attach to, taken from the row.
    fn take_base(&mut self) -> Scripts {
        if let Some(scripts) = self.scripts.take() {
            return scripts;
        }
        let base = self.nodes.pop().unwrap_or_else(|| Node::row(Vec::new()));
        let position = self.limits.take().unwrap_or_else(|| default_position(&base));
        Scripts::new(base, position)
    }

    pub fn begin_script(&mut self, slot: Slot) -> InnerResult<()> {
        if self.awaiting_script() {
            return Err(ErrorKind::MissingScript);
        }
        let mut scripts = self.take_base();
        if scripts.is_set(slot) {
            self.scripts = Some(scripts);
            return Err(match slot {
                Slot::Sub => ErrorKind::DoubleSubscripts,
                Slot::Sup => ErrorKind::DoubleExponent,
            });
        }
        scripts.awaiting = Some(slot);
        self.scripts = Some(scripts);
        Ok(())
    }

    pub fn add_prime(&mut self, count: usize) -> InnerResult<()> {
        if self.awaiting_script() {
            return Err(ErrorKind::MissingScript);
        }
        let mut scripts = self.take_base();
        let double = scripts.sup.is_some();
        if !double {
            scripts.primes += count;
        }
        self.scripts = Some(scripts);
        if double {
            return Err(ErrorKind::DoubleExponent);
        }
        Ok(())
    }

    /// Apply `\limits` or `\nolimits` to the last node.
    pub fn set_limits(&mut self, position: ScriptPosition, name: &str) -> InnerResult<()> {
        if let Some(scripts) = &mut self.scripts {
            if scripts.base.kind() == NodeKind::Operator {
                scripts.position = position;
                return Ok(());
            }
        } else if self
            .nodes
            .last()
            .is_some_and(|node| node.kind() == NodeKind::Operator)
        {
            self.limits = Some(position);
            return Ok(());
        }
        Err(ErrorKind::LimitsOnlyOnOperators(name.to_string()))
    }

    pub fn last(&self) -> Option<&Node> {
        match &self.scripts {
            Some(_) => None,
            None => self.nodes.last(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.scripts.is_none()
    }

    pub fn into_nodes(mut self) -> Vec<Node> {
        self.flush();
        self.nodes
    }
}

fn default_position(base: &Node) -> ScriptPosition {
    if base.kind() == NodeKind::Operator && base.attribute("movablelimits") == Some("true") {
        ScriptPosition::Movable
    } else {
        ScriptPosition::Right
    }
}

/// Builds the node of an environment from the nodes parsed inside of it.
pub type EnvironmentFinish = for<'b> fn(&mut Parser<'b>, bool, Vec<Node>) -> InnerResult<Node>;

#[derive(Debug)]
pub(crate) enum ItemKind<'a> {
    Start,
    /// A `{` group.
    Open,
    /// A `\left` group, holding the glyph of its opening delimiter.
    Left { open: &'static str },
    /// A style switch (`\displaystyle`, `\color`), closed with the enclosing group.
    Style {
        attributes: Vec<(&'static str, String)>,
    },
    Array(Box<ArrayState<'a>>),
    Environment {
        name: &'a str,
        star: bool,
        finish: EnvironmentFinish,
    },
}

#[derive(Debug)]
pub(crate) struct Item<'a> {
    pub kind: ItemKind<'a>,
    pub row: Row,
    /// Offset of the construct in the top-level input.
    pub start: Option<usize>,
    /// The font in effect when the item was opened, restored when it is closed.
    pub font: Option<Font>,
}

impl<'a> Item<'a> {
    pub fn new(kind: ItemKind<'a>, start: Option<usize>, font: Option<Font>) -> Self {
        Self {
            kind,
            row: Row::default(),
            start,
            font,
        }
    }
}

/// The parse stack. The bottom item is the top-level row of the expression.
#[derive(Debug)]
pub(crate) struct Stack<'a> {
    base: Item<'a>,
    items: Vec<Item<'a>>,
}

impl<'a> Stack<'a> {
    pub fn new() -> Self {
        Self {
            base: Item::new(ItemKind::Start, Some(0), None),
            items: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, item: Item<'a>) {
        self.items.push(item);
    }

    /// Pop the top item. The bottom item is never popped.
    pub fn pop(&mut self) -> Option<Item<'a>> {
        self.items.pop()
    }

    pub fn top(&self) -> &Item<'a> {
        self.items.last().unwrap_or(&self.base)
    }

    pub fn top_mut(&mut self) -> &mut Item<'a> {
        self.items.last_mut().unwrap_or(&mut self.base)
    }

    /// The innermost array, if it is the top item.
    pub fn array_mut(&mut self) -> Option<&mut ArrayState<'a>> {
        match &mut self.top_mut().kind {
            ItemKind::Array(state) => Some(state),
            _ => None,
        }
    }
}

/// A column of an array, with its templates already parsed.
#[derive(Debug, Clone)]
pub(crate) enum LayoutColumn {
    Cell {
        align: Alignment,
        width: Option<String>,
        before: Option<Node>,
        after: Option<Node>,
    },
    Separator(Node),
    Rule(&'static str),
}

/// The state of an array-like environment.
#[derive(Debug)]
pub(crate) struct ArrayState<'a> {
    pub name: &'a str,
    pub layout: Vec<LayoutColumn>,
    /// Alignments cycled through when there is no layout, or more cells than it describes.
    pub align_cycle: &'static [Alignment],
    rows: Vec<Vec<Vec<Node>>>,
    cells: Vec<Vec<Node>>,
    /// Row boundaries with a `\hline`, 0 being above the first row.
    hlines: Vec<usize>,
    pub fences: Option<(&'static str, &'static str)>,
    pub attributes: Vec<(&'static str, String)>,
    /// Attributes of an `mstyle` wrapping the table.
    pub style: Vec<(&'static str, String)>,
}

impl<'a> ArrayState<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            layout: Vec::new(),
            align_cycle: &[Alignment::Center],
            rows: Vec::new(),
            cells: Vec::new(),
            hlines: Vec::new(),
            fences: None,
            attributes: Vec::new(),
            style: Vec::new(),
        }
    }

    pub fn end_cell(&mut self, nodes: Vec<Node>) {
        self.cells.push(nodes);
    }

    pub fn end_row(&mut self) {
        self.rows.push(std::mem::take(&mut self.cells));
    }

    /// Finish the last row. A trailing empty row, left by a final `\\`, is dropped.
    pub fn end_last_row(&mut self, nodes: Vec<Node>) {
        if self.cells.is_empty() && nodes.is_empty() {
            return;
        }
        self.end_cell(nodes);
        self.end_row();
    }

    /// Whether nothing was parsed in the current row yet.
    pub fn at_row_start(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn hline(&mut self) {
        self.hlines.push(self.rows.len());
    }

    fn align_at(&self, column: usize, layout_align: Option<Alignment>) -> Alignment {
        layout_align.unwrap_or_else(|| {
            self.align_cycle
                .get(column % self.align_cycle.len().max(1))
                .copied()
                .unwrap_or(Alignment::Center)
        })
    }

    pub fn finish(self) -> InnerResult<Node> {
        let row_count = self.rows.len();
        let mut rows = Vec::with_capacity(row_count);
        let mut aligns: Vec<Alignment> = Vec::new();
        let mut widths: Vec<Option<String>> = Vec::new();
        let mut column_lines: Vec<&'static str> = Vec::new();
        let mut frame = None;

        for row in &self.rows {
            let mut user_cells = row.iter();
            let mut cells = Vec::new();
            let mut row_aligns = Vec::new();
            let mut row_widths = Vec::new();
            let mut lines = Vec::new();
            for column in &self.layout {
                match column {
                    LayoutColumn::Cell {
                        align,
                        width,
                        before,
                        after,
                    } => {
                        let mut content = Vec::new();
                        content.extend(before.clone());
                        content.extend(user_cells.next().cloned().unwrap_or_default());
                        content.extend(after.clone());
                        cells.push(Node::new(NodeKind::TableCell, content)?);
                        row_aligns.push(Some(*align));
                        row_widths.push(width.clone());
                        lines.push("none");
                    }
                    LayoutColumn::Separator(node) => {
                        cells.push(Node::new(NodeKind::TableCell, vec![node.clone()])?);
                        row_aligns.push(Some(Alignment::Center));
                        row_widths.push(None);
                        lines.push("none");
                    }
                    LayoutColumn::Rule(style) => match lines.last_mut() {
                        Some(line) => *line = style,
                        None => frame = Some(*style),
                    },
                }
            }
            // A rule after the last column frames the table.
            if let Some(LayoutColumn::Rule(style)) = self.layout.last() {
                frame = Some(*style);
            }
            for cell in user_cells {
                cells.push(Node::new(NodeKind::TableCell, cell.clone())?);
                row_aligns.push(None);
                row_widths.push(None);
                lines.push("none");
            }

            if row_aligns.len() > aligns.len() {
                for column in aligns.len()..row_aligns.len() {
                    aligns.push(self.align_at(column, row_aligns[column]));
                    widths.push(row_widths[column].clone());
                }
                column_lines = lines;
            }
            rows.push(Node::new(NodeKind::TableRow, cells)?);
        }

        let mut table = Node::new(NodeKind::Table, rows)?;
        if !aligns.is_empty() {
            let value = aligns.iter().map(|a| a.as_str()).collect::<Vec<_>>().join(" ");
            table.set_attribute("columnalign", value);
        }
        column_lines.pop();
        if column_lines.iter().any(|line| *line != "none") {
            table.set_attribute("columnlines", column_lines.join(" "));
        }
        if widths.iter().any(Option::is_some) {
            let value = widths
                .iter()
                .map(|w| w.as_deref().unwrap_or("auto"))
                .collect::<Vec<_>>()
                .join(" ");
            table.set_attribute("columnwidth", value);
        }
        if row_count > 1 && self.hlines.iter().any(|&line| line > 0 && line < row_count) {
            let value = (1..row_count)
                .map(|line| {
                    if self.hlines.contains(&line) {
                        "solid"
                    } else {
                        "none"
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            table.set_attribute("rowlines", value);
        }
        if self.hlines.contains(&0) || self.hlines.contains(&row_count) {
            frame = frame.or(Some("solid"));
        }
        if let Some(frame) = frame {
            table.set_attribute("frame", frame);
        }
        for (name, value) in self.attributes {
            table.set_attribute(name, value);
        }

        let mut node = match self.fences {
            Some((open, close)) => {
                let mut children = Vec::with_capacity(3);
                if !open.is_empty() {
                    children.push(super::delimiters::fence(open, super::delimiters::Role::Open, true));
                }
                children.push(table);
                if !close.is_empty() {
                    children.push(super::delimiters::fence(close, super::delimiters::Role::Close, true));
                }
                Node::row(children)
            }
            None => table,
        };
        if !self.style.is_empty() {
            node = Node::new(NodeKind::Style, vec![node])?;
            for (name, value) in self.style {
                node.set_attribute(name, value);
            }
        }
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::{ArrayState, LayoutColumn, Row, ScriptPosition, Slot};
    use crate::{
        node::{Node, NodeKind},
        parser::{columns::Alignment, ErrorKind},
    };

    #[test]
    fn scripts_attach_to_last_node() {
        let mut row = Row::default();
        row.push(Node::identifier("a"));
        row.push(Node::identifier("x"));
        row.begin_script(Slot::Sup).unwrap();
        assert!(row.awaiting_script());
        row.push(Node::number("2"));
        row.begin_script(Slot::Sub).unwrap();
        row.push(Node::identifier("i"));
        row.push(Node::identifier("y"));

        let nodes = row.into_nodes();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[1].kind(), NodeKind::SubSup);
        assert_eq!(nodes[1].children()[1].text_content(), Some("i"));
        assert_eq!(nodes[1].children()[2].text_content(), Some("2"));
    }

    #[test]
    fn double_scripts() {
        let mut row = Row::default();
        row.push(Node::identifier("a"));
        row.begin_script(Slot::Sup).unwrap();
        row.push(Node::identifier("b"));
        assert_eq!(row.begin_script(Slot::Sup), Err(ErrorKind::DoubleExponent));
        assert!(!row.awaiting_script());

        let mut row = Row::default();
        row.begin_script(Slot::Sub).unwrap();
        assert_eq!(row.begin_script(Slot::Sup), Err(ErrorKind::MissingScript));
    }

    #[test]
    fn primes() {
        let mut row = Row::default();
        row.push(Node::identifier("f"));
        row.add_prime(2).unwrap();
        row.begin_script(Slot::Sup).unwrap();
        row.push(Node::number("2"));
        let nodes = row.into_nodes();
        let sup = &nodes[0].children()[1];
        assert_eq!(nodes[0].kind(), NodeKind::Sup);
        assert_eq!(sup.kind(), NodeKind::Row);
        assert_eq!(sup.children()[0].text_content(), Some("″"));
    }

    #[test]
    fn limits() {
        let mut row = Row::default();
        row.push(Node::operator("∑").with_attribute("movablelimits", "true"));
        row.begin_script(Slot::Sub).unwrap();
        row.push(Node::identifier("i"));
        assert_eq!(row.into_nodes()[0].kind(), NodeKind::Under);

        let mut row = Row::default();
        row.push(Node::operator("∫"));
        row.set_limits(ScriptPosition::AboveBelow, "\\limits").unwrap();
        row.begin_script(Slot::Sup).unwrap();
        row.push(Node::number("1"));
        let nodes = row.into_nodes();
        assert_eq!(nodes[0].kind(), NodeKind::Over);
        assert_eq!(nodes[0].children()[0].attribute("movablelimits"), Some("false"));

        let mut row = Row::default();
        row.push(Node::identifier("x"));
        assert!(matches!(
            row.set_limits(ScriptPosition::AboveBelow, "\\limits"),
            Err(ErrorKind::LimitsOnlyOnOperators(_))
        ));
    }

    #[test]
    fn array_layout() {
        let mut state = ArrayState::new("array");
        state.layout = vec![
            LayoutColumn::Cell {
                align: Alignment::Left,
                width: None,
                before: None,
                after: None,
            },
            LayoutColumn::Rule("solid"),
            LayoutColumn::Separator(Node::operator(",")),
            LayoutColumn::Cell {
                align: Alignment::Right,
                width: None,
                before: None,
                after: None,
            },
        ];
        state.end_cell(vec![Node::identifier("a")]);
        state.end_last_row(vec![Node::identifier("b")]);
        state.hline();

        let table = state.finish().unwrap();
        assert_eq!(table.kind(), NodeKind::Table);
        assert_eq!(table.children()[0].children().len(), 3);
        assert_eq!(table.attribute("columnalign"), Some("left center right"));
        assert_eq!(table.attribute("columnlines"), Some("solid none"));
        assert_eq!(table.attribute("frame"), Some("solid"));
    }

    #[test]
    fn trailing_empty_row_is_dropped() {
        let mut state = ArrayState::new("matrix");
        state.end_cell(vec![Node::number("1")]);
        state.end_row();
        state.end_last_row(Vec::new());
        let table = state.finish().unwrap();
        assert_eq!(table.children().len(), 1);
    }
}
