//! Contains the [`Parser`], which transforms input `LaTeX` into a tree of [`Node`]s.
//!
//! The parser is a stack machine. Characters and control sequences are read one at a time and
//! resolved through the [`Registry`](crate::registry::Registry) of the configuration; handlers
//! receive the parser and either push finished nodes, or open a construct on the stack that a
//! later token closes (`}`, `\right`, `\end`).
//!
//! Errors are contained where they happen: an error in a handler is recorded as a
//! [`Diagnostic`] and replaced by an error node, and parsing continues after it. Only errors
//! whose [`Severity`] is fatal (an unclosed group, a runaway macro) abort the expression, in
//! which case the whole output is a single error node. An undefined control sequence also
//! aborts the expression, unless it appears in an argument parsed on its own, such as the
//! numerator of `\frac` or a cell of a generated matrix.
pub mod columns;
pub mod delimiters;
mod error;
pub(crate) mod lex;
pub(crate) mod macros;
pub(crate) mod stack;
mod storage;
pub mod tables;

use std::{
    cell::{RefCell, RefMut},
    ops::Range,
};

use log::{debug, trace};

use crate::{
    attribute::Font,
    config::ParserConfig,
    extension::Configuration,
    node::{Node, NodeKind},
    references::ReferenceTracker,
    registry::{Command, Handler, Invocation, SymbolClass},
};

pub use error::{Diagnostic, ErrorKind, Grouping, InnerResult, Severity};
pub use storage::Storage;

use self::{
    macros::MacroContext,
    stack::{Item, ItemKind, Row, Slot, Stack},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token<'a> {
    ControlSequence(&'a str),
    Character(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Argument<'a> {
    Token(Token<'a>),
    Group(&'a str),
}

/// The result of parsing an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    /// The root of the tree. When a fatal error occurred, this is a single error node.
    pub root: Node,
    /// Every problem found, in the order it was found. Warnings about the configuration come
    /// first, and a fatal diagnostic, if any, comes last.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    /// Whether the expression was abandoned because of a fatal error.
    pub fn is_fatal(&self) -> bool {
        self.diagnostics
            .last()
            .is_some_and(|d| d.severity == Severity::Fatal)
    }
}

/// State shared by the parser of an expression and the parsers it starts for arguments.
#[derive(Clone, Copy)]
pub(crate) struct ParseContext<'a> {
    configuration: &'a Configuration,
    storage: &'a Storage,
    macros: &'a RefCell<MacroContext<'a>>,
    references: &'a RefCell<dyn ReferenceTracker>,
    diagnostics: &'a RefCell<Vec<Diagnostic>>,
    /// The top-level input, which spans are computed against.
    root: &'a str,
    depth: usize,
}

/// Parse a whole expression. See [`Configuration::parse_with`].
pub(crate) fn parse_expression(
    configuration: &Configuration,
    source: &str,
    references: &RefCell<dyn ReferenceTracker>,
) -> ParseOutput {
    let storage = Storage::new();
    let macros = RefCell::new(MacroContext::new(configuration.config.max_macro_expansions));
    let diagnostics = RefCell::new(Vec::new());
    let ctx = ParseContext {
        configuration,
        storage: &storage,
        macros: &macros,
        references,
        diagnostics: &diagnostics,
        root: source,
        depth: 0,
    };
    preload_macros(ctx);

    let mut parser = Parser::new(ctx, source, None);
    let root = match parser.run() {
        Ok(root) => root,
        Err(error) => {
            let diagnostic = Diagnostic::new(
                &error,
                Severity::Fatal,
                parser.span_from(parser.token_start),
                &configuration.config.messages,
            );
            debug!("{diagnostic}");
            let root = Node::error(diagnostic.message.clone());
            diagnostics.borrow_mut().push(diagnostic);
            root
        }
    };
    ParseOutput {
        root,
        diagnostics: diagnostics.take(),
    }
}

fn preload_macros(ctx: ParseContext<'_>) {
    let config: &ParserConfig = &ctx.configuration.config;
    for (name, replacement) in &config.macros {
        let parameters = replacement
            .as_bytes()
            .windows(2)
            .filter(|pair| pair[0] == b'#' && pair[1].is_ascii_digit())
            .map(|pair| pair[1] - b'0')
            .max()
            .unwrap_or(0);
        let result = ctx
            .macros
            .borrow_mut()
            .insert_command(name, parameters, None, replacement);
        if let Err(error) = result {
            let diagnostic = Diagnostic::new(&error, Severity::Local, None, &config.messages);
            debug!("in predefined macro `\\{name}`: {diagnostic}");
            ctx.diagnostics.borrow_mut().push(diagnostic);
        }
    }
}

/// The parser of one expression, or of one argument of it.
///
/// Handlers registered in extension modules receive the parser, and use its methods to read
/// their arguments and push the nodes they build.
pub struct Parser<'a> {
    pub(crate) ctx: ParseContext<'a>,
    /// What is left to parse.
    input: &'a str,
    pub(crate) stack: Stack<'a>,
    font: Option<Font>,
    /// Where the token being handled started.
    token_start: &'a str,
}

impl<'a> Parser<'a> {
    fn new(ctx: ParseContext<'a>, input: &'a str, font: Option<Font>) -> Self {
        Self {
            ctx,
            input,
            stack: Stack::new(),
            font,
            token_start: input,
        }
    }

    fn run(&mut self) -> InnerResult<Node> {
        while self.step()? {}
        self.finish()
    }

    /// Handle the next token. Returns false at the end of the input.
    fn step(&mut self) -> InnerResult<bool> {
        self.input = self.input.trim_start();
        self.token_start = self.input;
        let Some(c) = self.input.chars().next() else {
            return Ok(false);
        };
        self.input = &self.input[c.len_utf8()..];

        let result = match c {
            '%' => {
                self.input = self.input.split_once('\n').map_or("", |(_, rest)| rest);
                Ok(())
            }
            '{' => {
                self.begin(ItemKind::Open);
                Ok(())
            }
            '}' => self.close_group(),
            '^' => self.stack.top_mut().row.begin_script(Slot::Sup),
            '_' => self.stack.top_mut().row.begin_script(Slot::Sub),
            '\\' => self.control_sequence(),
            c => self.character(c),
        };
        if let Err(error) = result {
            self.recover(error)?;
        }
        Ok(true)
    }

    fn control_sequence(&mut self) -> InnerResult<()> {
        let name = lex::rhs_control_sequence(&mut self.input)?;
        let storage = self.ctx.storage;
        let expansion = self
            .ctx
            .macros
            .borrow_mut()
            .try_expand_in(name, self.input, &storage.0);
        if let Some(expanded) = expansion {
            trace!("expanded user macro `\\{name}`");
            self.input = expanded?;
            return Ok(());
        }

        let configuration = self.ctx.configuration;
        let registry = configuration.registry();
        if let Some(handler) = registry.lookup(SymbolClass::Macro, name) {
            return self.dispatch(name, *handler);
        }
        let start = self.token_start;
        let source = &start[..name.len() + 1];
        if let Some(glyph) = registry.delimiter(source) {
            self.push_node(Node::operator(glyph).with_attribute("stretchy", "false"));
            return Ok(());
        }
        if let Some(fallback) = registry.fallback(SymbolClass::Macro) {
            return fallback(self, source);
        }
        Err(ErrorKind::UndefinedControlSequence(source.to_string()))
    }

    fn character(&mut self, c: char) -> InnerResult<()> {
        let start = self.token_start;
        let text = &start[..c.len_utf8()];
        let class = SymbolClass::of_char(c);
        let configuration = self.ctx.configuration;
        let registry = configuration.registry();
        if let Some(handler) = registry.lookup(class, text) {
            return self.dispatch(text, *handler);
        }
        if let Some(fallback) = registry.fallback(class) {
            return fallback(self, text);
        }
        self.push_node(Node::text(text));
        Ok(())
    }

    fn dispatch(&mut self, name: &'a str, handler: Handler) -> InnerResult<()> {
        trace!("dispatching `{name}`");
        match handler {
            Handler::Symbol(symbol) => {
                let node = symbol.to_node();
                self.push_token(node);
                Ok(())
            }
            Handler::Delimiter(glyph) => {
                self.push_node(Node::operator(glyph).with_attribute("stretchy", "false"));
                Ok(())
            }
            Handler::Macro(command) | Handler::Environment(command) => self.invoke(name, command),
            Handler::Character(func) => func(self, name),
        }
    }

    /// Run the handler of a macro or environment.
    pub(crate) fn invoke(&mut self, name: &'a str, command: Command) -> InnerResult<()> {
        let star = command.accepts_star && self.consume("*");
        (command.func)(
            self,
            Invocation {
                name,
                star,
                params: command.params,
            },
        )
    }

    /// Turn a non-fatal error into a diagnostic and an error node, or give it back if it must
    /// abort the expression.
    fn recover(&mut self, error: ErrorKind) -> InnerResult<()> {
        if self.aborts(&error) || self.is_fatal(&error) {
            return Err(error);
        }
        self.report(error);
        Ok(())
    }

    /// Whether an error abandons the expression this parser is working on. An undefined control
    /// sequence is fatal in the top-level expression, and local inside of an argument parsed
    /// with [`Parser::sub_parse`].
    fn is_fatal(&self, error: &ErrorKind) -> bool {
        match error {
            ErrorKind::UndefinedControlSequence(_) => self.ctx.depth == 0,
            error => error.severity() == Severity::Fatal,
        }
    }

    /// Whether an error aborts every parser up to the top-level one.
    fn aborts(&self, error: &ErrorKind) -> bool {
        match error {
            ErrorKind::MaxNesting | ErrorKind::MaxMacroSubstitutions => true,
            ErrorKind::UndefinedControlSequence(_)
            | ErrorKind::UnknownEnvironment(_)
            | ErrorKind::InvalidOption(_)
            | ErrorKind::InvalidValue(_) => self.ctx.configuration.config.strict,
            _ => false,
        }
    }

    /// Record a local diagnostic, returning its message.
    fn record(&self, error: &ErrorKind, span: Option<Range<usize>>) -> String {
        let diagnostic = Diagnostic::new(
            error,
            Severity::Local,
            span,
            &self.ctx.configuration.config.messages,
        );
        debug!("{diagnostic}");
        let message = diagnostic.message.clone();
        self.ctx.diagnostics.borrow_mut().push(diagnostic);
        message
    }

    /// Report a local error at the current token, and put an error node in its place.
    pub fn report(&mut self, error: ErrorKind) {
        let span = self.span_from(self.token_start);
        let message = self.record(&error, span);
        self.push_node(Node::error(message));
    }

    /// Push a finished node at the current position.
    ///
    /// If the node has no source span, it is given the span of the current token, including
    /// the arguments read so far.
    pub fn push_node(&mut self, mut node: Node) {
        if let Some(span) = self.span_from(self.token_start) {
            node.set_source_if_missing(span);
        }
        self.stack.top_mut().row.push(node);
    }

    /// Push a token node, in the current font if it is an identifier.
    pub fn push_token(&mut self, mut node: Node) {
        if let Some(font) = self.font {
            if node.kind() == NodeKind::Identifier && node.attribute("mathvariant").is_none() {
                node.set_attribute("mathvariant", font.mathvariant());
            }
        }
        self.push_node(node);
    }

    /// Open a construct on the stack.
    pub(crate) fn begin(&mut self, kind: ItemKind<'a>) {
        let start = self.offset(self.token_start);
        self.stack.push(Item::new(kind, start, self.font));
    }

    /// Close the style switches of the current group.
    pub(crate) fn close_styles(&mut self) {
        while let ItemKind::Style { .. } = self.stack.top().kind {
            let Some(Item {
                kind: ItemKind::Style { attributes },
                row,
                start,
                font,
            }) = self.stack.pop()
            else {
                break;
            };
            self.font = font;
            let nodes = self.finish_row(row);
            let mut node =
                Node::new(NodeKind::Style, nodes).unwrap_or_else(|e| Node::error(e.to_string()));
            for (name, value) in attributes {
                node.set_attribute(name, value);
            }
            if let Some(source) = start.zip(self.offset(self.token_start)) {
                node.set_source_if_missing(source.0..source.1);
            }
            self.stack.top_mut().row.push(node);
        }
    }

    /// The nodes of a finished row. A script left without its argument is reported.
    pub(crate) fn finish_row(&mut self, mut row: Row) -> Vec<Node> {
        if row.awaiting_script() {
            let message = self.record(&ErrorKind::MissingScript, self.span_from(self.token_start));
            row.push(Node::error(message));
        }
        row.into_nodes()
    }

    fn close_group(&mut self) -> InnerResult<()> {
        self.close_styles();
        match &self.stack.top().kind {
            ItemKind::Open => {}
            ItemKind::Left { .. } => return Err(ErrorKind::UnclosedGroup(Grouping::LeftRight)),
            ItemKind::Array(state) => {
                return Err(ErrorKind::UnclosedGroup(Grouping::Environment(
                    state.name.to_string(),
                )))
            }
            ItemKind::Environment { name, .. } => {
                return Err(ErrorKind::UnclosedGroup(Grouping::Environment(
                    name.to_string(),
                )))
            }
            ItemKind::Start | ItemKind::Style { .. } => {
                return Err(ErrorKind::ExtraCloseMissingOpen)
            }
        }
        let Some(item) = self.stack.pop() else {
            return Err(ErrorKind::ExtraCloseMissingOpen);
        };
        self.font = item.font;
        let nodes = self.finish_row(item.row);
        let mut node = Node::wrap(nodes);
        if let Some(source) = item.start.zip(self.offset(self.input)) {
            node.set_source_if_missing(source.0..source.1);
        }
        self.stack.top_mut().row.push(node);
        Ok(())
    }

    /// Close the environment at the top of the stack, which must be named `name`.
    pub(crate) fn close_environment(&mut self, name: &str) -> InnerResult<()> {
        self.close_styles();
        let open = match &self.stack.top().kind {
            ItemKind::Array(state) => state.name,
            ItemKind::Environment { name: open, .. } => *open,
            _ => return Err(ErrorKind::Extra(format!("\\end{{{name}}}"))),
        };
        if open != name {
            return Err(ErrorKind::EnvironmentMismatch {
                begin: open.to_string(),
                end: name.to_string(),
            });
        }
        let Some(item) = self.stack.pop() else {
            return Err(ErrorKind::Extra(format!("\\end{{{name}}}")));
        };
        self.font = item.font;
        let node = match item.kind {
            ItemKind::Array(mut state) => {
                let nodes = self.finish_row(item.row);
                state.end_last_row(nodes);
                state.finish()?
            }
            ItemKind::Environment { star, finish, .. } => {
                let nodes = self.finish_row(item.row);
                finish(self, star, nodes)?
            }
            _ => return Err(ErrorKind::Extra(format!("\\end{{{name}}}"))),
        };
        let node = match item.start.zip(self.offset(self.input)) {
            Some((start, end)) => node.with_source(start..end),
            None => node,
        };
        self.stack.top_mut().row.push(node);
        Ok(())
    }

    /// End the current cell of an array (`&`).
    pub(crate) fn end_cell(&mut self) -> InnerResult<()> {
        self.close_styles();
        if self.stack.array_mut().is_none() {
            return Err(ErrorKind::Misplaced("&".to_string()));
        }
        let row = std::mem::take(&mut self.stack.top_mut().row);
        let nodes = self.finish_row(row);
        if let Some(state) = self.stack.array_mut() {
            state.end_cell(nodes);
        }
        Ok(())
    }

    /// End the current row of an array (`\\`).
    pub(crate) fn end_row(&mut self) -> InnerResult<()> {
        self.close_styles();
        if self.stack.array_mut().is_none() {
            return Err(ErrorKind::Misplaced("\\\\".to_string()));
        }
        let row = std::mem::take(&mut self.stack.top_mut().row);
        let nodes = self.finish_row(row);
        if let Some(state) = self.stack.array_mut() {
            state.end_cell(nodes);
            state.end_row();
        }
        Ok(())
    }

    /// Draw a line above the current row of an array (`\hline`).
    pub(crate) fn hline(&mut self) -> InnerResult<()> {
        let at_row_start = self.stack.top().row.is_empty();
        match self.stack.array_mut() {
            Some(state) if at_row_start && state.at_row_start() => {
                state.hline();
                Ok(())
            }
            _ => Err(ErrorKind::Misplaced("\\hline".to_string())),
        }
    }

    fn finish(&mut self) -> InnerResult<Node> {
        self.close_styles();
        let grouping = match &self.stack.top().kind {
            ItemKind::Start | ItemKind::Style { .. } => None,
            ItemKind::Open => Some(Grouping::Brace),
            ItemKind::Left { .. } => Some(Grouping::LeftRight),
            ItemKind::Array(state) => Some(Grouping::Environment(state.name.to_string())),
            ItemKind::Environment { name, .. } => Some(Grouping::Environment(name.to_string())),
        };
        if let Some(grouping) = grouping {
            self.token_start = self.input;
            return Err(ErrorKind::UnclosedGroup(grouping));
        }
        let row = std::mem::take(&mut self.stack.top_mut().row);
        Ok(Node::wrap(self.finish_row(row)))
    }

    /// Parse `source` as a separate expression, sharing the state of this parser.
    ///
    /// Errors inside of `source` stay inside of it: a fatal error makes the result a single
    /// error node, and is recorded as a local diagnostic. Errors that must abort the whole
    /// expression (exceeding the nesting or expansion limits, and undefined names in strict
    /// mode) are returned.
    pub fn sub_parse(&mut self, source: &'a str) -> InnerResult<Node> {
        let depth = self.ctx.depth + 1;
        if depth > self.ctx.configuration.config.max_depth {
            return Err(ErrorKind::MaxNesting);
        }
        let mut parser = Parser::new(ParseContext { depth, ..self.ctx }, source, self.font);
        match parser.run() {
            Ok(mut node) => {
                if let Some(span) = self.span_of(source) {
                    node.set_source_if_missing(span);
                }
                Ok(node)
            }
            Err(error) if self.aborts(&error) => Err(error),
            Err(error) => {
                let span = parser
                    .span_from(parser.token_start)
                    .or_else(|| self.span_of(source));
                let message = self.record(&error, span.clone());
                let node = Node::error(message);
                Ok(match span {
                    Some(span) => node.with_source(span),
                    None => node,
                })
            }
        }
    }

    /// Parse `source` with the given font.
    pub fn sub_parse_in_font(&mut self, source: &'a str, font: Option<Font>) -> InnerResult<Node> {
        let saved = std::mem::replace(&mut self.font, font);
        let result = self.sub_parse(source);
        self.font = saved;
        result
    }

    /// Read the next argument, and return its source: the content of a group, or a single
    /// token.
    pub fn argument(&mut self, name: &str) -> InnerResult<&'a str> {
        let missing = || ErrorKind::MissingArgument(name.to_string());
        let rest = self.input.trim_start();
        if rest.starts_with('}') {
            return Err(ErrorKind::ExtraCloseMissingOpen);
        }
        if rest.starts_with('{') {
            return match lex::argument(&mut self.input) {
                Ok(Argument::Group(content)) => Ok(content),
                Ok(Argument::Token(_)) => Err(missing()),
                Err(error) => Err(error),
            };
        }
        lex::token_source(&mut self.input).map_err(|error| match error {
            ErrorKind::EndOfInput => missing(),
            error => error,
        })
    }

    /// Parse the next argument into a node.
    pub fn parse_argument(&mut self, name: &str) -> InnerResult<Node> {
        let source = self.argument(name)?;
        self.sub_parse(source)
    }

    /// Read an optional argument in brackets, if there is one.
    pub fn optional_argument(&mut self, name: &str) -> InnerResult<Option<&'a str>> {
        lex::optional_argument(&mut self.input).map_err(|error| match error {
            ErrorKind::MissingCloseBracket(_) => ErrorKind::MissingCloseBracket(name.to_string()),
            error => error,
        })
    }

    /// Read the source of the next token.
    pub fn next_token_source(&mut self) -> InnerResult<&'a str> {
        lex::token_source(&mut self.input)
    }

    /// Read the content of the next brace group, without the braces.
    pub fn group(&mut self, name: &str) -> InnerResult<&'a str> {
        self.input = self.input.trim_start();
        match self.input.strip_prefix('{') {
            Some(rest) => {
                self.input = rest;
                lex::group_content(&mut self.input, "{", "}")
            }
            None => Err(ErrorKind::MissingArgument(name.to_string())),
        }
    }

    /// The next character, skipping whitespace.
    pub fn peek(&self) -> Option<char> {
        self.input.trim_start().chars().next()
    }

    /// Consume `prefix` if the input starts with it, skipping whitespace.
    pub fn consume(&mut self, prefix: &str) -> bool {
        match self.input.trim_start().strip_prefix(prefix) {
            Some(rest) => {
                self.input = rest;
                true
            }
            None => false,
        }
    }

    /// The input left to parse.
    pub fn rest(&self) -> &'a str {
        self.input
    }

    pub(crate) fn set_rest(&mut self, rest: &'a str) {
        self.input = rest;
    }

    /// Copy the concatenation of `parts` into storage that lives as long as the parse.
    pub fn concat(&self, parts: &[&str]) -> &'a str {
        self.ctx.storage.concat(parts)
    }

    pub fn configuration(&self) -> &'a Configuration {
        self.ctx.configuration
    }

    pub fn config(&self) -> &'a ParserConfig {
        &self.ctx.configuration.config
    }

    pub fn references(&self) -> RefMut<'a, dyn ReferenceTracker + 'static> {
        self.ctx.references.borrow_mut()
    }

    pub(crate) fn macros(&self) -> RefMut<'a, MacroContext<'a>> {
        self.ctx.macros.borrow_mut()
    }

    pub fn font(&self) -> Option<Font> {
        self.font
    }

    pub fn set_font(&mut self, font: Option<Font>) {
        self.font = font;
    }

    /// The template used to display equation tags.
    pub fn tag_format(&self) -> &'a str {
        self.ctx.configuration.tag_format()
    }

    /// The byte offset of `s` in the top-level input, if `s` points into it.
    pub fn offset(&self, s: &str) -> Option<usize> {
        let root = self.ctx.root.as_ptr() as usize;
        let position = s.as_ptr() as usize;
        (position >= root && position + s.len() <= root + self.ctx.root.len())
            .then(|| position - root)
    }

    /// The span from `start` to the current position in the top-level input.
    pub fn span_from(&self, start: &str) -> Option<Range<usize>> {
        let start = self.offset(start)?;
        let end = self.offset(self.input)?;
        (start <= end).then_some(start..end)
    }

    fn span_of(&self, s: &str) -> Option<Range<usize>> {
        let start = self.offset(s)?;
        Some(start..start + s.len())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        node::NodeKind,
        parse,
        parser::{ErrorKind, Severity},
    };

    const BASE: &[(&str, i32)] = &[("base", 0)];

    #[test]
    fn groups_and_scripts() {
        let output = parse("x^{2} + y_i", BASE);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        let children = output.root.children();
        assert_eq!(children[0].kind(), NodeKind::Sup);
        assert_eq!(children[1].text_content(), Some("+"));
        assert_eq!(children[2].kind(), NodeKind::Sub);
    }

    #[test]
    fn unmatched_open_group_is_fatal() {
        let output = parse("{a", BASE);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].kind, "StackNotEmpty");
        assert_eq!(output.diagnostics[0].severity, Severity::Fatal);
        assert!(output.root.is_error());
        assert!(output.is_fatal());
    }

    #[test]
    fn extra_close_is_local() {
        let output = parse("a}b", BASE);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].kind, "ExtraCloseMissingOpen");
        assert_eq!(output.diagnostics[0].span, Some(1..2));
        assert_eq!(output.root.children().len(), 3);
        assert!(output.root.children()[1].is_error());
    }

    #[test]
    fn undefined_control_sequence() {
        let output = parse("a + \\nope", BASE);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(
            output.diagnostics[0].message,
            ErrorKind::UndefinedControlSequence("\\nope".into()).to_string()
        );
        assert_eq!(output.diagnostics[0].span, Some(4..9));
        assert!(output.is_fatal());
        assert!(output.root.is_error());

        let output = parse("a + {b \\nope}", BASE);
        assert!(output.is_fatal());
    }

    #[test]
    fn undefined_control_sequence_in_argument() {
        let output = parse("a + \\sqrt{\\nope} + b", BASE);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].severity, Severity::Local);
        let children = output.root.children();
        assert_eq!(children.len(), 5);
        assert_eq!(children[2].kind(), NodeKind::Sqrt);
        assert!(children[2].children()[0].is_error());
    }

    #[test]
    fn nested_errors_stay_local() {
        let output = parse("\\frac{\\left( a}{b}", BASE);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].kind, "StackNotEmpty");
        assert_eq!(output.diagnostics[0].severity, Severity::Local);
        assert_eq!(output.root.kind(), NodeKind::Fraction);
        assert!(output.root.children()[0].is_error());
    }

    #[test]
    fn missing_script() {
        let output = parse("x^", BASE);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].kind, "MissingScript");
        assert_eq!(output.root.kind(), NodeKind::Sup);
    }

    #[test]
    fn spans() {
        let output = parse("ab + \\frac12", BASE);
        let children = output.root.children();
        assert_eq!(children[0].source(), Some(0..1));
        assert_eq!(children[3].source(), Some(5..12));
    }
}
