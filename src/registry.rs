//! The grammar registry.
//!
//! Every symbol the parser understands is resolved through a [`Registry`]: control sequences,
//! environment names, delimiters, and characters. Handlers are grouped into named
//! [`HandlerMap`]s, and each [`SymbolClass`] keeps its maps in installation order. Looking up a
//! symbol walks the maps of its class and returns the first match, so a map installed earlier
//! takes precedence over one installed later. When no map knows the symbol, the fallback of the
//! class is used, if there is one.
use std::{collections::HashMap, fmt, sync::Arc};

use indexmap::IndexMap;

use crate::{
    node::{Node, NodeKind},
    parser::{InnerResult, Parser},
};

/// The kind of symbol a handler is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolClass {
    /// Control sequences, registered without their `\`.
    Macro,
    /// Environment names, as written in `\begin{...}`.
    Environment,
    /// Delimiters accepted after `\left`, `\big` and similar commands, registered with the
    /// source text of their token (`(` or `\langle`).
    Delimiter,
    /// Characters that are neither letters nor digits.
    Special,
    Letter,
    Digit,
}

impl SymbolClass {
    pub const ALL: [SymbolClass; 6] = [
        SymbolClass::Macro,
        SymbolClass::Environment,
        SymbolClass::Delimiter,
        SymbolClass::Special,
        SymbolClass::Letter,
        SymbolClass::Digit,
    ];

    /// The class a character is looked up in.
    pub fn of_char(c: char) -> Self {
        if c.is_ascii_digit() {
            SymbolClass::Digit
        } else if c.is_alphabetic() {
            SymbolClass::Letter
        } else {
            SymbolClass::Special
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SymbolClass::Macro => "macro",
            SymbolClass::Environment => "environment",
            SymbolClass::Delimiter => "delimiter",
            SymbolClass::Special => "special",
            SymbolClass::Letter => "letter",
            SymbolClass::Digit => "digit",
        }
    }
}

/// A handler receiving the parser and the invocation of a macro or environment.
pub type MacroFn = for<'a> fn(&mut Parser<'a>, Invocation<'a>) -> InnerResult<()>;
/// A handler receiving the parser and the source text of the symbol it was found for.
pub type CharFn = for<'a> fn(&mut Parser<'a>, &'a str) -> InnerResult<()>;
/// The handler used when no map of a class knows a symbol.
pub type FallbackFn = CharFn;

/// A constant passed to a handler from its registration, so that one function can serve a
/// family of macros.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Param {
    Char(char),
    Str(&'static str),
    Float(f32),
    Int(i32),
    Bool(bool),
}

/// What a handler receives when its macro or environment is used.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// The name the handler was found under.
    pub name: &'a str,
    /// Whether the name was directly followed by `*`. Always false for commands that do not
    /// accept a star.
    pub star: bool,
    pub params: &'static [Param],
}

impl Invocation<'_> {
    pub fn str(&self, index: usize) -> Option<&'static str> {
        match self.params.get(index) {
            Some(Param::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn char(&self, index: usize) -> Option<char> {
        match self.params.get(index) {
            Some(Param::Char(c)) => Some(*c),
            _ => None,
        }
    }

    pub fn float(&self, index: usize) -> Option<f32> {
        match self.params.get(index) {
            Some(Param::Float(f)) => Some(*f),
            _ => None,
        }
    }

    pub fn int(&self, index: usize) -> Option<i32> {
        match self.params.get(index) {
            Some(Param::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn bool(&self, index: usize) -> Option<bool> {
        match self.params.get(index) {
            Some(Param::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// The control sequence as written in the source, e.g. `\frac`.
    pub fn control_sequence(&self) -> String {
        format!("\\{}", self.name)
    }
}

/// A macro or environment implementation with the constants it is registered with.
#[derive(Debug, Clone, Copy)]
pub struct Command {
    pub func: MacroFn,
    pub params: &'static [Param],
    /// Whether a `*` directly following the name is consumed and passed to the handler.
    pub accepts_star: bool,
}

impl Command {
    pub const fn new(func: MacroFn) -> Self {
        Self {
            func,
            params: &[],
            accepts_star: false,
        }
    }

    pub const fn with_params(mut self, params: &'static [Param]) -> Self {
        self.params = params;
        self
    }

    pub const fn starred(mut self) -> Self {
        self.accepts_star = true;
        self
    }
}

/// A fixed token node, such as the `mi` produced by `\alpha`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Symbol {
    pub kind: NodeKind,
    pub text: &'static str,
    pub attributes: &'static [(&'static str, &'static str)],
}

impl Symbol {
    pub const fn identifier(text: &'static str) -> Self {
        Self {
            kind: NodeKind::Identifier,
            text,
            attributes: &[],
        }
    }

    pub const fn operator(text: &'static str) -> Self {
        Self {
            kind: NodeKind::Operator,
            text,
            attributes: &[],
        }
    }

    pub const fn text(text: &'static str) -> Self {
        Self {
            kind: NodeKind::Text,
            text,
            attributes: &[],
        }
    }

    pub const fn with_attributes(mut self, attributes: &'static [(&'static str, &'static str)]) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn to_node(&self) -> Node {
        self.attributes
            .iter()
            .fold(Node::token(self.kind, self.text), |node, (name, value)| {
                node.with_attribute(name, *value)
            })
    }
}

/// What a symbol resolves to.
#[derive(Debug, Clone, Copy)]
pub enum Handler {
    Symbol(Symbol),
    /// A delimiter glyph. The empty string stands for the null delimiter `.`.
    Delimiter(&'static str),
    Macro(Command),
    Environment(Command),
    Character(CharFn),
}

/// A named table of handlers for one symbol class.
#[derive(Debug, Clone)]
pub struct HandlerMap {
    name: String,
    class: SymbolClass,
    entries: IndexMap<&'static str, Handler>,
}

impl HandlerMap {
    pub fn new(
        name: impl Into<String>,
        class: SymbolClass,
        entries: impl IntoIterator<Item = (&'static str, Handler)>,
    ) -> Self {
        Self {
            name: name.into(),
            class,
            entries: entries.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> SymbolClass {
        self.class
    }

    pub fn get(&self, symbol: &str) -> Option<&Handler> {
        self.entries.get(symbol)
    }

    pub fn insert(&mut self, symbol: &'static str, handler: Handler) {
        self.entries.insert(symbol, handler);
    }

    /// Remove an entry, keeping the order of the others.
    pub fn remove(&mut self, symbol: &str) -> Option<Handler> {
        self.entries.shift_remove(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The registered symbols, in registration order.
    pub fn symbols(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }
}

/// The handler maps and fallbacks of one parser configuration.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    maps: HashMap<SymbolClass, Vec<Arc<HandlerMap>>>,
    fallbacks: HashMap<SymbolClass, Vec<(String, FallbackFn)>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a map to the maps of its class. Maps installed earlier are searched first.
    pub fn install(&mut self, map: Arc<HandlerMap>) {
        self.maps.entry(map.class()).or_default().push(map);
    }

    /// Register a fallback for a class. The first fallback registered for a class is the one
    /// used.
    pub fn install_fallback(&mut self, owner: impl Into<String>, class: SymbolClass, fallback: FallbackFn) {
        self.fallbacks
            .entry(class)
            .or_default()
            .push((owner.into(), fallback));
    }

    /// Remove `symbol` from the map named `map` of the given class, returning the removed
    /// handler. Other registries sharing the map are not affected.
    pub fn remove(&mut self, map: &str, class: SymbolClass, symbol: &str) -> Option<Handler> {
        let maps = self.maps.get_mut(&class)?;
        let map = maps.iter_mut().find(|m| m.name() == map)?;
        Arc::make_mut(map).remove(symbol)
    }

    pub fn lookup(&self, class: SymbolClass, symbol: &str) -> Option<&Handler> {
        self.maps
            .get(&class)?
            .iter()
            .find_map(|map| map.get(symbol))
    }

    pub fn fallback(&self, class: SymbolClass) -> Option<FallbackFn> {
        self.fallbacks
            .get(&class)
            .and_then(|fallbacks| fallbacks.first())
            .map(|(_, fallback)| *fallback)
    }

    /// The names of the maps installed for a class, in lookup order.
    pub fn map_names(&self, class: SymbolClass) -> Vec<&str> {
        self.maps
            .get(&class)
            .map(|maps| maps.iter().map(|map| map.name()).collect())
            .unwrap_or_default()
    }

    /// Resolve the glyph of a delimiter from the source text of its token.
    pub fn delimiter(&self, source: &str) -> Option<&'static str> {
        match self.lookup(SymbolClass::Delimiter, source)? {
            Handler::Delimiter(glyph) => Some(glyph),
            _ => None,
        }
    }
}

impl fmt::Display for Registry {
    /// One line per class that has maps or a fallback, in a fixed order:
    /// `macro: base-macros, physics-macros [fallback: base]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for class in SymbolClass::ALL {
            let names = self.map_names(class);
            let fallback = self
                .fallbacks
                .get(&class)
                .and_then(|fallbacks| fallbacks.first());
            if names.is_empty() && fallback.is_none() {
                continue;
            }
            if !first {
                f.write_str("\n")?;
            }
            first = false;
            write!(f, "{}:", class.as_str())?;
            if !names.is_empty() {
                write!(f, " {}", names.join(", "))?;
            }
            if let Some((owner, _)) = fallback {
                write!(f, " [fallback: {owner}]")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{Handler, HandlerMap, Registry, Symbol, SymbolClass};
    use crate::node::NodeKind;

    fn symbol_text(handler: Option<&Handler>) -> Option<&'static str> {
        match handler {
            Some(Handler::Symbol(symbol)) => Some(symbol.text),
            _ => None,
        }
    }

    #[test]
    fn first_map_wins() {
        let mut registry = Registry::new();
        registry.install(Arc::new(HandlerMap::new(
            "first",
            SymbolClass::Macro,
            [("x", Handler::Symbol(Symbol::identifier("1")))],
        )));
        registry.install(Arc::new(HandlerMap::new(
            "second",
            SymbolClass::Macro,
            [
                ("x", Handler::Symbol(Symbol::identifier("2"))),
                ("y", Handler::Symbol(Symbol::identifier("3"))),
            ],
        )));

        assert_eq!(symbol_text(registry.lookup(SymbolClass::Macro, "x")), Some("1"));
        assert_eq!(symbol_text(registry.lookup(SymbolClass::Macro, "y")), Some("3"));
        assert!(registry.lookup(SymbolClass::Environment, "x").is_none());
        assert_eq!(registry.map_names(SymbolClass::Macro), ["first", "second"]);
    }

    #[test]
    fn remove_uncovers_later_maps() {
        let shared = Arc::new(HandlerMap::new(
            "first",
            SymbolClass::Macro,
            [("x", Handler::Symbol(Symbol::identifier("1")))],
        ));
        let mut registry = Registry::new();
        registry.install(shared.clone());
        registry.install(Arc::new(HandlerMap::new(
            "second",
            SymbolClass::Macro,
            [("x", Handler::Symbol(Symbol::identifier("2")))],
        )));

        assert!(registry.remove("first", SymbolClass::Macro, "x").is_some());
        assert_eq!(symbol_text(registry.lookup(SymbolClass::Macro, "x")), Some("2"));
        assert!(registry.remove("first", SymbolClass::Macro, "x").is_none());
        // The shared map itself is untouched.
        assert!(shared.get("x").is_some());
    }

    #[test]
    fn display_lists_maps() {
        let mut registry = Registry::new();
        registry.install(Arc::new(HandlerMap::new("b", SymbolClass::Environment, [])));
        registry.install(Arc::new(HandlerMap::new("a", SymbolClass::Macro, [])));
        registry.install(Arc::new(HandlerMap::new("c", SymbolClass::Macro, [])));
        assert_eq!(registry.to_string(), "macro: a, c\nenvironment: b");
    }

    #[test]
    fn symbol_nodes() {
        let node = Symbol::operator("∑")
            .with_attributes(&[("movablelimits", "true")])
            .to_node();
        assert_eq!(node.kind(), NodeKind::Operator);
        assert_eq!(node.text_content(), Some("∑"));
        assert_eq!(node.attribute("movablelimits"), Some("true"));
    }
}
