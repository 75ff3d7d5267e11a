//! Configuration for parsing and rendering.

use std::collections::HashMap;

/// The type of parser a configuration builds.
///
/// Extension modules may require a specific kind of parser, see
/// [`ExtensionModule::for_parser`](crate::ExtensionModule::for_parser).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParserKind {
    /// The math-mode parser.
    #[default]
    Tex,
    /// A parser for text-mode material embedded in math.
    Text,
}

impl std::fmt::Display for ParserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ParserKind::Tex => "tex",
            ParserKind::Text => "text",
        })
    }
}

/// Options controlling how expressions are parsed.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// If true, undefined control sequences and invalid option keys abort the whole expression
    /// instead of being reported in place. (default: false)
    pub strict: bool,
    /// Maximum number of user macro expansions in one expression, guarding against recursive
    /// definitions. (default: 10000)
    pub max_macro_expansions: usize,
    /// Maximum nesting of arguments parsed recursively. (default: 100)
    pub max_depth: usize,
    /// Maximum number of rows, and of columns, of a matrix generated by a macro such as
    /// `\zmat`, and of entries in the column specification of an `array`. (default: 100)
    pub max_matrix_size: usize,
    /// Macros available in every expression, as pairs of name (without the `\`) and
    /// replacement text. Parameters are written `#1` to `#9`.
    pub macros: Vec<(String, String)>,
    /// Replacement message templates, keyed by diagnostic kind.
    ///
    /// See [`message::format`](crate::message::format) for the template syntax.
    pub messages: HashMap<&'static str, String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strict: false,
            max_macro_expansions: 10_000,
            max_depth: 100,
            max_matrix_size: 100,
            macros: Vec::new(),
            messages: HashMap::new(),
        }
    }
}

/// Options controlling how the output tree is written as MathML.
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    /// If [`DisplayMode::Block`], the math will be rendered in display/block mode,
    /// which will put the math in display style (so \int and \sum are large, for example),
    /// and will center the math on the page on its own line.
    /// Otherwise the math will be rendered in inline mode. (default: [`DisplayMode::Inline`])
    pub display_mode: DisplayMode,
    /// If true, include an `<annotation>` element that contains the input TeX string.
    /// (default: false)
    pub annotate: bool,
    /// If true, write the namespace `xmlns="http://www.w3.org/1998/Math/MathML"` into the
    /// `<math>` element. (default: false)
    pub xml: bool,
    /// If true, every element parsed from the input carries a `data-latex` attribute holding
    /// the source it was parsed from. (default: false)
    pub provenance: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::Inline,
            annotate: false,
            xml: false,
            provenance: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Inline,
    Block,
}
