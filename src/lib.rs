//! This crate provides an extensible parser for `LaTeX` math expressions, producing a tree of
//! [`Node`]s that maps one-to-one onto `MathML` elements, and a writer, available through the
//! [`mathml`] module, which closely follows the _MathML Core_ specification.
//!
//! The grammar is not fixed: it is assembled from named [`ExtensionModule`]s (`base`,
//! `newcommand`, `tags` and `physics` are built in) into a [`Configuration`], which can then
//! parse any number of expressions.
//!
//! ```
//! use latex_mathtree::{parse, NodeKind};
//!
//! let output = parse("\\frac{a}{b} + \\qty(c)", &[("base", 0), ("physics", 0)]);
//! assert!(output.diagnostics.is_empty());
//! assert_eq!(output.root.children()[0].kind(), NodeKind::Fraction);
//! ```
//!
//! Errors never make parsing fail. Every problem is reported as a [`Diagnostic`], and the
//! offending construct is replaced in the tree by an error node.

pub mod attribute;
pub mod config;
pub mod extension;
pub(crate) mod grammar;
pub mod mathml;
pub mod message;
pub mod node;
pub mod options;
pub mod parser;
pub mod references;
pub mod registry;

#[doc(inline)]
pub use config::{ParserConfig, RenderConfig};
#[doc(inline)]
pub use extension::{
    get_module, parse, register_module, Configuration, ConfigurationBuilder, ConfigurationError,
    ExtensionModule,
};
#[doc(inline)]
pub use mathml::{push_mathml, write_mathml};
#[doc(inline)]
pub use node::{Node, NodeKind};
#[doc(inline)]
pub use parser::{Diagnostic, ErrorKind, ParseOutput, Parser, Severity};
