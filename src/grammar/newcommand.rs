//! The `newcommand` module: `\newcommand`, `\renewcommand`, `\def` and `\let`.
use crate::{
    extension::ExtensionModule,
    parser::{lex, ErrorKind, InnerResult, Parser},
    registry::{Handler, HandlerMap, Invocation, SymbolClass},
};

use super::command;

pub(super) fn module() -> ExtensionModule {
    ExtensionModule::new().with_handlers([HandlerMap::new(
        "newcommand-macros",
        SymbolClass::Macro,
        MACROS.iter().copied(),
    )])
}

const MACROS: &[(&str, Handler)] = &[
    ("newcommand", command(new_command)),
    ("renewcommand", command(new_command)),
    ("def", command(def)),
    ("let", command(let_)),
];

/// `\newcommand{\name}[count][default]{replacement}`
fn new_command<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let name = invocation.control_sequence();
    let control_sequence = parser.argument(&name)?.trim();
    let defined = control_sequence
        .strip_prefix('\\')
        .filter(|cs| !cs.is_empty())
        .ok_or_else(|| ErrorKind::ExpectedControlSequence(name.clone()))?;

    let count = match parser.optional_argument(&name)? {
        Some(count) => count
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|count| *count <= 9)
            .ok_or_else(|| ErrorKind::InvalidParameterCount(name.clone()))?,
        None => 0,
    };
    let default = parser.optional_argument(&name)?;
    if default.is_some() && count == 0 {
        return Err(ErrorKind::InvalidParameterCount(name));
    }
    let replacement = parser.argument(&name)?;
    // The optional argument counts as the first parameter.
    let required = count - default.is_some() as u8;
    parser
        .macros()
        .insert_command(defined, required, default, replacement)
}

/// `\def\name#1#2{replacement}`
fn def<'a>(parser: &mut Parser<'a>, _: Invocation<'a>) -> InnerResult<()> {
    let mut rest = parser.rest();
    let (name, parameters, replacement) = lex::definition(&mut rest)?;
    parser.set_rest(rest);
    parser.macros().define(name, parameters, replacement)
}

/// `\let\name=token`
fn let_<'a>(parser: &mut Parser<'a>, _: Invocation<'a>) -> InnerResult<()> {
    let mut rest = parser.rest();
    let (name, token) = lex::let_assignment(&mut rest)?;
    parser.set_rest(rest);
    parser.macros().assign(name, token);
    Ok(())
}
