//! The `base` module: characters, symbols, and the core macros of math mode.
use crate::{
    attribute::{Font, Length, MATHVARIANTS},
    extension::ExtensionModule,
    node::{Node, NodeKind},
    options::{parse_options, OptionType},
    parser::{delimiters, lex, stack::ItemKind, stack::ScriptPosition, tables, ErrorKind, InnerResult, Parser},
    registry::{Handler, HandlerMap, Invocation, Param, Symbol, SymbolClass},
};

use super::{command, command_with, environments, starred, symbols};

pub(super) fn module() -> ExtensionModule {
    ExtensionModule::new()
        .with_handlers([
            HandlerMap::new("base-characters", SymbolClass::Special, CHARACTERS.iter().copied()),
            HandlerMap::new(
                "base-symbols",
                SymbolClass::Macro,
                symbols::ALL.iter().flat_map(|table| table.iter().copied()),
            ),
            HandlerMap::new("base-macros", SymbolClass::Macro, MACROS.iter().copied()),
            HandlerMap::new(
                "base-environments",
                SymbolClass::Environment,
                environments::ENVIRONMENTS.iter().copied(),
            ),
            HandlerMap::new(
                "base-delimiters",
                SymbolClass::Delimiter,
                tables::DELIMITERS
                    .iter()
                    .map(|&(source, glyph)| (source, Handler::Delimiter(glyph))),
            ),
        ])
        .with_fallback(SymbolClass::Letter, letter)
        .with_fallback(SymbolClass::Digit, digits)
        .with_fallback(SymbolClass::Special, special)
}

const CHARACTERS: &[(&str, Handler)] = &[
    ("&", Handler::Character(ampersand)),
    ("'", Handler::Character(prime)),
    ("~", Handler::Character(nonbreaking_space)),
    ("#", Handler::Character(hash)),
    ("$", Handler::Character(math_shift)),
    ("-", Handler::Symbol(Symbol::operator("−"))),
    ("*", Handler::Symbol(Symbol::operator("∗"))),
];

#[rustfmt::skip]
const MACROS: &[(&str, Handler)] = &[
    // Escaped characters
    ("#", Handler::Symbol(Symbol::operator("#"))),
    ("%", Handler::Symbol(Symbol::operator("%"))),
    ("&", Handler::Symbol(Symbol::operator("&"))),
    ("$", Handler::Symbol(Symbol::operator("$"))),
    ("_", Handler::Symbol(Symbol::operator("_"))),

    // Named functions
    ("arccos", command(function)), ("arcsin", command(function)), ("arctan", command(function)),
    ("arg", command(function)), ("cos", command(function)), ("cosh", command(function)),
    ("cot", command(function)), ("coth", command(function)), ("csc", command(function)),
    ("deg", command(function)), ("dim", command(function)), ("exp", command(function)),
    ("hom", command(function)), ("ker", command(function)), ("lg", command(function)),
    ("ln", command(function)), ("log", command(function)), ("sec", command(function)),
    ("sin", command(function)), ("sinh", command(function)), ("tan", command(function)),
    ("tanh", command(function)),
    ("det", command(limit_operator)), ("gcd", command(limit_operator)),
    ("inf", command(limit_operator)), ("lim", command(limit_operator)),
    ("max", command(limit_operator)), ("min", command(limit_operator)),
    ("Pr", command(limit_operator)), ("sup", command(limit_operator)),
    ("liminf", command_with(limit_operator, &[Param::Str("lim inf")])),
    ("limsup", command_with(limit_operator, &[Param::Str("lim sup")])),
    ("injlim", command_with(limit_operator, &[Param::Str("inj lim")])),
    ("projlim", command_with(limit_operator, &[Param::Str("proj lim")])),
    ("operatorname", starred(operatorname, &[])),

    // Fractions and radicals
    ("frac", command(fraction)),
    ("dfrac", command_with(fraction, &[Param::Bool(true)])),
    ("tfrac", command_with(fraction, &[Param::Bool(false)])),
    ("binom", command(binomial)),
    ("dbinom", command_with(binomial, &[Param::Bool(true)])),
    ("tbinom", command_with(binomial, &[Param::Bool(false)])),
    ("sqrt", command(sqrt)),

    // Delimiters
    ("left", command(delimiters::left)),
    ("middle", command(delimiters::middle)),
    ("right", command(delimiters::right)),
    ("big", command_with(delimiters::big, &[Param::Float(1.2)])),
    ("bigl", command_with(delimiters::big, &[Param::Float(1.2), Param::Char('l')])),
    ("bigr", command_with(delimiters::big, &[Param::Float(1.2), Param::Char('r')])),
    ("bigm", command_with(delimiters::big, &[Param::Float(1.2), Param::Char('m')])),
    ("Big", command_with(delimiters::big, &[Param::Float(1.623)])),
    ("Bigl", command_with(delimiters::big, &[Param::Float(1.623), Param::Char('l')])),
    ("Bigr", command_with(delimiters::big, &[Param::Float(1.623), Param::Char('r')])),
    ("Bigm", command_with(delimiters::big, &[Param::Float(1.623), Param::Char('m')])),
    ("bigg", command_with(delimiters::big, &[Param::Float(2.047)])),
    ("biggl", command_with(delimiters::big, &[Param::Float(2.047), Param::Char('l')])),
    ("biggr", command_with(delimiters::big, &[Param::Float(2.047), Param::Char('r')])),
    ("biggm", command_with(delimiters::big, &[Param::Float(2.047), Param::Char('m')])),
    ("Bigg", command_with(delimiters::big, &[Param::Float(2.470)])),
    ("Biggl", command_with(delimiters::big, &[Param::Float(2.470), Param::Char('l')])),
    ("Biggr", command_with(delimiters::big, &[Param::Float(2.470), Param::Char('r')])),
    ("Biggm", command_with(delimiters::big, &[Param::Float(2.470), Param::Char('m')])),

    // Environments and arrays
    ("begin", command(environments::begin)),
    ("end", command(environments::end)),
    ("\\", command(newline)),
    ("cr", command(newline)),
    ("hline", command(hline)),

    // Text
    ("text", command(text)),
    ("mbox", command(text)),
    ("textrm", command_with(text, &[Param::Str("normal")])),
    ("textup", command_with(text, &[Param::Str("normal")])),
    ("textbf", command_with(text, &[Param::Str("bold")])),
    ("textit", command_with(text, &[Param::Str("italic")])),
    ("textsf", command_with(text, &[Param::Str("sans-serif")])),
    ("texttt", command_with(text, &[Param::Str("monospace")])),

    // Fonts
    ("mathbf", command_with(font, &[Param::Str("bold")])),
    ("symbf", command_with(font, &[Param::Str("bold")])),
    ("mathrm", command_with(font, &[Param::Str("normal")])),
    ("symrm", command_with(font, &[Param::Str("normal")])),
    ("mathit", command_with(font, &[Param::Str("italic")])),
    ("symit", command_with(font, &[Param::Str("italic")])),
    ("mathbb", command_with(font, &[Param::Str("double-struck")])),
    ("symbb", command_with(font, &[Param::Str("double-struck")])),
    ("Bbb", command_with(font, &[Param::Str("double-struck")])),
    ("mathcal", command_with(font, &[Param::Str("script")])),
    ("mathscr", command_with(font, &[Param::Str("script")])),
    ("symcal", command_with(font, &[Param::Str("script")])),
    ("mathfrak", command_with(font, &[Param::Str("fraktur")])),
    ("symfrak", command_with(font, &[Param::Str("fraktur")])),
    ("mathsf", command_with(font, &[Param::Str("sans-serif")])),
    ("symsf", command_with(font, &[Param::Str("sans-serif")])),
    ("mathtt", command_with(font, &[Param::Str("monospace")])),
    ("symtt", command_with(font, &[Param::Str("monospace")])),
    ("boldsymbol", command_with(font, &[Param::Str("bold-italic")])),
    ("mathbfit", command_with(font, &[Param::Str("bold-italic")])),
    ("mathbfcal", command_with(font, &[Param::Str("bold-script")])),
    ("mathbffrak", command_with(font, &[Param::Str("bold-fraktur")])),
    ("mathsfit", command_with(font, &[Param::Str("sans-serif-italic")])),
    ("mathbfsfup", command_with(font, &[Param::Str("bold-sans-serif")])),
    ("mathbfsfit", command_with(font, &[Param::Str("sans-serif-bold-italic")])),
    ("mathnormal", command(font)),
    ("bf", command_with(font_switch, &[Param::Str("bold")])),
    ("rm", command_with(font_switch, &[Param::Str("normal")])),
    ("it", command_with(font_switch, &[Param::Str("italic")])),
    ("cal", command_with(font_switch, &[Param::Str("script")])),
    ("sf", command_with(font_switch, &[Param::Str("sans-serif")])),
    ("tt", command_with(font_switch, &[Param::Str("monospace")])),

    // Accents
    ("acute", command_with(accent, &[Param::Str("´"), Param::Bool(false)])),
    ("bar", command_with(accent, &[Param::Str("¯"), Param::Bool(false)])),
    ("breve", command_with(accent, &[Param::Str("˘"), Param::Bool(false)])),
    ("check", command_with(accent, &[Param::Str("ˇ"), Param::Bool(false)])),
    ("dot", command_with(accent, &[Param::Str("˙"), Param::Bool(false)])),
    ("ddot", command_with(accent, &[Param::Str("¨"), Param::Bool(false)])),
    ("dddot", command_with(accent, &[Param::Str("⃛"), Param::Bool(false)])),
    ("grave", command_with(accent, &[Param::Str("`"), Param::Bool(false)])),
    ("hat", command_with(accent, &[Param::Str("^"), Param::Bool(false)])),
    ("tilde", command_with(accent, &[Param::Str("~"), Param::Bool(false)])),
    ("vec", command_with(accent, &[Param::Str("→"), Param::Bool(false)])),
    ("mathring", command_with(accent, &[Param::Str("˚"), Param::Bool(false)])),
    ("widehat", command_with(accent, &[Param::Str("^"), Param::Bool(true)])),
    ("widetilde", command_with(accent, &[Param::Str("~"), Param::Bool(true)])),
    ("widecheck", command_with(accent, &[Param::Str("ˇ"), Param::Bool(true)])),

    // Over and under
    ("overline", command_with(over_under, &[Param::Str("‾"), Param::Char('o')])),
    ("underline", command_with(over_under, &[Param::Str("_"), Param::Char('u')])),
    ("overbrace", command_with(over_under, &[Param::Str("⏞"), Param::Char('o')])),
    ("underbrace", command_with(over_under, &[Param::Str("⏟"), Param::Char('u')])),
    ("overparen", command_with(over_under, &[Param::Str("⏜"), Param::Char('o')])),
    ("underparen", command_with(over_under, &[Param::Str("⏝"), Param::Char('u')])),
    ("overleftarrow", command_with(over_under, &[Param::Str("←"), Param::Char('o')])),
    ("overrightarrow", command_with(over_under, &[Param::Str("→"), Param::Char('o')])),
    ("overleftrightarrow", command_with(over_under, &[Param::Str("↔"), Param::Char('o')])),
    ("underleftarrow", command_with(over_under, &[Param::Str("←"), Param::Char('u')])),
    ("underrightarrow", command_with(over_under, &[Param::Str("→"), Param::Char('u')])),
    ("underleftrightarrow", command_with(over_under, &[Param::Str("↔"), Param::Char('u')])),
    ("overset", command_with(overset, &[Param::Char('o')])),
    ("stackrel", command_with(overset, &[Param::Char('o')])),
    ("underset", command_with(overset, &[Param::Char('u')])),

    // Phantoms
    ("phantom", command(phantom)),
    ("hphantom", command_with(phantom, &[Param::Char('h')])),
    ("vphantom", command_with(phantom, &[Param::Char('v')])),
    ("smash", command(smash)),

    // Spacing
    (",", command_with(space, &[Param::Float(0.16666667)])),
    ("thinspace", command_with(space, &[Param::Float(0.16666667)])),
    (":", command_with(space, &[Param::Float(0.22222222)])),
    (">", command_with(space, &[Param::Float(0.22222222)])),
    ("medspace", command_with(space, &[Param::Float(0.22222222)])),
    (";", command_with(space, &[Param::Float(0.27777778)])),
    ("thickspace", command_with(space, &[Param::Float(0.27777778)])),
    ("!", command_with(space, &[Param::Float(-0.16666667)])),
    ("negthinspace", command_with(space, &[Param::Float(-0.16666667)])),
    ("negmedspace", command_with(space, &[Param::Float(-0.22222222)])),
    ("negthickspace", command_with(space, &[Param::Float(-0.27777778)])),
    ("enspace", command_with(space, &[Param::Float(0.5)])),
    ("quad", command_with(space, &[Param::Float(1.)])),
    ("qquad", command_with(space, &[Param::Float(2.)])),
    (" ", command(control_space)),
    ("hspace", starred(hspace, &[])),
    ("kern", command(kern)),
    ("hskip", command(kern)),
    ("mkern", command(kern)),
    ("mskip", command(kern)),

    // Styles
    ("displaystyle", command_with(style_switch, &[Param::Bool(true), Param::Int(0)])),
    ("textstyle", command_with(style_switch, &[Param::Bool(false), Param::Int(0)])),
    ("scriptstyle", command_with(style_switch, &[Param::Bool(false), Param::Int(1)])),
    ("scriptscriptstyle", command_with(style_switch, &[Param::Bool(false), Param::Int(2)])),
    ("color", command(color)),
    ("textcolor", command(text_color)),
    ("limits", command_with(limits, &[Param::Bool(true)])),
    ("nolimits", command_with(limits, &[Param::Bool(false)])),
    ("mmlToken", command(mml_token)),
];

fn ampersand<'a>(parser: &mut Parser<'a>, _: &'a str) -> InnerResult<()> {
    parser.end_cell()
}

/// `'`, `''`... A run of primes is read at once.
fn prime<'a>(parser: &mut Parser<'a>, _: &'a str) -> InnerResult<()> {
    let rest = parser.rest();
    let extra = rest.len() - rest.trim_start_matches('\'').len();
    parser.set_rest(&rest[extra..]);
    parser.stack.top_mut().row.add_prime(extra + 1)
}

fn nonbreaking_space<'a>(parser: &mut Parser<'a>, _: &'a str) -> InnerResult<()> {
    parser.push_node(Node::text("\u{a0}"));
    Ok(())
}

fn hash<'a>(_: &mut Parser<'a>, _: &'a str) -> InnerResult<()> {
    Err(ErrorKind::HashSign)
}

fn math_shift<'a>(_: &mut Parser<'a>, _: &'a str) -> InnerResult<()> {
    Err(ErrorKind::MathShift)
}

fn letter<'a>(parser: &mut Parser<'a>, text: &'a str) -> InnerResult<()> {
    parser.push_token(Node::identifier(text));
    Ok(())
}

/// A number: a run of digits, with at most one decimal point followed by a digit. A script
/// only takes the first digit.
fn digits<'a>(parser: &mut Parser<'a>, text: &'a str) -> InnerResult<()> {
    if parser.stack.top().row.awaiting_script() {
        parser.push_token(Node::number(text));
        return Ok(());
    }
    let rest = parser.rest();
    let integer = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let mut end = integer;
    if let Some(fraction) = rest[integer..].strip_prefix('.') {
        let digits = fraction
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(fraction.len());
        if digits > 0 {
            end = integer + 1 + digits;
        }
    }
    parser.set_rest(&rest[end..]);
    parser.push_token(Node::number(format!("{text}{}", &rest[..end])));
    Ok(())
}

fn special<'a>(parser: &mut Parser<'a>, text: &'a str) -> InnerResult<()> {
    let node = match text.chars().next() {
        Some(c) if tables::is_delimiter_char(c) => {
            Node::operator(text).with_attribute("stretchy", "false")
        }
        Some(c) if tables::is_operator(c) => Node::operator(text),
        _ => Node::identifier(text),
    };
    parser.push_token(node);
    Ok(())
}

/// `\sin`, `\log`... An upright identifier.
fn function<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    parser.push_node(Node::identifier(invocation.name));
    Ok(())
}

/// `\lim`, `\max`... An operator whose limits go below it in display style.
fn limit_operator<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let text = invocation.str(0).unwrap_or(invocation.name);
    parser.push_node(Node::operator(text).with_attribute("movablelimits", "true"));
    Ok(())
}

fn operatorname<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let content = parser.argument(&invocation.control_sequence())?;
    if content.contains('\\') {
        let node = parser.sub_parse_in_font(content, Some(Font::UpRight))?;
        parser.push_node(node);
        return Ok(());
    }
    let name: String = content.split_whitespace().collect();
    let node = if invocation.star {
        Node::operator(name).with_attribute("movablelimits", "true")
    } else if name.chars().count() == 1 {
        Node::identifier(name).with_attribute("mathvariant", "normal")
    } else {
        Node::identifier(name)
    };
    parser.push_node(node);
    Ok(())
}

/// Wrap `node` in an `mstyle` forcing display or text style.
fn in_style(node: Node, display: Option<bool>) -> InnerResult<Node> {
    Ok(match display {
        Some(display) => Node::new(NodeKind::Style, vec![node])?
            .with_attribute("displaystyle", display.to_string())
            .with_attribute("scriptlevel", "0"),
        None => node,
    })
}

fn read_fraction<'a>(parser: &mut Parser<'a>, invocation: &Invocation<'a>) -> InnerResult<Node> {
    let name = invocation.control_sequence();
    let numerator = parser.parse_argument(&name)?;
    let denominator = parser.parse_argument(&name)?;
    Node::new(NodeKind::Fraction, vec![numerator, denominator])
}

fn fraction<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let fraction = read_fraction(parser, &invocation)?;
    parser.push_node(in_style(fraction, invocation.bool(0))?);
    Ok(())
}

fn binomial<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let fraction = read_fraction(parser, &invocation)?.with_attribute("linethickness", "0");
    let node = Node::row(vec![
        delimiters::fence("(", delimiters::Role::Open, true),
        fraction,
        delimiters::fence(")", delimiters::Role::Close, true),
    ]);
    parser.push_node(in_style(node, invocation.bool(0))?);
    Ok(())
}

fn sqrt<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let name = invocation.control_sequence();
    let index = parser.optional_argument(&name)?;
    let index = index.map(|index| parser.sub_parse(index)).transpose()?;
    let radicand = parser.parse_argument(&name)?;
    let node = match index {
        Some(index) => Node::new(NodeKind::Root, vec![radicand, index])?,
        None => Node::new(NodeKind::Sqrt, vec![radicand])?,
    };
    parser.push_node(node);
    Ok(())
}

/// `\\` and `\cr`, with an optional row spacing that is read and ignored.
fn newline<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    parser.optional_argument(&invocation.control_sequence())?;
    parser.end_row()
}

fn hline<'a>(parser: &mut Parser<'a>, _: Invocation<'a>) -> InnerResult<()> {
    parser.hline()
}

fn text<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let content = parser.argument(&invocation.control_sequence())?;
    let mut node = Node::text(content);
    if let Some(variant) = invocation.str(0) {
        node.set_attribute("mathvariant", variant);
    }
    parser.push_node(node);
    Ok(())
}

fn font<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let font = invocation.str(0).and_then(Font::from_mathvariant);
    let content = parser.argument(&invocation.control_sequence())?;
    let node = parser.sub_parse_in_font(content, font)?;
    parser.push_node(node);
    Ok(())
}

/// `\bf`, `\rm`... The font stays in effect until the end of the enclosing group.
fn font_switch<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    parser.set_font(invocation.str(0).and_then(Font::from_mathvariant));
    Ok(())
}

fn accent<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let base = parser.parse_argument(&invocation.control_sequence())?;
    let stretchy = invocation.bool(1).unwrap_or(false);
    let mark = Node::operator(invocation.str(0).unwrap_or("^"))
        .with_attribute("stretchy", stretchy.to_string());
    let node = Node::new(NodeKind::Over, vec![base, mark])?.with_attribute("accent", "true");
    parser.push_node(node);
    Ok(())
}

fn over_under<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let base = parser.parse_argument(&invocation.control_sequence())?;
    let mark = Node::operator(invocation.str(0).unwrap_or("‾")).with_attribute("stretchy", "true");
    let node = match invocation.char(1) {
        Some('u') => Node::new(NodeKind::Under, vec![base, mark])?,
        _ => Node::new(NodeKind::Over, vec![base, mark])?,
    };
    parser.push_node(node);
    Ok(())
}

/// `\overset{script}{base}`, `\underset` and `\stackrel`.
fn overset<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let name = invocation.control_sequence();
    let script = parser.parse_argument(&name)?;
    let base = parser.parse_argument(&name)?;
    let kind = match invocation.char(0) {
        Some('u') => NodeKind::Under,
        _ => NodeKind::Over,
    };
    parser.push_node(Node::new(kind, vec![base, script])?);
    Ok(())
}

fn phantom<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let content = parser.parse_argument(&invocation.control_sequence())?;
    let phantom = Node::new(NodeKind::Phantom, vec![content])?;
    let node = match invocation.char(0) {
        Some('h') => Node::new(NodeKind::Padded, vec![phantom])?
            .with_attribute("height", "0")
            .with_attribute("depth", "0"),
        Some('v') => Node::new(NodeKind::Padded, vec![phantom])?.with_attribute("width", "0"),
        _ => phantom,
    };
    parser.push_node(node);
    Ok(())
}

/// `\smash[t]{...}`, `\smash[b]{...}` or `\smash{...}`.
fn smash<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let name = invocation.control_sequence();
    let position = parser.optional_argument(&name)?.map(str::trim);
    let content = parser.parse_argument(&name)?;
    let mut node = Node::new(NodeKind::Padded, vec![content])?;
    if position != Some("b") {
        node.set_attribute("height", "0");
    }
    if position != Some("t") {
        node.set_attribute("depth", "0");
    }
    parser.push_node(node);
    Ok(())
}

fn space<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let width = Length::em(invocation.float(0).unwrap_or_default());
    parser.push_node(Node::space(width.to_string()));
    Ok(())
}

fn control_space<'a>(parser: &mut Parser<'a>, _: Invocation<'a>) -> InnerResult<()> {
    parser.push_node(Node::text("\u{a0}"));
    Ok(())
}

fn hspace<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let name = invocation.control_sequence();
    let mut content = parser.group(&name)?;
    let dimension = lex::dimension(&mut content)
        .ok()
        .filter(|_| content.trim().is_empty())
        .ok_or(ErrorKind::MissingDimension(name))?;
    parser.push_node(Node::space(Length(dimension).to_string()));
    Ok(())
}

/// `\kern`, `\hskip`, `\mkern` and `\mskip`, followed by a dimension or glue in the input. Only
/// the natural width of a glue is kept.
fn kern<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let mut rest = parser.rest();
    let dimension = match invocation.name {
        "kern" => lex::dimension(&mut rest),
        "hskip" => lex::glue(&mut rest).map(|glue| glue.0),
        "mkern" => lex::math_dimension(&mut rest),
        _ => lex::math_glue(&mut rest).map(|glue| glue.0),
    }
    .map_err(|_| ErrorKind::MissingDimension(invocation.control_sequence()))?;
    parser.set_rest(rest);
    parser.push_node(Node::space(Length(dimension).to_string()));
    Ok(())
}

fn style_switch<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let display = invocation.bool(0).unwrap_or(false);
    let level = invocation.int(1).unwrap_or(0);
    parser.begin(ItemKind::Style {
        attributes: vec![
            ("displaystyle", display.to_string()),
            ("scriptlevel", level.to_string()),
        ],
    });
    Ok(())
}

fn read_color<'a>(parser: &mut Parser<'a>, name: &str) -> InnerResult<&'a str> {
    let color = parser.group(name)?.trim();
    if !tables::is_primitive_color(color) {
        return Err(ErrorKind::UndefinedColor(color.to_string()));
    }
    Ok(color)
}

/// `\color{red}`, coloring everything up to the end of the enclosing group.
fn color<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let color = read_color(parser, &invocation.control_sequence())?;
    parser.begin(ItemKind::Style {
        attributes: vec![("mathcolor", color.to_string())],
    });
    Ok(())
}

fn text_color<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let name = invocation.control_sequence();
    let color = read_color(parser, &name)?;
    let content = parser.parse_argument(&name)?;
    let node = Node::new(NodeKind::Style, vec![content])?.with_attribute("mathcolor", color);
    parser.push_node(node);
    Ok(())
}

fn limits<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let position = match invocation.bool(0) {
        Some(true) => ScriptPosition::AboveBelow,
        _ => ScriptPosition::Right,
    };
    let name = invocation.control_sequence();
    parser.stack.top_mut().row.set_limits(position, &name)
}

const FORMS: &[&str] = &["prefix", "infix", "postfix"];

/// Attributes that `\mmlToken` accepts, with their types.
const TOKEN_OPTIONS: &[(&str, OptionType)] = &[
    ("mathvariant", OptionType::OneOf(MATHVARIANTS)),
    ("mathcolor", OptionType::String),
    ("mathbackground", OptionType::String),
    ("mathsize", OptionType::Dimension),
    ("form", OptionType::OneOf(FORMS)),
    ("fence", OptionType::Bool),
    ("separator", OptionType::Bool),
    ("stretchy", OptionType::Bool),
    ("symmetric", OptionType::Bool),
    ("largeop", OptionType::Bool),
    ("movablelimits", OptionType::Bool),
    ("accent", OptionType::Bool),
    ("lspace", OptionType::Dimension),
    ("rspace", OptionType::Dimension),
    ("minsize", OptionType::Dimension),
    ("maxsize", OptionType::Dimension),
    ("class", OptionType::String),
    ("id", OptionType::String),
    ("style", OptionType::String),
];

/// `\mmlToken{mo}[stretchy=false]{|}`
fn mml_token<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let name = invocation.control_sequence();
    let element = parser.group(&name)?.trim();
    let kind = match element {
        "mi" => NodeKind::Identifier,
        "mn" => NodeKind::Number,
        "mo" => NodeKind::Operator,
        "mtext" => NodeKind::Text,
        _ => return Err(ErrorKind::NotMathMLToken(element.to_string())),
    };
    let options = parser.optional_argument(&name)?;
    let text = parser.group(&name)?;
    let mut node = Node::token(kind, text);
    if let Some(options) = options {
        let options = parse_options(options, Some(TOKEN_OPTIONS), parser.config().strict)?;
        for (key, value) in &options {
            if let Some(&(attribute, _)) = TOKEN_OPTIONS.iter().find(|(name, _)| *name == key.as_str()) {
                node.set_attribute(attribute, value.to_attribute());
            }
        }
    }
    parser.push_node(node);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{node::NodeKind, parse};

    const BASE: &[(&str, i32)] = &[("base", 0)];

    #[test]
    fn numbers() {
        let output = parse("3.14 + 2. x^23", BASE);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        let children = output.root.children();
        assert_eq!(children[0].text_content(), Some("3.14"));
        assert_eq!(children[2].text_content(), Some("2"));
        assert_eq!(children[3].text_content(), Some("."));
        assert_eq!(children[4].kind(), NodeKind::Sup);
        assert_eq!(children[4].children()[1].text_content(), Some("2"));
        assert_eq!(children[5].text_content(), Some("3"));
    }

    #[test]
    fn symbols_and_fonts() {
        let output = parse("\\alpha \\Gamma \\mathbf{x} \\leq \\sum", BASE);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        let children = output.root.children();
        assert_eq!(children[0].text_content(), Some("α"));
        assert_eq!(children[1].attribute("mathvariant"), Some("normal"));
        assert_eq!(children[2].attribute("mathvariant"), Some("bold"));
        assert_eq!(children[3].kind(), NodeKind::Operator);
        assert_eq!(children[4].attribute("movablelimits"), Some("true"));
    }

    #[test]
    fn font_switch_ends_with_group() {
        let output = parse("{\\bf x} y", BASE);
        let children = output.root.children();
        assert_eq!(children[0].attribute("mathvariant"), Some("bold"));
        assert_eq!(children[1].attribute("mathvariant"), None);
    }

    #[test]
    fn limits_on_operators() {
        let output = parse("\\sum\\limits_0^n", BASE);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        assert_eq!(output.root.kind(), NodeKind::UnderOver);

        let output = parse("x\\limits", BASE);
        assert_eq!(output.diagnostics[0].kind, "MisplacedLimits");
    }

    #[test]
    fn roots_and_fractions() {
        let output = parse("\\sqrt[3]{x} \\dfrac12", BASE);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        let children = output.root.children();
        assert_eq!(children[0].kind(), NodeKind::Root);
        assert_eq!(children[0].children()[1].text_content(), Some("3"));
        assert_eq!(children[1].kind(), NodeKind::Style);
        assert_eq!(children[1].attribute("displaystyle"), Some("true"));
    }

    #[test]
    fn spacing() {
        let output = parse("a\\,b\\quad c\\hspace{2pt}\\mkern18mu", BASE);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        let children = output.root.children();
        assert_eq!(children[1].attribute("width"), Some("0.167em"));
        assert_eq!(children[3].attribute("width"), Some("1em"));
        assert_eq!(children[6].attribute("width"), Some("1em"));

        let output = parse("\\hspace{2}", BASE);
        assert_eq!(output.diagnostics[0].kind, "MissingDimOrUnits");
    }

    #[test]
    fn colors() {
        let output = parse("{\\color{red} x y} \\textcolor{#00ff00}{z}", BASE);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        let children = output.root.children();
        assert_eq!(children[0].kind(), NodeKind::Style);
        assert_eq!(children[0].attribute("mathcolor"), Some("red"));
        assert_eq!(children[0].children().len(), 2);
        assert_eq!(children[1].attribute("mathcolor"), Some("#00ff00"));

        let output = parse("\\color{notacolor} x", BASE);
        assert_eq!(output.diagnostics[0].kind, "UndefinedColor");
    }

    #[test]
    fn mml_token() {
        let output = parse("\\mmlToken{mo}[stretchy=false, unknown=1]{|}", BASE);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        assert_eq!(output.root.kind(), NodeKind::Operator);
        assert_eq!(output.root.attribute("stretchy"), Some("false"));
        assert_eq!(output.root.attribute("unknown"), None);

        let output = parse("\\mmlToken{mrow}{x}", BASE);
        assert_eq!(output.diagnostics[0].kind, "NotMathMLToken");
    }

    #[test]
    fn primes_and_specials() {
        let output = parse("f'' - g", BASE);
        let children = output.root.children();
        assert_eq!(children[0].kind(), NodeKind::Sup);
        assert_eq!(children[0].children()[1].text_content(), Some("″"));
        assert_eq!(children[1].text_content(), Some("−"));

        let output = parse("a # b", BASE);
        assert_eq!(output.diagnostics[0].kind, "CantUseHash1");
        assert_eq!(output.root.children().len(), 3);
    }
}
