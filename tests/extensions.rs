use std::sync::{Arc, Mutex};

use latex_mathtree::{
    config::ParserKind,
    parse,
    parser::{InnerResult, Parser},
    register_module,
    registry::{Handler, HandlerMap, Invocation, Command, Symbol, SymbolClass},
    Configuration, ConfigurationError, ExtensionModule, NodeKind,
};

/// Register modules whose init hooks record their name, and return the recorded order for the
/// given priorities.
fn init_order(prefix: &str, modules: &[(&'static str, i32)]) -> Vec<&'static str> {
    let order = Arc::new(Mutex::new(Vec::new()));
    let mut names = Vec::new();
    for (name, priority) in modules {
        let full_name = format!("{prefix}-{name}");
        let order = Arc::clone(&order);
        let name = *name;
        register_module(
            full_name.clone(),
            ExtensionModule::new().with_init(move |_| order.lock().unwrap().push(name)),
        );
        names.push((full_name, *priority));
    }
    let names: Vec<(&str, i32)> = names.iter().map(|(n, p)| (n.as_str(), *p)).collect();
    Configuration::new(&names).unwrap();
    let order = order.lock().unwrap().clone();
    order
}

#[test]
fn init_hooks_follow_priority() {
    assert_eq!(init_order("order-ascending", &[("A", 1), ("B", 2)]), ["A", "B"]);
    assert_eq!(init_order("order-descending", &[("A", 2), ("B", 1)]), ["B", "A"]);
}

#[test]
fn equal_priorities_keep_their_order() {
    assert_eq!(init_order("order-tie", &[("A", 0), ("B", 0), ("C", -1)]), ["C", "A", "B"]);
    assert_eq!(init_order("order-tie-reversed", &[("B", 0), ("A", 0)]), ["B", "A"]);
}

#[test]
fn last_registration_wins() {
    let symbol = |text| {
        ExtensionModule::new().with_handlers([HandlerMap::new(
            "replaced-symbols",
            SymbolClass::Macro,
            [("thing", Handler::Symbol(Symbol::identifier(text)))],
        )])
    };
    register_module("replaced", symbol("first"));
    register_module("replaced", symbol("second"));
    let output = parse(r"\thing", &[("replaced", 0)]);
    assert_eq!(output.root.text_content(), Some("second"));
}

#[test]
fn unknown_module_warns() {
    let configuration = Configuration::new(&[("base", 0), ("does-not-exist", 0)]).unwrap();
    assert_eq!(configuration.warnings().len(), 1);
    assert_eq!(configuration.modules(), ["base"]);
    let output = configuration.parse("x");
    assert!(output.diagnostics.is_empty());
}

#[test]
fn parser_kind_mismatch_is_fatal() {
    let error = Configuration::builder()
        .kind(ParserKind::Text)
        .modules(&[("base", 0), ("physics", 0)])
        .build()
        .unwrap_err();
    assert!(matches!(
        error,
        ConfigurationError::ParserMismatch {
            expected: ParserKind::Tex,
            found: ParserKind::Text,
            ..
        }
    ));

    register_module(
        "text-only",
        ExtensionModule::new().for_parser(ParserKind::Text),
    );
    let output = parse("x", &[("base", 0), ("text-only", 0)]);
    assert!(output.is_fatal());
    assert_eq!(output.diagnostics[0].kind, "ParserMismatch");
    assert!(output.root.is_error());
}

fn shout<'a>(parser: &mut Parser<'a>, invocation: Invocation<'a>) -> InnerResult<()> {
    let content = parser.argument(&invocation.control_sequence())?;
    let text = content.to_uppercase();
    let text = if invocation.star { format!("{text}!") } else { text };
    parser.push_node(latex_mathtree::Node::text(text));
    Ok(())
}

#[test]
fn custom_macro() {
    register_module(
        "shouting",
        ExtensionModule::new().with_handlers([HandlerMap::new(
            "shouting-macros",
            SymbolClass::Macro,
            [("shout", Handler::Macro(Command::new(shout).starred()))],
        )]),
    );
    let output = parse(r"\shout{hey} + \shout*{you}", &[("base", 0), ("shouting", 0)]);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let children = output.root.children();
    assert_eq!(children[0].text_content(), Some("HEY"));
    assert_eq!(children[2].text_content(), Some("YOU!"));
}

#[test]
fn lower_priority_maps_take_precedence() {
    register_module(
        "alpha-override",
        ExtensionModule::new().with_handlers([HandlerMap::new(
            "alpha-override-symbols",
            SymbolClass::Macro,
            [("alpha", Handler::Symbol(Symbol::identifier("A")))],
        )]),
    );
    let output = parse(r"\alpha", &[("base", 0), ("alpha-override", -1)]);
    assert_eq!(output.root.text_content(), Some("A"));
    let output = parse(r"\alpha", &[("base", 0), ("alpha-override", 1)]);
    assert_eq!(output.root.text_content(), Some("α"));
}

#[test]
fn init_hook_can_remove_symbols() {
    register_module(
        "no-alpha",
        ExtensionModule::new().with_init(|configuration| {
            configuration
                .registry_mut()
                .remove("base-symbols", SymbolClass::Macro, "alpha");
        }),
    );
    let output = parse(r"\alpha \beta", &[("base", 0), ("no-alpha", 1)]);
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].kind, "UndefinedControlSequence");
    assert!(output.is_fatal());

    let output = parse(r"\frac{\alpha}{\beta}", &[("base", 0), ("no-alpha", 1)]);
    assert_eq!(output.diagnostics.len(), 1);
    assert!(output.root.children()[0].is_error());
    assert_eq!(output.root.children()[1].text_content(), Some("β"));

    // The catalog copy of the module is untouched.
    let output = parse(r"\alpha", &[("base", 0)]);
    assert!(output.diagnostics.is_empty());
}

#[test]
fn registry_summary() {
    let configuration = Configuration::new(&[("base", 0), ("physics", 0)]).unwrap();
    let summary = configuration.registry().to_string();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines[0], "macro: base-symbols, base-macros, physics-macros");
    assert!(lines.contains(&"letter: [fallback: base]"), "{summary}");
}

#[test]
fn builtin_letters_and_digits() {
    let output = parse("x2", &[("base", 0)]);
    let children = output.root.children();
    assert_eq!(children[0].kind(), NodeKind::Identifier);
    assert_eq!(children[1].kind(), NodeKind::Number);
}
