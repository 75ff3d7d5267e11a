use latex_mathtree::{parse, Configuration, ParserConfig, Severity};

const MODULES: &[(&str, i32)] = &[("base", 0), ("newcommand", 0), ("physics", 0)];

/// Every input must produce a first diagnostic of the given kind.
macro_rules! should_error {
    ($name:ident, $kind:literal, $($input:literal),+ $(,)?) => {
        #[test]
        fn $name() {
            for input in [$($input),*] {
                let output = parse(input, MODULES);
                let first = output.diagnostics.first();
                assert_eq!(
                    first.map(|d| d.kind),
                    Some($kind),
                    "unexpected diagnostics for input {input:?}: {:?}",
                    output.diagnostics
                );
            }
        }
    };
}

should_error! {
    double_scripts,
    "DoubleExponent",
    r"a^b^c",
    r"a^b_c^d",
    r"a'^b^c",
}

should_error! {
    double_subscripts,
    "DoubleSubscripts",
    r"a_b_c",
    r"a_b^c_d",
}

should_error! {
    unclosed_groups,
    "StackNotEmpty",
    r"{",
    r"\left( x",
    r"\begin{matrix} a",
    r"\frac{a",
    r"\sqrt{x + y",
    r"\frac{a}{\sqrt{b}",
    r"\qty{x",
    r"\def\a#1{#1} \a{x",
}

should_error! {
    extra_close,
    "ExtraCloseMissingOpen",
    r"a}",
    r"\frac}",
}

should_error! {
    unrecognized_delimiters,
    "MissingOrUnrecognizedDelim",
    r"\left a \right)",
    r"\big x",
    r"\quantity\bigg\sin",
}

should_error! {
    misplaced,
    "Misplaced",
    r"a & b",
    r"a \\ b",
    r"\hline",
}

should_error! {
    math_shift_and_hash,
    "MathShift",
    r"a $ b",
}

should_error! {
    recursive_macros,
    "MaxMacroSub1",
    r"\def\a{\a} \a",
    r"\newcommand{\b}{x\b} \b",
}

#[test]
fn quantity_error_is_contained() {
    let output = parse(r"\quantity\bigg\sin", MODULES);
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].severity, Severity::Local);
    assert!(output.root.is_error());
    assert_eq!(
        output.root.text_content(),
        Some("Missing or unrecognized delimiter for \\bigg")
    );
}

#[test]
fn unmatched_open_group() {
    for input in [r"a + {b", r"\frac{a", r"x + \sqrt{x + y", r"\eval{x"] {
        let output = parse(input, MODULES);
        assert_eq!(output.diagnostics.len(), 1, "{input}: {:?}", output.diagnostics);
        assert_eq!(output.diagnostics[0].kind, "StackNotEmpty");
        assert_eq!(output.diagnostics[0].severity, Severity::Fatal);
        assert!(output.is_fatal());
        assert!(output.root.is_error(), "{input}");
    }
}

#[test]
fn undefined_control_sequences() {
    let output = parse(r"\nope + b", MODULES);
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].kind, "UndefinedControlSequence");
    assert!(output.is_fatal());
    assert!(output.root.is_error());

    let output = parse(r"\dmat{1,\nope} + b", MODULES);
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].severity, Severity::Local);
    assert!(!output.root.is_error());
}

#[test]
fn parsing_continues_after_local_errors() {
    let output = parse(r"\frac{\nope}{c} + \frac{a}{\undefined} - b", MODULES);
    assert_eq!(output.diagnostics.len(), 2);
    let children = output.root.children();
    assert!(children[0].children()[0].is_error());
    assert_eq!(children[2].children()[1].kind(), latex_mathtree::NodeKind::Error);
    assert_eq!(children.last().and_then(|n| n.text_content()), Some("b"));
    assert_eq!(output.root.errors().len(), 2);
}

#[test]
fn strict_mode_aborts() {
    let configuration = Configuration::builder()
        .modules(MODULES)
        .config(ParserConfig {
            strict: true,
            ..ParserConfig::default()
        })
        .build()
        .unwrap();
    let output = configuration.parse(r"a + \frac{\nope}{b}");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].kind, "UndefinedControlSequence");
    assert!(output.root.is_error());
}

#[test]
fn custom_messages() {
    let mut config = ParserConfig::default();
    config
        .messages
        .insert("UndefinedControlSequence", "Commande inconnue : %1".to_string());
    let configuration = Configuration::builder()
        .modules(MODULES)
        .config(config)
        .build()
        .unwrap();
    let output = configuration.parse(r"\nope");
    assert_eq!(output.diagnostics[0].message, "Commande inconnue : \\nope");
    assert_eq!(output.root.text_content(), Some("Commande inconnue : \\nope"));
}

#[test]
fn nesting_limit() {
    let configuration = Configuration::builder()
        .modules(MODULES)
        .config(ParserConfig {
            max_depth: 3,
            ..ParserConfig::default()
        })
        .build()
        .unwrap();
    let output = configuration.parse(r"\frac{\frac{\frac{\frac{a}{b}}{c}}{d}}{e}");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].kind, "MaxNesting");
    assert!(output.is_fatal());
}

#[test]
fn diagnostics_are_deterministic() {
    let source = r"\frac{a}{ + \left( \bigg x \abs*{y} \pmat{aa}";
    let first = parse(source, MODULES);
    let second = parse(source, MODULES);
    assert_eq!(first, second);
}
