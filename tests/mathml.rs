use latex_mathtree::{
    config::{DisplayMode, RenderConfig},
    parse, write_mathml,
};

const MODULES: &[(&str, i32)] = &[("base", 0), ("tags", 0), ("physics", 0)];

fn render(source: &str, config: RenderConfig) -> String {
    let output = parse(source, MODULES);
    let mut bytes = Vec::new();
    write_mathml(&mut bytes, &output.root, source, config).unwrap();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn matrix_with_fences() {
    let html = render(r"\begin{pmatrix} 1 & 0 \\ 0 & 1 \end{pmatrix}", RenderConfig::default());
    assert_eq!(
        html,
        "<math><mrow>\
         <mo fence=\"true\" form=\"prefix\" stretchy=\"true\">(</mo>\
         <mtable columnalign=\"center center\">\
         <mtr><mtd><mn>1</mn></mtd><mtd><mn>0</mn></mtd></mtr>\
         <mtr><mtd><mn>0</mn></mtd><mtd><mn>1</mn></mtd></mtr>\
         </mtable>\
         <mo fence=\"true\" form=\"postfix\" stretchy=\"true\">)</mo>\
         </mrow></math>"
    );
}

#[test]
fn labeled_equation() {
    let html = render(r"\begin{equation} E = mc^2 \end{equation}", RenderConfig::default());
    assert!(html.starts_with("<math><mtable side=\"right\"><mlabeledtr><mtd><mtext>(1)</mtext></mtd>"), "{html}");
    assert!(html.contains("<msup><mi>c</mi><mn>2</mn></msup>"), "{html}");
}

#[test]
fn display_mode_picks_choice() {
    let inline = render(r"\abs{\frac{a}{b}}", RenderConfig::default());
    let block = render(
        r"\abs{\frac{a}{b}}",
        RenderConfig {
            display_mode: DisplayMode::Block,
            ..RenderConfig::default()
        },
    );
    assert!(block.starts_with("<math display=\"block\">"));
    assert_eq!(inline.replace("<math>", "<math display=\"block\">"), block);

    let script = render(r"x^{\abs{y}}", RenderConfig::default());
    assert!(script.contains("stretchy=\"false\""), "{script}");
}

#[test]
fn sized_delimiter_attributes() {
    let html = render(r"\bigl( x \bigr)", RenderConfig::default());
    assert!(html.contains(
        "<mo form=\"prefix\" maxsize=\"1.2em\" minsize=\"1.2em\" stretchy=\"true\" symmetric=\"true\">(</mo>"
    ), "{html}");
}
