use anyhow::Context;
use latex_mathtree::{push_mathml, Configuration, RenderConfig};

static LATEX: &str = r#"
\forall \epsilon > 0, \exists \delta > 0,
\forall x \in \mathbb{R} \qquad \abs{x - c} < \delta \implies \abs{f(x) - L} < \epsilon.
"#;

fn main() -> anyhow::Result<()> {
    let configuration = Configuration::new(&[("base", 0), ("physics", 0)])?;
    let output = configuration.parse(LATEX);
    for diagnostic in &output.diagnostics {
        eprintln!("{}: {}", diagnostic.kind, diagnostic.message);
    }

    let mut mathml = String::new();
    push_mathml(&mut mathml, &output.root, LATEX, RenderConfig::default())
        .context("rendering MathML")?;
    println!("{mathml}");
    Ok(())
}
