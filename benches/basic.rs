use criterion::{criterion_group, criterion_main, Criterion};
use latex_mathtree::{push_mathml, Configuration};

const MODULES: &[(&str, i32)] = &[("base", 0), ("newcommand", 0), ("tags", 0), ("physics", 0)];

fn render(configuration: &Configuration, source: &str) -> String {
    let output = configuration.parse(source);
    let mut string = String::new();
    push_mathml(&mut string, &output.root, source, Default::default()).unwrap();
    string
}

fn match_on_greek(c: &mut Criterion) {
    let configuration = Configuration::new(MODULES).unwrap();
    let source = r"
\alpha \beta \gamma \delta \epsilon \zeta \eta \theta
\iota \kappa \lambda \mu \nu \xi \omicron \pi
\rho \sigma \tau \upsilon \phi \chi \psi \omega
\Gamma \Delta \Theta \Lambda \Xi \Pi \Sigma \Upsilon \Phi \Psi \Omega
\varGamma \varDelta \varTheta \varLambda \varXi \varPi \varSigma \varUpsilon \varPhi \varPsi \varOmega
\varepsilon \vartheta \varkappa \varrho \varsigma \varpi \varphi
\alpha \beta \gamma \delta \epsilon \zeta \eta \theta
\iota \kappa \lambda \mu \nu \xi \omicron \pi
\rho \sigma \tau \upsilon \phi \chi \psi \omega
";
    c.bench_function("match on greek", |b| b.iter(|| render(&configuration, source)));
}

fn subscript_torture(c: &mut Criterion) {
    let configuration = Configuration::new(MODULES).unwrap();
    c.bench_function("subscript torture", |b| {
        b.iter(|| render(&configuration, "a_{5_{5_{5_{5_{5_{5_{5_{5_{5_{5_{5_5}}}}}}}}}}}"))
    });
}

fn basic_macro(c: &mut Criterion) {
    let configuration = Configuration::new(MODULES).unwrap();
    let source = r"\def\d{\mathrm{d}}
        \oint_C \vec{B}\circ \d\vec{l} = \mu_0 \left( I_{\text{enc}}
        + \varepsilon_0 \frac{\d}{\d t} \int_S {\vec{E} \circ \hat{n}}\;
        \d a \right)";
    c.bench_function("basic macro", |b| b.iter(|| render(&configuration, source)));
}

fn physics_matrices(c: &mut Criterion) {
    let configuration = Configuration::new(MODULES).unwrap();
    let source = r"\mqty(\dmat{1,\pmat{2},3}) \qty\Big[\abs{x} + \norm*{v}] \eval{f(x)}_0^1";
    c.bench_function("physics matrices", |b| b.iter(|| render(&configuration, source)));
}

criterion_group!(benches, basic_macro, match_on_greek, subscript_torture, physics_matrices);
criterion_main!(benches);
