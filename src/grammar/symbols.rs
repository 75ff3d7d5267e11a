//! Control sequences that stand for a single symbol.
use crate::registry::{Handler, Symbol};

const fn mi(text: &'static str) -> Handler {
    Handler::Symbol(Symbol::identifier(text))
}

/// Upright identifiers, such as uppercase Greek letters.
const fn upright(text: &'static str) -> Handler {
    Handler::Symbol(Symbol::identifier(text).with_attributes(&[("mathvariant", "normal")]))
}

const fn mo(text: &'static str) -> Handler {
    Handler::Symbol(Symbol::operator(text))
}

/// Large operators whose limits go above and below in display style.
const fn big_op(text: &'static str) -> Handler {
    Handler::Symbol(
        Symbol::operator(text).with_attributes(&[("largeop", "true"), ("movablelimits", "true")]),
    )
}

const fn integral(text: &'static str) -> Handler {
    Handler::Symbol(Symbol::operator(text).with_attributes(&[("largeop", "true")]))
}

#[rustfmt::skip]
pub(crate) const GREEK: &[(&str, Handler)] = &[
    ("alpha", mi("α")), ("beta", mi("β")), ("gamma", mi("γ")), ("delta", mi("δ")),
    ("epsilon", mi("ϵ")), ("varepsilon", mi("ε")), ("zeta", mi("ζ")), ("eta", mi("η")),
    ("theta", mi("θ")), ("vartheta", mi("ϑ")), ("iota", mi("ι")), ("kappa", mi("κ")),
    ("varkappa", mi("ϰ")), ("lambda", mi("λ")), ("mu", mi("μ")), ("nu", mi("ν")),
    ("xi", mi("ξ")), ("omicron", mi("ο")), ("pi", mi("π")), ("varpi", mi("ϖ")),
    ("rho", mi("ρ")), ("varrho", mi("ϱ")), ("sigma", mi("σ")), ("varsigma", mi("ς")),
    ("tau", mi("τ")), ("upsilon", mi("υ")), ("phi", mi("ϕ")), ("varphi", mi("φ")),
    ("chi", mi("χ")), ("psi", mi("ψ")), ("omega", mi("ω")),
    ("Gamma", upright("Γ")), ("Delta", upright("Δ")), ("Theta", upright("Θ")),
    ("Lambda", upright("Λ")), ("Xi", upright("Ξ")), ("Pi", upright("Π")),
    ("Sigma", upright("Σ")), ("Upsilon", upright("Υ")), ("Phi", upright("Φ")),
    ("Psi", upright("Ψ")), ("Omega", upright("Ω")),
    ("varGamma", mi("Γ")), ("varDelta", mi("Δ")), ("varTheta", mi("Θ")),
    ("varLambda", mi("Λ")), ("varXi", mi("Ξ")), ("varPi", mi("Π")),
    ("varSigma", mi("Σ")), ("varUpsilon", mi("Υ")), ("varPhi", mi("Φ")),
    ("varPsi", mi("Ψ")), ("varOmega", mi("Ω")),
];

#[rustfmt::skip]
pub(crate) const LETTERLIKE: &[(&str, Handler)] = &[
    ("aleph", mi("ℵ")), ("beth", mi("ℶ")), ("gimel", mi("ℷ")), ("daleth", mi("ℸ")),
    ("eth", mi("ð")), ("ell", mi("ℓ")), ("nabla", upright("∇")), ("partial", upright("∂")),
    ("Finv", mi("Ⅎ")), ("Game", mi("⅁")), ("hbar", mi("ℏ")), ("hslash", mi("ℏ")),
    ("imath", mi("ı")), ("jmath", mi("ȷ")), ("Im", mi("ℑ")), ("Re", mi("ℜ")),
    ("wp", mi("℘")), ("Bbbk", mi("𝕜")), ("Angstrom", mi("Å")), ("backepsilon", mi("϶")),
    ("infty", upright("∞")), ("emptyset", upright("∅")), ("varnothing", upright("⌀")),
    ("angle", upright("∠")), ("top", upright("⊤")), ("bot", upright("⊥")),
    ("triangle", upright("△")), ("Box", upright("□")), ("Diamond", upright("◊")),
    ("flat", upright("♭")), ("natural", upright("♮")), ("sharp", upright("♯")),
    ("clubsuit", upright("♣")), ("diamondsuit", upright("♢")),
    ("heartsuit", upright("♡")), ("spadesuit", upright("♠")),
    ("prime", mo("′")), ("dprime", mo("″")), ("trprime", mo("‴")), ("qprime", mo("⁗")),
    ("backprime", mo("‵")), ("backdprime", mo("‶")), ("backtrprime", mo("‷")),
];

#[rustfmt::skip]
pub(crate) const BINARY: &[(&str, Handler)] = &[
    ("pm", mo("±")), ("mp", mo("∓")), ("times", mo("×")), ("div", mo("÷")),
    ("cdot", mo("⋅")), ("cdotp", mo("·")), ("centerdot", mo("·")), ("ldotp", mo(".")),
    ("ast", mo("∗")), ("star", mo("⋆")), ("circ", mo("∘")), ("bullet", mo("∙")),
    ("bigcirc", mo("◯")), ("setminus", mo("∖")), ("smallsetminus", mo("∖")),
    ("cap", mo("∩")), ("cup", mo("∪")), ("Cap", mo("⋒")), ("Cup", mo("⋓")),
    ("doublecap", mo("⋒")), ("doublecup", mo("⋓")), ("sqcap", mo("⊓")), ("sqcup", mo("⊔")),
    ("uplus", mo("⊎")), ("wedge", mo("∧")), ("land", mo("∧")), ("vee", mo("∨")),
    ("lor", mo("∨")), ("veebar", mo("⊻")), ("barwedge", mo("⌅")),
    ("doublebarwedge", mo("⩞")), ("curlyvee", mo("⋎")), ("curlywedge", mo("⋏")),
    ("oplus", mo("⊕")), ("ominus", mo("⊖")), ("otimes", mo("⊗")), ("oslash", mo("⊘")),
    ("odot", mo("⊙")), ("circledast", mo("⊛")), ("circledcirc", mo("⊚")),
    ("circleddash", mo("⊝")), ("boxplus", mo("⊞")), ("boxminus", mo("⊟")),
    ("boxtimes", mo("⊠")), ("boxdot", mo("⊡")), ("dotplus", mo("∔")),
    ("divideontimes", mo("⋇")), ("ltimes", mo("⋉")), ("rtimes", mo("⋊")),
    ("leftthreetimes", mo("⋋")), ("rightthreetimes", mo("⋌")), ("amalg", mo("⨿")),
    ("wr", mo("≀")), ("intercal", mo("⊺")), ("lhd", mo("⊲")), ("rhd", mo("⊳")),
    ("unlhd", mo("⊴")), ("unrhd", mo("⊵")), ("dagger", mo("†")), ("ddagger", mo("‡")),
    ("And", mo("&")), ("sslash", mo("⫽")), ("lessdot", mo("⋖")), ("gtrdot", mo("⋗")),
];

#[rustfmt::skip]
pub(crate) const RELATIONS: &[(&str, Handler)] = &[
    ("leq", mo("≤")), ("le", mo("≤")), ("geq", mo("≥")), ("ge", mo("≥")),
    ("neq", mo("≠")), ("ne", mo("≠")), ("ll", mo("≪")), ("gg", mo("≫")),
    ("lll", mo("⋘")), ("ggg", mo("⋙")), ("leqq", mo("≦")), ("geqq", mo("≧")),
    ("leqslant", mo("⩽")), ("geqslant", mo("⩾")), ("lesssim", mo("≲")), ("gtrsim", mo("≳")),
    ("prec", mo("≺")), ("succ", mo("≻")), ("preceq", mo("⪯")), ("succeq", mo("⪰")),
    ("sim", mo("∼")), ("simeq", mo("≃")), ("backsim", mo("∽")), ("backsimeq", mo("⋍")),
    ("cong", mo("≅")), ("approx", mo("≈")), ("approxeq", mo("≊")), ("asymp", mo("≍")),
    ("equiv", mo("≡")), ("doteq", mo("≐")), ("propto", mo("∝")), ("between", mo("≬")),
    ("models", mo("⊨")), ("vdash", mo("⊢")), ("dashv", mo("⊣")), ("perp", mo("⊥")),
    ("mid", mo("∣")), ("nmid", mo("∤")), ("parallel", mo("∥")), ("nparallel", mo("∦")),
    ("bowtie", mo("⋈")), ("Join", mo("⋈")), ("smile", mo("⌣")), ("frown", mo("⌢")),
    ("in", mo("∈")), ("notin", mo("∉")), ("ni", mo("∋")), ("notni", mo("∌")),
    ("subset", mo("⊂")), ("supset", mo("⊃")), ("subseteq", mo("⊆")), ("supseteq", mo("⊇")),
    ("subsetneq", mo("⊊")), ("supsetneq", mo("⊋")), ("sqsubset", mo("⊏")),
    ("sqsupset", mo("⊐")), ("sqsubseteq", mo("⊑")), ("sqsupseteq", mo("⊒")),
    ("nless", mo("≮")), ("ngtr", mo("≯")), ("nleq", mo("≰")), ("ngeq", mo("≱")),
    ("nsim", mo("≁")), ("ncong", mo("≇")), ("colon", mo(":")), ("coloneqq", mo("≔")),
];

#[rustfmt::skip]
pub(crate) const ARROWS: &[(&str, Handler)] = &[
    ("leftarrow", mo("←")), ("gets", mo("←")), ("rightarrow", mo("→")), ("to", mo("→")),
    ("leftrightarrow", mo("↔")), ("uparrow", mo("↑")), ("downarrow", mo("↓")),
    ("updownarrow", mo("↕")), ("Leftarrow", mo("⇐")), ("Rightarrow", mo("⇒")),
    ("Leftrightarrow", mo("⇔")), ("Uparrow", mo("⇑")), ("Downarrow", mo("⇓")),
    ("Updownarrow", mo("⇕")), ("longleftarrow", mo("⟵")), ("longrightarrow", mo("⟶")),
    ("longleftrightarrow", mo("⟷")), ("Longleftarrow", mo("⟸")),
    ("Longrightarrow", mo("⟹")), ("Longleftrightarrow", mo("⟺")),
    ("implies", mo("⟹")), ("impliedby", mo("⟸")), ("iff", mo("⟺")),
    ("mapsto", mo("↦")), ("longmapsto", mo("⟼")), ("hookleftarrow", mo("↩")),
    ("hookrightarrow", mo("↪")), ("nearrow", mo("↗")), ("searrow", mo("↘")),
    ("swarrow", mo("↙")), ("nwarrow", mo("↖")), ("leftharpoonup", mo("↼")),
    ("leftharpoondown", mo("↽")), ("rightharpoonup", mo("⇀")),
    ("rightharpoondown", mo("⇁")), ("rightleftharpoons", mo("⇌")),
    ("leftrightharpoons", mo("⇋")), ("leadsto", mo("⇝")), ("strictif", mo("⥽")),
    ("strictfi", mo("⥼")),
];

#[rustfmt::skip]
pub(crate) const LOGIC: &[(&str, Handler)] = &[
    ("forall", mo("∀")), ("exists", mo("∃")), ("nexists", mo("∄")), ("neg", mo("¬")),
    ("lnot", mo("¬")), ("complement", mo("∁")), ("therefore", mo("∴")),
    ("because", mo("∵")),
];

#[rustfmt::skip]
pub(crate) const DOTS: &[(&str, Handler)] = &[
    ("ldots", mo("…")), ("dots", mo("…")), ("dotsc", mo("…")), ("dotso", mo("…")),
    ("cdots", mo("⋯")), ("dotsb", mo("⋯")), ("dotsm", mo("⋯")), ("dotsi", mo("⋯")),
    ("vdots", mo("⋮")), ("ddots", mo("⋱")), ("iddots", mo("⋰")),
];

#[rustfmt::skip]
pub(crate) const LARGE_OPERATORS: &[(&str, Handler)] = &[
    ("sum", big_op("∑")), ("prod", big_op("∏")), ("coprod", big_op("∐")),
    ("bigoplus", big_op("⨁")), ("bigotimes", big_op("⨂")), ("bigodot", big_op("⨀")),
    ("bigvee", big_op("⋁")), ("bigwedge", big_op("⋀")), ("bigcap", big_op("⋂")),
    ("bigcup", big_op("⋃")), ("biguplus", big_op("⨄")), ("bigsqcup", big_op("⨆")),
    ("bigsqcap", big_op("⨅")), ("bigtimes", big_op("⨉")),
    ("int", integral("∫")), ("intop", integral("∫")), ("smallint", mo("∫")),
    ("iint", integral("∬")), ("iiint", integral("∭")), ("iiiint", integral("⨌")),
    ("oint", integral("∮")), ("oiint", integral("∯")), ("oiiint", integral("∰")),
    ("intclockwise", integral("∱")), ("varointclockwise", integral("∲")),
    ("intcap", integral("⨙")), ("intcup", integral("⨚")), ("fint", integral("⨏")),
    ("sqint", integral("⨖")), ("intbar", integral("⨍")), ("intBar", integral("⨎")),
];

/// Every symbol table, in lookup order.
pub(crate) const ALL: &[&[(&str, Handler)]] = &[
    GREEK,
    LETTERLIKE,
    BINARY,
    RELATIONS,
    ARROWS,
    LOGIC,
    DOTS,
    LARGE_OPERATORS,
];
