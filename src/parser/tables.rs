//! Character tables.

/// Whether a character is rendered as an operator (`mo`) when it appears on its own.
///
/// The ranges are those of the operator dictionary of MathML Core.
#[rustfmt::skip]
pub fn is_operator(c: char) -> bool {
    matches!(
    c,
    '\u{0021}'..='\u{0022}' | '\u{0025}'..='\u{002F}' | '\u{003A}'..='\u{0040}' | '\u{005B}'..='\u{0060}' |
    '\u{007B}'..='\u{007E}' | '\u{00A8}' | '\u{00AC}' | '\u{00AF}'..='\u{00B4}' | '\u{00B7}'..='\u{00B9}' |
    '\u{00D7}' | '\u{00F7}' | '\u{02C6}'..='\u{02C7}' | '\u{02C9}'..='\u{02CB}' | '\u{02CD}' | '\u{02D8}'..='\u{02DA}' |
    '\u{02DC}'..='\u{02DD}' | '\u{02F7}' | '\u{0302}' | '\u{0311}' | '\u{0320}' | '\u{0322}'..='\u{0323}' |
    '\u{0325}' | '\u{0327}' | '\u{032E}' | '\u{0331}' | '\u{2016}' | '\u{2018}'..='\u{201F}' | '\u{2022}' |
    '\u{2032}'..='\u{2037}' | '\u{203E}' | '\u{2043}'..='\u{2044}' | '\u{2057}' | '\u{2061}'..='\u{2064}' |
    '\u{20DB}'..='\u{20DC}' | '\u{2145}'..='\u{2146}' | '\u{2190}'..='\u{2204}' | '\u{2206}'..='\u{220D}' |
    '\u{220F}'..='\u{221D}' | '\u{221F}'..='\u{223E}' | '\u{2240}'..='\u{22A3}' | '\u{22A6}'..='\u{22B8}' |
    '\u{22BA}'..='\u{22ED}' | '\u{22F2}'..='\u{22FF}' | '\u{2301}' | '\u{2305}'..='\u{2306}' | '\u{2308}'..='\u{230B}' |
    '\u{2310}' | '\u{2319}' | '\u{2322}'..='\u{2323}' | '\u{2329}'..='\u{232A}' | '\u{237C}' | '\u{238B}' |
    '\u{23B4}'..='\u{23B5}' | '\u{23CD}' | '\u{23DC}'..='\u{23E1}' | '\u{2772}'..='\u{2773}' | '\u{2794}'..='\u{27A1}' |
    '\u{27A5}'..='\u{27AF}' | '\u{27B1}'..='\u{27BE}' | '\u{27C0}' | '\u{27C2}' | '\u{27CB}' | '\u{27CD}' |
    '\u{27E6}'..='\u{27FF}' | '\u{2900}'..='\u{2999}' | '\u{299B}'..='\u{29AF}' | '\u{29B6}'..='\u{29B9}' |
    '\u{29BC}' | '\u{29C0}'..='\u{29C1}' | '\u{29C4}'..='\u{29C8}' | '\u{29CE}'..='\u{29DB}' | '\u{29DF}' |
    '\u{29E1}'..='\u{29E6}' | '\u{29F4}'..='\u{29FD}' | '\u{2A00}'..='\u{2AEE}' | '\u{2AF2}'..='\u{2B11}' |
    '\u{2B30}'..='\u{2B4F}' | '\u{2B5A}'..='\u{2B73}' | '\u{2B76}'..='\u{2B7D}' | '\u{2B80}'..='\u{2B8F}' |
    '\u{2B94}' | '\u{2B95}' | '\u{2BA0}'..='\u{2BB8}' | '\u{2BD1}'
    )
}

/// Delimiters accepted after `\left`, `\right`, `\middle` and the `\big` family, keyed by the
/// source text of their token. `.` is the null delimiter.
#[rustfmt::skip]
pub const DELIMITERS: &[(&str, &str)] = &[
    ("(", "("), (")", ")"), ("[", "["), ("]", "]"), ("|", "|"), ("/", "/"), (".", ""),
    ("<", "⟨"), (">", "⟩"), ("\\{", "{"), ("\\}", "}"), ("\\|", "‖"),
    ("\\lparen", "("), ("\\rparen", ")"), ("\\llparenthesis", "⦇"), ("\\rrparenthesis", "⦈"),
    ("\\lgroup", "⟮"), ("\\rgroup", "⟯"),
    ("\\lbrack", "["), ("\\rbrack", "]"), ("\\lBrack", "⟦"), ("\\rBrack", "⟧"),
    ("\\lbrace", "{"), ("\\rbrace", "}"), ("\\lBrace", "⦃"), ("\\rBrace", "⦄"),
    ("\\langle", "⟨"), ("\\rangle", "⟩"), ("\\lAngle", "⟪"), ("\\rAngle", "⟫"),
    ("\\llangle", "⦉"), ("\\rrangle", "⦊"),
    ("\\lfloor", "⌊"), ("\\rfloor", "⌋"), ("\\lceil", "⌈"), ("\\rceil", "⌉"),
    ("\\ulcorner", "┌"), ("\\urcorner", "┐"), ("\\llcorner", "└"), ("\\lrcorner", "┘"),
    ("\\lmoustache", "⎰"), ("\\rmoustache", "⎱"), ("\\backslash", "\\"),
    ("\\vert", "|"), ("\\lvert", "|"), ("\\rvert", "|"),
    ("\\Vert", "‖"), ("\\lVert", "‖"), ("\\rVert", "‖"),
    ("\\uparrow", "↑"), ("\\Uparrow", "⇑"), ("\\downarrow", "↓"), ("\\Downarrow", "⇓"),
    ("\\updownarrow", "↕"), ("\\Updownarrow", "⇕"),
];

/// Whether a character is one of the glyphs of [`DELIMITERS`].
pub fn is_delimiter_char(c: char) -> bool {
    let mut buf = [0; 4];
    let c: &str = c.encode_utf8(&mut buf);
    DELIMITERS.iter().any(|(_, glyph)| *glyph == c)
}

/// Returns whether the given string is a valid primitive color.
///
/// Named colors come from the [MDN docs](https://developer.mozilla.org/en-US/docs/Web/CSS/named-color#value),
/// which is a list of about 150 official css color names.
pub fn is_primitive_color(color: &str) -> bool {
    color.starts_with('#')
        && color.len() == 7
        && color.as_bytes()[1..].iter().all(|&c| c.is_ascii_hexdigit())
        || matches!(
            color,
            "aliceblue"
                | "antiquewhite"
                | "aqua"
                | "aquamarine"
                | "azure"
                | "beige"
                | "bisque"
                | "black"
                | "blanchedalmond"
                | "blue"
                | "blueviolet"
                | "brown"
                | "burlywood"
                | "cadetblue"
                | "chartreuse"
                | "chocolate"
                | "coral"
                | "cornflowerblue"
                | "cornsilk"
                | "crimson"
                | "cyan"
                | "darkblue"
                | "darkcyan"
                | "darkgoldenrod"
                | "darkgray"
                | "darkgreen"
                | "darkgrey"
                | "darkkhaki"
                | "darkmagenta"
                | "darkolivegreen"
                | "darkorange"
                | "darkorchid"
                | "darkred"
                | "darksalmon"
                | "darkseagreen"
                | "darkslateblue"
                | "darkslategray"
                | "darkslategrey"
                | "darkturquoise"
                | "darkviolet"
                | "deeppink"
                | "deepskyblue"
                | "dimgray"
                | "dimgrey"
                | "dodgerblue"
                | "firebrick"
                | "floralwhite"
                | "forestgreen"
                | "fuchsia"
                | "gainsboro"
                | "ghostwhite"
                | "gold"
                | "goldenrod"
                | "gray"
                | "green"
                | "greenyellow"
                | "grey"
                | "honeydew"
                | "hotpink"
                | "indianred"
                | "indigo"
                | "ivory"
                | "khaki"
                | "lavender"
                | "lavenderblush"
                | "lawngreen"
                | "lemonchiffon"
                | "lightblue"
                | "lightcoral"
                | "lightcyan"
                | "lightgoldenrodyellow"
                | "lightgray"
                | "lightgreen"
                | "lightgrey"
                | "lightpink"
                | "lightsalmon"
                | "lightseagreen"
                | "lightskyblue"
                | "lightslategray"
                | "lightslategrey"
                | "lightsteelblue"
                | "lightyellow"
                | "lime"
                | "limegreen"
                | "linen"
                | "magenta"
                | "maroon"
                | "mediumaquamarine"
                | "mediumblue"
                | "mediumorchid"
                | "mediumpurple"
                | "mediumseagreen"
                | "mediumslateblue"
                | "mediumspringgreen"
                | "mediumturquoise"
                | "mediumvioletred"
                | "midnightblue"
                | "mintcream"
                | "mistyrose"
                | "moccasin"
                | "navajowhite"
                | "navy"
                | "oldlace"
                | "olive"
                | "olivedrab"
                | "orange"
                | "orangered"
                | "orchid"
                | "palegoldenrod"
                | "palegreen"
                | "paleturquoise"
                | "palevioletred"
                | "papayawhip"
                | "peachpuff"
                | "peru"
                | "pink"
                | "plum"
                | "powderblue"
                | "purple"
                | "rebeccapurple"
                | "red"
                | "rosybrown"
                | "royalblue"
                | "saddlebrown"
                | "salmon"
                | "sandybrown"
                | "seagreen"
                | "seashell"
                | "sienna"
                | "silver"
                | "skyblue"
                | "slateblue"
                | "slategray"
                | "slategrey"
                | "snow"
                | "springgreen"
                | "steelblue"
                | "tan"
                | "teal"
                | "thistle"
                | "tomato"
                | "transparent"
                | "turquoise"
                | "violet"
                | "wheat"
                | "white"
                | "whitesmoke"
                | "yellow"
                | "yellowgreen"
        )
}

#[cfg(test)]
mod tests {
    use super::{is_delimiter_char, is_operator, is_primitive_color};

    #[test]
    fn character_tables() {
        assert!(is_operator('+'));
        assert!(is_operator('∑'));
        assert!(!is_operator('a'));
        assert!(is_delimiter_char('⟨'));
        assert!(!is_delimiter_char('a'));
    }

    #[test]
    fn colors() {
        assert!(is_primitive_color("#ff00ff"));
        assert!(is_primitive_color("teal"));
        assert!(!is_primitive_color("#ff00f"));
        assert!(!is_primitive_color("notacolor"));
    }
}
