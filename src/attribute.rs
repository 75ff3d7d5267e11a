//! Attribute values shared by the parser and the output tree.

use std::fmt;

pub type Dimension = (f32, DimensionUnit);
pub type Glue = (Dimension, Option<Dimension>, Option<Dimension>);

/// Fonts, written out as the `mathvariant` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    BoldScript,
    BoldItalic,
    Bold,
    Fraktur,
    Script,
    Monospace,
    SansSerif,
    DoubleStruck,
    Italic,
    BoldFraktur,
    SansSerifBoldItalic,
    SansSerifItalic,
    BoldSansSerif,
    UpRight,
}

impl Font {
    /// The value of the `mathvariant` attribute for this font.
    pub const fn mathvariant(self) -> &'static str {
        match self {
            Font::BoldScript => "bold-script",
            Font::BoldItalic => "bold-italic",
            Font::Bold => "bold",
            Font::Fraktur => "fraktur",
            Font::Script => "script",
            Font::Monospace => "monospace",
            Font::SansSerif => "sans-serif",
            Font::DoubleStruck => "double-struck",
            Font::Italic => "italic",
            Font::BoldFraktur => "bold-fraktur",
            Font::SansSerifBoldItalic => "sans-serif-bold-italic",
            Font::SansSerifItalic => "sans-serif-italic",
            Font::BoldSansSerif => "bold-sans-serif",
            Font::UpRight => "normal",
        }
    }

    /// Parse a `mathvariant` attribute value.
    pub fn from_mathvariant(value: &str) -> Option<Self> {
        Some(match value {
            "bold-script" => Font::BoldScript,
            "bold-italic" => Font::BoldItalic,
            "bold" => Font::Bold,
            "fraktur" => Font::Fraktur,
            "script" => Font::Script,
            "monospace" => Font::Monospace,
            "sans-serif" => Font::SansSerif,
            "double-struck" => Font::DoubleStruck,
            "italic" => Font::Italic,
            "bold-fraktur" => Font::BoldFraktur,
            "sans-serif-bold-italic" => Font::SansSerifBoldItalic,
            "sans-serif-italic" => Font::SansSerifItalic,
            "bold-sans-serif" => Font::BoldSansSerif,
            "normal" => Font::UpRight,
            _ => return None,
        })
    }
}

/// Every `mathvariant` value understood by [`Font::from_mathvariant`].
pub const MATHVARIANTS: &[&str] = &[
    "normal",
    "bold",
    "italic",
    "bold-italic",
    "double-struck",
    "bold-fraktur",
    "script",
    "bold-script",
    "fraktur",
    "sans-serif",
    "bold-sans-serif",
    "sans-serif-italic",
    "sans-serif-bold-italic",
    "monospace",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimensionUnit {
    Em,
    Ex,
    Pt,
    Pc,
    In,
    Bp,
    Cm,
    Mm,
    Dd,
    Cc,
    Sp,
    Mu,
}

impl DimensionUnit {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DimensionUnit::Em => "em",
            DimensionUnit::Ex => "ex",
            DimensionUnit::Pt => "pt",
            DimensionUnit::Pc => "pc",
            DimensionUnit::In => "in",
            DimensionUnit::Bp => "bp",
            DimensionUnit::Cm => "cm",
            DimensionUnit::Mm => "mm",
            DimensionUnit::Dd => "dd",
            DimensionUnit::Cc => "cc",
            DimensionUnit::Sp => "sp",
            DimensionUnit::Mu => "mu",
        }
    }
}

/// Convert TeX units to CSS units.
///
/// This makes use of the conversion table in the TeXbook, p. 57.
/// Notably: TeX pt == 72.27 / 72.0 CSS pt
pub fn tex_to_css_units(dim: Dimension) -> Dimension {
    match dim.1 {
        DimensionUnit::Pt => (dim.0 * 72.27 / 72., DimensionUnit::Pt),
        DimensionUnit::Pc => (dim.0 * 12. * 72.27 / 72., DimensionUnit::Pt),
        DimensionUnit::Bp => (dim.0, DimensionUnit::Pt),
        DimensionUnit::Dd => (dim.0 * 72.27 * 1238. / (1157. * 72.), DimensionUnit::Pt),
        DimensionUnit::Cc => (
            dim.0 * 12. * 72.27 * 1238. / (1157. * 72.),
            DimensionUnit::Pt,
        ),
        DimensionUnit::Sp => (dim.0 * 72.27 / (72. * 65536.), DimensionUnit::Pt),
        DimensionUnit::Mu => (dim.0 / 18., DimensionUnit::Em),
        DimensionUnit::Em
        | DimensionUnit::Ex
        | DimensionUnit::In
        | DimensionUnit::Cm
        | DimensionUnit::Mm => dim,
    }
}

/// A length ready to be written as an attribute value.
///
/// Values are written with at most three decimals and no trailing zeros, so `2.470em` is written
/// as `2.47em` and `1/6 em` as `0.167em`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length(pub Dimension);

impl Length {
    pub fn em(value: f32) -> Self {
        Self((value, DimensionUnit::Em))
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (value, unit) = tex_to_css_units(self.0);
        if value.abs() < 0.0006 {
            return write!(f, "0{}", unit.as_str());
        }
        let fixed = format!("{value:.3}");
        let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
        write!(f, "{trimmed}{}", unit.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{DimensionUnit, Font, Length};

    #[test]
    fn em_lengths() {
        assert_eq!(Length::em(1.2).to_string(), "1.2em");
        assert_eq!(Length::em(2.470).to_string(), "2.47em");
        assert_eq!(Length::em(3. / 18.).to_string(), "0.167em");
        assert_eq!(Length::em(-1.).to_string(), "-1em");
        assert_eq!(Length::em(0.).to_string(), "0em");
    }

    #[test]
    fn converted_lengths() {
        assert_eq!(Length((18., DimensionUnit::Mu)).to_string(), "1em");
        assert_eq!(Length((72., DimensionUnit::Bp)).to_string(), "72pt");
    }

    #[test]
    fn mathvariant_round_trip() {
        for variant in super::MATHVARIANTS {
            let font = Font::from_mathvariant(variant).unwrap();
            assert_eq!(font.mathvariant(), *variant);
        }
    }
}
