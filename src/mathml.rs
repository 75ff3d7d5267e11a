//! Writing a [`Node`] tree as `MathML`.
//!
//! The output follows _MathML Core_. Choice nodes are resolved while writing: the display, text,
//! or script alternative is chosen from the display mode and the script level at the position
//! of the node.
use std::io;

use crate::{
    config::{DisplayMode, RenderConfig},
    node::{Node, NodeKind},
};

/// The style in effect at a position of the tree.
#[derive(Debug, Clone, Copy)]
struct Style {
    display: bool,
    level: usize,
}

impl Style {
    fn script(self) -> Self {
        Self {
            display: false,
            level: self.level + 1,
        }
    }

    fn fraction(self) -> Self {
        if self.display {
            Self {
                display: false,
                level: self.level,
            }
        } else {
            self.script()
        }
    }

    fn choice(self) -> usize {
        match (self.display, self.level) {
            (_, 1..) => 2,
            (true, 0) => 0,
            (false, 0) => 1,
        }
    }
}

struct MathmlWriter<'s, W> {
    writer: W,
    source: &'s str,
    config: RenderConfig,
}

impl<'s, W: io::Write> MathmlWriter<'s, W> {
    fn new(writer: W, source: &'s str, config: RenderConfig) -> Self {
        Self {
            writer,
            source,
            config,
        }
    }

    fn write(mut self, root: &Node) -> io::Result<()> {
        self.writer.write_all(b"<math")?;
        if self.config.xml {
            self.writer
                .write_all(b" xmlns=\"http://www.w3.org/1998/Math/MathML\"")?;
        }
        let display = self.config.display_mode == DisplayMode::Block;
        if display {
            self.writer.write_all(b" display=\"block\"")?;
        }
        self.writer.write_all(b">")?;

        let style = Style { display, level: 0 };
        if self.config.annotate {
            self.writer.write_all(b"<semantics><mrow>")?;
            self.node(root, style)?;
            self.writer.write_all(b"</mrow><annotation encoding=\"application/x-tex\">")?;
            self.escaped(self.source)?;
            self.writer.write_all(b"</annotation></semantics>")?;
        } else {
            self.node(root, style)?;
        }
        self.writer.write_all(b"</math>")
    }

    fn node(&mut self, node: &Node, style: Style) -> io::Result<()> {
        let kind = node.kind();
        if kind == NodeKind::Choice {
            return match node.children().get(style.choice()) {
                Some(child) => self.node(child, style),
                None => Ok(()),
            };
        }

        self.open(node)?;
        match kind {
            NodeKind::Error => {
                self.writer.write_all(b"<mtext>")?;
                self.escaped(node.text_content().unwrap_or_default())?;
                self.writer.write_all(b"</mtext>")?;
            }
            NodeKind::Space => {
                // `mspace` is always empty.
                return self.writer.write_all(b"/>");
            }
            _ if kind.is_token() => self.escaped(node.text_content().unwrap_or_default())?,
            NodeKind::Style => {
                let mut inner = style;
                if let Some(display) = node.attribute("displaystyle") {
                    inner.display = display == "true";
                }
                if let Some(level) = node.attribute("scriptlevel").and_then(|l| l.parse().ok()) {
                    inner.level = level;
                }
                self.children(node.children(), inner)?;
            }
            NodeKind::Fraction => self.children(node.children(), style.fraction())?,
            _ if kind.is_scripted() => {
                let mut children = node.children().iter();
                if let Some(base) = children.next() {
                    self.node(base, style)?;
                }
                self.children(children.as_slice(), style.script())?;
            }
            NodeKind::Root => {
                let mut children = node.children().iter();
                if let Some(radicand) = children.next() {
                    self.node(radicand, style)?;
                }
                self.children(children.as_slice(), Style { display: false, level: style.level + 2 })?;
            }
            _ => self.children(node.children(), style)?,
        }
        self.writer.write_all(b"</")?;
        self.writer.write_all(kind.tag().as_bytes())?;
        self.writer.write_all(b">")
    }

    fn children(&mut self, children: &[Node], style: Style) -> io::Result<()> {
        children.iter().try_for_each(|child| self.node(child, style))
    }

    /// Write the start tag of `node`, without its closing `>` for an `mspace`.
    fn open(&mut self, node: &Node) -> io::Result<()> {
        self.writer.write_all(b"<")?;
        self.writer.write_all(node.kind().tag().as_bytes())?;
        for (name, value) in node.attributes() {
            self.attribute(name, value)?;
        }
        if self.config.provenance {
            let source = self.source;
            if let Some(text) = node.source().and_then(|span| source.get(span)) {
                self.attribute("data-latex", text)?;
            }
        }
        if node.kind() != NodeKind::Space {
            self.writer.write_all(b">")?;
        }
        Ok(())
    }

    fn attribute(&mut self, name: &str, value: &str) -> io::Result<()> {
        self.writer.write_all(b" ")?;
        self.writer.write_all(name.as_bytes())?;
        self.writer.write_all(b"=\"")?;
        self.escaped(value)?;
        self.writer.write_all(b"\"")
    }

    fn escaped(&mut self, text: &str) -> io::Result<()> {
        let mut last = 0;
        for (index, c) in text.char_indices() {
            let replacement: &[u8] = match c {
                '&' => b"&amp;",
                '<' => b"&lt;",
                '>' => b"&gt;",
                '"' => b"&quot;",
                _ => continue,
            };
            self.writer.write_all(text[last..index].as_bytes())?;
            self.writer.write_all(replacement)?;
            last = index + 1;
        }
        self.writer.write_all(text[last..].as_bytes())
    }
}

/// Adapts a `String` to [`io::Write`], for [`push_mathml`].
struct StringWriter<'a>(&'a mut String);

impl io::Write for StringWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text =
            std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.0.push_str(text);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Append the `MathML` of `root`, parsed from `source`, to `string`.
///
/// `source` is only used for the annotation and the `data-latex` attributes.
pub fn push_mathml(
    string: &mut String,
    root: &Node,
    source: &str,
    config: RenderConfig,
) -> io::Result<()> {
    MathmlWriter::new(StringWriter(string), source, config).write(root)
}

/// Write the `MathML` of `root`, parsed from `source`, to `writer`.
///
/// The writer is not buffered; wrap it in an [`io::BufWriter`] if writes are expensive.
pub fn write_mathml<W: io::Write>(
    writer: W,
    root: &Node,
    source: &str,
    config: RenderConfig,
) -> io::Result<()> {
    MathmlWriter::new(writer, source, config).write(root)
}

#[cfg(test)]
mod tests {
    use super::push_mathml;
    use crate::{
        config::{DisplayMode, RenderConfig},
        parse,
    };

    const MODULES: &[(&str, i32)] = &[("base", 0), ("physics", 0)];

    fn render(source: &str, config: RenderConfig) -> String {
        let output = parse(source, MODULES);
        let mut string = String::new();
        push_mathml(&mut string, &output.root, source, config).unwrap();
        string
    }

    #[test]
    fn fraction() {
        assert_eq!(
            render("\\frac{a}{2}", RenderConfig::default()),
            "<math><mfrac><mi>a</mi><mn>2</mn></mfrac></math>"
        );
    }

    #[test]
    fn math_element_options() {
        let config = RenderConfig {
            display_mode: DisplayMode::Block,
            xml: true,
            annotate: true,
            ..RenderConfig::default()
        };
        assert_eq!(
            render("a<b", config),
            "<math xmlns=\"http://www.w3.org/1998/Math/MathML\" display=\"block\"><semantics>\
             <mrow><mrow><mi>a</mi><mo>&lt;</mo><mi>b</mi></mrow></mrow>\
             <annotation encoding=\"application/x-tex\">a&lt;b</annotation></semantics></math>"
        );
    }

    #[test]
    fn choice_follows_style() {
        let block = RenderConfig {
            display_mode: DisplayMode::Block,
            ..RenderConfig::default()
        };
        let display = render("\\left( x \\right)", block);
        assert!(display.contains("stretchy=\"true\""), "{display}");
        assert!(!display.contains("mathchoice"));

        let script = render("a^{\\left( x \\right)}", block);
        assert!(script.contains("stretchy=\"false\""), "{script}");
        assert!(!script.contains("stretchy=\"true\""), "{script}");
    }

    #[test]
    fn errors_and_spaces() {
        let html = render("a\\,\\frac{\\nope}{2}", RenderConfig::default());
        assert!(html.contains("<mspace width=\"0.167em\"/>"), "{html}");
        assert!(html.contains("<merror><mtext>Undefined control sequence \\nope</mtext></merror>"));
    }

    #[test]
    fn provenance() {
        let config = RenderConfig {
            provenance: true,
            ..RenderConfig::default()
        };
        let html = render("x + \\sqrt{y}", config);
        assert!(html.contains("<msqrt data-latex=\"\\sqrt{y}\">"), "{html}");
        assert!(html.contains("<mi data-latex=\"x\">x</mi>"), "{html}");
    }
}
