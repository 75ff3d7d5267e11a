//! Equation numbers and cross-references.
//!
//! The parser does not own any numbering state. It calls a [`ReferenceTracker`], which is shared
//! by every expression of a document so that a `\ref` can find a `\label` defined in another
//! expression.
use std::collections::{BTreeSet, HashMap};

use crate::parser::{ErrorKind, InnerResult};

/// Text displayed for a reference whose label is not known yet.
pub const PLACEHOLDER: &str = "???";

/// The result of resolving a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// The label is known, and refers to this tag text.
    Resolved(String),
    /// The label has not been defined yet.
    Pending,
}

/// Numbering and label state threaded through the parses of a document.
pub trait ReferenceTracker {
    /// Open a numbered construct.
    fn start_equation(&mut self);
    /// Give the open construct an explicit tag instead of a number.
    fn tag(&mut self, tag: &str) -> InnerResult<()>;
    /// Turn off the automatic number of the open construct. An explicit tag is still shown.
    fn suppress_number(&mut self) -> InnerResult<()>;
    /// Attach a label to the open construct, returning the number it will display if the
    /// construct is numbered automatically.
    fn define(&mut self, label: &str) -> InnerResult<u32>;
    /// Close the open construct, returning the text of its tag, if it has one.
    ///
    /// When `numbered` is false and no explicit tag was given, no number is consumed and the
    /// labels of the construct are dropped.
    fn finish_equation(&mut self, numbered: bool) -> Option<String>;
    /// Resolve a label. An unknown label is remembered as pending.
    fn resolve(&mut self, label: &str) -> Reference;
    fn contains(&self, label: &str) -> bool;
}

#[derive(Debug, Default)]
struct OpenEquation {
    tag: Option<String>,
    unnumbered: bool,
    labels: Vec<String>,
}

/// The default [`ReferenceTracker`]: equations are numbered from 1 in document order.
#[derive(Debug, Default)]
pub struct DocumentReferences {
    counter: u32,
    labels: HashMap<String, String>,
    pending: BTreeSet<String>,
    current: Option<OpenEquation>,
}

impl DocumentReferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels that were referenced before being defined, and are still undefined.
    ///
    /// Expressions containing such references must be parsed again once the whole document
    /// has been seen.
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.pending
            .iter()
            .filter(|label| !self.labels.contains_key(*label))
            .map(String::as_str)
    }

    /// The number of equations numbered so far.
    pub fn count(&self) -> u32 {
        self.counter
    }
}

impl ReferenceTracker for DocumentReferences {
    fn start_equation(&mut self) {
        self.current = Some(OpenEquation::default());
    }

    fn tag(&mut self, tag: &str) -> InnerResult<()> {
        let current = self
            .current
            .as_mut()
            .ok_or_else(|| ErrorKind::Misplaced("\\tag".to_string()))?;
        if current.tag.is_some() {
            return Err(ErrorKind::MultipleTag);
        }
        current.tag = Some(tag.to_string());
        Ok(())
    }

    fn suppress_number(&mut self) -> InnerResult<()> {
        let current = self
            .current
            .as_mut()
            .ok_or_else(|| ErrorKind::Misplaced("\\notag".to_string()))?;
        current.unnumbered = true;
        Ok(())
    }

    fn define(&mut self, label: &str) -> InnerResult<u32> {
        let current = self
            .current
            .as_mut()
            .ok_or_else(|| ErrorKind::Misplaced("\\label".to_string()))?;
        if self.labels.contains_key(label) || current.labels.iter().any(|l| l == label) {
            return Err(ErrorKind::MultipleLabel(label.to_string()));
        }
        current.labels.push(label.to_string());
        Ok(self.counter + 1)
    }

    fn finish_equation(&mut self, numbered: bool) -> Option<String> {
        let current = self.current.take()?;
        let tag = match current.tag {
            Some(tag) => tag,
            None if numbered && !current.unnumbered => {
                self.counter += 1;
                self.counter.to_string()
            }
            None => return None,
        };
        for label in current.labels {
            self.labels.insert(label, tag.clone());
        }
        Some(tag)
    }

    fn resolve(&mut self, label: &str) -> Reference {
        match self.labels.get(label) {
            Some(tag) => Reference::Resolved(tag.clone()),
            None => {
                self.pending.insert(label.to_string());
                Reference::Pending
            }
        }
    }

    fn contains(&self, label: &str) -> bool {
        self.labels.contains_key(label)
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentReferences, Reference, ReferenceTracker};
    use crate::parser::ErrorKind;

    #[test]
    fn numbers_in_order() {
        let mut refs = DocumentReferences::new();
        refs.start_equation();
        assert_eq!(refs.define("first"), Ok(1));
        assert_eq!(refs.finish_equation(true).as_deref(), Some("1"));

        refs.start_equation();
        assert_eq!(refs.finish_equation(false), None);

        refs.start_equation();
        refs.define("second").unwrap();
        assert_eq!(refs.finish_equation(true).as_deref(), Some("2"));

        assert_eq!(refs.resolve("first"), Reference::Resolved("1".into()));
        assert_eq!(refs.resolve("second"), Reference::Resolved("2".into()));
    }

    #[test]
    fn forward_reference_is_pending() {
        let mut refs = DocumentReferences::new();
        assert_eq!(refs.resolve("later"), Reference::Pending);
        assert_eq!(refs.pending().collect::<Vec<_>>(), ["later"]);

        refs.start_equation();
        refs.define("later").unwrap();
        refs.finish_equation(true);
        assert_eq!(refs.pending().count(), 0);
        assert_eq!(refs.resolve("later"), Reference::Resolved("1".into()));
    }

    #[test]
    fn explicit_tags() {
        let mut refs = DocumentReferences::new();
        refs.start_equation();
        refs.tag("A").unwrap();
        assert_eq!(refs.tag("B"), Err(ErrorKind::MultipleTag));
        refs.define("a").unwrap();
        assert_eq!(refs.finish_equation(true).as_deref(), Some("A"));
        assert_eq!(refs.count(), 0);
        assert!(refs.contains("a"));
    }

    #[test]
    fn suppressed_numbers() {
        let mut refs = DocumentReferences::new();
        assert!(matches!(refs.suppress_number(), Err(ErrorKind::Misplaced(_))));

        refs.start_equation();
        refs.suppress_number().unwrap();
        assert_eq!(refs.finish_equation(true), None);
        assert_eq!(refs.count(), 0);

        refs.start_equation();
        refs.suppress_number().unwrap();
        refs.tag("B").unwrap();
        assert_eq!(refs.finish_equation(true).as_deref(), Some("B"));
    }

    #[test]
    fn labels_outside_equations() {
        let mut refs = DocumentReferences::new();
        assert!(matches!(refs.define("x"), Err(ErrorKind::Misplaced(_))));
        refs.start_equation();
        refs.define("x").unwrap();
        refs.finish_equation(true);
        refs.start_equation();
        assert_eq!(refs.define("x"), Err(ErrorKind::MultipleLabel("x".into())));
    }
}
