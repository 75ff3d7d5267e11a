//! Diagnostics produced while parsing.
//!
//! Every problem the parser or a handler can run into is an [`ErrorKind`]. When an error reaches
//! the parse engine it is turned into a [`Diagnostic`], which is what hosts see. Each kind has a
//! stable identifier, returned by [`ErrorKind::id`], that does not change when the wording of
//! the message does.
use std::{fmt::Display, ops::Range};
use thiserror::Error;

use crate::message;

pub type InnerResult<T> = std::result::Result<T, ErrorKind>;

/// How far the effects of an error reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The whole expression is replaced by a single error node.
    Fatal,
    /// Only the offending construct is replaced by an error node; parsing continues.
    Local,
    /// Nothing is replaced. Used for problems with the configuration, such as unknown modules.
    Warning,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Severity::Fatal => "fatal",
            Severity::Local => "local",
            Severity::Warning => "warning",
        })
    }
}

/// A construct that can be left open at the end of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grouping {
    Brace,
    LeftRight,
    Environment(String),
}

impl Display for Grouping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grouping::Brace => f.write_str("close brace"),
            Grouping::LeftRight => f.write_str("\\right"),
            Grouping::Environment(name) => write!(f, "\\end{{{name}}}"),
        }
    }
}

/// A problem found in the input, as reported to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Stable identifier of the error, see [`ErrorKind::id`].
    pub kind: &'static str,
    pub message: String,
    pub severity: Severity,
    /// Byte range of the top-level source where the error was found, when known.
    pub span: Option<Range<usize>>,
}

impl Diagnostic {
    pub(crate) fn new(
        error: &ErrorKind,
        severity: Severity,
        span: Option<Range<usize>>,
        templates: &std::collections::HashMap<&'static str, String>,
    ) -> Self {
        let message = match templates.get(error.id()) {
            Some(template) => message::format(template, &error.args()),
            None => error.to_string(),
        };
        Self {
            kind: error.id(),
            message,
            severity,
            span,
        }
    }

    /// A short excerpt of `source` surrounding the location of the error.
    pub fn context<'s>(&self, source: &'s str) -> Option<&'s str> {
        const CONTEXT_SIZE: usize = 12;

        let span = self.span.as_ref()?;
        if span.start > source.len() {
            return None;
        }
        let lower_bound = floor_char_boundary(source, span.start.saturating_sub(CONTEXT_SIZE));
        let upper_bound = floor_char_boundary(source, span.end.max(span.start) + CONTEXT_SIZE);
        source.get(lower_bound..upper_bound)
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error [{}]: {}", self.severity, self.kind, self.message)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("Missing {0}")]
    UnclosedGroup(Grouping),
    #[error("Extra close brace or missing open brace")]
    ExtraCloseMissingOpen,
    #[error("Extra open brace or missing close brace")]
    ExtraOpenMissingClose,
    #[error("Undefined control sequence {0}")]
    UndefinedControlSequence(String),
    #[error("Unknown environment '{0}'")]
    UnknownEnvironment(String),
    #[error("Missing or unrecognized delimiter for {0}")]
    MissingOrUnrecognizedDelim(String),
    #[error("Missing argument for {0}")]
    MissingArgument(String),
    #[error("Could not find closing ']' for argument to {0}")]
    MissingCloseBracket(String),
    #[error("Extra close brace while looking for {0}")]
    ExtraCloseLooking(String),
    #[error("Could not find closing '{delimiter}' for {name}")]
    MissingCloseDelimiter { delimiter: char, name: String },
    #[error("Double exponent: use braces to clarify")]
    DoubleExponent,
    #[error("Double subscripts: use braces to clarify")]
    DoubleSubscripts,
    #[error("Missing superscript or subscript argument")]
    MissingScript,
    #[error("Misplaced {0}")]
    Misplaced(String),
    #[error("Extra {0}")]
    Extra(String),
    #[error("\\begin{{{begin}}} ended with \\end{{{end}}}")]
    EnvironmentMismatch { begin: String, end: String },
    #[error("Invalid option: {0}")]
    InvalidOption(String),
    #[error("Value for key '{0}' is not of the expected type")]
    InvalidValue(String),
    #[error("Illegal pream-token ({token}) at position {position}")]
    BadPreambleToken { token: char, position: usize },
    #[error("Missing argument for {0} column declaration")]
    MissingColumnArgument(char),
    #[error("Argument to *{{}}{{}} column declaration must be a positive integer, found '{0}'")]
    InvalidColumnCount(String),
    #[error("Too many columns in column declaration; at most {0} are allowed")]
    TooManyColumns(usize),
    #[error("Missing dimension or its units for {0}")]
    MissingDimension(String),
    #[error("Undefined color '{0}'")]
    UndefinedColor(String),
    #[error("{0} is not a token element")]
    NotMathMLToken(String),
    #[error("{0} is allowed only on operators")]
    LimitsOnlyOnOperators(String),
    #[error("Label '{0}' multiply defined")]
    MultipleLabel(String),
    #[error("Multiple \\tag")]
    MultipleTag,
    #[error("Invalid argument '{argument}' for {name}")]
    InvalidMatrixArgument { name: String, argument: String },
    #[error("First argument to {0} must be a control sequence")]
    ExpectedControlSequence(String),
    #[error("Illegal number of parameters specified in {0}")]
    InvalidParameterCount(String),
    #[error("Maximum macro substitution count exceeded; is there a recursive macro call?")]
    MaxMacroSubstitutions,
    #[error("Maximum nesting depth exceeded; is there a recursive call?")]
    MaxNesting,
    #[error("Math shift character '$' cannot be used in math mode")]
    MathShift,
    #[error("You can't use 'macro parameter character #' in math mode")]
    HashSign,
    #[error("Element <{element}> expects {expected} children, found {found}")]
    InvalidChildren {
        element: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Element <{child}> cannot be a child of <{element}>")]
    MisplacedChild {
        element: &'static str,
        child: &'static str,
    },
    #[error("Unexpected end of input")]
    EndOfInput,
    #[error("Expected a dimensional unit")]
    DimensionUnit,
    #[error("Expected mathematical units (mu) in dimension specification")]
    MathUnit,
    #[error("Empty control sequence")]
    EmptyControlSequence,
    #[error("Macro parameter text contains '{{' or '}}'")]
    BracesInParamText,
    #[error("Macro definition found parameter #{0} but expected #{1}")]
    IncorrectMacroParams(u8, u8),
    #[error("Macro definition found parameter #{0} but expected a parameter in the range [#1, #{1}]")]
    IncorrectReplacementParams(u8, u8),
    #[error("Macro definition contains a standalone '#'")]
    StandaloneHashSign,
    #[error("Use of {0} does not match its definition")]
    IncorrectMacroPrefix(String),
}

impl ErrorKind {
    /// The stable identifier of this kind of error.
    pub fn id(&self) -> &'static str {
        match self {
            ErrorKind::UnclosedGroup(_) => "StackNotEmpty",
            ErrorKind::ExtraCloseMissingOpen => "ExtraCloseMissingOpen",
            ErrorKind::ExtraOpenMissingClose => "ExtraOpenMissingClose",
            ErrorKind::UndefinedControlSequence(_) => "UndefinedControlSequence",
            ErrorKind::UnknownEnvironment(_) => "UnknownEnv",
            ErrorKind::MissingOrUnrecognizedDelim(_) => "MissingOrUnrecognizedDelim",
            ErrorKind::MissingArgument(_) => "MissingArgFor",
            ErrorKind::MissingCloseBracket(_) => "MissingCloseBracket",
            ErrorKind::ExtraCloseLooking(_) => "ExtraCloseLooking",
            ErrorKind::MissingCloseDelimiter { .. } => "MissingCloseDelimiter",
            ErrorKind::DoubleExponent => "DoubleExponent",
            ErrorKind::DoubleSubscripts => "DoubleSubscripts",
            ErrorKind::MissingScript => "MissingScript",
            ErrorKind::Misplaced(_) => "Misplaced",
            ErrorKind::Extra(_) => "Extra",
            ErrorKind::EnvironmentMismatch { .. } => "EnvBadEnd",
            ErrorKind::InvalidOption(_) => "InvalidOption",
            ErrorKind::InvalidValue(_) => "InvalidValue",
            ErrorKind::BadPreambleToken { .. } => "BadPreamToken",
            ErrorKind::MissingColumnArgument(_) => "MissingArgForColumn",
            ErrorKind::InvalidColumnCount(_) => "ColArgNotNum",
            ErrorKind::TooManyColumns(_) => "TooManyColumns",
            ErrorKind::MissingDimension(_) => "MissingDimOrUnits",
            ErrorKind::UndefinedColor(_) => "UndefinedColor",
            ErrorKind::NotMathMLToken(_) => "NotMathMLToken",
            ErrorKind::LimitsOnlyOnOperators(_) => "MisplacedLimits",
            ErrorKind::MultipleLabel(_) => "MultipleLabel",
            ErrorKind::MultipleTag => "MultipleCommand",
            ErrorKind::InvalidMatrixArgument { .. } => "InvalidMatrixArgument",
            ErrorKind::ExpectedControlSequence(_) => "NotCS",
            ErrorKind::InvalidParameterCount(_) => "IllegalParamNumber",
            ErrorKind::MaxMacroSubstitutions => "MaxMacroSub1",
            ErrorKind::MaxNesting => "MaxNesting",
            ErrorKind::MathShift => "MathShift",
            ErrorKind::HashSign => "CantUseHash1",
            ErrorKind::InvalidChildren { .. } => "InvalidChildren",
            ErrorKind::MisplacedChild { .. } => "MisplacedChild",
            ErrorKind::EndOfInput => "EndOfInput",
            ErrorKind::DimensionUnit => "DimensionUnit",
            ErrorKind::MathUnit => "MathUnit",
            ErrorKind::EmptyControlSequence => "EmptyControlSequence",
            ErrorKind::BracesInParamText => "BracesInParamText",
            ErrorKind::IncorrectMacroParams(..) => "IncorrectMacroParams",
            ErrorKind::IncorrectReplacementParams(..) => "IllegalMacroParam",
            ErrorKind::StandaloneHashSign => "StandaloneHashSign",
            ErrorKind::IncorrectMacroPrefix(_) => "MismatchUseDef",
        }
    }

    /// The positional arguments used when the message comes from a template.
    pub fn args(&self) -> Vec<String> {
        match self {
            ErrorKind::UnclosedGroup(grouping) => vec![grouping.to_string()],
            ErrorKind::UndefinedControlSequence(s)
            | ErrorKind::UnknownEnvironment(s)
            | ErrorKind::MissingOrUnrecognizedDelim(s)
            | ErrorKind::MissingArgument(s)
            | ErrorKind::MissingCloseBracket(s)
            | ErrorKind::ExtraCloseLooking(s)
            | ErrorKind::Misplaced(s)
            | ErrorKind::Extra(s)
            | ErrorKind::InvalidOption(s)
            | ErrorKind::InvalidValue(s)
            | ErrorKind::InvalidColumnCount(s)
            | ErrorKind::MissingDimension(s)
            | ErrorKind::UndefinedColor(s)
            | ErrorKind::NotMathMLToken(s)
            | ErrorKind::LimitsOnlyOnOperators(s)
            | ErrorKind::MultipleLabel(s)
            | ErrorKind::ExpectedControlSequence(s)
            | ErrorKind::InvalidParameterCount(s)
            | ErrorKind::IncorrectMacroPrefix(s) => vec![s.clone()],
            ErrorKind::MissingCloseDelimiter { delimiter, name } => {
                vec![delimiter.to_string(), name.clone()]
            }
            ErrorKind::EnvironmentMismatch { begin, end } => vec![begin.clone(), end.clone()],
            ErrorKind::BadPreambleToken { token, position } => {
                vec![token.to_string(), position.to_string()]
            }
            ErrorKind::MissingColumnArgument(c) => vec![c.to_string()],
            ErrorKind::TooManyColumns(max) => vec![max.to_string()],
            ErrorKind::InvalidMatrixArgument { name, argument } => {
                vec![name.clone(), argument.clone()]
            }
            ErrorKind::InvalidChildren {
                element,
                expected,
                found,
            } => vec![element.to_string(), expected.to_string(), found.to_string()],
            ErrorKind::MisplacedChild { element, child } => {
                vec![element.to_string(), child.to_string()]
            }
            ErrorKind::IncorrectMacroParams(a, b) | ErrorKind::IncorrectReplacementParams(a, b) => {
                vec![a.to_string(), b.to_string()]
            }
            _ => Vec::new(),
        }
    }

    /// Whether the error aborts the expression or only the construct it was found in.
    pub fn severity(&self) -> Severity {
        match self {
            ErrorKind::UnclosedGroup(_)
            | ErrorKind::EnvironmentMismatch { .. }
            | ErrorKind::MaxMacroSubstitutions
            | ErrorKind::MaxNesting => Severity::Fatal,
            _ => Severity::Local,
        }
    }
}

fn floor_char_boundary(str: &str, index: usize) -> usize {
    if index >= str.len() {
        str.len()
    } else {
        (0..=index)
            .rev()
            .find(|&i| str.is_char_boundary(i))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{Diagnostic, ErrorKind, Grouping, Severity};

    #[test]
    fn stable_kinds() {
        let error = ErrorKind::MissingOrUnrecognizedDelim("\\bigg".into());
        assert_eq!(error.id(), "MissingOrUnrecognizedDelim");
        assert_eq!(
            error.to_string(),
            "Missing or unrecognized delimiter for \\bigg"
        );
        assert_eq!(error.severity(), Severity::Local);

        let error = ErrorKind::UnclosedGroup(Grouping::Environment("matrix".into()));
        assert_eq!(error.id(), "StackNotEmpty");
        assert_eq!(error.to_string(), "Missing \\end{matrix}");
        assert_eq!(error.severity(), Severity::Fatal);
    }

    #[test]
    fn template_override() {
        let mut templates = HashMap::new();
        templates.insert("UnknownEnv", "Environnement inconnu « %1 »".to_string());
        let diagnostic = Diagnostic::new(
            &ErrorKind::UnknownEnvironment("foo".into()),
            Severity::Local,
            None,
            &templates,
        );
        assert_eq!(diagnostic.kind, "UnknownEnv");
        assert_eq!(diagnostic.message, "Environnement inconnu « foo »");
    }

    #[test]
    fn context() {
        let source = "a + b + c + \\undefined + d + e + f";
        let diagnostic = Diagnostic {
            kind: "UndefinedControlSequence",
            message: String::new(),
            severity: Severity::Local,
            span: Some(23..24),
        };
        assert_eq!(diagnostic.context(source), Some(" \\undefined + d + e + f"));
    }
}
