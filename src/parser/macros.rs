//! User-defined macros.
//!
//! Definitions made with `\def`, `\newcommand`, and `\let` (or predefined through
//! [`ParserConfig::macros`](crate::config::ParserConfig::macros)) live in a [`MacroContext`]
//! that is shared by every parser taking part in one top-level parse. Expanding a macro writes
//! its replacement text, followed by the rest of the input, into the [`Storage`](super::Storage).
use std::collections::HashMap;

use crate::parser::{ErrorKind, InnerResult, Token};

use super::{lex, Argument};

#[derive(Debug)]
pub struct MacroContext<'input> {
    definitions: HashMap<&'input str, Definition<'input>>,
    expansions: usize,
    max_expansions: usize,
}

impl<'input> MacroContext<'input> {
    pub fn new(max_expansions: usize) -> Self {
        Self {
            definitions: HashMap::new(),
            expansions: 0,
            max_expansions,
        }
    }

    /// Define a new macro, from its name, parameter text, and replacement text.
    ///
    /// - The replacement text must be properly balanced.
    /// - The parameter text must not contain '{' or '}'.
    pub(crate) fn define(
        &mut self,
        name: &'input str,
        mut parameter_text: &'input str,
        replacement_text: &'input str,
    ) -> InnerResult<()> {
        // Check for the '#{' rule of the last parameter (TeXBook p. 204).
        let last_param_brace_delimited = parameter_text.ends_with('#');
        if last_param_brace_delimited {
            parameter_text = &parameter_text[..parameter_text.len() - 1];
        };

        let mut parameters = parameter_text.split('#').enumerate();

        let prefix = parameters.next().map_or("", |(_, prefix)| prefix);
        let prefix = if prefix.is_empty() {
            None
        } else {
            if prefix.contains(['{', '}']) {
                return Err(ErrorKind::BracesInParamText);
            };
            Some(prefix)
        };

        // Parse the arguments, making sure that they are in order and that the number of arguments
        // is less than 10.
        let parameters: Vec<_> = parameters
            .map(|(i, arg)| -> InnerResult<Parameter> {
                let mut chars = arg.chars();
                let param_index = chars
                    .next()
                    .and_then(|c| c.is_ascii_digit().then_some(c as u8 - b'0'))
                    .ok_or(ErrorKind::StandaloneHashSign)?;
                if param_index != i as u8 {
                    return Err(ErrorKind::IncorrectMacroParams(param_index, i as u8));
                };
                let suffix = chars.as_str();
                if suffix.is_empty() {
                    Ok(None)
                } else {
                    if suffix.contains(['{', '}']) {
                        return Err(ErrorKind::BracesInParamText);
                    };
                    Ok(Some(suffix))
                }
            })
            .collect::<InnerResult<Vec<_>>>()?;

        let replacement = parse_replacement_text(replacement_text, parameters.len() as u8)?;

        self.definitions.insert(
            name,
            Definition::Macro(MacroDef {
                prefix,
                last_param_brace_delimited,
                parameters,
                replacement,
            }),
        );
        Ok(())
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Assign a new control sequence to a token.
    pub(crate) fn assign(&mut self, name: &'input str, alias_for: Token<'input>) {
        self.definitions.insert(name, Definition::Alias(alias_for));
    }

    /// The argument count must be at most 9 if the optional argument is None, and at most 8 if
    /// the optional argument is Some.
    pub(crate) fn insert_command(
        &mut self,
        name: &'input str,
        argument_count: u8,
        optional_argument: Option<&'input str>,
        replacement: &'input str,
    ) -> InnerResult<()> {
        let total = argument_count + optional_argument.is_some() as u8;
        let replacement = parse_replacement_text(replacement, total)?;

        self.definitions.insert(
            name,
            Definition::Command(CommandDef {
                argument_count,
                optional_argument,
                replacement,
            }),
        );

        Ok(())
    }

    /// If a macro is successfully expanded, the rest of the input must be discarded, and the
    /// returned string, which will contain the rest of the input appended, must be used instead.
    pub(crate) fn try_expand_in(
        &mut self,
        name: &'input str,
        input_rest: &'input str,
        storage: &'input bumpalo::Bump,
    ) -> Option<InnerResult<&'input str>> {
        let definition = self.definitions.get(name)?;
        if self.expansions >= self.max_expansions {
            return Some(Err(ErrorKind::MaxMacroSubstitutions));
        }
        let expanded = expand_definition_in(name, definition, input_rest, storage);
        self.expansions += 1;
        Some(expanded)
    }
}

fn expand_definition_in<'input>(
    name: &str,
    definition: &Definition<'input>,
    mut input_rest: &'input str,
    storage: &'input bumpalo::Bump,
) -> InnerResult<&'input str> {
    Ok(match definition {
        Definition::Macro(MacroDef {
            prefix,
            parameters,
            last_param_brace_delimited,
            replacement,
        }) => {
            if let Some(prefix) = prefix {
                input_rest = input_rest
                    .strip_prefix(prefix)
                    .ok_or_else(|| ErrorKind::IncorrectMacroPrefix(format!("\\{name}")))?;
            };

            let mut arguments: Vec<Result<Argument, &str>> = Vec::with_capacity(parameters.len());
            for (index, param) in parameters.iter().enumerate() {
                if index == parameters.len() - 1 && *last_param_brace_delimited {
                    let before = match param {
                        Some(suffix) => {
                            let full_suffix = format!("{}{{", suffix);
                            input_rest
                                .split_once(&full_suffix)
                                .ok_or(ErrorKind::EndOfInput)?
                                .0
                        }
                        None => input_rest.split_once('{').ok_or(ErrorKind::EndOfInput)?.0,
                    };
                    arguments.push(Err(before));
                    input_rest = &input_rest[before.len()..];
                    break;
                }
                match param {
                    None => arguments.push(Ok(lex::argument(&mut input_rest)?)),
                    Some(suffix) => {
                        arguments.push(Err(lex::content_with_suffix(&mut input_rest, suffix)?));
                    }
                }
            }

            expand_replacement(storage, replacement, &arguments, input_rest)
        }
        Definition::Alias(Token::Character(c)) => {
            let mut string = bumpalo::collections::String::with_capacity_in(
                c.len_utf8() + input_rest.len(),
                storage,
            );
            string.push(*c);
            string.push_str(input_rest);
            string.into_bump_str()
        }
        Definition::Alias(Token::ControlSequence(cs)) => {
            let mut string = bumpalo::collections::String::with_capacity_in(
                cs.len() + input_rest.len() + 2,
                storage,
            );
            string.push('\\');
            string.push_str(cs);
            // Keep a following letter from being read as part of the control word.
            if cs.bytes().all(|b| b.is_ascii_alphabetic()) {
                string.push(' ');
            }
            string.push_str(input_rest);
            string.into_bump_str()
        }
        Definition::Command(CommandDef {
            argument_count,
            optional_argument,
            replacement,
        }) => {
            let mut arguments = Vec::with_capacity(
                *argument_count as usize + optional_argument.is_some() as usize,
            );

            if let Some(default_argument) = optional_argument {
                let optional = lex::optional_argument(&mut input_rest)
                    .map_err(|_| ErrorKind::MissingCloseBracket(format!("\\{name}")))?;
                arguments.push(Err(optional.unwrap_or(default_argument)));
            }

            for _ in 0..*argument_count {
                if input_rest.trim_start().is_empty() {
                    return Err(ErrorKind::MissingArgument(format!("\\{name}")));
                }
                arguments.push(Ok(lex::argument(&mut input_rest)?));
            }

            expand_replacement(storage, replacement, &arguments, input_rest)
        }
    })
}

fn parse_replacement_text(
    replacement_text: &str,
    parameter_count: u8,
) -> InnerResult<Vec<ReplacementToken>> {
    let mut replacement_splits = replacement_text.split_inclusive('#').peekable();
    let mut replacement_tokens: Vec<ReplacementToken> = Vec::new();

    while let Some(split) = replacement_splits.next() {
        replacement_tokens.push(ReplacementToken::String(split));

        if !split.ends_with('#') {
            continue;
        }
        let Some(next_split) = replacement_splits.peek_mut() else {
            return Err(ErrorKind::StandaloneHashSign);
        };
        let Some(first_char) = next_split.chars().next() else {
            return Err(ErrorKind::StandaloneHashSign);
        };
        if first_char == '#' {
            // skip the next split since it will contain the second '#'
            replacement_splits.next();
        } else if first_char.is_ascii_digit() {
            let param_index = first_char as u8 - b'0';
            if param_index > parameter_count || param_index == 0 {
                return Err(ErrorKind::IncorrectReplacementParams(
                    param_index,
                    parameter_count,
                ));
            };

            if let Some(ReplacementToken::String(s)) = replacement_tokens.last_mut() {
                if s.len() == 1 {
                    replacement_tokens.pop();
                } else {
                    *s = &s[..s.len() - 1];
                }
            }

            replacement_tokens.push(ReplacementToken::Parameter(param_index));
            // Make it so that the next split wont begin with the digit.
            *next_split = &next_split[1..];
        } else {
            return Err(ErrorKind::StandaloneHashSign);
        }
    }

    replacement_tokens.retain(|token| !matches!(token, ReplacementToken::String("")));
    replacement_tokens.shrink_to_fit();
    Ok(replacement_tokens)
}

fn expand_replacement<'store>(
    storage: &'store bumpalo::Bump,
    replacement: &[ReplacementToken],
    // If Ok, its a regular argument, if Err, its a raw string to be inserted.
    arguments: &[Result<Argument, &str>],
    input_rest: &str,
) -> &'store str {
    let mut replacement_string = bumpalo::collections::String::new_in(storage);

    for token in replacement {
        match token {
            ReplacementToken::Parameter(idx) => match arguments.get(*idx as usize - 1) {
                Some(Ok(Argument::Token(Token::Character(ch)))) => {
                    replacement_string.push(*ch);
                }
                Some(Ok(Argument::Token(Token::ControlSequence(cs)))) => {
                    replacement_string.push('\\');
                    replacement_string.push_str(cs);
                    replacement_string.push(' ');
                }
                Some(Ok(Argument::Group(group))) => {
                    replacement_string.push('{');
                    replacement_string.push_str(group);
                    replacement_string.push('}');
                }
                Some(Err(str)) => {
                    replacement_string.push_str(str);
                }
                None => {}
            },
            ReplacementToken::String(str) => {
                replacement_string.push_str(str);
            }
        }
    }

    replacement_string.push_str(input_rest);
    replacement_string.into_bump_str()
}

#[derive(Debug)]
struct MacroDef<'a> {
    prefix: Option<&'a str>,
    parameters: Vec<Parameter<'a>>,
    last_param_brace_delimited: bool,
    replacement: Vec<ReplacementToken<'a>>,
}

#[derive(Debug)]
struct CommandDef<'a> {
    argument_count: u8,
    optional_argument: Option<&'a str>,
    replacement: Vec<ReplacementToken<'a>>,
}

/// Some if the argument has a suffix, None otherwise.
type Parameter<'a> = Option<&'a str>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplacementToken<'a> {
    Parameter(u8),
    String(&'a str),
}

#[derive(Debug)]
enum Definition<'a> {
    Macro(MacroDef<'a>),
    Alias(Token<'a>),
    Command(CommandDef<'a>),
}
