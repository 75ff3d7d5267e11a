//! Expansion of diagnostic message templates.
//!
//! Templates use the following placeholders:
//! - `%1` to `%9` (and further digits): the positional argument with that index,
//! - `%{1}`: the same, delimited so that it can be followed by a digit,
//! - `%%`: a literal percent sign,
//! - `%{plural:%1|one item|%1 items}`: picks an alternative based on the numeric value of an
//!   argument.
//!
//! Formatting never fails. A missing argument is rendered as `???`, and a braced marker that
//! cannot be understood (an unknown key, a non-numeric plural argument, or a missing closing
//! brace) is copied to the output unexpanded.

/// Text used in place of an argument that was not provided.
pub const MISSING_ARGUMENT: &str = "???";

/// Expand `template` using the positional `args`.
///
/// ```
/// use latex_mathtree::message::format;
///
/// assert_eq!(format("Undefined control sequence %1", &["\\foo"]), "Undefined control sequence \\foo");
/// assert_eq!(format("%{1}0%%", &["5"]), "50%");
/// assert_eq!(format("%{plural:%1|one row|%1 rows}", &["3"]), "3 rows");
/// ```
pub fn format<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(index) = rest.find('%') {
        output.push_str(&rest[..index]);
        rest = &rest[index + 1..];

        let Some(next) = rest.chars().next() else {
            output.push('%');
            break;
        };

        if next.is_ascii_digit() {
            let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
            push_argument(&mut output, &rest[..digits], args);
            rest = &rest[digits..];
        } else if next == '{' {
            match braced_marker(rest) {
                Some((content, after)) => {
                    if content.bytes().all(|b| b.is_ascii_digit()) && !content.is_empty() {
                        push_argument(&mut output, content, args);
                    } else if let Some(expanded) = keyed_marker(content, args) {
                        output.push_str(&expanded);
                    } else {
                        output.push('%');
                        output.push_str(&rest[..rest.len() - after.len()]);
                    }
                    rest = after;
                }
                None => {
                    output.push('%');
                    output.push_str(rest);
                    rest = "";
                }
            }
        } else {
            // `%%` and any other escaped character stand for the character itself.
            output.push(next);
            rest = &rest[next.len_utf8()..];
        }
    }
    output.push_str(rest);
    output
}

fn push_argument<S: AsRef<str>>(output: &mut String, index: &str, args: &[S]) {
    let argument = index
        .parse::<usize>()
        .ok()
        .and_then(|index| index.checked_sub(1))
        .and_then(|index| args.get(index));
    match argument {
        Some(argument) => output.push_str(argument.as_ref()),
        None => output.push_str(MISSING_ARGUMENT),
    }
}

/// Given the input right after a `%`, starting with `{`, return the content inside the matching
/// braces and the input after the closing brace.
fn braced_marker(input: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    let mut escaped = false;
    for (index, c) in input.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '%' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&input[1..index], &input[index + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

/// Expand a `key:%n|alternative|...` marker. Returns `None` if the marker is not understood.
fn keyed_marker<S: AsRef<str>>(content: &str, args: &[S]) -> Option<String> {
    let (key, rest) = content.split_once(':')?;
    let rest = rest.strip_prefix('%')?;
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let index = rest[..digits].parse::<usize>().ok()?.checked_sub(1)?;
    let alternatives = split_alternatives(rest[digits..].strip_prefix('|')?);

    match key {
        "plural" => {
            let value: f64 = args.get(index)?.as_ref().trim().parse().ok()?;
            let choice = if value == 1. { 0 } else { 1 };
            let alternative = alternatives.get(choice).or(alternatives.last())?;
            Some(format(alternative, args))
        }
        _ => None,
    }
}

fn split_alternatives(input: &str) -> Vec<&str> {
    let mut alternatives = Vec::new();
    let mut depth = 0usize;
    let mut escaped = false;
    let mut start = 0;
    for (index, c) in input.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '%' => escaped = true,
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                alternatives.push(&input[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    alternatives.push(&input[start..]);
    alternatives
}

#[cfg(test)]
mod tests {
    use super::format;

    #[test]
    fn positional() {
        assert_eq!(
            format("%1 ended with %2", &["\\begin{a}", "\\end{b}"]),
            "\\begin{a} ended with \\end{b}"
        );
        assert_eq!(format("%2%1", &["a", "b"]), "ba");
    }

    #[test]
    fn braced_positional() {
        assert_eq!(format("%{1}2", &["x"]), "x2");
        assert_eq!(format("%12", &["x"]), "???");
    }

    #[test]
    fn escapes() {
        assert_eq!(format("100%%", &[] as &[&str]), "100%");
        assert_eq!(format("trailing %", &[] as &[&str]), "trailing %");
        assert_eq!(format("%a", &[] as &[&str]), "a");
    }

    #[test]
    fn missing_argument() {
        assert_eq!(format("Missing %1 for %2", &["x"]), "Missing x for ???");
    }

    #[test]
    fn plural() {
        let template = "Found %{plural:%1|one column|%1 columns}";
        assert_eq!(format(template, &["1"]), "Found one column");
        assert_eq!(format(template, &["4"]), "Found 4 columns");
    }

    #[test]
    fn unknown_key_is_kept() {
        let template = "%{gender:%1|he|she} left";
        assert_eq!(format(template, &["x"]), "%{gender:%1|he|she} left");
        assert_eq!(format("%{plural:%1|a|b}", &["many"]), "%{plural:%1|a|b}");
        assert_eq!(format("%{1", &["x"]), "%{1");
    }
}
