//! String escaping utilities.
//!
//! Pure functions with no dependency on printer state. Used to embed content
//! inside JavaScript template literals, quoted strings and HTML attributes.

use cow_utils::CowUtils;

/// Escape a string for safe embedding inside a JavaScript template literal.
///
/// Escapes backticks, `${` sequences, and backslashes.
pub fn escape_template_literal(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '`' => result.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => {
                result.push_str("\\$");
            }
            '\\' => result.push_str("\\\\"),
            _ => result.push(c),
        }
    }

    result
}

/// Escape a string for embedding inside a `'...'` JavaScript string.
///
/// Besides the quote itself, backslashes and line terminators are escaped
/// so that multi-line inline scripts stay a single valid literal.
pub fn escape_single_quote(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '\'' => result.push_str("\\'"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\u{2028}' => result.push_str("\\u2028"),
            '\u{2029}' => result.push_str("\\u2029"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape a string for embedding inside a `"..."` JavaScript string.
pub fn escape_double_quotes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\u{2028}' => result.push_str("\\u2028"),
            '\u{2029}' => result.push_str("\\u2029"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape a string for use as an HTML attribute value inside a template literal.
///
/// Backslashes go first so the cooked template keeps them and the escapes
/// added for `` ` `` and `${` stay intact. The double quote that would
/// terminate the attribute becomes `&quot;`.
pub fn escape_html_attribute(s: &str) -> String {
    let s = s.cow_replace('\\', "\\\\");
    let s = s.cow_replace('`', "\\`");
    let s = s.cow_replace("${", "\\${");
    s.cow_replace('"', "&quot;").into_owned()
}

/// Remove the longest common leading whitespace from every non-blank line.
pub fn dedent(s: &str) -> String {
    let margin = s
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    if margin == 0 {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    for (i, line) in s.split('\n').enumerate() {
        if i > 0 {
            result.push('\n');
        }
        if line.trim().is_empty() {
            result.push_str(line.trim_start_matches([' ', '\t']));
        } else {
            result.push_str(&line[margin..]);
        }
    }
    result
}
