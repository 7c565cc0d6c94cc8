use super::node::{ScalarStyle, ScalarType};

/// Render a scalar value for splicing back into the source.
///
/// Quoted scalars keep their quote style. Plain scalars stay plain unless the
/// new text would no longer read back as the same string, in which case they
/// are single quoted. Block scalars are rewritten as double quoted flow
/// scalars so the surrounding indentation does not matter.
pub(crate) fn render_scalar(value: &str, style: ScalarStyle, original: ScalarType) -> String {
    if needs_escapes(value) {
        return double_quoted(value);
    }
    match style {
        ScalarStyle::Plain => {
            let keeps_type = original != ScalarType::Str
                || ScalarType::resolve(value, ScalarStyle::Plain) == ScalarType::Str;
            if keeps_type && is_plain_safe(value) {
                value.to_string()
            } else {
                single_quoted(value)
            }
        }
        ScalarStyle::SingleQuoted => single_quoted(value),
        ScalarStyle::DoubleQuoted | ScalarStyle::Literal | ScalarStyle::Folded => {
            double_quoted(value)
        }
    }
}

fn needs_escapes(value: &str) -> bool {
    value.chars().any(|c| c.is_control() && c != '\t')
}

/// Whether `value` can be written as a plain scalar in block context
pub(crate) fn is_plain_safe(value: &str) -> bool {
    let Some(first) = value.chars().next() else {
        return false;
    };
    if value.starts_with(char::is_whitespace) || value.ends_with(char::is_whitespace) {
        return false;
    }
    if matches!(
        first,
        '[' | ']' | '{' | '}' | '#' | '&' | '*' | '!' | '|' | '>' | '\'' | '"' | '%' | '@' | '`' | ','
    ) {
        return false;
    }
    if matches!(first, '-' | '?' | ':') {
        match value[1..].chars().next() {
            None => return false,
            Some(c) if c.is_whitespace() => return false,
            _ => {}
        }
    }
    !(value.contains(": ") || value.contains(" #") || value.ends_with(':'))
}

fn single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
