//! Formatting of `LICENSE` variable values.

/// Line length aimed for in generated ebuilds.
const MAX_LINE: usize = 72;

/// Format a rendered license value for assignment after `prefix`.
///
/// Values that fit on the assignment line are returned verbatim; longer
/// values become a newline followed by tab-indented wrapped lines and a
/// trailing newline. The result therefore always starts with either the
/// literal value or `\n`, which callers use to decide whether a
/// separating space must be inserted.
pub fn format_license_var(value: &str, prefix: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    // +1 for the closing quote
    if prefix.len() + value.len() + 1 <= MAX_LINE {
        return value.to_string();
    }
    let mut out = String::from("\n");
    for line in wrap(value, MAX_LINE - 8) {
        out.push('\t');
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Greedy word wrap on spaces.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split(' ') {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
