//! Escaping helpers for embedding values in ebuild text.
//!
//! Ebuild variables are bash strings, so free-form manifest text
//! (descriptions, homepages, git entries) has to be escaped before it is
//! interpolated into the script.

/// Collapse every run of whitespace, newlines included, into a single
/// space.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Backslash-escape the characters bash treats specially inside double
/// quotes: `$`, backtick, `"` and `\`.
pub fn bash_dquote_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '$' | '`' | '"' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// URL-encode whitespace and the bash double-quote specials so the value
/// can sit inside a double-quoted URL verbatim.
///
/// Spaces become `+`; the remaining specials become percent-encoded
/// UTF-8 byte sequences. Characters that are neither whitespace nor
/// bash specials pass through untouched, so an already valid URL keeps
/// its shape.
pub fn url_dquote_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut buf = [0u8; 4];
    for ch in value.chars() {
        if ch == ' ' {
            out.push('+');
        } else if ch.is_whitespace() || matches!(ch, '$' | '`' | '"' | '\\') {
            for byte in ch.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{:02X}", byte));
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Quote a string for literal inclusion in shell script text.
///
/// Strings built only from unambiguous characters pass through
/// unchanged; everything else is wrapped in single quotes, with embedded
/// single quotes rendered as `'\''`.
pub fn shell_quote(value: &str) -> String {
    if value.is_empty() {
        return "''".to_string();
    }
    let safe = value.chars().all(|ch| {
        ch.is_ascii_alphanumeric()
            || matches!(
                ch,
                '_' | '-' | '.' | '/' | ':' | '@' | '%' | '+' | '=' | ','
            )
    });
    if safe {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', "'\\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace_mixed_runs() {
        assert_eq!(collapse_whitespace("a   b\n\tc"), "a b c");
        assert_eq!(collapse_whitespace("  leading and trailing \n"), "leading and trailing");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_bash_dquote_escape_specials() {
        assert_eq!(
            bash_dquote_escape(r#"He said "hi" $HOME"#),
            r#"He said \"hi\" \$HOME"#
        );
        assert_eq!(bash_dquote_escape(r"back\slash `cmd`"), r"back\\slash \`cmd\`");
        assert_eq!(bash_dquote_escape("plain text"), "plain text");
    }

    #[test]
    fn test_url_dquote_escape_space_becomes_plus() {
        assert_eq!(
            url_dquote_escape("https://example.com/my tool"),
            "https://example.com/my+tool"
        );
    }

    #[test]
    fn test_url_dquote_escape_specials_percent_encoded() {
        assert_eq!(url_dquote_escape("a\nb\tc"), "a%0Ab%09c");
        assert_eq!(url_dquote_escape(r#"$`"\"#), "%24%60%22%5C");
        // URL structure characters are left alone.
        assert_eq!(
            url_dquote_escape("https://example.com/a?b=c&d=e#f"),
            "https://example.com/a?b=c&d=e#f"
        );
    }

    #[test]
    fn test_shell_quote_safe_string_unchanged() {
        assert_eq!(
            shell_quote("https://github.com/example/helper-0.1.0"),
            "https://github.com/example/helper-0.1.0"
        );
        assert_eq!(shell_quote("a@1.0,b=2"), "a@1.0,b=2");
    }

    #[test]
    fn test_shell_quote_wraps_unsafe_strings() {
        assert_eq!(shell_quote("repo;commit;subdir"), "'repo;commit;subdir'");
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn test_shell_quote_embedded_single_quote() {
        assert_eq!(shell_quote("it's fine"), r"'it'\''s fine'");
    }
}
