/// Canonicalize decoded text: drop a leading BOM, unify newlines to `\n`,
/// trim trailing whitespace per line and trailing newlines overall.
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let text = raw.trim_start_matches('\u{feff}');
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let joined = text
        .split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");

    joined.trim_end_matches('\n').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_crlf() {
        assert_eq!(normalize("a\r\nb\r\n"), "a\nb");
        assert_eq!(normalize("hello\r\nworld\r\n"), "hello\nworld");
    }

    #[test]
    fn test_lone_cr() {
        assert_eq!(normalize("a\rb"), "a\nb");
    }

    #[test]
    fn test_bom_only() {
        assert_eq!(normalize("\u{feff}"), "");
    }

    #[test]
    fn test_bom_prefix() {
        assert_eq!(normalize("\u{feff}title\n"), "title");
    }

    #[test]
    fn test_trailing_whitespace_kept_internal_blank_lines() {
        assert_eq!(normalize("  one  \t\n\n  two   \n\n\n"), "  one\n\n  two");
    }
}
