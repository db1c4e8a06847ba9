use regex::Regex;
use std::sync::LazyLock;

/// Pieces shorter than this many characters are dropped.
pub const DEFAULT_MIN_PARAGRAPH_CHARS: usize = 40;

// Blank line, or 2+ whitespace right after a period. The period is matched
// outside the capture group so it stays with the preceding piece.
static SPLIT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n|\.(\s{2,})").expect("valid split pattern"));

/// Splits text into paragraph-like pieces of at least `min_len` characters.
///
/// Returns an empty list when nothing survives; falling back to the whole
/// text is the caller's decision (see [`segment_or_whole`]).
pub fn segment(text: &str, min_len: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for caps in SPLIT_PATTERN.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let (cut_start, cut_end) = match caps.get(1) {
            Some(ws) => (ws.start(), ws.end()),
            None => (whole.start(), whole.end()),
        };
        pieces.push(&text[start..cut_start]);
        start = cut_end;
    }
    pieces.push(&text[start..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty() && p.chars().count() >= min_len)
        .map(str::to_string)
        .collect()
}

/// Segments `text`, or returns the whole trimmed text as a single piece when
/// segmentation yields nothing. Whitespace-only input yields an empty list.
pub fn segment_or_whole(text: &str, min_len: usize) -> Vec<String> {
    let pieces = segment(text, min_len);
    if !pieces.is_empty() {
        return pieces;
    }

    let whole = text.trim();
    if whole.is_empty() {
        Vec::new()
    } else {
        vec![whole.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARA_A: &str = "Rust guarantees memory safety without a garbage collector.";
    const PARA_B: &str = "Ownership and borrowing are checked at compile time by rustc.";

    #[test]
    fn test_two_paragraphs() {
        let text = format!("{PARA_A}\n\n{PARA_B}");
        assert_eq!(segment(&text, 40), vec![PARA_A, PARA_B]);
    }

    #[test]
    fn test_blank_line_with_spaces() {
        let text = format!("{PARA_A}\n   \t\n\n{PARA_B}");
        assert_eq!(segment(&text, 40), vec![PARA_A, PARA_B]);
    }

    #[test]
    fn test_sentence_boundary_keeps_period() {
        let text = format!("{PARA_A}  {PARA_B}");
        let pieces = segment(&text, 40);
        assert_eq!(pieces, vec![PARA_A, PARA_B]);
        assert!(pieces[0].ends_with('.'));
    }

    #[test]
    fn test_single_space_after_period_does_not_split() {
        let text = format!("{PARA_A} {PARA_B}");
        assert_eq!(segment(&text, 40).len(), 1);
    }

    #[test]
    fn test_single_newline_does_not_split() {
        let text = format!("{PARA_A}\n{PARA_B}");
        assert_eq!(segment(&text, 40).len(), 1);
    }

    #[test]
    fn test_short_text_yields_nothing() {
        assert!(segment("too short", 40).is_empty());
        assert!(segment("", 40).is_empty());
    }

    #[test]
    fn test_short_pieces_filtered() {
        let text = format!("Title\n\n{PARA_A}\n\nEnd.");
        assert_eq!(segment(&text, 40), vec![PARA_A]);
    }

    #[test]
    fn test_min_len_counts_chars() {
        // 10 multi-byte chars, 30 bytes
        let text = "日本語のテキストです";
        assert_eq!(segment(text, 10).len(), 1);
        assert!(segment(text, 11).is_empty());
    }

    #[test]
    fn test_segment_or_whole_fallback() {
        assert_eq!(segment_or_whole("  ten chars \n", 40), vec!["ten chars"]);
        assert!(segment_or_whole(" \n\n \t", 40).is_empty());

        let text = format!("{PARA_A}\n\n{PARA_B}");
        assert_eq!(segment_or_whole(&text, 40).len(), 2);
    }
}
