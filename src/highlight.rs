//! HTML-safe excerpt with query words wrapped in `<mark>` tags.

/// Default excerpt length, in characters.
pub const DEFAULT_HIGHLIGHT_CHARS: usize = 420;

const MAX_QUERY_WORDS: usize = 6;
const OPEN: &str = "<mark>";
const CLOSE: &str = "</mark>";

/// Escapes `&`, `<`, `>`, `"` and `'` for embedding in HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Upper-cases the first character and lower-cases the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Up to six distinct lowercase query words longer than two characters.
pub fn query_words(query: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for w in query.to_lowercase().split_whitespace() {
        if w.chars().count() > 2 && !words.iter().any(|seen| seen == w) {
            words.push(w.to_string());
            if words.len() == MAX_QUERY_WORDS {
                break;
            }
        }
    }
    words
}

/// Escapes `text` and wraps occurrences of the query words in `<mark>`.
///
/// Only the all-lowercase and the capitalized spelling of each word are
/// matched ("quick" and "Quick", never "QUICK"). Words are replaced one
/// after another over the whole string, so a later word also matches inside
/// markup added for an earlier one. Output longer than
/// `max_chars` characters is cut and suffixed with `…`, even if that splits
/// a tag.
pub fn highlight(text: &str, query: &str, max_chars: usize) -> String {
    let mut rendered = escape_html(text);
    for word in query_words(query) {
        for form in [escape_html(&word), escape_html(&capitalize(&word))] {
            rendered = rendered.replace(&form, &format!("{OPEN}{form}{CLOSE}"));
        }
    }

    if rendered.chars().count() <= max_chars {
        return rendered;
    }
    let mut cut: String = rendered.chars().take(max_chars).collect();
    cut.push('…');
    cut
}
