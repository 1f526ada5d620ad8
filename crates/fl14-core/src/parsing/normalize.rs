/// Flatten extracted table text into a single clean line.
///
/// Whitespace runs (including line breaks) become one space, the ends are
/// trimmed, and anything other than alphanumerics, `_`, `-`, `/`, `(`, `)`,
/// `.` and space is dropped.
pub fn normalize_span(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if !is_kept(c) {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }

    out
}

fn is_kept(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '/' | '(' | ')' | '.')
}
