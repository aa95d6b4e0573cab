//! Free-text cleanup applied to every textual field during normalization.

/// Collapses line breaks, tabs, backslashes and whitespace runs into single
/// spaces and folds typographic quotes and dashes to ASCII.
pub fn sanitize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        let c = match c {
            '\n' | '\r' | '\t' | '\\' => ' ',
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{00AB}' | '\u{00BB}' => '"',
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{00B4}' => '\'',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{00A0}' => ' ',
            c if c.is_control() => ' ',
            c => c,
        };

        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(c);
    }

    out
}
