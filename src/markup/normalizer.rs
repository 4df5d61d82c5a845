//! String-level cleanup applied to raw markup before it is parsed.

use regex::Regex;
use std::sync::OnceLock;

/// Literal `\r\n` escape sequences left behind by the exporter.
const ESCAPED_EOL: &str = r"\r\n";
/// Literal `\"` escape sequences left behind by the exporter.
const ESCAPED_QUOTE: &str = r#"\""#;

fn inter_tag_whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r">\s+<").unwrap())
}

/// Delete every literal `\r\n` escape sequence.
pub fn remove_eol_chars(input: &str) -> String {
    input.replace(ESCAPED_EOL, "")
}

/// Collapse whitespace runs sitting strictly between `>` and `<`.
pub fn trim_spaces(input: &str) -> String {
    inter_tag_whitespace().replace_all(input, "><").into_owned()
}

/// Turn escaped double quotes back into plain double quotes.
pub fn normalize_quotes(input: &str) -> String {
    input.replace(ESCAPED_QUOTE, "\"")
}

/// Run the three cleanup steps until the text stops changing, in one pass.
///
/// Characters are appended to the output one at a time and any pattern the
/// new character completes is rewritten on the spot. The output never holds a
/// match, so every new match ends at its tail. The rewrites never overlap and
/// each one shortens the text, so the result is the same fixpoint whatever
/// order they are applied in (`\r\r\n\n`, `\\"` included).
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        out.push(c);
        reduce_tail(&mut out);
    }
    out
}

fn reduce_tail(out: &mut String) {
    loop {
        if out.ends_with(ESCAPED_EOL) {
            out.truncate(out.len() - ESCAPED_EOL.len());
            return;
        }
        if out.ends_with(ESCAPED_QUOTE) {
            // The new quote may complete another escape with the backslash before it.
            out.truncate(out.len() - ESCAPED_QUOTE.len());
            out.push('"');
            continue;
        }
        if out.ends_with('<') {
            let body = &out[..out.len() - 1];
            let kept = body.trim_end_matches(char::is_whitespace).len();
            if kept < body.len() && body[..kept].ends_with('>') {
                out.truncate(kept);
                out.push('<');
            }
        }
        return;
    }
}
