//! Conservative HTML cleanup.
//!
//! The pipeline deliberately does not collapse inter-tag whitespace (the
//! markup relies on it); cleanup is limited to:
//! - stripping `<!-- ... -->` comments
//! - trimming trailing whitespace and dropping blank lines
//!
//! Raw-text elements (`script`, `style`, `pre`, `textarea`) are copied
//! through verbatim.

use regex::Regex;
use std::sync::LazyLock;

/// Comment span, non-greedy across lines.
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

/// Opening tag of a raw-text element.
static RAW_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(script|style|pre|textarea)\b").expect("valid regex"));

/// Clean an HTML document.
pub fn clean(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while !rest.is_empty() {
        let comment = COMMENT_RE.find(rest);
        let raw = RAW_OPEN_RE.find(rest);

        match (comment, raw) {
            // Comment before any raw element: drop it
            (Some(c), r) if r.is_none_or(|r| c.start() < r.start()) => {
                tidy_into(&mut out, &rest[..c.start()]);
                rest = &rest[c.end()..];
            }
            // Raw element first: copy through its closing tag untouched
            (_, Some(r)) => {
                tidy_into(&mut out, &rest[..r.start()]);
                let tag = &rest[r.start() + 1..r.end()];
                let end = raw_element_end(&rest[r.start()..], tag);
                out.push_str(&rest[r.start()..r.start() + end]);
                rest = &rest[r.start() + end..];
            }
            (_, None) => {
                tidy_into(&mut out, rest);
                break;
            }
        }
    }

    out
}

/// Byte length of the raw element starting at the beginning of `s`,
/// including its closing tag. Falls back to the whole remainder when the
/// element is unclosed.
fn raw_element_end(s: &str, tag: &str) -> usize {
    let close = Regex::new(&format!(r"(?i)</{}\s*>", regex::escape(tag))).expect("valid regex");
    match close.find(s) {
        Some(m) => m.end(),
        None => s.len(),
    }
}

/// Append `text` with trailing whitespace trimmed and blank lines dropped.
///
/// A trailing partial line (no `\n`) is copied verbatim: it may continue
/// with a raw element or a comment on the same source line, where trimming
/// would eat significant inter-word whitespace.
fn tidy_into(out: &mut String, text: &str) {
    for line in text.split_inclusive('\n') {
        if !line.ends_with('\n') {
            out.push_str(line);
            continue;
        }
        let trimmed = line.trim_end();
        if !trimmed.is_empty() {
            out.push_str(trimmed);
            out.push('\n');
        }
    }
}
