// src/convert/plaintext.rs
//! Stripping markdown down to plaintext.
//!
//! `to_plaintext` is pure, deterministic, and idempotent: its output
//! contains no remaining markdown syntax, so re-running it on its own
//! output is a no-op. Fenced code is removed content and all (code is
//! not narration); link labels survive their targets.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Fenced code blocks, content included.
    static ref FENCED_CODE: Regex =
        Regex::new(r"(?s)```.*?```").expect("fenced code regex must compile");
    /// Any HTML tag (covers <u>, <details>, <summary>, comments aside).
    static ref HTML_TAG: Regex =
        Regex::new(r"<[^>\n]+>").expect("html tag regex must compile");
    /// HTML comments, the converter's inert markers included.
    static ref HTML_COMMENT: Regex =
        Regex::new(r"(?s)<!--.*?-->").expect("html comment regex must compile");
    /// Markdown links: keep the label, drop the target.
    static ref LINK: Regex =
        Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("link regex must compile");
    /// Emphasis via paired single asterisks.
    static ref ITALIC: Regex =
        Regex::new(r"\*([^*\n]+)\*").expect("italic regex must compile");
    /// One leading line marker: heading, quote, bullet, number, checkbox.
    static ref LINE_MARKER: Regex = Regex::new(
        r"^(?:#{1,6}[ \t]+|>[ \t]*|[-*+][ \t]+|\d+\.[ \t]+|\[[ xX]\][ \t]*)"
    )
    .expect("line marker regex must compile");
    /// A horizontal rule on a line of its own.
    static ref HORIZONTAL_RULE: Regex =
        Regex::new(r"^\s*(?:-{3,}|\*{3,}|_{3,})\s*$").expect("rule regex must compile");
    /// Three or more consecutive blank lines.
    static ref EXCESS_BLANKS: Regex =
        Regex::new(r"\n{4,}").expect("blank collapse regex must compile");
}

/// Converts markdown to plaintext. Idempotent by construction: every
/// rule runs until its pattern no longer occurs.
pub fn to_plaintext(markdown: &str) -> String {
    let text = FENCED_CODE.replace_all(markdown, "");
    let text = HTML_COMMENT.replace_all(&text, "");
    let text = HTML_TAG.replace_all(&text, "");
    let text = LINK.replace_all(&text, "$1");

    let text = text.replace("**", "").replace("~~", "").replace('`', "");
    let text = strip_italics(&text);

    let text = text
        .lines()
        .filter(|line| !HORIZONTAL_RULE.is_match(line))
        .map(strip_line_markers)
        .collect::<Vec<_>>()
        .join("\n");

    let text = EXCESS_BLANKS.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Removes paired-asterisk emphasis until none remains; an unpaired
/// asterisk (plain prose) is left alone.
fn strip_italics(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = ITALIC.replace_all(&current, "$1").into_owned();
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Strips leading whitespace and stacked line markers from one line.
///
/// Markers are stripped repeatedly so `> - [x] done` flattens in a
/// single call, which is what makes the extractor idempotent.
fn strip_line_markers(line: &str) -> String {
    let mut current = line.trim_start();
    loop {
        let stripped = LINE_MARKER.replace(current, "");
        let stripped = stripped.trim_start();
        if stripped == current {
            return current.to_string();
        }
        // Move forward inside the original line without reallocating.
        current = &line[line.len() - stripped.len()..];
    }
}
