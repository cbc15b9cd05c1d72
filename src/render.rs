//! Message rendering: split message text into plain and fenced-code segments.
//!
//! A fence is three backticks, an optional word-character language tag, a
//! newline, a non-empty body, and a closing three backticks. Anything that
//! does not form a complete fence stays plain text, so parsing never fails.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::theme::Theme;

/// Language reported for fences without a tag.
pub const DEFAULT_LANGUAGE: &str = "text";

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```([A-Za-z0-9_]+)?\n(.+?)```").expect("fence pattern must compile"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Plain text, line breaks preserved.
    Text(&'a str),
    /// Fenced code, body trimmed once at both ends.
    Code { language: &'a str, content: &'a str },
}

/// Split `content` into ordered segments.
#[must_use]
pub fn parse_segments(content: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in FENCE_RE.captures_iter(content) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Text(&content[last..whole.start()]));
        }
        let language = caps.get(1).map_or(DEFAULT_LANGUAGE, |m| m.as_str());
        segments.push(Segment::Code { language, content: body.as_str().trim() });
        last = whole.end();
    }

    if last < content.len() {
        segments.push(Segment::Text(&content[last..]));
    }
    segments
}

/// Render message text for the terminal, colouring code blocks with the
/// theme palette.
#[must_use]
pub fn format_message(content: &str, theme: Theme) -> String {
    let palette = theme.palette();
    let mut out = String::with_capacity(content.len());

    for segment in parse_segments(content) {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Code { language, content } => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                let _ = writeln!(out, "{}┌─ {language}{}", palette.accent, palette.reset);
                for line in content.lines() {
                    let _ = writeln!(out, "{}│{} {}{line}{}", palette.accent, palette.reset, palette.code, palette.reset);
                }
                let _ = write!(out, "{}└─{}", palette.accent, palette.reset);
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;
